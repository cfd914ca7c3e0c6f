use std::io;

use anyhow::Result;
use tictactoe_ai::AiEngine;
use tictactoe_client::{GameLog, GameSettings, Session, StorageManager};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // 初始化日志，游戏日志已在棋盘下方显示，默认只输出警告
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("tictactoe=warn".parse()?))
        .init();

    info!("井字棋启动中...");

    let settings = GameSettings::load();

    let log = if settings.log_to_file {
        GameLog::with_file(&settings.log_file)?
    } else {
        GameLog::new()
    };

    let storage = match StorageManager::new() {
        Ok(storage) => Some(storage),
        Err(e) => {
            warn!("存档不可用: {:#}", e);
            None
        }
    };

    let engine = AiEngine::from_difficulty(settings.difficulty);
    let mut session = Session::new(settings, log, engine, storage);

    // 可选参数：启动时加载存档
    if let Some(id) = std::env::args().nth(1) {
        if let Err(e) = session.load(&id) {
            session.log.error(format!("加载失败: {:#}", e));
        }
    }

    session.run(io::stdin().lock(), io::stdout())?;

    info!("井字棋退出");
    Ok(())
}
