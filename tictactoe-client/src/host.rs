//! 终端宿主
//!
//! 解析玩家输入并驱动对局、AI、日志和存档

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use protocol::{GameResult, CELL_COUNT};
use tictactoe_ai::AiEngine;

use crate::game::TicTacToe;
use crate::log::GameLog;
use crate::settings::GameSettings;
use crate::storage::StorageManager;
use crate::view::{board_text, log_text};

/// AI 玩家显示名
const AI_NAME: &str = "AI";

/// 每次刷新显示的日志行数
const LOG_LINES: usize = 6;

const PROMPT: &str = "[1-9] 落子  r 重开  s 保存  ls 存档  l <id> 加载  d <id> 删除  q 退出 > ";

/// 玩家命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 在格子落子（0-8）
    Place(usize),
    /// 重新开始
    Reset,
    /// 保存棋局
    Save,
    /// 加载棋局
    Load(String),
    /// 列出存档
    List,
    /// 删除存档
    Delete(String),
    /// 退出
    Quit,
}

/// 解析一行输入；格子编号为 1-9
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "r" | "reset" => Some(Command::Reset),
        "s" | "save" => Some(Command::Save),
        "q" | "quit" | "exit" => Some(Command::Quit),
        "ls" | "list" => Some(Command::List),
        "l" | "load" if !rest.is_empty() => Some(Command::Load(rest.to_string())),
        "d" | "delete" if !rest.is_empty() => Some(Command::Delete(rest.to_string())),
        _ => {
            let n: usize = head.parse().ok()?;
            (1..=CELL_COUNT).contains(&n).then(|| Command::Place(n - 1))
        }
    }
}

/// 一次终端对局会话
pub struct Session {
    pub game: TicTacToe,
    pub log: GameLog,
    engine: AiEngine,
    storage: Option<StorageManager>,
    settings: GameSettings,
}

impl Session {
    /// 创建会话并摆好棋盘
    pub fn new(
        settings: GameSettings,
        log: GameLog,
        engine: AiEngine,
        storage: Option<StorageManager>,
    ) -> Self {
        let mut session = Self {
            game: TicTacToe::new(),
            log,
            engine,
            storage,
            settings,
        };
        session.game.set_up_board(&mut session.log);
        session
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// 轮到 AI 时让 AI 落子
    pub fn run_ai(&mut self) -> Option<usize> {
        self.game.update_ai(&mut self.engine, &mut self.log)
    }

    /// 处理一条命令，返回 false 表示退出
    pub fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Place(index) => {
                if !self.game.place_at(index, &mut self.log) {
                    self.log.warn(format!("无法在第 {} 格落子", index + 1));
                }
            }
            Command::Reset => self.game.reset(&mut self.log),
            Command::Save => {
                let id = self.save()?;
                self.log.info(format!("已保存: {}", id));
            }
            Command::Load(id) => self.load(&id)?,
            Command::List => {
                let storage = self.storage()?;
                let games = storage.list_saved_games()?;
                if games.is_empty() {
                    self.log.info("没有存档");
                }
                for info in games {
                    self.log.info(format!(
                        "{}  {}  {} 步  [{}]",
                        info.formatted_time(),
                        info.display_name(),
                        info.move_count,
                        info.game_id
                    ));
                }
            }
            Command::Delete(id) => {
                self.storage()?.delete_game(&id)?;
                self.log.info(format!("已删除: {}", id));
            }
            Command::Quit => {
                if self.settings.autosave && !self.game.is_game_over() && !self.game.history().is_empty() {
                    let id = self.save()?;
                    self.log.info(format!("已自动保存: {}", id));
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// 保存当前棋局，返回存档 ID
    pub fn save(&mut self) -> Result<String> {
        let mut record = self.game.to_record(&self.settings.human_name, AI_NAME);
        record.set_ai_difficulty(self.engine.config().difficulty.display_name());
        let state = self.game.state_string();
        let turn = self.game.current_player();
        self.storage()?.save_game(&mut record, &state, turn)
    }

    /// 加载存档
    pub fn load(&mut self, id: &str) -> Result<()> {
        let record = self.storage()?.load_game(id)?;
        self.game
            .restore_record(&record, &mut self.log)
            .with_context(|| format!("存档局面无效: {}", id))?;
        Ok(())
    }

    /// 交互主循环：AI 走棋、刷新显示、读取并执行一行命令
    ///
    /// 输入按字节读取，非 UTF-8 内容按有损方式转换。输入结束或读取失败
    /// 都按 `q` 处理，以便自动保存。
    pub fn run(&mut self, mut input: impl BufRead, mut output: impl Write) -> Result<()> {
        let mut buf = Vec::new();

        loop {
            self.run_ai();
            self.render(&mut output)?;

            buf.clear();
            let line = match input.read_until(b'\n', &mut buf) {
                Ok(0) => None,
                Ok(_) => Some(String::from_utf8_lossy(&buf).into_owned()),
                Err(e) => {
                    self.log.error(format!("读取输入失败: {}", e));
                    None
                }
            };

            let command = match line {
                None => Command::Quit,
                Some(line) => match parse_command(&line) {
                    Some(command) => command,
                    None => {
                        self.log.warn(format!("未知命令: {}", line.trim()));
                        continue;
                    }
                },
            };

            let is_quit = command == Command::Quit;
            match self.handle(command) {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => {
                    self.log.error(format!("{:#}", e));
                    if is_quit {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn render(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", board_text(&self.game.board()))?;
        writeln!(out)?;
        writeln!(out, "{}", self.status_line())?;
        writeln!(out, "{}", log_text(&self.log, LOG_LINES))?;
        write!(out, "{}", PROMPT)?;
        out.flush()?;
        Ok(())
    }

    /// 结果提示
    pub fn status_line(&self) -> String {
        match self.game.result() {
            Some(GameResult::Draw) => "和棋".to_string(),
            Some(result) => match result.winner() {
                Some(side) if Some(side) == self.game.ai_player() => format!("{} 获胜 (AI)", side),
                Some(side) => format!("{} 获胜", side),
                None => String::new(),
            },
            None => match self.game.current_player() {
                Some(side) => format!("轮到 {}", side),
                None => String::new(),
            },
        }
    }

    fn storage(&self) -> Result<&StorageManager> {
        self.storage.as_ref().context("存储不可用")
    }
}
