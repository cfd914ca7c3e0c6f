//! 本地棋局存储系统
//!
//! 每个存档是保存目录下的一个 JSON 棋谱文件，文件名即存档 ID

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use protocol::{GameRecord, SaveInfo, Side};

/// 存档文件扩展名
const SAVE_EXTENSION: &str = "json";

/// 存储管理器
#[derive(Debug, Clone)]
pub struct StorageManager {
    saves_dir: PathBuf,
}

impl StorageManager {
    /// 使用 `<data_dir>/tictactoe/saves` 创建
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir().context("无法获取应用数据目录")?;
        Self::with_directory(data_dir.join("tictactoe").join("saves"))
    }

    /// 使用指定目录创建，目录不存在时自动创建
    pub fn with_directory(saves_dir: impl Into<PathBuf>) -> Result<Self> {
        let saves_dir = saves_dir.into();
        fs::create_dir_all(&saves_dir)
            .with_context(|| format!("无法创建存储目录: {:?}", saves_dir))?;
        Ok(Self { saves_dir })
    }

    pub fn saves_directory(&self) -> &Path {
        &self.saves_dir
    }

    /// 存档 ID 对应的文件路径
    ///
    /// ID 只能是保存目录下的文件名，不能带路径分隔符或指向上级目录。
    fn game_path(&self, game_id: &str) -> Result<PathBuf> {
        let is_plain_name = !game_id.is_empty()
            && game_id != "."
            && game_id != ".."
            && !game_id.contains(['/', '\\'])
            && Path::new(game_id).file_name() == Some(OsStr::new(game_id));
        anyhow::ensure!(is_plain_name, "无效的存档 ID: {}", game_id);
        Ok(self.saves_dir.join(game_id))
    }

    /// 写入存档，返回存档 ID
    pub fn save_game(
        &self,
        record: &mut GameRecord,
        state: &str,
        current_turn: Option<Side>,
    ) -> Result<String> {
        let saved_at = Utc::now();
        record.save_info = Some(SaveInfo {
            saved_at,
            state: state.to_string(),
            current_turn,
        });

        let game_id = save_file_name(&saved_at, record);
        let json = record.to_json().context("序列化棋谱失败")?;
        let path = self.saves_dir.join(&game_id);
        fs::write(&path, json).with_context(|| format!("写入文件失败: {:?}", path))?;

        tracing::info!(game_id = %game_id, "棋局已保存");
        Ok(game_id)
    }

    /// 读取存档
    pub fn load_game(&self, game_id: &str) -> Result<GameRecord> {
        let path = self.game_path(game_id)?;
        let json = fs::read_to_string(&path)
            .with_context(|| format!("读取存档失败: {}", game_id))?;
        GameRecord::from_json(&json).with_context(|| format!("解析存档失败: {}", game_id))
    }

    /// 列出存档，最近保存的在前；无法解析的文件跳过
    pub fn list_saved_games(&self) -> Result<Vec<SavedGameInfo>> {
        let entries = fs::read_dir(&self.saves_dir)
            .with_context(|| format!("读取存储目录失败: {:?}", self.saves_dir))?;

        let mut games = Vec::new();
        for entry in entries {
            let path = entry.context("读取目录项失败")?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            let Some(game_id) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match self.load_game(game_id) {
                Ok(record) => {
                    let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
                    games.push(SavedGameInfo::from_record(game_id, &record, modified));
                }
                Err(e) => tracing::warn!("跳过损坏的存档 {}: {:#}", game_id, e),
            }
        }

        games.sort_by_key(|info| std::cmp::Reverse(info.saved_at));
        Ok(games)
    }

    /// 删除存档，不存在时什么也不做
    pub fn delete_game(&self, game_id: &str) -> Result<()> {
        let path = self.game_path(game_id)?;
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("删除存档失败: {}", game_id))?;
            tracing::info!(game_id, "棋局已删除");
        }
        Ok(())
    }
}

/// 存档摘要
#[derive(Debug, Clone)]
pub struct SavedGameInfo {
    /// 存档 ID（文件名）
    pub game_id: String,
    pub x_player: String,
    pub o_player: String,
    pub saved_at: DateTime<Utc>,
    pub move_count: usize,
    pub ai_difficulty: Option<String>,
}

impl SavedGameInfo {
    /// 从棋谱生成摘要；没有保存信息时用文件修改时间
    fn from_record(game_id: &str, record: &GameRecord, modified: Option<SystemTime>) -> Self {
        let saved_at = record
            .save_info
            .as_ref()
            .map(|info| info.saved_at)
            .or_else(|| modified.map(DateTime::from))
            .unwrap_or_else(Utc::now);

        Self {
            game_id: game_id.to_string(),
            x_player: record.metadata.x_player.clone(),
            o_player: record.metadata.o_player.clone(),
            saved_at,
            move_count: record.moves.len(),
            ai_difficulty: record.metadata.ai_difficulty.clone(),
        }
    }

    pub fn formatted_time(&self) -> String {
        self.saved_at.format("%Y-%m-%d %H:%M").to_string()
    }

    /// `X方 vs O方`，人机对局显示 AI 难度
    pub fn display_name(&self) -> String {
        match self.ai_difficulty {
            Some(ref diff) => format!("{} vs AI({})", self.x_player, diff),
            None => format!("{} vs {}", self.x_player, self.o_player),
        }
    }
}

/// 存档文件名：`时间戳_X方vsO方.json`
fn save_file_name(saved_at: &DateTime<Utc>, record: &GameRecord) -> String {
    format!(
        "{}_{}vs{}.{}",
        saved_at.format("%Y%m%d_%H%M%S%3f"),
        clean_name(&record.metadata.x_player),
        clean_name(&record.metadata.o_player),
        SAVE_EXTENSION
    )
}

/// 去掉不能出现在文件名里的字符
fn clean_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_control() || "/\\:*?\"<>|".contains(c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::MoveRecord;

    fn sample_record() -> GameRecord {
        let mut record = GameRecord::new("玩家".to_string(), "AI".to_string());
        record.set_ai_difficulty("困难");
        record.add_move(MoveRecord::new(4, Side::X, "000010000".to_string()));
        record.add_move(MoveRecord::new(0, Side::O, "200010000".to_string()));
        record
    }

    #[test]
    fn test_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::with_directory(dir.path().join("saves")).unwrap();
        assert!(storage.saves_directory().exists());

        let mut record = sample_record();
        let id = storage
            .save_game(&mut record, "200010000", Some(Side::X))
            .unwrap();
        assert!(id.ends_with("_玩家vsAI.json"));

        let loaded = storage.load_game(&id).unwrap();
        assert_eq!(loaded.moves, record.moves);
        assert_eq!(loaded.latest_state(), "200010000");
        assert_eq!(
            loaded.save_info.as_ref().and_then(|s| s.current_turn),
            Some(Side::X)
        );

        let games = storage.list_saved_games().unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, id);
        assert_eq!(games[0].move_count, 2);
        assert_eq!(games[0].display_name(), "玩家 vs AI(困难)");

        storage.delete_game(&id).unwrap();
        assert!(storage.load_game(&id).is_err());
        assert!(storage.list_saved_games().unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::with_directory(dir.path()).unwrap();

        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let mut record = sample_record();
        storage.save_game(&mut record, "200010000", Some(Side::X)).unwrap();

        let games = storage.list_saved_games().unwrap();
        assert_eq!(games.len(), 1);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::with_directory(dir.path()).unwrap();
        assert!(storage.load_game("missing.json").is_err());
        // 删除不存在的存档不报错
        assert!(storage.delete_game("missing.json").is_ok());
    }

    #[test]
    fn test_rejects_paths_outside_saves_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::with_directory(dir.path().join("saves")).unwrap();

        // 保存目录之外的合法棋谱
        let outside = dir.path().join("outside.json");
        fs::write(&outside, sample_record().to_json().unwrap()).unwrap();

        for id in [
            "../outside.json",
            outside.to_str().unwrap(),
            "/etc/passwd",
            "..\\outside.json",
            "..",
            "",
        ] {
            assert!(storage.load_game(id).is_err(), "{}", id);
            assert!(storage.delete_game(id).is_err(), "{}", id);
        }
        assert!(outside.exists());
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("a/b:c"), "a_b_c");
        assert_eq!(clean_name("  名字 "), "名字");
    }
}
