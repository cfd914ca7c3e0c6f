//! 棋谱记录格式
//!
//! JSON 格式的对局存储，局面以 9 字符编码保存，可随时恢复

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::INITIAL_STATE;
use crate::error::{GameError, Result};
use crate::outcome::GameResult;
use crate::piece::Side;
use crate::state::Encoding;

/// 棋谱版本
pub const RECORD_VERSION: &str = "1.0";

/// 游戏元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    /// X 方玩家名
    pub x_player: String,
    /// O 方玩家名
    pub o_player: String,
    /// 游戏日期
    pub date: String,
    /// 游戏结果
    pub result: Option<GameResult>,
    /// AI 难度（人机模式）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_difficulty: Option<String>,
}

/// 走法记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 落子格子索引 (0-8)
    pub cell: usize,
    /// 落子方
    pub side: Side,
    /// 落子后的局面编码
    pub state: String,
}

impl MoveRecord {
    /// 创建新的走法记录
    pub fn new(cell: usize, side: Side, state: String) -> Self {
        Self { cell, side, state }
    }
}

/// 保存信息（用于中途保存的棋局）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveInfo {
    /// 保存时间
    pub saved_at: DateTime<Utc>,
    /// 保存时的局面编码
    pub state: String,
    /// 保存时的走子方，终局时为 None
    pub current_turn: Option<Side>,
}

/// 完整的棋谱记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// 版本号
    pub version: String,
    /// 元数据
    pub metadata: GameMetadata,
    /// 初始局面编码
    pub initial_state: String,
    /// 走法列表
    pub moves: Vec<MoveRecord>,
    /// 保存信息（可选，用于中途保存）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_info: Option<SaveInfo>,
}

impl GameRecord {
    /// 创建新的棋谱记录
    pub fn new(x_player: String, o_player: String) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            metadata: GameMetadata {
                x_player,
                o_player,
                date: Utc::now().format("%Y-%m-%d").to_string(),
                result: None,
                ai_difficulty: None,
            },
            initial_state: INITIAL_STATE.to_string(),
            moves: Vec::new(),
            save_info: None,
        }
    }

    /// 设置 AI 难度
    pub fn set_ai_difficulty(&mut self, difficulty: &str) {
        self.metadata.ai_difficulty = Some(difficulty.to_string());
    }

    /// 从自定义局面创建
    pub fn from_state(x_player: String, o_player: String, state: String) -> Self {
        let mut record = Self::new(x_player, o_player);
        record.initial_state = state;
        record
    }

    /// 添加走法
    pub fn add_move(&mut self, mv: MoveRecord) {
        self.moves.push(mv);
    }

    /// 设置游戏结果
    pub fn set_result(&mut self, result: GameResult) {
        self.metadata.result = Some(result);
    }

    /// 最新局面：优先取保存信息，其次最后一步，最后是初始局面
    pub fn latest_state(&self) -> &str {
        if let Some(ref info) = self.save_info {
            return &info.state;
        }
        self.moves
            .last()
            .map(|mv| mv.state.as_str())
            .unwrap_or(&self.initial_state)
    }

    /// 检查记录中的所有局面编码
    pub fn validate(&self) -> std::result::Result<(), GameError> {
        Encoding::decode_bytes(&self.initial_state)?;
        for mv in &self.moves {
            Encoding::decode_bytes(&mv.state)?;
        }
        if let Some(ref info) = self.save_info {
            Encoding::decode_bytes(&info.state)?;
        }
        Ok(())
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从 JSON 字符串解析并校验局面
    pub fn from_json(json: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(json)?;
        record.validate()?;
        Ok(record)
    }
}
