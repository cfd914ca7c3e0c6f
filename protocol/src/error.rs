//! 错误类型定义

use thiserror::Error;

/// 井字棋规则错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// 无效的位置
    #[error("Invalid position: {index}")]
    InvalidPosition { index: usize },

    /// 无效的局面编码
    #[error("Invalid state string: {reason}")]
    InvalidState { reason: String },

    /// 格子已被占用
    #[error("Cell {index} is already occupied")]
    CellOccupied { index: usize },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 规则错误
    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
