//! 井字棋 AI 引擎
//!
//! 包含:
//! - Negamax 穷举搜索（无剪枝、无深度限制）
//! - 难度配置

mod search;

pub use search::{AiConfig, AiEngine, Difficulty, SearchReport, AI_COLOR, DRAW_SCORE, HUMAN_COLOR, LOSS_SCORE};
