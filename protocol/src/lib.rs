//! 井字棋共享协议库
//!
//! 包含:
//! - 棋子、棋盘、位置等核心数据结构
//! - 局面编码 (9 字符字符串)
//! - 终局判定 (获胜三元组、和棋)
//! - 棋谱格式 (JSON)

mod board;
mod constants;
mod error;
mod outcome;
mod piece;
mod record;
mod state;

pub use board::Board;
pub use constants::*;
pub use error::{GameError, ProtocolError, Result};
pub use outcome::{GameResult, Outcome};
pub use piece::{Position, Side};
pub use record::{GameMetadata, GameRecord, MoveRecord, SaveInfo, RECORD_VERSION};
pub use state::{Encoding, StateBytes};
