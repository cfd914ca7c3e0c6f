//! 井字棋客户端
//!
//! 对局控制、日志服务、设置、存档和终端宿主

pub mod game;
pub mod host;
pub mod log;
pub mod settings;
pub mod storage;
pub mod view;

pub use game::TicTacToe;
pub use host::{parse_command, Command, Session};
pub use log::GameLog;
pub use settings::GameSettings;
pub use storage::StorageManager;
