//! 对局逻辑

mod holder;
mod state;

pub use holder::{Bit, Holder, ScreenPos};
pub use state::TicTacToe;
