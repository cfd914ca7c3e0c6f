//! 局面编码
//!
//! 9 个 ASCII 字符，行优先，无分隔符：
//! `'0'` 空格，`'1'` X（玩家 0），`'2'` O（玩家 1）
//!
//! 示例：X 在左上、O 在中心 → `100020000`

use crate::board::Board;
use crate::constants::{CELL_COUNT, EMPTY_CHAR, INITIAL_STATE};
use crate::error::GameError;
use crate::piece::Side;

/// 定长局面缓冲区，搜索时原地修改并回溯
pub type StateBytes = [u8; CELL_COUNT];

/// 局面编码处理
pub struct Encoding;

impl Encoding {
    /// 将棋盘编码到定长缓冲区
    pub fn encode_bytes(board: &Board) -> StateBytes {
        let mut state = [EMPTY_CHAR; CELL_COUNT];
        for (i, c) in state.iter_mut().enumerate() {
            if let Some(side) = board.get(i) {
                *c = side.to_state_char();
            }
        }
        state
    }

    /// 将棋盘编码为字符串
    pub fn encode(board: &Board) -> String {
        Self::bytes_to_string(&Self::encode_bytes(board))
    }

    /// 缓冲区转字符串（只含 ASCII）
    pub fn bytes_to_string(state: &StateBytes) -> String {
        state.iter().map(|&b| b as char).collect()
    }

    /// 解析字符串为定长缓冲区
    pub fn decode_bytes(s: &str) -> Result<StateBytes, GameError> {
        let bytes = s.as_bytes();
        if bytes.len() != CELL_COUNT {
            return Err(GameError::InvalidState {
                reason: format!("Expected {} characters, got {}", CELL_COUNT, bytes.len()),
            });
        }

        let mut state = [EMPTY_CHAR; CELL_COUNT];
        for (i, &c) in bytes.iter().enumerate() {
            if c != EMPTY_CHAR && Side::from_state_char(c).is_none() {
                return Err(GameError::InvalidState {
                    reason: format!("Invalid cell character at {}: {:?}", i, c as char),
                });
            }
            state[i] = c;
        }
        Ok(state)
    }

    /// 从缓冲区构建棋盘
    pub fn board_from_bytes(state: &StateBytes) -> Board {
        let mut board = Board::empty();
        for (i, &c) in state.iter().enumerate() {
            board.set(i, Side::from_state_char(c));
        }
        board
    }

    /// 解析字符串为棋盘
    pub fn decode(s: &str) -> Result<Board, GameError> {
        Self::decode_bytes(s).map(|state| Self::board_from_bytes(&state))
    }

    /// 初始局面
    pub fn initial() -> Board {
        Self::decode(INITIAL_STATE).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        assert_eq!(Encoding::encode(&Board::empty()), INITIAL_STATE);
        assert_eq!(Encoding::initial(), Board::empty());
    }

    #[test]
    fn test_encode_marks() {
        let mut board = Board::empty();
        board.set(0, Some(Side::X));
        board.set(4, Some(Side::O));
        assert_eq!(Encoding::encode(&board), "100020000");
    }

    #[test]
    fn test_decode() {
        let board = Encoding::decode("110020000").unwrap();
        assert_eq!(board.get(0), Some(Side::X));
        assert_eq!(board.get(1), Some(Side::X));
        assert_eq!(board.get(2), None);
        assert_eq!(board.get(4), Some(Side::O));
        assert_eq!(board.empties().count(), 6);
    }

    #[test]
    fn test_reencode_is_stable() {
        for s in ["000000000", "100020000", "121121212", "212010000", "111222000"] {
            let board = Encoding::decode(s).unwrap();
            let encoded = Encoding::encode(&board);
            assert_eq!(encoded, s);
            let again = Encoding::decode(&encoded).unwrap();
            assert_eq!(Encoding::encode(&again), s);
        }
    }

    #[test]
    fn test_invalid_state() {
        // 长度不对
        assert!(Encoding::decode("0000").is_err());
        assert!(Encoding::decode("0000000000").is_err());

        // 非法字符
        assert!(Encoding::decode("00003000x").is_err());
        assert!(matches!(
            Encoding::decode("0000a0000"),
            Err(GameError::InvalidState { .. })
        ));
    }
}
