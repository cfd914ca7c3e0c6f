//! 终局判定

use serde::{Deserialize, Serialize};

use crate::constants::{EMPTY_CHAR, WINNING_TRIPLES};
use crate::piece::Side;
use crate::state::StateBytes;

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// X 胜
    XWin,
    /// O 胜
    OWin,
    /// 和棋
    Draw,
}

impl GameResult {
    /// 获胜方，和棋返回 None
    pub fn winner(&self) -> Option<Side> {
        match self {
            GameResult::XWin => Some(Side::X),
            GameResult::OWin => Some(Side::O),
            GameResult::Draw => None,
        }
    }

    /// 某方获胜的结果
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::X => GameResult::XWin,
            Side::O => GameResult::OWin,
        }
    }
}

/// 局面判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    /// 获胜方
    pub winner: Option<Side>,
    /// 是否和棋（棋盘已满且无人获胜）
    pub is_draw: bool,
    /// 获胜的三元组
    pub line: Option<[usize; 3]>,
}

impl Outcome {
    /// 判定局面
    ///
    /// 按固定顺序扫描 8 个三元组，第一个三格同色的三元组决定胜者；
    /// 否则棋盘全满即为和棋。
    pub fn detect(state: &StateBytes) -> Self {
        for triple in WINNING_TRIPLES {
            let first = state[triple[0]];
            if first == EMPTY_CHAR {
                continue;
            }
            if state[triple[1]] != first || state[triple[2]] != first {
                continue;
            }
            if let Some(side) = Side::from_state_char(first) {
                return Self {
                    winner: Some(side),
                    is_draw: false,
                    line: Some(triple),
                };
            }
        }

        Self {
            winner: None,
            is_draw: state.iter().all(|&c| c != EMPTY_CHAR),
            line: None,
        }
    }

    /// 是否终局
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }

    /// 转换为游戏结果，未终局返回 None
    pub fn result(&self) -> Option<GameResult> {
        match (self.winner, self.is_draw) {
            (Some(side), _) => Some(GameResult::win_for(side)),
            (None, true) => Some(GameResult::Draw),
            (None, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Encoding;

    fn detect(s: &str) -> Outcome {
        Outcome::detect(&Encoding::decode_bytes(s).unwrap())
    }

    #[test]
    fn test_every_triple_wins() {
        for triple in WINNING_TRIPLES {
            for side in [Side::X, Side::O] {
                let mut state = *b"000000000";
                for i in triple {
                    state[i] = side.to_state_char();
                }
                let outcome = Outcome::detect(&state);
                assert_eq!(outcome.winner, Some(side), "triple {:?}", triple);
                assert_eq!(outcome.line, Some(triple));
                assert!(!outcome.is_draw);
            }
        }
    }

    #[test]
    fn test_win_ignores_rest_of_board() {
        // 左列全是 X，其余格子随意
        let outcome = detect("121122100");
        assert_eq!(outcome.winner, Some(Side::X));
        assert_eq!(outcome.line, Some([0, 3, 6]));
    }

    #[test]
    fn test_completed_row_scenario() {
        // 人类在 2 号格完成第一行
        assert_eq!(detect("110020000").winner, None);
        let outcome = detect("111020000");
        assert_eq!(outcome.winner, Some(Side::X));
        assert_eq!(outcome.result(), Some(GameResult::XWin));
    }

    #[test]
    fn test_full_board_with_diagonals_is_win() {
        // 两条对角线都是 '1'，第一条 (0,4,8) 决定结果
        let outcome = detect("121212121");
        assert_eq!(outcome.winner, Some(Side::X));
        assert_eq!(outcome.line, Some([0, 4, 8]));
        assert!(!outcome.is_draw);
    }

    #[test]
    fn test_draw() {
        let outcome = detect("121121212");
        assert_eq!(outcome.winner, None);
        assert!(outcome.is_draw);
        assert!(outcome.is_terminal());
        assert_eq!(outcome.result(), Some(GameResult::Draw));
    }

    #[test]
    fn test_non_terminal() {
        for s in ["000000000", "100020000", "121121210", "012112221"] {
            let outcome = detect(s);
            assert_eq!(outcome.winner, None, "{}", s);
            assert!(!outcome.is_draw, "{}", s);
            assert!(!outcome.is_terminal());
            assert_eq!(outcome.result(), None);
        }
    }

    #[test]
    fn test_all_encodings() {
        const CHARS: [u8; 3] = [b'0', b'1', b'2'];

        for n in 0..3usize.pow(9) {
            let mut state = [b'0'; 9];
            let mut rest = n;
            for cell in state.iter_mut() {
                *cell = CHARS[rest % 3];
                rest /= 3;
            }
            let s = std::str::from_utf8(&state).unwrap();

            // 重新编码不变
            let board = Encoding::decode(s).unwrap();
            assert_eq!(Encoding::encode(&board), s);

            let outcome = Outcome::detect(&state);
            let first_triple = WINNING_TRIPLES.iter().find(|t| {
                state[t[0]] != b'0' && state[t[0]] == state[t[1]] && state[t[1]] == state[t[2]]
            });

            match first_triple {
                Some(triple) => {
                    assert_eq!(outcome.winner, Side::from_state_char(state[triple[0]]), "{}", s);
                    assert_eq!(outcome.line, Some(*triple), "{}", s);
                    assert!(!outcome.is_draw, "{}", s);
                }
                None if !state.contains(&b'0') => {
                    assert!(outcome.is_draw, "{}", s);
                    assert_eq!(outcome.winner, None, "{}", s);
                }
                None => {
                    assert!(!outcome.is_terminal(), "{}", s);
                    assert_eq!(outcome.line, None, "{}", s);
                }
            }
        }
    }

    #[test]
    fn test_board_outcome_matches_state() {
        let board = Encoding::decode("222110100").unwrap();
        assert_eq!(board.outcome().winner, Some(Side::O));
    }
}
