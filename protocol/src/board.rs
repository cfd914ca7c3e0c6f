//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::CELL_COUNT;
use crate::outcome::Outcome;
use crate::piece::{Position, Side};
use crate::state::Encoding;

/// 棋盘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    /// 3x3 棋盘，索引为 y * 3 + x
    squares: [Option<Side>; CELL_COUNT],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self::default()
    }

    /// 获取指定索引的棋子
    pub fn get(&self, index: usize) -> Option<Side> {
        self.squares.get(index).copied().flatten()
    }

    /// 获取指定位置的棋子
    pub fn get_at(&self, pos: Position) -> Option<Side> {
        if pos.is_valid() {
            self.squares[pos.to_index()]
        } else {
            None
        }
    }

    /// 设置指定索引的棋子，越界时忽略
    pub fn set(&mut self, index: usize, side: Option<Side>) {
        if let Some(square) = self.squares.get_mut(index) {
            *square = side;
        }
    }

    /// 格子是否为空（越界视为非空）
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.squares.get(index), Some(None))
    }

    /// 所有空格索引（升序）
    pub fn empties(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CELL_COUNT).filter(|&i| self.squares[i].is_none())
    }

    /// 棋盘是否已满
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(Option::is_some)
    }

    /// 指定阵营的棋子数
    pub fn count(&self, side: Side) -> usize {
        self.squares.iter().filter(|&&s| s == Some(side)).count()
    }

    /// 根据双方棋子数推断走子方（X 先手）
    ///
    /// 棋子数不满足 `X - O ∈ {0, 1}` 时返回 None
    pub fn side_to_move(&self) -> Option<Side> {
        let x = self.count(Side::X);
        let o = self.count(Side::O);
        if x == o {
            Some(Side::X)
        } else if x == o + 1 {
            Some(Side::O)
        } else {
            tracing::warn!("不可达局面: X={}, O={}", x, o);
            None
        }
    }

    /// 判定终局状态
    pub fn outcome(&self) -> Outcome {
        Outcome::detect(&Encoding::encode_bytes(self))
    }
}
