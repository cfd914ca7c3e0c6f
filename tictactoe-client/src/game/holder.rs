//! 棋子与格子
//!
//! `Bit` 是一个属于某个玩家的棋子，`Holder` 是棋盘上最多容纳一个棋子的格子。

use protocol::{Position, Side};

/// 屏幕坐标
pub type ScreenPos = (f32, f32);

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bit {
    owner: Side,
    position: ScreenPos,
}

impl Bit {
    /// 为指定玩家创建棋子
    pub fn new(owner: Side) -> Self {
        Self {
            owner,
            position: (0.0, 0.0),
        }
    }

    /// 棋子归属
    pub fn owner(&self) -> Side {
        self.owner
    }

    pub fn position(&self) -> ScreenPos {
        self.position
    }

    pub fn set_position(&mut self, position: ScreenPos) {
        self.position = position;
    }
}

/// 格子
#[derive(Debug, Clone, Default)]
pub struct Holder {
    position: ScreenPos,
    column: u8,
    row: u8,
    bit: Option<Bit>,
}

impl Holder {
    /// 初始化格子位置，清空棋子
    pub fn init_holder(&mut self, position: ScreenPos, column: u8, row: u8) {
        self.position = position;
        self.column = column;
        self.row = row;
        self.bit = None;
    }

    pub fn is_empty(&self) -> bool {
        self.bit.is_none()
    }

    pub fn bit(&self) -> Option<&Bit> {
        self.bit.as_ref()
    }

    /// 放入棋子（替换原有棋子）
    pub fn set_bit(&mut self, bit: Bit) {
        self.bit = Some(bit);
    }

    /// 移除棋子
    pub fn destroy_bit(&mut self) {
        self.bit = None;
    }

    pub fn position(&self) -> ScreenPos {
        self.position
    }

    /// 棋盘坐标
    pub fn grid_position(&self) -> Position {
        Position::new_unchecked(self.column, self.row)
    }

    /// 棋子归属，空格返回 None
    pub fn owner(&self) -> Option<Side> {
        self.bit.map(|b| b.owner())
    }
}
