//! 棋子与位置定义

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, CELL_COUNT, CELL_PIXELS, GRID_TOP_PADDING};

/// 阵营（棋子归属）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// X（先手，引擎玩家 0）
    X,
    /// O（后手，引擎玩家 1）
    O,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    /// 引擎中的玩家索引（从 0 开始）
    pub fn index(&self) -> usize {
        match self {
            Side::X => 0,
            Side::O => 1,
        }
    }

    /// 从玩家索引解析
    pub fn from_index(index: usize) -> Option<Side> {
        match index {
            0 => Some(Side::X),
            1 => Some(Side::O),
            _ => None,
        }
    }

    /// 局面编码字符（'1' + 玩家索引）
    pub fn to_state_char(&self) -> u8 {
        b'1' + self.index() as u8
    }

    /// 从局面编码字符解析，'0' 与非法字符返回 None
    pub fn from_state_char(c: u8) -> Option<Side> {
        match c {
            b'1' => Some(Side::X),
            b'2' => Some(Side::O),
            _ => None,
        }
    }

    /// 显示字符
    pub fn display_char(&self) -> char {
        match self {
            Side::X => 'X',
            Side::O => 'O',
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_char())
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 列 (0-2)
    pub x: u8,
    /// 行 (0-2)
    pub y: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if (x as usize) < BOARD_SIZE && (y as usize) < BOARD_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// 转换为数组索引（行优先）
    pub fn to_index(&self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            Some(Position {
                x: (index % BOARD_SIZE) as u8,
                y: (index / BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 格子左上角的屏幕坐标
    pub fn screen_position(&self) -> (f32, f32) {
        (
            self.x as f32 * CELL_PIXELS,
            self.y as f32 * CELL_PIXELS + GRID_TOP_PADDING,
        )
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_state_char() {
        assert_eq!(Side::X.to_state_char(), b'1');
        assert_eq!(Side::O.to_state_char(), b'2');
        assert_eq!(Side::from_state_char(b'1'), Some(Side::X));
        assert_eq!(Side::from_state_char(b'2'), Some(Side::O));
        assert_eq!(Side::from_state_char(b'0'), None);
        assert_eq!(Side::from_state_char(b'3'), None);
    }

    #[test]
    fn test_side_index() {
        assert_eq!(Side::from_index(Side::X.index()), Some(Side::X));
        assert_eq!(Side::from_index(Side::O.index()), Some(Side::O));
        assert_eq!(Side::from_index(2), None);
        assert_eq!(Side::X.opponent(), Side::O);
    }

    #[test]
    fn test_position_index() {
        let pos = Position::from_index(5).unwrap();
        assert_eq!(pos, Position::new_unchecked(2, 1));
        assert_eq!(pos.to_index(), 5);
        assert!(Position::from_index(9).is_none());
        assert!(Position::new(3, 0).is_none());
    }

    #[test]
    fn test_screen_position() {
        assert_eq!(Position::new_unchecked(0, 0).screen_position(), (0.0, 24.0));
        assert_eq!(Position::new_unchecked(2, 1).screen_position(), (200.0, 124.0));
    }
}
