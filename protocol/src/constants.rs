//! 协议常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 3;

/// 格子总数
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 玩家数量
pub const PLAYER_COUNT: usize = 2;

/// AI 玩家的引擎索引（0 = X 先手，1 = O 后手）
pub const AI_PLAYER_INDEX: usize = 1;

/// 初始局面编码
pub const INITIAL_STATE: &str = "000000000";

/// 空格子的编码字符
pub const EMPTY_CHAR: u8 = b'0';

/// 每个格子的屏幕尺寸（像素）
pub const CELL_PIXELS: f32 = 100.0;

/// 棋盘顶部留白（像素），避免与窗口标题重叠
pub const GRID_TOP_PADDING: f32 = 24.0;

/// 获胜三元组：3 行、3 列、2 条对角线（顺序固定）
pub const WINNING_TRIPLES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];
