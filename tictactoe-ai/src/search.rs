//! 搜索引擎
//!
//! 实现 Negamax 穷举搜索。井字棋状态空间很小（不超过 9! 个展开），
//! 完整搜索足够交互使用。搜索只使用一个 9 字节缓冲区，落子后递归、返回后撤销。

use protocol::{Outcome, Side, StateBytes, CELL_COUNT, EMPTY_CHAR};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// AI 的颜色值（negamax 符号约定）
pub const AI_COLOR: i32 = 1;

/// 人类的颜色值
pub const HUMAN_COLOR: i32 = -1;

/// 终局获胜：对当前走子方而言是输棋
pub const LOSS_SCORE: i32 = -10;

/// 和棋分值
pub const DRAW_SCORE: i32 = 0;

/// 低于任何真实分值的初始值
const SENTINEL: i32 = -1000;

/// 记录终局诊断日志的最大深度
const TRACE_DEPTH: u32 = 2;

/// 简单难度随机落子的概率
const EASY_RANDOM_CHANCE: f64 = 0.3;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：30% 概率随机落子
    Easy,
    /// 困难：完整搜索，不会输
    #[default]
    Hard,
}

impl Difficulty {
    /// 显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Hard => "困难",
        }
    }
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// AI 执子方
    pub ai_side: Side,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ai_side: Side::O,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::default())
    }
}

/// 一次搜索的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// 按格子顺序的 (格子, 分值)，AI 视角
    pub values: Vec<(usize, i32)>,
    /// 最佳走法（平分取最小索引）
    pub best: Option<usize>,
    /// 按难度最终选择的走法
    pub chosen: Option<usize>,
    /// 搜索的节点数
    pub nodes_searched: u64,
}

/// 取第一个最大值（严格大于才替换）
fn first_best(values: &[(usize, i32)]) -> Option<usize> {
    let mut best_value = SENTINEL;
    let mut best_cell = None;
    for &(cell, value) in values {
        if value > best_value {
            best_value = value;
            best_cell = Some(cell);
        }
    }
    best_cell
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    nodes_searched: u64,
    rng: ChaCha8Rng,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// 使用固定随机种子创建（结果可复现）
    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            nodes_searched: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 获取配置
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    fn ai_mark(&self) -> u8 {
        self.config.ai_side.to_state_char()
    }

    fn human_mark(&self) -> u8 {
        self.config.ai_side.opponent().to_state_char()
    }

    /// 按难度选择走法
    pub fn search(&mut self, state: &StateBytes) -> Option<usize> {
        self.analyze(state).chosen
    }

    /// 完整分析：每个空格的分值、最佳走法以及按难度最终选择的走法
    pub fn analyze(&mut self, state: &StateBytes) -> SearchReport {
        let values = self.evaluate_moves(state);
        let best = first_best(&values);
        let chosen = best.map(|cell| self.apply_difficulty(state, cell));

        if let Some(cell) = best {
            tracing::debug!("最佳走法: {}, 节点数: {}", cell, self.nodes_searched);
        }

        SearchReport {
            values,
            best,
            chosen,
            nodes_searched: self.nodes_searched,
        }
    }

    /// 搜索最佳走法
    ///
    /// 按 0..8 顺序扫描空格，取第一个达到最大值的格子。无空格时返回 None。
    pub fn best_move(&mut self, state: &StateBytes) -> Option<usize> {
        let values = self.evaluate_moves(state);
        first_best(&values)
    }

    /// 简单难度：一定概率改为随机空格
    fn apply_difficulty(&mut self, state: &StateBytes, best: usize) -> usize {
        if self.config.difficulty != Difficulty::Easy || !self.rng.gen_bool(EASY_RANDOM_CHANCE) {
            return best;
        }

        let empties: Vec<usize> = (0..CELL_COUNT).filter(|&i| state[i] == EMPTY_CHAR).collect();
        match empties.choose(&mut self.rng) {
            Some(&cell) => {
                tracing::debug!("简单难度随机落子: {}", cell);
                cell
            }
            None => best,
        }
    }

    /// 评估每个空格（AI 视角），按格子顺序返回 (格子, 分值)
    pub fn evaluate_moves(&mut self, state: &StateBytes) -> Vec<(usize, i32)> {
        self.nodes_searched = 0;

        let mut scratch = *state;
        let ai_mark = self.ai_mark();
        let mut values = Vec::with_capacity(CELL_COUNT);

        for cell in 0..CELL_COUNT {
            if scratch[cell] != EMPTY_CHAR {
                continue;
            }

            scratch[cell] = ai_mark;
            let value = -self.negamax(&mut scratch, 0, HUMAN_COLOR);
            scratch[cell] = EMPTY_CHAR;

            values.push((cell, value));
        }

        values
    }

    /// 当前局面对 AI 的最优分值，无空格时返回 None
    pub fn root_value(&mut self, state: &StateBytes) -> Option<i32> {
        self.evaluate_moves(state)
            .into_iter()
            .map(|(_, value)| value)
            .max()
    }

    /// Negamax 搜索
    ///
    /// 终局一定是上一手造成的，所以获胜局面对当前走子方总是 `LOSS_SCORE`。
    fn negamax(&mut self, state: &mut StateBytes, depth: u32, color: i32) -> i32 {
        self.nodes_searched += 1;

        let outcome = Outcome::detect(state);
        if outcome.is_terminal() {
            if depth <= TRACE_DEPTH {
                tracing::trace!("两步内终局: 深度 {}, 胜者 {:?}", depth, outcome.winner);
            }
            return if outcome.is_draw { DRAW_SCORE } else { LOSS_SCORE };
        }

        let mark = if color == HUMAN_COLOR {
            self.human_mark()
        } else {
            self.ai_mark()
        };

        let mut value = SENTINEL;
        for cell in 0..CELL_COUNT {
            if state[cell] != EMPTY_CHAR {
                continue;
            }
            state[cell] = mark;
            value = value.max(-self.negamax(state, depth + 1, -color));
            state[cell] = EMPTY_CHAR;
        }

        value
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}
