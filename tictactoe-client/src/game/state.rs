//! 井字棋对局控制
//!
//! 管理 3x3 格子、玩家轮转、落子、终局判定和 AI 回合

use protocol::{
    Board, Encoding, GameError, GameRecord, GameResult, MoveRecord, Outcome, Position, Side,
    AI_PLAYER_INDEX, BOARD_SIZE, CELL_COUNT, INITIAL_STATE, PLAYER_COUNT,
};
use tictactoe_ai::AiEngine;

use super::holder::{Bit, Holder};
use crate::log::GameLog;

/// 井字棋对局
#[derive(Debug, Default)]
pub struct TicTacToe {
    /// 3x3 格子，`grid[row][column]`
    grid: [[Holder; BOARD_SIZE]; BOARD_SIZE],
    /// 玩家数量
    number_of_players: usize,
    /// AI 执子方
    ai_player: Option<Side>,
    /// 当前走子方，未开始时为 None
    current_player: Option<Side>,
    /// 游戏结果
    result: Option<GameResult>,
    /// 本局起始局面
    initial_state: String,
    /// 走法记录
    history: Vec<MoveRecord>,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_number_of_players(&mut self, count: usize) {
        self.number_of_players = count;
    }

    pub fn number_of_players(&self) -> usize {
        self.number_of_players
    }

    /// 指定 AI 玩家的引擎索引
    pub fn set_ai_player(&mut self, index: usize) {
        self.ai_player = Side::from_index(index);
    }

    pub fn ai_player(&self) -> Option<Side> {
        self.ai_player
    }

    /// 初始化棋盘并开始游戏（每局调用一次）
    pub fn set_up_board(&mut self, log: &mut GameLog) {
        self.set_number_of_players(PLAYER_COUNT);
        self.set_ai_player(AI_PLAYER_INDEX);

        for (row, holders) in self.grid.iter_mut().enumerate() {
            for (column, holder) in holders.iter_mut().enumerate() {
                let pos = Position::new_unchecked(column as u8, row as u8);
                holder.init_holder(pos.screen_position(), pos.x, pos.y);
            }
        }

        log.game_info("Game board set up");
        self.start_game();
    }

    /// 开始游戏：X 先手
    pub fn start_game(&mut self) {
        self.current_player = Some(Side::X);
        self.result = None;
        self.initial_state = INITIAL_STATE.to_string();
        self.history.clear();
    }

    /// 结束游戏并清空棋盘
    pub fn stop_game(&mut self) {
        for holder in self.grid.iter_mut().flatten() {
            holder.destroy_bit();
        }
        self.current_player = None;
        self.result = None;
        self.history.clear();
    }

    /// 重新开始
    pub fn reset(&mut self, log: &mut GameLog) {
        self.stop_game();
        self.set_up_board(log);
    }

    pub fn current_player(&self) -> Option<Side> {
        self.current_player
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// 是否轮到 AI
    pub fn is_ai_turn(&self) -> bool {
        !self.is_game_over()
            && self.current_player.is_some()
            && self.current_player == self.ai_player
    }

    /// 获取格子
    pub fn holder(&self, index: usize) -> Option<&Holder> {
        let pos = Position::from_index(index)?;
        Some(&self.grid[pos.y as usize][pos.x as usize])
    }

    fn holder_mut(&mut self, index: usize) -> Option<&mut Holder> {
        let pos = Position::from_index(index)?;
        Some(&mut self.grid[pos.y as usize][pos.x as usize])
    }

    /// 指定格子的棋子归属
    pub fn owner_at(&self, index: usize) -> Option<Side> {
        self.holder(index).and_then(Holder::owner)
    }

    /// 当前棋盘
    pub fn board(&self) -> Board {
        let mut board = Board::empty();
        for index in 0..CELL_COUNT {
            board.set(index, self.owner_at(index));
        }
        board
    }

    /// 检查能否在格子落子，返回落子方
    ///
    /// 没有当前玩家（未开始）与已终局同样视为 `GameOver`。
    pub fn check_placement(&self, index: usize) -> Result<Side, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        let player = self.current_player.ok_or(GameError::GameOver)?;
        let holder = self
            .holder(index)
            .ok_or(GameError::InvalidPosition { index })?;
        if !holder.is_empty() {
            return Err(GameError::CellOccupied { index });
        }
        Ok(player)
    }

    /// 在空格落子
    ///
    /// 越界、格子非空、没有当前玩家或游戏已结束时忽略并返回 false。
    pub fn action_for_empty_holder(&mut self, index: usize, log: &mut GameLog) -> bool {
        let player = match self.check_placement(index) {
            Ok(player) => player,
            Err(e) => {
                tracing::debug!("忽略落子: {}", e);
                return false;
            }
        };
        let Some(holder) = self.holder_mut(index) else {
            return false;
        };

        let (x, y) = holder.position();
        let mut bit = Bit::new(player);
        bit.set_position((x, y));
        holder.set_bit(bit);

        log.game_info(format!(
            "Player {} placed bit at ({}, {})",
            player.index(),
            x,
            y
        ));

        let state = self.state_string();
        self.history.push(MoveRecord::new(index, player, state));
        true
    }

    /// 井字棋不能移动棋子
    pub fn can_bit_move_from(&self, _bit: &Bit, _src: &Holder) -> bool {
        false
    }

    /// 井字棋不能移动棋子
    pub fn can_bit_move_from_to(&self, _bit: &Bit, _src: &Holder, _dst: &Holder) -> bool {
        false
    }

    /// 当前局面判定（每次重新计算）
    pub fn outcome(&self) -> Outcome {
        self.board().outcome()
    }

    pub fn check_for_winner(&self) -> Option<Side> {
        self.outcome().winner
    }

    pub fn check_for_draw(&self) -> bool {
        self.outcome().is_draw
    }

    /// 回合结束：判定胜负，否则交换走子方
    pub fn end_turn(&mut self, log: &mut GameLog) {
        let outcome = self.outcome();

        if let Some(winner) = outcome.winner {
            if let Some([a, b, c]) = outcome.line {
                log.game_info(format!(
                    "Detected win by player {} with triple ({}, {}, {})",
                    winner.index(),
                    a,
                    b,
                    c
                ));
            }
            self.result = Some(GameResult::win_for(winner));
            log.game_info(format!("Game over. Won by player {}", winner.index()));
        } else if outcome.is_draw {
            self.result = Some(GameResult::Draw);
            log.game_info("Game over. Draw.");
        } else {
            self.current_player = self.current_player.map(|p| p.opponent());
        }
    }

    /// 人类点击格子：落子并结束回合
    pub fn place_at(&mut self, index: usize, log: &mut GameLog) -> bool {
        if self.is_ai_turn() {
            return false;
        }
        if !self.action_for_empty_holder(index, log) {
            return false;
        }
        self.end_turn(log);
        true
    }

    /// AI 回合：搜索、落子、结束回合，返回落子的格子
    pub fn update_ai(&mut self, engine: &mut AiEngine, log: &mut GameLog) -> Option<usize> {
        if !self.is_ai_turn() {
            return None;
        }

        let state = Encoding::encode_bytes(&self.board());
        let report = engine.analyze(&state);
        for (cell, value) in &report.values {
            log.game_info(format!("Space {} has value {}", cell, value));
        }

        let Some(cell) = report.chosen else {
            log.game_warn("AI has no available move");
            return None;
        };

        if !self.action_for_empty_holder(cell, log) {
            log.game_error(format!("AI move rejected: {}", cell));
            return None;
        }
        self.end_turn(log);
        Some(cell)
    }

    /// 初始局面编码
    pub fn initial_state_string(&self) -> &'static str {
        INITIAL_STATE
    }

    /// 当前局面编码
    pub fn state_string(&self) -> String {
        Encoding::encode(&self.board())
    }

    /// 从局面编码恢复棋盘
    ///
    /// 走子方按双方棋子数推断；终局局面直接标记为游戏结束。
    pub fn set_state_string(&mut self, s: &str, log: &mut GameLog) -> Result<(), GameError> {
        let board = Encoding::decode(s)?;

        for index in 0..CELL_COUNT {
            let Some(holder) = self.holder_mut(index) else {
                continue;
            };
            match board.get(index) {
                None => holder.destroy_bit(),
                Some(side) => {
                    let mut bit = Bit::new(side);
                    bit.set_position(holder.position());
                    holder.set_bit(bit);
                }
            }
        }

        self.initial_state = s.to_string();
        self.history.clear();
        self.result = board.outcome().result();
        match board.side_to_move() {
            Some(side) => self.current_player = Some(side),
            None => log.game_warn(format!(
                "Unreachable mark counts in \"{}\", side to move unchanged",
                s
            )),
        }

        log.game_info(format!("Game state set via string \"{}\"", s));
        Ok(())
    }

    /// 生成棋谱记录
    pub fn to_record(&self, x_player: &str, o_player: &str) -> GameRecord {
        let mut record = GameRecord::from_state(
            x_player.to_string(),
            o_player.to_string(),
            self.initial_state.clone(),
        );
        for mv in &self.history {
            record.add_move(mv.clone());
        }
        if let Some(result) = self.result {
            record.set_result(result);
        }
        record
    }

    /// 从棋谱记录恢复
    pub fn restore_record(&mut self, record: &GameRecord, log: &mut GameLog) -> Result<(), GameError> {
        self.set_state_string(record.latest_state(), log)?;
        self.initial_state = record.initial_state.clone();
        self.history = record.moves.clone();

        // 保存的走子方只在棋子数无法推断时采用
        let saved_turn = record.save_info.as_ref().and_then(|info| info.current_turn);
        if let Some(saved) = saved_turn {
            match self.board().side_to_move() {
                None if !self.is_game_over() => {
                    self.current_player = Some(saved);
                    log.game_info(format!("Side to move restored from save: player {}", saved.index()));
                }
                Some(counted) if counted != saved => log.game_warn(format!(
                    "Saved side to move (player {}) disagrees with mark counts, using player {}",
                    saved.index(),
                    counted.index()
                )),
                _ => {}
            }
        }
        Ok(())
    }
}
