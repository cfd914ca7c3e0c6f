//! 文本棋盘渲染

use protocol::{Board, BOARD_SIZE};

use crate::log::GameLog;

/// 棋盘文本，空格显示对应的输入编号 1-9
pub fn board_text(board: &Board) -> String {
    let mut lines = Vec::with_capacity(BOARD_SIZE * 2 - 1);

    for row in 0..BOARD_SIZE {
        let cells: Vec<String> = (0..BOARD_SIZE)
            .map(|column| {
                let index = row * BOARD_SIZE + column;
                match board.get(index) {
                    Some(side) => side.display_char().to_string(),
                    None => (index + 1).to_string(),
                }
            })
            .collect();
        lines.push(format!(" {} ", cells.join(" | ")));
        if row + 1 < BOARD_SIZE {
            lines.push("---+---+---".to_string());
        }
    }

    lines.join("\n")
}

/// 最近 n 条日志的完整文本
pub fn log_text(log: &GameLog, n: usize) -> String {
    log.recent(n)
        .iter()
        .map(|e| e.full_text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::Encoding;

    #[test]
    fn test_board_text() {
        let board = Encoding::decode("120000002").unwrap();
        let text = board_text(&board);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], " X | O | 3 ");
        assert_eq!(lines[1], "---+---+---");
        assert_eq!(lines[4], " 7 | 8 | O ");
    }

    #[test]
    fn test_log_text() {
        let mut log = GameLog::new();
        log.info("a");
        log.info("b");
        log.info("c");
        let text = log_text(&log, 2);
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("[INFO] c"));
    }
}
