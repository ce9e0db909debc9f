use super::board::Board;
use super::types::Mark;
use super::win_detector::{LINES, line_marks};

/// Heuristic score of a position. Positive favours X, negative favours O.
pub fn evaluate(board: &Board) -> i32 {
    LINES
        .iter()
        .map(|line| score_line(&line_marks(board, line)))
        .sum()
}

fn score_line(cells: &[Mark; 3]) -> i32 {
    let mut empty = 0;
    let mut x = 0;
    let mut o = 0;
    for cell in cells {
        match cell {
            Mark::Empty => empty += 1,
            Mark::X => x += 1,
            Mark::O => o += 1,
        }
    }

    match (empty, x, o) {
        (2, 1, 0) => 1,
        (1, 2, 0) => 10,
        (0, 3, 0) => 100,
        (2, 0, 1) => -1,
        (1, 0, 2) => -10,
        (0, 0, 3) => -100,
        _ => 0,
    }
}
