use super::board::Board;
use super::types::{GameStatus, Mark, Player};

pub type Line = [usize; 3];

pub const LINES: [Line; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub(crate) fn line_marks(board: &Board, line: &Line) -> [Mark; 3] {
    let cells = board.cells();
    [cells[line[0]], cells[line[1]], cells[line[2]]]
}

/// Counts lines fully held by `player`. More than one only happens on
/// boards that cannot arise from alternating play, or on a fork completed
/// by the last move.
pub fn count_winning_lines(board: &Board, player: Player) -> usize {
    let mark = player.mark();
    LINES
        .iter()
        .filter(|line| line_marks(board, line).iter().all(|cell| *cell == mark))
        .count()
}

pub fn is_winning_position(board: &Board, player: Player) -> bool {
    count_winning_lines(board, player) > 0
}

/// True once the board is full. A win is not game over by this predicate:
/// callers check `is_winning_position` first and this second.
pub fn is_game_over(board: &Board) -> bool {
    board.is_full()
}

pub fn game_status(board: &Board) -> GameStatus {
    if is_winning_position(board, Player::X) {
        GameStatus::XWon
    } else if is_winning_position(board, Player::O) {
        GameStatus::OWon
    } else if is_game_over(board) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}
