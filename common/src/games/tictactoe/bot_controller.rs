use super::board::Board;
use super::evaluator::evaluate;
use super::types::Player;
use super::win_detector::is_game_over;

/// Plies searched by the computer opponent.
pub const SEARCH_DEPTH: usize = 2;

const SCORE_BOUND: i32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    /// `None` only at a leaf.
    pub index: Option<usize>,
}

impl SearchResult {
    fn leaf(board: &Board) -> Self {
        Self {
            score: evaluate(board),
            index: None,
        }
    }
}

/// Depth-bounded minimax. X maximises, O minimises, and ties keep the lowest
/// index. Every ply is applied to `board` and undone before the next sibling,
/// so the board is unchanged on return.
pub fn search(board: &mut Board, player: Player, depth: usize) -> SearchResult {
    if is_game_over(board) || depth == 0 {
        return SearchResult::leaf(board);
    }

    let mut best = SearchResult {
        score: match player {
            Player::X => -SCORE_BOUND,
            Player::O => SCORE_BOUND,
        },
        index: None,
    };

    for index in board.available_moves() {
        board.apply_move(index, player);
        let score = search(board, player.opponent(), depth - 1).score;
        board.undo_move(index);

        let improves = match player {
            Player::X => score > best.score,
            Player::O => score < best.score,
        };
        if improves {
            best = SearchResult {
                score,
                index: Some(index),
            };
        }
    }

    best
}

/// Picks the move for `player` at `SEARCH_DEPTH` without touching the
/// caller's board. `None` when the board is already full.
pub fn calculate_move(board: &Board, player: Player) -> Option<usize> {
    let mut scratch = *board;
    search(&mut scratch, player, SEARCH_DEPTH).index
}
