mod board;
mod bot_controller;
mod evaluator;
mod session;
mod types;
mod win_detector;

pub use board::{BOARD_SIDE, Board, BoardError, CELL_COUNT};
pub use bot_controller::{SEARCH_DEPTH, SearchResult, calculate_move, search};
pub use evaluator::evaluate;
pub use session::{
    COMPUTER, GAME_BOARD_KEY, GAME_INACTIVE_KEY, GameSession, HUMAN, MoveReport, SessionError,
};
pub use types::{GameStatus, Mark, Player};
pub use win_detector::{
    LINES, Line, count_winning_lines, game_status, is_game_over, is_winning_position,
};
