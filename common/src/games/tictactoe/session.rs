use std::fmt;

use crate::log;
use crate::storage::{StateStore, StoreError};
use super::board::{Board, BoardError, CELL_COUNT};
use super::bot_controller::calculate_move;
use super::types::{GameStatus, Mark, Player};
use super::win_detector::{game_status, is_game_over, is_winning_position};

pub const GAME_BOARD_KEY: &str = "game_board";
pub const GAME_INACTIVE_KEY: &str = "is_game_inactive";

/// The human always plays X and moves first; the computer plays O.
pub const HUMAN: Player = Player::X;
pub const COMPUTER: Player = Player::O;

#[derive(Debug)]
pub enum SessionError {
    GameInactive,
    NotYourTurn { expected: Player },
    CellOccupied { index: usize },
    Board(BoardError),
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::GameInactive => write!(f, "Game is already over"),
            SessionError::NotYourTurn { expected } => write!(f, "It is {}'s turn", expected),
            SessionError::CellOccupied { index } => write!(f, "Cell {} is already marked", index),
            SessionError::Board(e) => write!(f, "{}", e),
            SessionError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<BoardError> for SessionError {
    fn from(e: BoardError) -> Self {
        SessionError::Board(e)
    }
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        SessionError::Store(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub player: Player,
    pub index: usize,
    pub status: GameStatus,
}

/// Human-versus-computer game over one board, persisted to a `StateStore`
/// after every move. The engine functions stay free of storage concerns.
pub struct GameSession<S: StateStore> {
    board: Board,
    store: S,
    status: GameStatus,
    inactive: bool,
    current_player: Player,
}

impl<S: StateStore> GameSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            board: Board::new(),
            store,
            status: GameStatus::InProgress,
            inactive: false,
            current_player: HUMAN,
        }
    }

    /// Restores an unfinished game from `store`. A game stored as finished,
    /// or a board that cannot be restored, starts over on an empty board.
    /// Store content that does not parse at all is wiped the same way. When
    /// the stored board shows one more X than O the computer is owed a move
    /// and `current_player` is O.
    pub fn load(mut store: S) -> Result<Self, SessionError> {
        let (stored_inactive, stored_board) = match read_saved_game(&store) {
            Ok(saved) => saved,
            Err(StoreError::FormatError(e)) => {
                log!("Discarding unreadable state: {}", e);
                store.clear()?;
                (None, None)
            }
            Err(e) => return Err(e.into()),
        };
        let mut session = Self::new(store);

        let was_inactive = stored_inactive.as_deref() != Some("false");
        let Some(serialized) = stored_board else {
            return Ok(session);
        };
        if was_inactive {
            log!("Stored game was finished, starting a new one");
            return Ok(session);
        }

        match restore_board(&serialized) {
            Ok((board, next)) => {
                log!(
                    "Restored game with {} moves played",
                    CELL_COUNT - board.count(Mark::Empty)
                );
                session.board = board;
                session.current_player = next;
            }
            Err(e) => {
                log!("Discarding stored game: {}", e);
                session.clear_store()?;
            }
        }
        Ok(session)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_inactive(&self) -> bool {
        self.inactive
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player_move(&mut self, index: usize) -> Result<MoveReport, SessionError> {
        self.play(HUMAN, index)
    }

    /// Plays O at the search's choice.
    pub fn computer_move(&mut self) -> Result<MoveReport, SessionError> {
        self.ensure_turn(COMPUTER)?;
        // A non-full board always yields a move, and a full one ends the game
        // before the turn passes to O.
        let index = calculate_move(&self.board, COMPUTER).ok_or(SessionError::GameInactive)?;
        self.play(COMPUTER, index)
    }

    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.clear_store()?;
        self.board.reset();
        self.status = GameStatus::InProgress;
        self.inactive = false;
        self.current_player = HUMAN;
        log!("Game reset");
        Ok(())
    }

    fn ensure_turn(&self, player: Player) -> Result<(), SessionError> {
        if self.inactive {
            return Err(SessionError::GameInactive);
        }
        if self.current_player != player {
            return Err(SessionError::NotYourTurn {
                expected: self.current_player,
            });
        }
        Ok(())
    }

    /// The move is stored before the session changes, so a failed write
    /// leaves both the session and the store on the previous position.
    fn play(&mut self, player: Player, index: usize) -> Result<MoveReport, SessionError> {
        self.ensure_turn(player)?;
        if self.board.get(index)? != Mark::Empty {
            return Err(SessionError::CellOccupied { index });
        }

        let mut board = self.board;
        board.apply_move(index, player);

        // Win is checked before fullness so a winning last move is not a draw.
        let status = if is_winning_position(&board, player) {
            match player {
                Player::X => GameStatus::XWon,
                Player::O => GameStatus::OWon,
            }
        } else if is_game_over(&board) {
            GameStatus::Draw
        } else {
            GameStatus::InProgress
        };

        if status.is_finished() {
            self.clear_store()?;
        } else {
            self.persist(&board)?;
        }

        self.board = board;
        self.status = status;
        self.inactive = status.is_finished();
        self.current_player = player.opponent();

        log!("{} played cell {}, status {:?}", player, index, status);
        Ok(MoveReport {
            player,
            index,
            status,
        })
    }

    // Flag first: a stored "false" next to the previous board is still a
    // valid saved game if the board write fails.
    fn persist(&mut self, board: &Board) -> Result<(), SessionError> {
        self.store.set(GAME_INACTIVE_KEY, "false")?;
        self.store.set(GAME_BOARD_KEY, &board.serialize())?;
        Ok(())
    }

    fn clear_store(&mut self) -> Result<(), SessionError> {
        self.store.remove(GAME_BOARD_KEY)?;
        self.store.remove(GAME_INACTIVE_KEY)?;
        Ok(())
    }
}

fn read_saved_game<S: StateStore>(
    store: &S,
) -> Result<(Option<String>, Option<String>), StoreError> {
    Ok((store.get(GAME_INACTIVE_KEY)?, store.get(GAME_BOARD_KEY)?))
}

/// Decodes a stored board and works out whose turn it is. Boards that could
/// not come from alternating play with X first, or that are already decided,
/// are rejected as malformed.
fn restore_board(serialized: &str) -> Result<(Board, Player), BoardError> {
    let board = Board::deserialize(serialized)?;
    if game_status(&board).is_finished() {
        return Err(BoardError::MalformedState(
            "stored game is already decided".to_string(),
        ));
    }

    let x_count = board.count(Mark::X);
    let o_count = board.count(Mark::O);
    if x_count == o_count {
        Ok((board, HUMAN))
    } else if x_count == o_count + 1 {
        Ok((board, COMPUTER))
    } else {
        Err(BoardError::MalformedState(format!(
            "{} X marks against {} O marks",
            x_count, o_count
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStateStore, MemoryStateStore};
    use std::path::PathBuf;

    /// Reads like the wrapped store; every write fails.
    struct FailingStateStore {
        inner: MemoryStateStore,
    }

    impl FailingStateStore {
        fn write_error() -> StoreError {
            StoreError::IoError(std::io::Error::other("disk full"))
        }
    }

    impl StateStore for FailingStateStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(Self::write_error())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(Self::write_error())
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            Err(Self::write_error())
        }
    }

    fn get_temp_file_path() -> PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("temp_ttt_session_{}.yaml", random_number))
    }

    fn store_with(board: &str, inactive: &str) -> MemoryStateStore {
        let mut store = MemoryStateStore::new();
        store.set(GAME_BOARD_KEY, board).unwrap();
        store.set(GAME_INACTIVE_KEY, inactive).unwrap();
        store
    }

    #[test]
    fn test_load_from_empty_store_starts_fresh() {
        let session = GameSession::load(MemoryStateStore::new()).unwrap();
        assert_eq!(*session.board(), Board::new());
        assert_eq!(session.current_player(), HUMAN);
        assert!(!session.is_inactive());
    }

    #[test]
    fn test_player_move_persists_board() {
        let mut session = GameSession::new(MemoryStateStore::new());
        let report = session.player_move(4).unwrap();

        assert_eq!(
            report,
            MoveReport {
                player: Player::X,
                index: 4,
                status: GameStatus::InProgress,
            }
        );
        assert_eq!(session.current_player(), COMPUTER);
        assert_eq!(
            session.store().get(GAME_BOARD_KEY).unwrap().as_deref(),
            Some(r#"["-","-","-","-","x","-","-","-","-"]"#)
        );
        assert_eq!(session.store().get(GAME_INACTIVE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_player_cannot_move_twice() {
        let mut session = GameSession::new(MemoryStateStore::new());
        session.player_move(0).unwrap();
        assert!(matches!(
            session.player_move(1),
            Err(SessionError::NotYourTurn { expected: Player::O })
        ));
    }

    #[test]
    fn test_occupied_and_out_of_range_cells_are_rejected() {
        let mut session = GameSession::new(MemoryStateStore::new());
        session.player_move(0).unwrap();
        let computer = session.computer_move().unwrap();

        assert!(matches!(
            session.player_move(computer.index),
            Err(SessionError::CellOccupied { .. })
        ));
        assert!(matches!(
            session.player_move(9),
            Err(SessionError::Board(BoardError::OutOfRange { index: 9 }))
        ));
        assert_eq!(session.current_player(), HUMAN);
    }

    #[test]
    fn test_computer_blocks_and_hands_turn_back() {
        let mut session = GameSession::new(MemoryStateStore::new());
        session.player_move(0).unwrap();
        assert_eq!(session.computer_move().unwrap().index, 4);

        session.player_move(1).unwrap();
        let computer = session.computer_move().unwrap();
        assert_eq!(
            computer,
            MoveReport {
                player: COMPUTER,
                index: 2,
                status: GameStatus::InProgress,
            }
        );
        assert_eq!(session.current_player(), HUMAN);
    }

    #[test]
    fn test_computer_wins_and_clears_store() {
        let store = store_with(r#"["x","-","-","o","o","-","x","-","x"]"#, "false");
        let mut session = GameSession::load(store).unwrap();
        assert_eq!(session.current_player(), COMPUTER);

        let report = session.computer_move().unwrap();
        assert_eq!(report.index, 5);
        assert_eq!(report.status, GameStatus::OWon);
        assert!(session.is_inactive());
        assert!(session.store().is_empty());
        assert!(matches!(session.player_move(2), Err(SessionError::GameInactive)));
    }

    #[test]
    fn test_shallow_search_prefers_block_over_win() {
        // Both X and O threaten a row. At depth 2 the block scores better for
        // O than completing its own row, because X's reply is still scored.
        let store = store_with(r#"["x","x","-","o","o","-","x","-","-"]"#, "false");
        let mut session = GameSession::load(store).unwrap();

        let report = session.computer_move().unwrap();
        assert_eq!(report.index, 2);
        assert_eq!(report.status, GameStatus::InProgress);
    }

    #[test]
    fn test_player_win_finishes_game() {
        let store = store_with(r#"["x","x","-","o","o","-","-","-","-"]"#, "false");
        let mut session = GameSession::load(store).unwrap();
        assert_eq!(session.current_player(), HUMAN);

        let report = session.player_move(2).unwrap();
        assert_eq!(report.status, GameStatus::XWon);
        assert!(session.is_inactive());
        assert!(session.store().is_empty());
        assert!(matches!(session.computer_move(), Err(SessionError::GameInactive)));
    }

    #[test]
    fn test_winning_last_cell_is_not_a_draw() {
        let store = store_with(r#"["x","o","x","o","x","o","o","x","-"]"#, "false");
        let mut session = GameSession::load(store).unwrap();

        let report = session.player_move(8).unwrap();
        assert_eq!(report.status, GameStatus::XWon);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let store = store_with(r#"["x","o","x","x","o","o","o","x","-"]"#, "false");
        let mut session = GameSession::load(store).unwrap();

        let report = session.player_move(8).unwrap();
        assert_eq!(report.status, GameStatus::Draw);
        assert!(session.is_inactive());
    }

    #[test]
    fn test_finished_stored_game_starts_fresh() {
        let store = store_with(r#"["x","o","-","-","-","-","-","-","-"]"#, "true");
        let session = GameSession::load(store).unwrap();
        assert_eq!(*session.board(), Board::new());
        assert!(!session.is_inactive());
    }

    #[test]
    fn test_missing_inactive_flag_counts_as_finished() {
        let mut store = MemoryStateStore::new();
        store.set(GAME_BOARD_KEY, r#"["x","o","-","-","-","-","-","-","-"]"#).unwrap();
        let session = GameSession::load(store).unwrap();
        assert_eq!(*session.board(), Board::new());
    }

    #[test]
    fn test_malformed_board_falls_back_to_empty() {
        for stored in ["null", r#"["x","o"]"#, r#"["x","x","x","-","-","-","-","-","-"]"#] {
            let session = GameSession::load(store_with(stored, "false")).unwrap();
            assert_eq!(*session.board(), Board::new(), "stored {}", stored);
            assert_eq!(session.current_player(), HUMAN);
            assert!(session.store().is_empty());
        }
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = GameSession::new(MemoryStateStore::new());
        session.player_move(4).unwrap();
        session.computer_move().unwrap();

        session.reset().unwrap();

        assert_eq!(*session.board(), Board::new());
        assert_eq!(session.status(), GameStatus::InProgress);
        assert_eq!(session.current_player(), HUMAN);
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_failed_save_leaves_session_unchanged() {
        let mut session = GameSession::new(FailingStateStore {
            inner: MemoryStateStore::new(),
        });

        assert!(matches!(session.player_move(4), Err(SessionError::Store(_))));
        assert_eq!(*session.board(), Board::new());
        assert_eq!(session.current_player(), HUMAN);
        assert_eq!(session.status(), GameStatus::InProgress);
        assert!(!session.is_inactive());
    }

    #[test]
    fn test_failed_clear_on_win_leaves_session_unchanged() {
        let stored = r#"["x","x","-","o","o","-","-","-","-"]"#;
        let mut session = GameSession::load(FailingStateStore {
            inner: store_with(stored, "false"),
        })
        .unwrap();
        let before = *session.board();

        assert!(matches!(session.player_move(2), Err(SessionError::Store(_))));
        assert_eq!(*session.board(), before);
        assert_eq!(session.status(), GameStatus::InProgress);
        assert!(!session.is_inactive());
        assert_eq!(
            session.store().get(GAME_BOARD_KEY).unwrap().as_deref(),
            Some(stored)
        );
    }

    #[test]
    fn test_failed_reset_leaves_session_unchanged() {
        let stored = r#"["x","-","-","-","o","-","-","-","-"]"#;
        let mut session = GameSession::load(FailingStateStore {
            inner: store_with(stored, "false"),
        })
        .unwrap();
        let before = *session.board();

        assert!(matches!(session.reset(), Err(SessionError::Store(_))));
        assert_eq!(*session.board(), before);
    }

    #[test]
    fn test_unreadable_state_file_starts_fresh() {
        let path = get_temp_file_path();
        std::fs::write(&path, "- garbage\n- list\n").unwrap();

        let mut session = GameSession::load(FileStateStore::new(&path)).unwrap();
        assert_eq!(*session.board(), Board::new());
        assert_eq!(session.current_player(), HUMAN);
        assert!(!session.is_inactive());

        session.player_move(4).unwrap();
        let reloaded = GameSession::load(FileStateStore::new(&path)).unwrap();
        assert_eq!(reloaded.board().get(4), Ok(Mark::X));
        assert_eq!(reloaded.current_player(), COMPUTER);

        let _ = std::fs::remove_file(path);
    }
}
