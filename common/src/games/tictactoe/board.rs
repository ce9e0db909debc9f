use std::fmt;

use serde_json::Value;

use super::types::{Mark, Player};

pub const BOARD_SIDE: usize = 3;
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    OutOfRange { index: usize },
    MalformedState(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfRange { index } => {
                write!(f, "Cell index {} is outside 0..{}", index, CELL_COUNT)
            }
            BoardError::MalformedState(reason) => write!(f, "Malformed board state: {}", reason),
        }
    }
}

impl std::error::Error for BoardError {}

impl From<serde_json::Error> for BoardError {
    fn from(e: serde_json::Error) -> Self {
        BoardError::MalformedState(e.to_string())
    }
}

/// 3x3 grid in row-major order:
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
///
/// The board only knows occupancy. Turn order and legality belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Mark; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Mark; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Mark; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Result<Mark, BoardError> {
        self.cells
            .get(index)
            .copied()
            .ok_or(BoardError::OutOfRange { index })
    }

    pub fn set(&mut self, index: usize, mark: Mark) -> Result<(), BoardError> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(BoardError::OutOfRange { index })?;
        *cell = mark;
        Ok(())
    }

    /// Places `player`'s mark without a legality check.
    ///
    /// # Panics
    ///
    /// Panics if `index >= CELL_COUNT`. Use `set` for untrusted indices.
    pub fn apply_move(&mut self, index: usize, player: Player) {
        self.cells[index] = player.mark();
    }

    /// Clears a cell set by `apply_move`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= CELL_COUNT`.
    pub fn undo_move(&mut self, index: usize) {
        self.cells[index] = Mark::Empty;
    }

    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Mark::Empty)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|cell| **cell == mark).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| *cell != Mark::Empty)
    }

    pub fn reset(&mut self) {
        self.cells = [Mark::Empty; CELL_COUNT];
    }

    /// JSON array of the nine cell codes in index order, e.g.
    /// `["x","-","o","-","-","-","-","-","-"]`.
    pub fn serialize(&self) -> String {
        Value::Array(
            self.cells
                .iter()
                .map(|mark| Value::from(mark.code()))
                .collect(),
        )
        .to_string()
    }

    pub fn deserialize(content: &str) -> Result<Board, BoardError> {
        let codes: Vec<String> = serde_json::from_str(content)?;
        if codes.len() != CELL_COUNT {
            return Err(BoardError::MalformedState(format!(
                "expected {} cells, found {}",
                CELL_COUNT,
                codes.len()
            )));
        }

        let mut board = Board::new();
        for (index, code) in codes.iter().enumerate() {
            let mark = Mark::from_code(code).ok_or_else(|| {
                BoardError::MalformedState(format!("unknown cell code {:?} at {}", code, index))
            })?;
            board.cells[index] = mark;
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.cells.chunks(BOARD_SIDE).enumerate() {
            if row_index > 0 {
                writeln!(f, "---+---+---")?;
            }
            let base = row_index * BOARD_SIDE;
            let rendered: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(offset, mark)| match mark {
                    Mark::Empty => format!(" {} ", base + offset + 1),
                    _ => format!(" {} ", mark),
                })
                .collect();
            writeln!(f, "{}", rendered.join("|"))?;
        }
        Ok(())
    }
}
