use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    /// Single-character code used by the persisted board format.
    pub fn code(&self) -> &'static str {
        match self {
            Mark::Empty => "-",
            Mark::X => "x",
            Mark::O => "o",
        }
    }

    pub fn from_code(code: &str) -> Option<Mark> {
        match code {
            "-" => Some(Mark::Empty),
            "x" => Some(Mark::X),
            "o" => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Mark::Empty => ' ',
            Mark::X => 'X',
            Mark::O => 'O',
        };
        write!(f, "{}", symbol)
    }
}

/// One of the two sides. X maximises the evaluation, O minimises it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn mark(&self) -> Mark {
        match self {
            Player::X => Mark::X,
            Player::O => Mark::O,
        }
    }

    pub fn opponent(&self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mark())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    XWon,
    OWon,
    Draw,
}

impl GameStatus {
    pub fn is_finished(&self) -> bool {
        *self != GameStatus::InProgress
    }
}
