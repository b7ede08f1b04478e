//! Board representation for tic-tac-toe variants

pub mod board;
pub mod combos;

#[cfg(test)]
mod tests;

// Re-exports
pub use board::Board;
pub use combos::{generate_win_combos, Geometry, WinCombo};

use std::fmt;
use std::str::FromStr;

use crate::error::ParseTagError;

/// Classic board size (3x3)
pub const CLASSIC_SIZE: usize = 3;

/// Player marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the other player's mark
    #[inline]
    #[must_use]
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character symbol used in board strings and cache keys
    #[inline]
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Mark {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Mark::X),
            "O" | "o" => Ok(Mark::O),
            other => Err(ParseTagError::Mark(other.to_string())),
        }
    }
}

/// A single board square: empty or holding a mark
pub type Cell = Option<Mark>;
