//! Game rules shared by every variant
//!
//! This module implements:
//! - Terminal detection (win, draw, ongoing)
//! - Mark aging for the infinite variant

pub mod aging;
pub mod win;

// Re-exports for convenient access
pub use aging::{apply_aging_move, MoveHistory, MoveRecord, MAX_MARKS};
pub use win::{
    check_terminal, completes_line, find_immediate_win, find_winner, winning_moves, Outcome,
};
