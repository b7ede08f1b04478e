//! Static evaluation of tic-tac-toe positions
//!
//! The evaluation considers:
//! - Lines owned by a single player (two-in-a-row, singles, open lines)
//! - Mark aging in the infinite variant
//! - Positional bonuses (center, corners, near-center on mega boards)

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate_classic, evaluate_infinite, evaluate_mega};
pub use patterns::{LineScore, ThreatScore};
