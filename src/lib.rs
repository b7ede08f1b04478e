//! Tic-tac-toe move engine
//!
//! A move engine for four tic-tac-toe variants:
//! - Classic: 3x3, three in a row
//! - Infinite: 3x3 where each player keeps at most three marks; placing a
//!   fourth removes that player's oldest mark
//! - Blitz: classic rules answered by a constant-time heuristic
//! - Mega: larger square boards with a configurable win length
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board snapshot, marks and winning-line geometry
//! - [`rules`]: Terminal detection and mark aging
//! - [`eval`]: Static evaluation for each variant
//! - [`search`]: Minimax, alpha-beta with iterative deepening, fork detection
//! - [`engine`]: Difficulty and variant routing
//! - [`worker`]: Background thread for non-blocking callers
//!
//! # Quick Start
//!
//! ```
//! use tictactoe::{AIEngine, Board, Difficulty, Mark, MoveRequest, Variant};
//!
//! let mut engine = AIEngine::seeded(1);
//! let mut board = Board::new(3).with_move(0, Mark::X);
//!
//! let request = MoveRequest::new(board.clone(), Mark::O)
//!     .difficulty(Difficulty::Impossible)
//!     .variant(Variant::Classic);
//!
//! if let Some(index) = engine.get_move(&request, None) {
//!     board = board.with_move(index, Mark::O);
//!     println!("AI plays at {index}");
//! }
//! assert_eq!(board.mark_count(), 2);
//! ```
//!
//! # Decision Priority
//!
//! At the strongest setting the engine:
//! 1. Completes a line if it can
//! 2. Blocks the opponent's line
//! 3. Takes or denies forks (mega boards)
//! 4. Searches: exhaustive minimax on 3x3, time-bounded alpha-beta on mega
//!    boards

pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod worker;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Geometry, Mark, CLASSIC_SIZE};
pub use engine::{
    decide, decide_with_stats, AIEngine, Difficulty, EngineConfig, MoveRequest, MoveResult,
    Strategy, Variant, NO_MOVE,
};
pub use error::{BoardError, ParseTagError, RequestError};
pub use rules::{apply_aging_move, check_terminal, MoveHistory, Outcome};
pub use search::TranspositionCache;
pub use worker::{MoveWorker, WorkerReply};
