//! Search module for the tic-tac-toe engine
//!
//! Contains:
//! - Line threats and fork detection
//! - Constant-time heuristic move selection (blitz)
//! - Exhaustive minimax for 3x3 boards (classic and infinite)
//! - Transposition cache for caching search results
//! - Alpha-Beta search with iterative deepening for mega boards

pub mod alphabeta;
pub mod heuristic;
pub mod minimax;
pub mod threat;
pub mod tt;

pub use alphabeta::{order_root_moves, DeepeningResult, MegaSearcher, SearchLimits, MEGA_WIN};
pub use heuristic::heuristic_move;
pub use minimax::{
    best_classic_move, best_infinite_move, SearchResult, CLASSIC_WIN, DEFAULT_INFINITE_DEPTH,
    INFINITE_WIN,
};
pub use threat::{
    detect_fork, detect_opponent_fork_threat, find_double_threat_reply, line_threat,
    prevent_common_fork_patterns, proximity, Fork, FORK_MAX_WIN_LENGTH,
};
pub use tt::{cache_key, Bound, CacheEntry, CacheStats, TranspositionCache};
