//! Transposition cache for the mega-board search
//!
//! The cache maps a canonical position key to the score found for it. Keys
//! are plain strings built from the board's row-major cells plus the search
//! parameters that change the meaning of a score:
//!
//! ```text
//! <cells>|p<player>|d<depth>|m<max depth>|g<maximizing>
//! ```
//!
//! Because alpha-beta can cut a node short, every entry records whether the
//! stored score is exact or only a bound, and a probe only returns a score
//! when it is usable inside the caller's window.
//!
//! The cache is owned by the caller (one per match is typical) and may be
//! reused across consecutive decisions.
//!
//! # Example
//!
//! ```
//! use tictactoe::board::{Board, Mark};
//! use tictactoe::search::{cache_key, Bound, TranspositionCache};
//!
//! let mut cache = TranspositionCache::new();
//! let key = cache_key(&Board::new(4), Mark::X, 1, 3, false);
//!
//! cache.store(key.clone(), 120, Bound::Exact);
//! assert_eq!(cache.probe(&key, -1000, 1000), Some(120));
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::board::{Board, Mark};

/// How a stored score relates to the true value of the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window
    Exact,
    /// score >= stored value (beta cutoff)
    LowerBound,
    /// score <= stored value (no move raised alpha)
    UpperBound,
}

impl Bound {
    /// Classify a node result against the window it was searched with
    #[inline]
    #[must_use]
    pub fn classify(score: i32, alpha: i32, beta: i32) -> Self {
        if score <= alpha {
            Bound::UpperBound
        } else if score >= beta {
            Bound::LowerBound
        } else {
            Bound::Exact
        }
    }
}

/// Cached node result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub score: i32,
    pub bound: Bound,
}

/// Build the canonical cache key for one search node
#[must_use]
pub fn cache_key(board: &Board, player: Mark, depth: u32, max_depth: u32, maximizing: bool) -> String {
    let mut key = board.to_string();
    // Writing to a String never fails
    let _ = write!(key, "|p{player}|d{depth}|m{max_depth}|g{maximizing}");
    key
}

/// Caller-owned map from position key to search result.
#[derive(Debug, Default)]
pub struct TranspositionCache {
    entries: HashMap<String, CacheEntry>,
    probes: u64,
    hits: u64,
}

impl TranspositionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node.
    ///
    /// # Arguments
    ///
    /// * `key` - Key from [`cache_key`]
    /// * `alpha`, `beta` - Current search window
    ///
    /// # Returns
    ///
    /// The stored score if it is exact, or a bound that already falls
    /// outside the window; `None` otherwise.
    pub fn probe(&mut self, key: &str, alpha: i32, beta: i32) -> Option<i32> {
        self.probes += 1;
        let entry = self.entries.get(key)?;

        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::LowerBound => entry.score >= beta,
            Bound::UpperBound => entry.score <= alpha,
        };
        if usable {
            self.hits += 1;
            Some(entry.score)
        } else {
            None
        }
    }

    /// Raw entry lookup, without touching statistics
    #[must_use]
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).copied()
    }

    /// Store a node result, replacing any previous entry for the key
    pub fn store(&mut self, key: String, score: i32, bound: Bound) {
        self.entries.insert(key, CacheEntry { score, bound });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, e.g. when a new match starts
    pub fn clear(&mut self) {
        self.entries.clear();
        self.probes = 0;
        self.hits = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            probes: self.probes,
            hits: self.hits,
        }
    }
}

/// Usage statistics of a [`TranspositionCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Stored positions
    pub entries: usize,
    /// Lookups since creation or the last clear
    pub probes: u64,
    /// Lookups that returned a usable score
    pub hits: u64,
}

impl CacheStats {
    /// Percentage of probes that returned a usable score
    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64 * 100.0
        }
    }
}
