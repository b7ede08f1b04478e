//! Exhaustive minimax for the classic and infinite variants
//!
//! On a 3x3 board the whole remaining game tree is small enough to search
//! completely. Alpha-beta pruning cuts it further without changing the
//! value of any node.
//!
//! # Features
//!
//! - Depth-weighted terminal scores: faster wins and slower losses score
//!   better
//! - Infinite variant: mark aging on every simulated ply and a depth
//!   cutoff that falls back to [`evaluate_infinite`]
//! - Node counting through the search context, never through globals
//!
//! # Example
//!
//! ```
//! use tictactoe::board::{Board, Geometry, Mark};
//! use tictactoe::search::best_classic_move;
//!
//! let result = best_classic_move(&Board::new(3), &Geometry::classic(), Mark::X);
//! assert_eq!(result.best_move, Some(4));
//! ```

use std::cmp::Reverse;

use tracing::trace;

use crate::board::{Board, Geometry, Mark};
use crate::eval::{evaluate_classic, evaluate_infinite};
use crate::rules::{apply_aging_move, find_winner, MoveHistory};

/// Terminal score base for the classic search
pub const CLASSIC_WIN: i32 = 10;

/// Terminal score base for the infinite search (dominates the evaluator)
pub const INFINITE_WIN: i32 = 10_000;

/// Default depth cutoff for the infinite search, in plies
pub const DEFAULT_INFINITE_DEPTH: u32 = 6;

/// Infinity score for alpha-beta bounds
const INF: i32 = i32::MAX;

/// Result of a root search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found, `None` only when the board has no empty square
    pub best_move: Option<usize>,
    /// Minimax value of the best move from the searching player's side
    pub score: i32,
    /// Nodes visited
    pub nodes: u64,
}

/// Per-search state for the classic variant
pub(crate) struct ClassicSearch<'a> {
    geometry: &'a Geometry,
    player: Mark,
    pub(crate) nodes: u64,
}

impl<'a> ClassicSearch<'a> {
    pub(crate) fn new(geometry: &'a Geometry, player: Mark) -> Self {
        Self {
            geometry,
            player,
            nodes: 0,
        }
    }

    /// Value of `board` for the searching player. `depth` counts plies below
    /// the root move; `maximizing` is true when the searching player moves.
    pub(crate) fn minimax(
        &mut self,
        board: &Board,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        match find_winner(board, self.geometry) {
            Some(m) if m == self.player => return CLASSIC_WIN - depth,
            Some(_) => return depth - CLASSIC_WIN,
            None => {}
        }

        let available = board.available_moves();
        if available.is_empty() {
            return 0;
        }

        if maximizing {
            let mut best = -INF;
            for idx in available {
                let child = board.with_move(idx, self.player);
                let score = self.minimax(&child, depth + 1, false, alpha, beta);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let opponent = self.player.opponent();
            let mut best = INF;
            for idx in available {
                let child = board.with_move(idx, opponent);
                let score = self.minimax(&child, depth + 1, true, alpha, beta);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

/// Pick the classic-variant move for `player` by full minimax.
///
/// Every root move is searched with a full window so that its exact value
/// is known. Ties are broken by [`evaluate_classic`] of the resulting
/// board, then by the lowest index.
#[must_use]
pub fn best_classic_move(board: &Board, geometry: &Geometry, player: Mark) -> SearchResult {
    let mut search = ClassicSearch::new(geometry, player);

    let best = board
        .available_moves()
        .into_iter()
        .map(|idx| {
            let child = board.with_move(idx, player);
            let score = search.minimax(&child, 0, false, -INF, INF);
            let tie_break = evaluate_classic(&child, geometry, player);
            (idx, score, tie_break)
        })
        .max_by_key(|&(idx, score, tie_break)| (score, tie_break, Reverse(idx)));

    trace!(nodes = search.nodes, ?best, "classic search done");

    SearchResult {
        best_move: best.map(|(idx, _, _)| idx),
        score: best.map_or(0, |(_, score, _)| score),
        nodes: search.nodes,
    }
}

/// Per-search state for the infinite variant
struct InfiniteSearch<'a> {
    geometry: &'a Geometry,
    player: Mark,
    max_depth: i32,
    nodes: u64,
}

impl InfiniteSearch<'_> {
    fn minimax(
        &mut self,
        board: &Board,
        history: &MoveHistory,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        match find_winner(board, self.geometry) {
            Some(m) if m == self.player => return INFINITE_WIN - depth,
            Some(_) => return depth - INFINITE_WIN,
            None => {}
        }

        let available = board.available_moves();
        if depth >= self.max_depth || available.is_empty() {
            return evaluate_infinite(board, self.geometry, self.player, history);
        }

        let mover = if maximizing {
            self.player
        } else {
            self.player.opponent()
        };
        let mut best = if maximizing { -INF } else { INF };

        for idx in available {
            let (child, child_history) = apply_aging_move(board, history, idx, mover);
            let score = self.minimax(&child, &child_history, depth + 1, !maximizing, alpha, beta);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        best
    }
}

/// Pick the infinite-variant move for `player` by depth-limited minimax
/// with mark aging.
///
/// `max_depth` counts plies below the root move. Ties go to the lowest index.
#[must_use]
pub fn best_infinite_move(
    board: &Board,
    geometry: &Geometry,
    player: Mark,
    history: &MoveHistory,
    max_depth: u32,
) -> SearchResult {
    let mut search = InfiniteSearch {
        geometry,
        player,
        max_depth: i32::try_from(max_depth).unwrap_or(i32::MAX),
        nodes: 0,
    };

    let mut best: Option<(usize, i32)> = None;
    for idx in board.available_moves() {
        let (child, child_history) = apply_aging_move(board, history, idx, player);
        let score = search.minimax(&child, &child_history, 0, false, -INF, INF);
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((idx, score));
        }
    }

    trace!(nodes = search.nodes, ?best, max_depth, "infinite search done");

    SearchResult {
        best_move: best.map(|(idx, _)| idx),
        score: best.map_or(0, |(_, score)| score),
        nodes: search.nodes,
    }
}
