//! Alpha-beta search with iterative deepening for mega boards
//!
//! Exhaustive search is out of reach beyond 3x3, so this searcher trades
//! completeness for speed:
//!
//! # Features
//!
//! - Root move ordering by static evaluation (plus fork and proximity
//!   bonuses at the strongest level), keeping only the top K candidates
//! - Iterative deepening; the best move of each finished iteration is
//!   searched first in the next one
//! - Caller-owned [`TranspositionCache`] with bound-typed entries
//! - Interior ordering: wins and blocks first, then moves near existing
//!   marks, at most [`MAX_INTERIOR_MOVES`] per node
//! - Wall-clock budget checked every [`TIME_CHECK_INTERVAL`] nodes and at
//!   every root move; a node reached after the deadline returns its static
//!   evaluation
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use tictactoe::board::{Board, Geometry, Mark};
//! use tictactoe::search::{order_root_moves, MegaSearcher, SearchLimits, TranspositionCache};
//!
//! let geometry = Geometry::new(5, 4);
//! let mut board = Board::new(5);
//! for col in 0..3 {
//!     board = board.with_move(board.index(1, col), Mark::X);
//! }
//!
//! let limits = SearchLimits::new(3, 10, Duration::from_millis(500));
//! let moves = order_root_moves(&board, &geometry, Mark::X, limits.top_k, false);
//! let mut cache = TranspositionCache::new();
//! let mut searcher = MegaSearcher::new(&geometry, Mark::X, limits, Instant::now(), &mut cache);
//!
//! let result = searcher.iterative_deepening(&board, &moves);
//! assert_eq!(result.best_move, Some(8));
//! ```

use std::time::{Duration, Instant};

use tracing::trace;

use crate::board::{Board, Geometry, Mark};
use crate::eval::evaluate_mega;
use crate::rules::{completes_line, find_winner};

use super::threat::{detect_fork, proximity};
use super::tt::{cache_key, Bound, TranspositionCache};

/// Terminal score base for mega boards
pub const MEGA_WIN: i32 = 10_000;

/// Infinity score for alpha-beta bounds
const INF: i32 = i32::MAX;

/// Scores above this are forced wins
const PROVEN_WIN: i32 = MEGA_WIN - 100;

/// Static evaluations are clamped to `-LEAF_LIMIT..=LEAF_LIMIT`, strictly
/// inside the proven band, so only terminal nodes can exceed [`PROVEN_WIN`]
const LEAF_LIMIT: i32 = PROVEN_WIN - 1;

/// Nodes between two clock checks
pub const TIME_CHECK_INTERVAL: u64 = 32;

/// Moves searched per interior node
pub const MAX_INTERIOR_MOVES: usize = 12;

/// First iterative-deepening depth
const MIN_ITERATION_DEPTH: u32 = 3;

/// Root bonus for the player's own fork square
const OWN_FORK_BONUS: i32 = 3_000;

/// Root penalty for the opponent's fork square
const OPPONENT_FORK_PENALTY: i32 = 2_500;

/// Root ordering score of a square that completes a line
const ROOT_WIN: i32 = i32::MAX / 2;

/// Interior ordering weights
const ORDER_WIN: i32 = 100_000;
const ORDER_BLOCK: i32 = 50_000;
const ORDER_CENTER: i32 = 100;
const ORDER_CORNER: i32 = 50;
const ORDER_PROXIMITY: i32 = 10;

/// Depth, breadth and time limits for one decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest iteration, in plies below the root move
    pub max_depth: u32,
    /// Root candidates kept after ordering
    pub top_k: usize,
    /// Wall-clock budget measured from the decision start
    pub time_limit: Duration,
}

impl SearchLimits {
    #[must_use]
    pub fn new(max_depth: u32, top_k: usize, time_limit: Duration) -> Self {
        Self {
            max_depth,
            top_k,
            time_limit,
        }
    }

    /// Limits scaled by the number of empty squares, board size and win
    /// length.
    ///
    /// | empty squares | K  | depth (size <= 5 / larger) | time    |
    /// |---------------|----|----------------------------|---------|
    /// | <= 10         | 10 | 5 / 4                      | 1500 ms |
    /// | <= 20         | 12 | 4 / 3                      | 1200 ms |
    /// | more          | 15 | 3                          | 1000 ms |
    ///
    /// Win length 4 adds a ply (at most 6); 5 or more removes one (at least 3).
    #[must_use]
    pub fn for_position(available: usize, size: usize, win_length: usize) -> Self {
        let small = size <= 5;
        let (top_k, mut max_depth, millis): (usize, u32, u64) = if available <= 10 {
            (10, if small { 5 } else { 4 }, 1_500)
        } else if available <= 20 {
            (12, if small { 4 } else { 3 }, 1_200)
        } else {
            (15, 3, 1_000)
        };

        if win_length == 4 {
            max_depth = (max_depth + 1).min(6);
        }
        if win_length >= 5 {
            max_depth = max_depth.saturating_sub(1).max(3);
        }

        Self::new(max_depth, top_k, Duration::from_millis(millis))
    }

    /// Widen the limits for the strongest level: up to 24 candidates, one
    /// or two extra plies (capped at `depth_cap`), and at least three times
    /// the time with a 3 s floor.
    #[must_use]
    pub fn strengthened(self, available: usize, win_length: usize, depth_cap: u32) -> Self {
        let extra = if win_length <= 4 { 2 } else { 1 };
        Self {
            max_depth: (self.max_depth + extra).min(depth_cap),
            top_k: available.min(24),
            time_limit: (self.time_limit * 3).max(Duration::from_millis(3_000)),
        }
    }

    /// Replace the time limit with a caller budget, never going below `floor`
    #[must_use]
    pub fn with_budget(self, budget: Option<Duration>, floor: Duration) -> Self {
        match budget {
            Some(budget) => Self {
                time_limit: budget.max(floor),
                ..self
            },
            None => self,
        }
    }
}

/// Outcome of an iterative-deepening search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepeningResult {
    pub best_move: Option<usize>,
    pub score: i32,
    /// Deepest fully completed iteration (0 if none finished)
    pub depth: u32,
    pub nodes: u64,
    /// True if the clock stopped the search
    pub timed_out: bool,
}

/// Order every empty square by the static evaluation after playing it and
/// keep the best `top_k`. Squares that complete a line rank first.
///
/// With `tactical` set, the kept squares are re-ranked with fork and
/// proximity bonuses: +3000 for the player's fork square, -2500 for the
/// opponent's, plus [`proximity`]. Ties keep index order.
#[must_use]
pub fn order_root_moves(
    board: &Board,
    geometry: &Geometry,
    player: Mark,
    top_k: usize,
    tactical: bool,
) -> Vec<usize> {
    let mut scored: Vec<(usize, i32)> = board
        .available_moves()
        .into_iter()
        .map(|idx| {
            let score = if completes_line(board, geometry, idx, player) {
                ROOT_WIN
            } else {
                evaluate_mega(&board.with_move(idx, player), geometry, player)
            };
            (idx, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(top_k);

    if tactical {
        let own_fork = detect_fork(board, geometry, player).map(|f| f.index);
        let opponent_fork = detect_fork(board, geometry, player.opponent()).map(|f| f.index);
        for (idx, score) in &mut scored {
            if own_fork == Some(*idx) {
                *score += OWN_FORK_BONUS;
            }
            if opponent_fork == Some(*idx) {
                *score -= OPPONENT_FORK_PENALTY;
            }
            *score += proximity(board, *idx);
        }
        scored.sort_by(|a, b| b.1.cmp(&a.1));
    }

    scored.into_iter().map(|(idx, _)| idx).collect()
}

/// Time-bounded alpha-beta searcher for one decision.
///
/// The searcher borrows the caller's cache; entries are only written for
/// nodes whose search finished before the deadline.
pub struct MegaSearcher<'a> {
    geometry: &'a Geometry,
    player: Mark,
    limits: SearchLimits,
    start: Instant,
    cache: &'a mut TranspositionCache,
    nodes: u64,
    stopped: bool,
}

impl<'a> MegaSearcher<'a> {
    /// Create a searcher whose clock started at `start`
    pub fn new(
        geometry: &'a Geometry,
        player: Mark,
        limits: SearchLimits,
        start: Instant,
        cache: &'a mut TranspositionCache,
    ) -> Self {
        Self {
            geometry,
            player,
            limits,
            start,
            cache,
            nodes: 0,
            stopped: false,
        }
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Check the clock and latch the stop flag once the budget is spent
    #[inline]
    fn check_time(&mut self) -> bool {
        if !self.stopped && self.start.elapsed() >= self.limits.time_limit {
            self.stopped = true;
        }
        self.stopped
    }

    /// Static evaluation of a non-terminal node, kept below every terminal
    /// score so a real win or loss always dominates it
    #[inline]
    fn leaf_score(&self, board: &Board) -> i32 {
        evaluate_mega(board, self.geometry, self.player).clamp(-LEAF_LIMIT, LEAF_LIMIT)
    }

    /// Interior move list: immediate wins for the mover, then blocks, then
    /// squares near existing marks and the center/corners.
    fn interior_moves(&self, board: &Board, mover: Mark) -> Vec<usize> {
        let center = board.center();
        let corners = board.corners();
        let mut scored: Vec<(usize, i32)> = board
            .available_moves()
            .into_iter()
            .map(|idx| {
                let score = if completes_line(board, self.geometry, idx, mover) {
                    ORDER_WIN
                } else if completes_line(board, self.geometry, idx, mover.opponent()) {
                    ORDER_BLOCK
                } else {
                    let mut s = proximity(board, idx) * ORDER_PROXIMITY;
                    if idx == center {
                        s += ORDER_CENTER;
                    }
                    if corners.contains(&idx) {
                        s += ORDER_CORNER;
                    }
                    s
                };
                (idx, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(MAX_INTERIOR_MOVES);
        scored.into_iter().map(|(idx, _)| idx).collect()
    }

    /// Value of `board` for the searching player.
    fn alpha_beta(
        &mut self,
        board: &Board,
        depth: u32,
        max_depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if self.nodes % TIME_CHECK_INTERVAL == 0 {
            self.check_time();
        }
        if self.stopped {
            return self.leaf_score(board);
        }

        let ply = i32::try_from(depth).unwrap_or(i32::MAX);
        match find_winner(board, self.geometry) {
            Some(m) if m == self.player => return MEGA_WIN - ply,
            Some(_) => return ply - MEGA_WIN,
            None => {}
        }
        if board.is_full() {
            return 0;
        }
        if depth >= max_depth {
            return self.leaf_score(board);
        }

        let key = cache_key(board, self.player, depth, max_depth, maximizing);
        if let Some(score) = self.cache.probe(&key, alpha, beta) {
            return score;
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let mover = if maximizing {
            self.player
        } else {
            self.player.opponent()
        };
        let mut best = if maximizing { -INF } else { INF };

        for idx in self.interior_moves(board, mover) {
            let child = board.with_move(idx, mover);
            let score = self.alpha_beta(&child, depth + 1, max_depth, !maximizing, alpha, beta);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha || self.stopped {
                break;
            }
        }

        if !self.stopped {
            self.cache
                .store(key, best, Bound::classify(best, alpha_orig, beta_orig));
        }
        best
    }

    /// Search every root move to `max_depth`.
    ///
    /// Stops early when `elapsed >= guard` before a root move. Returns the
    /// best `(move, score)` seen and whether every root move finished.
    fn search_root(
        &mut self,
        board: &Board,
        moves: &[usize],
        max_depth: u32,
        guard: Duration,
    ) -> (Option<(usize, i32)>, bool) {
        let mut best: Option<(usize, i32)> = None;

        for &idx in moves {
            if self.stopped || self.start.elapsed() >= guard {
                self.stopped = true;
                return (best, false);
            }
            let alpha = best.map_or(-INF, |(_, s)| s);
            let child = board.with_move(idx, self.player);
            let score = self.alpha_beta(&child, 0, max_depth, false, alpha, INF);
            if self.stopped {
                return (best, false);
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        (best, true)
    }

    /// Iterative deepening from depth `min(3, max_depth)` to `max_depth`.
    ///
    /// An iteration cut short by the clock is discarded unless no iteration
    /// has finished yet. Stops early once a forced win is proven, which only
    /// a terminal score can show.
    pub fn iterative_deepening(&mut self, board: &Board, root_moves: &[usize]) -> DeepeningResult {
        let mut moves = root_moves.to_vec();
        let mut best: Option<(usize, i32)> = None;
        let mut completed_depth = 0;

        let first = MIN_ITERATION_DEPTH.min(self.limits.max_depth);
        for depth in first..=self.limits.max_depth {
            let (result, finished) = self.search_root(board, &moves, depth, self.limits.time_limit);

            if !finished {
                if best.is_none() {
                    best = result;
                }
                trace!(depth, nodes = self.nodes, "iteration interrupted");
                break;
            }

            best = result;
            completed_depth = depth;
            trace!(depth, ?best, nodes = self.nodes, "iteration complete");

            if let Some((pv, score)) = best {
                if score > PROVEN_WIN {
                    break;
                }
                // Principal variation first next time
                if let Some(pos) = moves.iter().position(|&m| m == pv) {
                    moves[..=pos].rotate_right(1);
                }
            }
        }

        self.result(best, completed_depth, root_moves)
    }

    /// One pass at `max_depth`, with no new root move started once
    /// `guard_fraction` of the time limit is spent.
    pub fn fixed_depth(&mut self, board: &Board, root_moves: &[usize], guard_fraction: f64) -> DeepeningResult {
        let guard = self.limits.time_limit.mul_f64(guard_fraction);
        let (best, finished) = self.search_root(board, root_moves, self.limits.max_depth, guard);
        let depth = if finished { self.limits.max_depth } else { 0 };
        self.result(best, depth, root_moves)
    }

    fn result(&self, best: Option<(usize, i32)>, depth: u32, root_moves: &[usize]) -> DeepeningResult {
        DeepeningResult {
            best_move: best.map(|(idx, _)| idx).or_else(|| root_moves.first().copied()),
            score: best.map_or(0, |(_, s)| s),
            depth,
            nodes: self.nodes,
            timed_out: self.stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searcher_for<'a>(
        geometry: &'a Geometry,
        player: Mark,
        limits: SearchLimits,
        cache: &'a mut TranspositionCache,
    ) -> MegaSearcher<'a> {
        MegaSearcher::new(geometry, player, limits, Instant::now(), cache)
    }

    #[test]
    fn test_limits_by_branching() {
        let few = SearchLimits::for_position(8, 5, 3);
        assert_eq!((few.top_k, few.max_depth), (10, 5));
        assert_eq!(few.time_limit, Duration::from_millis(1_500));

        let mid = SearchLimits::for_position(18, 6, 3);
        assert_eq!((mid.top_k, mid.max_depth), (12, 3));

        let many = SearchLimits::for_position(40, 7, 3);
        assert_eq!((many.top_k, many.max_depth), (15, 3));
        assert_eq!(many.time_limit, Duration::from_millis(1_000));
    }

    #[test]
    fn test_limits_by_win_length() {
        assert_eq!(SearchLimits::for_position(8, 5, 4).max_depth, 6);
        assert_eq!(SearchLimits::for_position(18, 5, 4).max_depth, 5);
        assert_eq!(SearchLimits::for_position(40, 7, 5).max_depth, 3);
        assert_eq!(SearchLimits::for_position(8, 5, 5).max_depth, 4);
    }

    #[test]
    fn test_strengthened_limits() {
        let base = SearchLimits::for_position(40, 7, 4);
        let strong = base.strengthened(40, 4, 8);
        assert_eq!(strong.max_depth, 6);
        assert_eq!(strong.top_k, 24);
        assert_eq!(strong.time_limit, Duration::from_millis(3_000));

        let capped = SearchLimits::for_position(8, 5, 4).strengthened(8, 4, 8);
        assert_eq!(capped.max_depth, 8);
        assert_eq!(capped.top_k, 8);
        assert_eq!(capped.time_limit, Duration::from_millis(4_500));
    }

    #[test]
    fn test_budget_is_clamped_to_floor() {
        let limits = SearchLimits::for_position(40, 7, 4);
        let floor = Duration::from_millis(200);
        assert_eq!(
            limits.with_budget(Some(Duration::from_millis(50)), floor).time_limit,
            floor
        );
        assert_eq!(
            limits.with_budget(Some(Duration::from_millis(700)), floor).time_limit,
            Duration::from_millis(700)
        );
        assert_eq!(limits.with_budget(None, floor), limits);
    }

    #[test]
    fn test_root_ordering_puts_win_first() {
        let geometry = Geometry::new(5, 4);
        let mut b = Board::new(5);
        for col in 0..3 {
            b = b.with_move(b.index(0, col), Mark::O);
        }
        let moves = order_root_moves(&b, &geometry, Mark::O, 10, false);
        assert_eq!(moves.len(), 10);
        assert_eq!(moves[0], 3);
    }

    #[test]
    fn test_root_ordering_fork_bonus() {
        let geometry = Geometry::classic();
        let b: Board = "X.. .O. ..X".parse().unwrap();
        let moves = order_root_moves(&b, &geometry, Mark::X, 9, true);
        assert_eq!(moves.len(), 6);
        assert!(moves[0] == 2 || moves[0] == 6);
    }

    #[test]
    fn test_finds_immediate_win() {
        let geometry = Geometry::new(5, 4);
        let mut b = Board::new(5);
        for col in 1..4 {
            b = b.with_move(b.index(2, col), Mark::X);
        }
        b = b.with_move(0, Mark::O).with_move(24, Mark::O);

        let limits = SearchLimits::new(3, 10, Duration::from_secs(2));
        let moves = order_root_moves(&b, &geometry, Mark::X, limits.top_k, false);
        let mut cache = TranspositionCache::new();
        let result = searcher_for(&geometry, Mark::X, limits, &mut cache).iterative_deepening(&b, &moves);

        assert!(result.best_move == Some(10) || result.best_move == Some(14));
        assert_eq!(result.score, MEGA_WIN);
        assert!(!result.timed_out);
    }

    #[test]
    fn test_leaf_scores_stay_below_proven_band() {
        // X one mark short on row 2: the raw evaluation is far past any
        // terminal score
        let geometry = Geometry::new(5, 4);
        let mut b = Board::new(5).with_move(10, Mark::O);
        for idx in [11, 12, 13] {
            b = b.with_move(idx, Mark::X);
        }
        assert!(evaluate_mega(&b, &geometry, Mark::X) > MEGA_WIN);

        let limits = SearchLimits::new(3, 10, Duration::from_secs(2));
        let mut cache = TranspositionCache::new();
        let searcher = searcher_for(&geometry, Mark::X, limits, &mut cache);
        assert_eq!(searcher.leaf_score(&b), LEAF_LIMIT);
        assert!(searcher.leaf_score(&b) < PROVEN_WIN);

        let mut cache = TranspositionCache::new();
        let searcher = searcher_for(&geometry, Mark::O, limits, &mut cache);
        assert_eq!(searcher.leaf_score(&b), -LEAF_LIMIT);
    }

    #[test]
    fn test_heuristic_scores_do_not_stop_deepening() {
        // Five in a row on 5x5 with one mark each: no line can be finished
        // within four plies, so every iteration must run
        let geometry = Geometry::new(5, 5);
        let b = Board::new(5).with_move(12, Mark::X).with_move(0, Mark::O);
        let limits = SearchLimits::new(4, 4, Duration::from_secs(30));
        let moves = order_root_moves(&b, &geometry, Mark::X, limits.top_k, false);
        let mut cache = TranspositionCache::new();
        let result = searcher_for(&geometry, Mark::X, limits, &mut cache).iterative_deepening(&b, &moves);

        assert_eq!(result.depth, 4);
        assert!(!result.timed_out);
        assert!(result.score.abs() <= LEAF_LIMIT);
    }

    #[test]
    fn test_takes_win_over_strong_leaf() {
        // Both 10 and 14 win at once; slower wins and static scores rank below
        let geometry = Geometry::new(5, 4);
        let mut b = Board::new(5).with_move(0, Mark::O).with_move(24, Mark::O).with_move(4, Mark::O);
        for idx in [11, 12, 13] {
            b = b.with_move(idx, Mark::X);
        }
        let limits = SearchLimits::new(4, 10, Duration::from_secs(5));
        let moves: Vec<usize> = b.available_moves().into_iter().rev().collect();
        let mut cache = TranspositionCache::new();
        let result = searcher_for(&geometry, Mark::X, limits, &mut cache).iterative_deepening(&b, &moves);

        assert!(result.best_move == Some(10) || result.best_move == Some(14));
        assert_eq!(result.score, MEGA_WIN);
    }

    #[test]
    fn test_blocks_open_four_threat() {
        let geometry = Geometry::new(5, 4);
        let mut b = Board::new(5);
        for row in 0..3 {
            b = b.with_move(b.index(row, 4), Mark::O);
        }
        b = b.with_move(12, Mark::X).with_move(6, Mark::X);

        let limits = SearchLimits::new(3, 10, Duration::from_secs(2));
        let moves = order_root_moves(&b, &geometry, Mark::X, limits.top_k, false);
        let mut cache = TranspositionCache::new();
        let result = searcher_for(&geometry, Mark::X, limits, &mut cache).iterative_deepening(&b, &moves);

        // X has no immediate win, O threatens 19
        assert_eq!(result.best_move, Some(19));
    }

    #[test]
    fn test_cache_is_filled_and_reused() {
        let geometry = Geometry::new(4, 3);
        let b = Board::new(4).with_move(5, Mark::X).with_move(10, Mark::O);
        let limits = SearchLimits::new(3, 8, Duration::from_secs(5));
        let moves = order_root_moves(&b, &geometry, Mark::X, limits.top_k, false);

        let mut cache = TranspositionCache::new();
        let first = searcher_for(&geometry, Mark::X, limits, &mut cache).iterative_deepening(&b, &moves);
        assert!(!cache.is_empty());

        let second = searcher_for(&geometry, Mark::X, limits, &mut cache).iterative_deepening(&b, &moves);
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert!(second.nodes <= first.nodes);
        assert!(cache.stats().hits > 0);
    }

    #[test]
    fn test_time_budget_is_respected() {
        let geometry = Geometry::new(9, 5);
        let mut b = Board::new(9);
        for (i, idx) in [40, 41, 31, 49, 30, 50].into_iter().enumerate() {
            b = b.with_move(idx, if i % 2 == 0 { Mark::X } else { Mark::O });
        }

        let budget = Duration::from_millis(250);
        let limits = SearchLimits::new(8, 24, budget);
        let start = Instant::now();
        let moves = order_root_moves(&b, &geometry, Mark::X, limits.top_k, true);
        let mut cache = TranspositionCache::new();
        let result = MegaSearcher::new(&geometry, Mark::X, limits, start, &mut cache)
            .iterative_deepening(&b, &moves);
        let elapsed = start.elapsed();

        assert!(result.best_move.is_some());
        assert!(result.timed_out);
        // One node past the deadline at most, plus scheduling noise
        assert!(elapsed < budget + Duration::from_millis(250), "took {elapsed:?}");
    }

    #[test]
    fn test_fixed_depth_returns_candidate() {
        let geometry = Geometry::new(6, 4);
        let b = Board::new(6).with_move(14, Mark::O);
        let limits = SearchLimits::for_position(35, 6, 4);
        let moves = order_root_moves(&b, &geometry, Mark::X, limits.top_k, false);
        let mut cache = TranspositionCache::new();
        let result = searcher_for(&geometry, Mark::X, limits, &mut cache).fixed_depth(&b, &moves, 0.85);

        let chosen = result.best_move.unwrap();
        assert!(moves.contains(&chosen));
        assert!(b.is_empty_at(chosen));
    }
}
