//! Move engine routing every variant and difficulty
//!
//! One request produces one move. The dispatcher picks a strategy from the
//! request's variant and difficulty:
//!
//! 1. **No empty square**: [`NO_MOVE`]
//! 2. **Unrecognized difficulty or variant**: a uniformly random legal move
//! 3. **Mega**: threat checks, forks, opening book and time-bounded
//!    alpha-beta
//! 4. **Blitz** (or any classic request flagged as blitz): constant-time
//!    heuristic mixed with random play, never a deep search
//! 5. **Classic on a board larger than 3x3**: the mega strategies
//! 6. **Infinite**: mark-aging minimax mixed with random play
//! 7. **Classic**: exhaustive minimax, quick evaluation or random play
//!
//! Lower difficulties deliberately play imperfectly. All randomness comes
//! from the injected [`Rng`], so a seeded generator replays the same game.
//!
//! # Example
//!
//! ```
//! use tictactoe::{AIEngine, Board, Difficulty, Mark, MoveRequest, Variant};
//!
//! let mut engine = AIEngine::seeded(7);
//! let board: Board = "XX. OO. ...".parse().unwrap();
//! let request = MoveRequest::new(board, Mark::X)
//!     .difficulty(Difficulty::Impossible)
//!     .variant(Variant::Classic);
//!
//! let result = engine.get_move_with_stats(&request, None);
//! assert_eq!(result.best_move, Some(2));
//! println!("Strategy: {:?}", result.strategy);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument, warn};

use crate::board::{Board, Geometry, Mark, CLASSIC_SIZE};
use crate::error::{ParseTagError, RequestError};
use crate::eval::{evaluate_classic, evaluate_infinite, evaluate_mega};
use crate::rules::{apply_aging_move, find_immediate_win, find_winner, MoveHistory};
use crate::search::{
    best_classic_move, best_infinite_move, detect_fork, detect_opponent_fork_threat,
    find_double_threat_reply, heuristic_move, order_root_moves, prevent_common_fork_patterns,
    MegaSearcher, SearchLimits, TranspositionCache, DEFAULT_INFINITE_DEPTH, FORK_MAX_WIN_LENGTH,
};

/// Returned by [`decide`] when the board has no empty square
pub const NO_MOVE: i32 = -1;

/// Default win length when a request does not set one
pub const DEFAULT_WIN_LENGTH: usize = 3;

/// Playing strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Impossible,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Impossible => "impossible",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTagError::Difficulty(s.to_string()))
    }
}

/// Game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// 3x3, three in a row
    Classic,
    /// 3x3 with at most three marks per player
    Infinite,
    /// Classic rules under a short move clock
    Blitz,
    /// Larger boards with a configurable win length
    Mega,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Classic,
        Variant::Infinite,
        Variant::Blitz,
        Variant::Mega,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Infinite => "infinite",
            Variant::Blitz => "blitz",
            Variant::Mega => "mega",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTagError::Variant(s.to_string()))
    }
}

/// Engine-wide tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Caller time budgets below this are raised to it
    pub min_time_budget: Duration,
    /// Depth cutoff of the infinite-variant search, in plies
    pub infinite_depth: u32,
    /// Deepest iteration the mega search may reach
    pub mega_depth_cap: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_time_budget: Duration::from_millis(200),
            infinite_depth: DEFAULT_INFINITE_DEPTH,
            mega_depth_cap: 8,
        }
    }
}

/// Everything the engine needs to pick one move.
///
/// `difficulty` and `variant` are `None` when the caller passed a tag the
/// engine does not recognize; such requests get a random legal move.
#[derive(Debug, Clone)]
pub struct MoveRequest {
    pub board: Board,
    pub mover: Mark,
    pub difficulty: Option<Difficulty>,
    pub variant: Option<Variant>,
    /// Surviving marks in play order (infinite variant only)
    pub history: MoveHistory,
    /// Forces the blitz strategy for classic requests
    pub is_blitz: bool,
    /// Board size the caller believes it is playing on
    pub size: usize,
    pub win_length: usize,
    /// Requested thinking time (mega only), raised to the configured floor
    pub time_budget: Option<Duration>,
}

impl MoveRequest {
    /// Normal classic request with the default win length
    #[must_use]
    pub fn new(board: Board, mover: Mark) -> Self {
        let size = board.size();
        Self {
            board,
            mover,
            difficulty: Some(Difficulty::Normal),
            variant: Some(Variant::Classic),
            history: MoveHistory::new(),
            is_blitz: false,
            size,
            win_length: DEFAULT_WIN_LENGTH,
            time_budget: None,
        }
    }

    /// Build a request from free-form tags, keeping unknown tags as `None`
    #[must_use]
    pub fn from_tags(board: Board, mover: Mark, difficulty: &str, variant: &str) -> Self {
        let difficulty = difficulty
            .parse::<Difficulty>()
            .map_err(|e| warn!(%e, "falling back to random play"))
            .ok();
        let variant = variant
            .parse::<Variant>()
            .map_err(|e| warn!(%e, "falling back to random play"))
            .ok();
        Self {
            difficulty,
            variant,
            ..Self::new(board, mover)
        }
    }

    #[must_use]
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    #[must_use]
    pub fn history(mut self, history: MoveHistory) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn blitz(mut self, is_blitz: bool) -> Self {
        self.is_blitz = is_blitz;
        self
    }

    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn win_length(mut self, win_length: usize) -> Self {
        self.win_length = win_length;
        self
    }

    #[must_use]
    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Check the request for inconsistencies.
    ///
    /// The engine itself tolerates all of these; this is for callers that
    /// want to reject bad input before asking for a move.
    ///
    /// # Errors
    ///
    /// * [`RequestError::SizeMismatch`] if the board is not `size x size`
    /// * [`RequestError::WinLengthTooLong`] if no line can ever be completed
    /// * [`RequestError::HistoryOutOfRange`] if the history names a square
    ///   off the board
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.board.size() != self.size {
            return Err(RequestError::SizeMismatch {
                expected: self.size,
                actual: self.board.size(),
            });
        }
        if self.win_length > self.size {
            return Err(RequestError::WinLengthTooLong {
                size: self.size,
                win_length: self.win_length,
            });
        }
        let cells = self.board.cell_count();
        if let Some(record) = self.history.records().iter().find(|r| r.index >= cells) {
            return Err(RequestError::HistoryOutOfRange {
                index: record.index,
                cells,
            });
        }
        Ok(())
    }
}

/// Strategy that produced a move.
///
/// This indicates which step of the decision pipeline picked the square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Board was full
    NoMove,
    /// Uniformly random legal move
    Random,
    /// Completes a line for the mover
    ImmediateWin,
    /// Stops the opponent from completing a line
    Block,
    /// Creates two threats, or takes the opponent's fork square
    Fork,
    /// Denies the opponent a fork next move
    ForkPrevention,
    /// Fixed reply in the first two plies
    OpeningBook,
    /// Denies the opponent a two-win reply
    DoubleThreat,
    /// Constant-time blitz priorities
    Heuristic,
    /// Best one-ply static evaluation
    QuickEval,
    /// Exhaustive (classic) or depth-limited (infinite) minimax
    Minimax,
    /// Single-pass fixed-depth alpha-beta
    FixedDepth,
    /// Iterative-deepening alpha-beta
    IterativeDeepening,
}

/// Result of a move decision with statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    /// Chosen square, `None` only on a full board
    pub best_move: Option<usize>,
    /// Pipeline step that picked it
    pub strategy: Strategy,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Search nodes visited (0 for non-search strategies)
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn no_move(start: Instant) -> Self {
        Self {
            best_move: None,
            strategy: Strategy::NoMove,
            time_ms: elapsed_ms(start),
            nodes: 0,
        }
    }

    #[inline]
    fn chosen(choice: Choice, start: Instant) -> Self {
        Self {
            best_move: Some(choice.index),
            strategy: choice.strategy,
            time_ms: elapsed_ms(start),
            nodes: choice.nodes,
        }
    }

    /// The move as the wire-level index, [`NO_MOVE`] when there is none
    #[must_use]
    pub fn index(&self) -> i32 {
        self.best_move
            .and_then(|idx| i32::try_from(idx).ok())
            .unwrap_or(NO_MOVE)
    }
}

#[inline]
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// One pipeline decision before timing is attached
#[derive(Debug, Clone, Copy)]
struct Choice {
    index: usize,
    strategy: Strategy,
    nodes: u64,
}

impl Choice {
    #[inline]
    fn new(index: usize, strategy: Strategy) -> Self {
        Self {
            index,
            strategy,
            nodes: 0,
        }
    }

    #[inline]
    fn searched(index: usize, strategy: Strategy, nodes: u64) -> Self {
        Self {
            index,
            strategy,
            nodes,
        }
    }
}

/// Borrowed view of one decision
struct Position<'a> {
    board: &'a Board,
    geometry: &'a Geometry,
    mover: Mark,
    available: &'a [usize],
}

impl Position<'_> {
    #[inline]
    fn opponent(&self) -> Mark {
        self.mover.opponent()
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        let index = self.available[rng.random_range(0..self.available.len())];
        Choice::new(index, Strategy::Random)
    }

    fn win(&self) -> Option<Choice> {
        find_immediate_win(self.board, self.geometry, self.mover)
            .map(|idx| Choice::new(idx, Strategy::ImmediateWin))
    }

    fn block(&self) -> Option<Choice> {
        find_immediate_win(self.board, self.geometry, self.opponent())
            .map(|idx| Choice::new(idx, Strategy::Block))
    }

    /// First square with the highest score
    fn best_by<F>(&self, mut score: F) -> usize
    where
        F: FnMut(usize) -> i32,
    {
        let mut best = (self.available[0], i32::MIN);
        for &idx in self.available {
            let s = score(idx);
            if s > best.1 {
                best = (idx, s);
            }
        }
        best.0
    }
}

/// Pick a move for `request`.
///
/// Returns the chosen square as an index, or [`NO_MOVE`] when the board has
/// no empty square.
pub fn decide<R: Rng + ?Sized>(
    request: &MoveRequest,
    rng: &mut R,
    config: &EngineConfig,
    cache: Option<&mut TranspositionCache>,
) -> i32 {
    decide_with_stats(request, rng, config, cache).index()
}

/// Pick a move for `request` and report how it was found.
///
/// The optional `cache` is reused by the mega search; pass the same cache
/// for consecutive moves of one match.
#[instrument(skip_all, fields(variant = ?request.variant, difficulty = ?request.difficulty, mover = %request.mover))]
pub fn decide_with_stats<R: Rng + ?Sized>(
    request: &MoveRequest,
    rng: &mut R,
    config: &EngineConfig,
    cache: Option<&mut TranspositionCache>,
) -> MoveResult {
    let start = Instant::now();
    let board = &request.board;
    let available = board.available_moves();

    if available.is_empty() {
        debug!("board is full");
        return MoveResult::no_move(start);
    }

    let geometry = Geometry::new(board.size(), request.win_length);
    let position = Position {
        board,
        geometry: &geometry,
        mover: request.mover,
        available: &available,
    };

    let (Some(difficulty), Some(variant)) = (request.difficulty, request.variant) else {
        warn!("unrecognized difficulty or variant, playing randomly");
        return MoveResult::chosen(position.random(rng), start);
    };

    let choice = match variant {
        Variant::Mega => {
            let mut local = TranspositionCache::new();
            let cache = cache.unwrap_or(&mut local);
            mega_move(&position, difficulty, request.time_budget, config, cache, rng, start)
        }
        Variant::Blitz => blitz_move(&position, difficulty, rng),
        Variant::Classic if request.is_blitz => blitz_move(&position, difficulty, rng),
        Variant::Classic if board.size() > CLASSIC_SIZE => {
            debug!(size = board.size(), "classic request on a large board, using mega search");
            let mut local = TranspositionCache::new();
            let cache = cache.unwrap_or(&mut local);
            mega_move(&position, difficulty, request.time_budget, config, cache, rng, start)
        }
        Variant::Infinite => infinite_move(&position, difficulty, &request.history, config, rng),
        Variant::Classic => classic_move(&position, difficulty, rng),
    };

    let result = MoveResult::chosen(choice, start);
    debug!(
        index = choice.index,
        strategy = ?result.strategy,
        nodes = result.nodes,
        time_ms = result.time_ms,
        "move chosen"
    );
    result
}

fn classic_move<R: Rng + ?Sized>(position: &Position<'_>, difficulty: Difficulty, rng: &mut R) -> Choice {
    let quick_eval = |position: &Position<'_>| {
        let index = position.best_by(|idx| {
            evaluate_classic(
                &position.board.with_move(idx, position.mover),
                position.geometry,
                position.mover,
            )
        });
        Choice::new(index, Strategy::QuickEval)
    };
    let minimax = |position: &Position<'_>| {
        let result = best_classic_move(position.board, position.geometry, position.mover);
        let index = result.best_move.unwrap_or(position.available[0]);
        Choice::searched(index, Strategy::Minimax, result.nodes)
    };

    match difficulty {
        Difficulty::Easy => position.random(rng),
        Difficulty::Normal => {
            if let Some(win) = position.win() {
                return win;
            }
            if rng.random_bool(0.85) {
                if let Some(block) = position.block() {
                    return block;
                }
            }
            if rng.random_bool(0.4) {
                quick_eval(position)
            } else {
                position.random(rng)
            }
        }
        Difficulty::Hard => {
            if let Some(choice) = position.win().or_else(|| position.block()) {
                return choice;
            }
            if rng.random_bool(0.85) {
                minimax(position)
            } else {
                quick_eval(position)
            }
        }
        Difficulty::Impossible => minimax(position),
    }
}

fn blitz_move<R: Rng + ?Sized>(position: &Position<'_>, difficulty: Difficulty, rng: &mut R) -> Choice {
    let heuristic = |position: &Position<'_>| {
        let index = heuristic_move(position.board, position.geometry, position.mover)
            .unwrap_or(position.available[0]);
        Choice::new(index, Strategy::Heuristic)
    };

    match difficulty {
        Difficulty::Easy => {
            if rng.random_bool(0.7) {
                position.random(rng)
            } else {
                heuristic(position)
            }
        }
        Difficulty::Normal => {
            if rng.random_bool(0.5) {
                heuristic(position)
            } else {
                position.random(rng)
            }
        }
        Difficulty::Hard | Difficulty::Impossible => heuristic(position),
    }
}

fn infinite_move<R: Rng + ?Sized>(
    position: &Position<'_>,
    difficulty: Difficulty,
    history: &MoveHistory,
    config: &EngineConfig,
    rng: &mut R,
) -> Choice {
    match difficulty {
        Difficulty::Easy => {
            if rng.random_bool(0.8) {
                position.random(rng)
            } else {
                best_infinite(position, history, false, config)
            }
        }
        Difficulty::Normal => {
            if rng.random_bool(0.5) {
                best_infinite(position, history, false, config)
            } else {
                position.random(rng)
            }
        }
        Difficulty::Hard => {
            if rng.random_bool(0.8) {
                best_infinite(position, history, false, config)
            } else {
                position.random(rng)
            }
        }
        Difficulty::Impossible => best_infinite(position, history, true, config),
    }
}

/// Win, block, then either full aging minimax or the best one-ply evaluation
fn best_infinite(
    position: &Position<'_>,
    history: &MoveHistory,
    deep: bool,
    config: &EngineConfig,
) -> Choice {
    let wins_after_aging = |mark: Mark| {
        position.available.iter().copied().find(|&idx| {
            let (next, _) = apply_aging_move(position.board, history, idx, mark);
            find_winner(&next, position.geometry) == Some(mark)
        })
    };

    if let Some(idx) = wins_after_aging(position.mover) {
        return Choice::new(idx, Strategy::ImmediateWin);
    }
    if let Some(idx) = wins_after_aging(position.opponent()) {
        return Choice::new(idx, Strategy::Block);
    }

    if deep {
        let depth = infinite_depth_for(position.board.size(), config.infinite_depth);
        let result = best_infinite_move(position.board, position.geometry, position.mover, history, depth);
        let index = result.best_move.unwrap_or(position.available[0]);
        return Choice::searched(index, Strategy::Minimax, result.nodes);
    }

    let index = position.best_by(|idx| {
        let (next, next_history) = apply_aging_move(position.board, history, idx, position.mover);
        evaluate_infinite(&next, position.geometry, position.mover, &next_history)
    });
    Choice::new(index, Strategy::QuickEval)
}

/// Aging-search depth for a board: the configured cutoff on 3x3, fewer plies
/// on larger boards where the full cutoff would not finish in time
fn infinite_depth_for(size: usize, configured: u32) -> u32 {
    match size {
        0..=CLASSIC_SIZE => configured,
        4 => configured.min(3),
        _ => configured.min(2),
    }
}

/// Fork checks shared by the hard and impossible mega tiers
fn fork_choice(position: &Position<'_>) -> Option<Choice> {
    if let Some(fork) = detect_fork(position.board, position.geometry, position.mover) {
        return Some(Choice::new(fork.index, Strategy::Fork));
    }
    if let Some(fork) = detect_fork(position.board, position.geometry, position.opponent()) {
        return Some(Choice::new(fork.index, Strategy::Fork));
    }
    prevent_common_fork_patterns(position.board, position.geometry, position.mover)
        .map(|idx| Choice::new(idx, Strategy::ForkPrevention))
}

/// Fixed replies for the first two plies
fn opening_book(position: &Position<'_>) -> Option<usize> {
    let board = position.board;
    let center = board.center();
    match board.mark_count() {
        0 => Some(center),
        1 if board.is_empty_at(center) => Some(center),
        1 => board
            .corners()
            .into_iter()
            .find(|&c| board.is_empty_at(c))
            .or_else(|| position.available.first().copied()),
        _ => None,
    }
}

fn mega_move<R: Rng + ?Sized>(
    position: &Position<'_>,
    difficulty: Difficulty,
    budget: Option<Duration>,
    config: &EngineConfig,
    cache: &mut TranspositionCache,
    rng: &mut R,
    start: Instant,
) -> Choice {
    let static_best = |position: &Position<'_>| {
        position.best_by(|idx| {
            evaluate_mega(
                &position.board.with_move(idx, position.mover),
                position.geometry,
                position.mover,
            )
        })
    };

    match difficulty {
        Difficulty::Easy => {
            if rng.random_bool(0.5) {
                if let Some(win) = position.win() {
                    return win;
                }
            }
            if rng.random_bool(0.4) {
                if let Some(block) = position.block() {
                    return block;
                }
            }
            position.random(rng)
        }
        Difficulty::Normal => {
            if let Some(win) = position.win() {
                return win;
            }
            if rng.random_bool(0.7) {
                if let Some(block) = position.block() {
                    return block;
                }
            }
            let best = static_best(position);
            if rng.random_bool(0.3) {
                position.random(rng)
            } else {
                Choice::new(best, Strategy::QuickEval)
            }
        }
        Difficulty::Hard => {
            if let Some(choice) = position.win().or_else(|| position.block()) {
                return choice;
            }
            if rng.random_bool(0.8) {
                if let Some(choice) = fork_choice(position) {
                    return choice;
                }
            }
            if rng.random_bool(0.15) {
                return position.random(rng);
            }

            let limits = mega_limits(position, budget, config);
            let moves = order_root_moves(position.board, position.geometry, position.mover, limits.top_k, false);
            let mut searcher = MegaSearcher::new(position.geometry, position.mover, limits, start, cache);
            let result = searcher.fixed_depth(position.board, &moves, 0.85);
            let index = result.best_move.unwrap_or(position.available[0]);
            Choice::searched(index, Strategy::FixedDepth, result.nodes)
        }
        Difficulty::Impossible => impossible_mega_move(position, budget, config, cache, start),
    }
}

fn impossible_mega_move(
    position: &Position<'_>,
    budget: Option<Duration>,
    config: &EngineConfig,
    cache: &mut TranspositionCache,
    start: Instant,
) -> Choice {
    if let Some(choice) = position.win().or_else(|| position.block()) {
        return choice;
    }
    if let Some(choice) = fork_choice(position) {
        return choice;
    }
    if position.geometry.win_length() <= FORK_MAX_WIN_LENGTH {
        if let Some(idx) = detect_opponent_fork_threat(position.board, position.geometry, position.mover) {
            return Choice::new(idx, Strategy::ForkPrevention);
        }
    }
    if let Some(idx) = opening_book(position) {
        return Choice::new(idx, Strategy::OpeningBook);
    }

    let win_length = position.geometry.win_length();
    let available = position.available.len();
    let limits = SearchLimits::for_position(available, position.board.size(), win_length)
        .strengthened(available, win_length, config.mega_depth_cap);
    let limits = clamp_budget(limits, budget, config);

    let moves = order_root_moves(position.board, position.geometry, position.mover, limits.top_k, true);
    if let Some(idx) = find_double_threat_reply(position.board, position.geometry, position.mover, &moves) {
        return Choice::new(idx, Strategy::DoubleThreat);
    }

    let mut searcher = MegaSearcher::new(position.geometry, position.mover, limits, start, cache);
    let result = searcher.iterative_deepening(position.board, &moves);
    debug!(
        depth = result.depth,
        score = result.score,
        timed_out = result.timed_out,
        "iterative deepening finished"
    );
    let index = result.best_move.unwrap_or(position.available[0]);
    Choice::searched(index, Strategy::IterativeDeepening, result.nodes)
}

fn mega_limits(position: &Position<'_>, budget: Option<Duration>, config: &EngineConfig) -> SearchLimits {
    let limits = SearchLimits::for_position(
        position.available.len(),
        position.board.size(),
        position.geometry.win_length(),
    );
    clamp_budget(limits, budget, config)
}

fn clamp_budget(limits: SearchLimits, budget: Option<Duration>, config: &EngineConfig) -> SearchLimits {
    if let Some(requested) = budget {
        if requested < config.min_time_budget {
            warn!(
                requested_ms = requested.as_millis(),
                floor_ms = config.min_time_budget.as_millis(),
                "time budget below floor, clamping"
            );
        }
    }
    limits.with_budget(budget, config.min_time_budget)
}

/// Stateful front end owning the configuration and random source.
///
/// # Example
///
/// ```
/// use tictactoe::{AIEngine, Board, Difficulty, Mark, MoveRequest, Variant};
///
/// let mut engine = AIEngine::seeded(42);
/// let request = MoveRequest::new(Board::new(3), Mark::X)
///     .difficulty(Difficulty::Impossible)
///     .variant(Variant::Classic);
///
/// assert_eq!(engine.get_move(&request, None), Some(4));
/// ```
pub struct AIEngine {
    config: EngineConfig,
    rng: StdRng,
}

impl AIEngine {
    /// Create an engine with default settings and an OS-seeded generator
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom configuration
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create an engine whose random choices replay for a given seed
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(EngineConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(config: EngineConfig, rng: StdRng) -> Self {
        Self { config, rng }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the chosen square, or `None` on a full board.
    pub fn get_move(
        &mut self,
        request: &MoveRequest,
        cache: Option<&mut TranspositionCache>,
    ) -> Option<usize> {
        self.get_move_with_stats(request, cache).best_move
    }

    /// Get the chosen square with the strategy, time and node count.
    pub fn get_move_with_stats(
        &mut self,
        request: &MoveRequest,
        cache: Option<&mut TranspositionCache>,
    ) -> MoveResult {
        decide_with_stats(request, &mut self.rng, &self.config, cache)
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}
