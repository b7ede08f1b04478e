//! Mark aging for the "infinite" variant
//!
//! Each player may hold at most [`MAX_MARKS`] marks. Placing one more first
//! retracts that player's chronologically oldest surviving mark. The caller
//! owns the real move log; the engine only reads it and builds new
//! [`MoveHistory`] values for simulated plies.

use crate::board::{Board, Mark};

/// Marks a player may keep on the board in the infinite variant
pub const MAX_MARKS: usize = 3;

/// One placed mark: who, where, and when (monotonic insertion stamp)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub mark: Mark,
    pub index: usize,
    pub order: u64,
}

impl MoveRecord {
    #[must_use]
    pub fn new(mark: Mark, index: usize, order: u64) -> Self {
        Self { mark, index, order }
    }
}

/// Chronological log of surviving marks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from `(mark, index)` pairs in play order
    pub fn from_moves<I>(moves: I) -> Self
    where
        I: IntoIterator<Item = (Mark, usize)>,
    {
        let records = moves
            .into_iter()
            .zip(0u64..)
            .map(|((mark, index), order)| MoveRecord::new(mark, index, order))
            .collect();
        Self { records }
    }

    #[inline]
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Number of recorded marks for one player
    pub fn count(&self, mark: Mark) -> usize {
        self.records.iter().filter(|r| r.mark == mark).count()
    }

    /// Oldest surviving record of one player
    pub fn oldest(&self, mark: Mark) -> Option<&MoveRecord> {
        self.records
            .iter()
            .filter(|r| r.mark == mark)
            .min_by_key(|r| r.order)
    }

    /// Square that will be retracted on `mark`'s next placement, if any
    pub fn expiring(&self, mark: Mark) -> Option<usize> {
        if self.count(mark) >= MAX_MARKS {
            self.oldest(mark).map(|r| r.index)
        } else {
            None
        }
    }

    /// Stamp for the next record
    pub fn next_order(&self) -> u64 {
        self.records.iter().map(|r| r.order + 1).max().unwrap_or(0)
    }

    /// Append a record (caller-side bookkeeping)
    pub fn push(&mut self, mark: Mark, index: usize) {
        let order = self.next_order();
        self.records.push(MoveRecord::new(mark, index, order));
    }
}

/// Apply `mark` at `index` with aging, returning the new board and history.
///
/// If `mark` already holds [`MAX_MARKS`] marks, its oldest mark is removed
/// from both before the new mark is placed. Inputs are left untouched.
#[must_use]
pub fn apply_aging_move(
    board: &Board,
    history: &MoveHistory,
    index: usize,
    mark: Mark,
) -> (Board, MoveHistory) {
    let mut next_board = board.clone();
    let mut records = history.records.clone();

    if history.count(mark) >= MAX_MARKS {
        if let Some(oldest) = history.oldest(mark).copied() {
            if next_board.get(oldest.index) == Some(mark) {
                next_board = next_board.without(oldest.index);
            }
            records.retain(|r| *r != oldest);
        }
    }

    let order = history.next_order();
    next_board = next_board.with_move(index, mark);
    records.push(MoveRecord::new(mark, index, order));

    (next_board, MoveHistory { records })
}
