//! Line and square weights for position evaluation
//!
//! Opponent lines weigh slightly more than our own on the classic board so
//! that blocking a two-in-a-row is preferred over building one.

/// Line weights for the classic and infinite evaluators
pub struct LineScore;

impl LineScore {
    /// Complete line (only reachable when called on a terminal board)
    pub const FULL: i32 = 1_000;
    /// One mark short of a complete line
    pub const OPEN_TWO: i32 = 100;
    /// Opponent line one mark short of complete
    pub const OPP_OPEN_TWO: i32 = 150;
    /// Any other single-owner line
    pub const SINGLE: i32 = 10;

    /// Infinite variant: one-short line built on the side's oldest mark
    pub const AGING_TWO: i32 = 50;
    /// Infinite variant: opponent one-short line built on their oldest mark
    pub const OPP_AGING_TWO: i32 = 75;
    /// Infinite variant: single-mark line
    pub const AGING_SINGLE: i32 = 5;
    /// Infinite variant: decided game
    pub const AGING_WIN: i32 = 10_000;

    /// Center square bonus (classic and infinite)
    pub const CENTER: i32 = 15;
    /// Corner square bonus (classic and infinite)
    pub const CORNER: i32 = 5;
}

/// Threat weights for mega boards, scaled by the win length
pub struct ThreatScore;

impl ThreatScore {
    /// Line one mark away from winning
    pub const IMMEDIATE: i32 = 10_000;
    /// Base for a line two marks short (× win_length / 3)
    pub const ALMOST: i32 = 1_000;
    /// Base for a line with room to develop (× win_length / 3)
    pub const SETUP: i32 = 100;
    /// Base per mark for an early line (× win_length / 3)
    pub const EARLY: i32 = 20;
    /// Untouched line
    pub const OPEN_LINE: i32 = 5;

    /// Line multiplier when win length <= 4
    pub const SHORT_RUN_WEIGHT: f64 = 1.8;
    /// Line multiplier for longer runs
    pub const LONG_RUN_WEIGHT: f64 = 1.5;

    /// Per-size positional bonuses
    pub const CENTER_PER_SIZE: f64 = 5.0;
    pub const CORNER_PER_SIZE: f64 = 2.5;
    pub const NEAR_CENTER_PER_SIZE: f64 = 1.5;

    /// Scale a base weight by `win_length / 3`, rounding down
    #[inline]
    #[must_use]
    pub fn scaled(base: i32, win_length: usize) -> i32 {
        #[allow(clippy::cast_possible_truncation)]
        let scaled = (f64::from(base) * win_length as f64 / 3.0).floor() as i32;
        scaled
    }
}
