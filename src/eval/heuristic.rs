//! Heuristic evaluation of non-terminal positions
//!
//! Three evaluators share one convention: the score is from `player`'s
//! point of view, positive favours `player`.
//!
//! - [`evaluate_classic`]: line counting on small boards plus center/corner
//!   bonuses
//! - [`evaluate_infinite`]: the classic weights, halved for lines that lean
//!   on a mark about to be retracted
//! - [`evaluate_mega`]: summed [`line_threat`] scores plus positional
//!   bonuses scaled by board size

use crate::board::{Board, Geometry, Mark, WinCombo};
use crate::rules::{find_winner, MoveHistory};
use crate::search::threat::line_threat;

use super::patterns::{LineScore, ThreatScore};

/// Count `(player, opponent)` marks on one line
#[inline]
fn line_counts(board: &Board, combo: &WinCombo, player: Mark) -> (usize, usize) {
    combo
        .cells()
        .iter()
        .fold((0, 0), |(mine, theirs), &i| match board.get(i) {
            Some(m) if m == player => (mine + 1, theirs),
            Some(_) => (mine, theirs + 1),
            None => (mine, theirs),
        })
}

/// Center and corner bonus for the classic and infinite evaluators
fn square_bonus(board: &Board, player: Mark) -> i32 {
    let value = |idx: usize, weight: i32| match board.get(idx) {
        Some(m) if m == player => weight,
        Some(_) => -weight,
        None => 0,
    };
    let corners: i32 = board
        .corners()
        .iter()
        .map(|&idx| value(idx, LineScore::CORNER))
        .sum();
    value(board.center(), LineScore::CENTER) + corners
}

/// Evaluate a classic board from `player`'s perspective.
///
/// Lines held only by `player` score +1000 when complete, +100 when one
/// short, +10 otherwise; opponent-only lines score -1000/-150/-10.
#[must_use]
pub fn evaluate_classic(board: &Board, geometry: &Geometry, player: Mark) -> i32 {
    let win = geometry.win_length();
    let mut score = 0;

    for combo in geometry.combos() {
        let (mine, theirs) = line_counts(board, combo, player);

        if theirs == 0 && mine > 0 {
            score += if mine == win {
                LineScore::FULL
            } else if mine + 1 == win {
                LineScore::OPEN_TWO
            } else {
                LineScore::SINGLE
            };
        }
        if mine == 0 && theirs > 0 {
            score -= if theirs == win {
                LineScore::FULL
            } else if theirs + 1 == win {
                LineScore::OPP_OPEN_TWO
            } else {
                LineScore::SINGLE
            };
        }
    }

    score + square_bonus(board, player)
}

/// Evaluate an infinite-variant board from `player`'s perspective.
///
/// A one-short line that contains the side's oldest mark (when that side
/// already holds the maximum number of marks) is worth half, since that
/// mark disappears on the side's next placement.
#[must_use]
pub fn evaluate_infinite(
    board: &Board,
    geometry: &Geometry,
    player: Mark,
    history: &MoveHistory,
) -> i32 {
    let opponent = player.opponent();
    match find_winner(board, geometry) {
        Some(m) if m == player => return LineScore::AGING_WIN,
        Some(_) => return -LineScore::AGING_WIN,
        None => {}
    }

    let win = geometry.win_length();
    let my_oldest = history.expiring(player);
    let opp_oldest = history.expiring(opponent);
    let mut score = 0;

    for combo in geometry.combos() {
        let (mine, theirs) = line_counts(board, combo, player);
        let leans_on = |oldest: Option<usize>| oldest.is_some_and(|i| combo.contains(i));

        if theirs == 0 && mine > 0 {
            if mine + 1 == win {
                score += if leans_on(my_oldest) {
                    LineScore::AGING_TWO
                } else {
                    LineScore::OPEN_TWO
                };
            } else if mine < win {
                score += LineScore::AGING_SINGLE;
            }
        }
        if mine == 0 && theirs > 0 {
            if theirs + 1 == win {
                score -= if leans_on(opp_oldest) {
                    LineScore::OPP_AGING_TWO
                } else {
                    LineScore::OPP_OPEN_TWO
                };
            } else if theirs < win {
                score -= LineScore::AGING_SINGLE;
            }
        }
    }

    score + square_bonus(board, player)
}

/// Evaluate a mega board from `player`'s perspective.
///
/// Every line contributes its [`line_threat`] score, weighted 1.8 for win
/// lengths up to 4 and 1.5 beyond. Center, corners and (on boards of size 5
/// and up) the four squares next to the center add size-scaled bonuses.
#[must_use]
pub fn evaluate_mega(board: &Board, geometry: &Geometry, player: Mark) -> i32 {
    let win = geometry.win_length();
    let weight = if win <= 4 {
        ThreatScore::SHORT_RUN_WEIGHT
    } else {
        ThreatScore::LONG_RUN_WEIGHT
    };

    let lines: f64 = geometry
        .combos()
        .iter()
        .map(|combo| f64::from(line_threat(board, combo, player, win)) * weight)
        .sum();

    #[allow(clippy::cast_possible_truncation)]
    let lines = lines as i32;
    lines + positional_bonus(board, player)
}

/// Size-scaled center, corner and near-center bonuses for mega boards
fn positional_bonus(board: &Board, player: Mark) -> i32 {
    let n = board.size();
    #[allow(clippy::cast_possible_truncation)]
    let per_size = |k: f64| (n as f64 * k).floor() as i32;
    let center_bonus = per_size(ThreatScore::CENTER_PER_SIZE);
    let corner_bonus = per_size(ThreatScore::CORNER_PER_SIZE);
    let near_bonus = per_size(ThreatScore::NEAR_CENTER_PER_SIZE);

    let value = |idx: usize, weight: i32| match board.get(idx) {
        Some(m) if m == player => weight,
        Some(_) => -weight,
        None => 0,
    };

    let center = board.center();
    let mut score = value(center, center_bonus);
    for corner in board.corners() {
        score += value(corner, corner_bonus);
    }

    if n >= 5 {
        let near = [
            center.checked_sub(1),
            Some(center + 1),
            center.checked_sub(n),
            Some(center + n),
        ];
        for idx in near.into_iter().flatten().filter(|&i| i < board.cell_count()) {
            score += value(idx, near_bonus);
        }
    }

    score
}
