//! Line threats and fork detection
//!
//! This module classifies single winning lines and looks one ply ahead for
//! forks: a move that leaves two or more lines one mark short of winning,
//! which the opponent cannot block at once.
//!
//! - [`line_threat`]: signed score of one line for one player
//! - [`detect_fork`]: best fork square for a player
//! - [`detect_opponent_fork_threat`] / [`prevent_common_fork_patterns`]:
//!   squares that stop the opponent from setting up a fork next move
//! - [`find_double_threat_reply`]: candidate squares that would hand the
//!   opponent two immediate wins

use crate::board::{Board, Geometry, Mark, WinCombo};
use crate::eval::ThreatScore;
use crate::rules::find_winner;

/// Fork forecasts are only used up to this win length
pub const FORK_MAX_WIN_LENGTH: usize = 5;

/// Smallest board on which common fork shapes are looked for
const FORK_PATTERN_MIN_SIZE: usize = 5;

/// Candidates examined by [`find_double_threat_reply`]
const DOUBLE_THREAT_CANDIDATES: usize = 8;

/// Opponent replies examined per candidate
const DOUBLE_THREAT_REPLIES: usize = 12;

/// A fork square and the number of one-short lines it creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fork {
    pub index: usize,
    pub threats: usize,
}

/// Count `(player, opponent, empty)` squares of one line
#[inline]
fn tally(board: &Board, combo: &WinCombo, player: Mark) -> (usize, usize, usize) {
    combo
        .cells()
        .iter()
        .fold((0, 0, 0), |(mine, theirs, empty), &i| match board.get(i) {
            Some(m) if m == player => (mine + 1, theirs, empty),
            Some(_) => (mine, theirs + 1, empty),
            None => (mine, theirs, empty + 1),
        })
}

/// Score of a single-owner line, from the owner's side
fn owned_line(marks: usize, empty: usize, win_length: usize) -> i32 {
    if marks + 1 == win_length && empty == 1 {
        ThreatScore::IMMEDIATE
    } else if marks + 2 == win_length && empty == 2 {
        ThreatScore::scaled(ThreatScore::ALMOST, win_length)
    } else if marks + 3 >= win_length && empty >= 3 {
        ThreatScore::scaled(ThreatScore::SETUP, win_length)
    } else {
        let marks = i32::try_from(marks).unwrap_or(i32::MAX);
        ThreatScore::scaled(ThreatScore::EARLY, win_length).saturating_mul(marks)
    }
}

/// Classify one winning line for `player`.
///
/// # Returns
///
/// * `0` when both players hold squares on the line
/// * a positive score when only `player` holds squares, negative when only
///   the opponent does (see [`ThreatScore`])
/// * [`ThreatScore::OPEN_LINE`] for an untouched line
#[must_use]
pub fn line_threat(board: &Board, combo: &WinCombo, player: Mark, win_length: usize) -> i32 {
    let (mine, theirs, empty) = tally(board, combo, player);

    match (mine, theirs) {
        (0, 0) if empty == win_length => ThreatScore::OPEN_LINE,
        (0, 0) => 0,
        (0, theirs) => -owned_line(theirs, empty, win_length),
        (mine, 0) => owned_line(mine, empty, win_length),
        _ => 0,
    }
}

/// Count lines through `index` that are one mark short of a win for
/// `player` with no opponent marks, once `player` has moved there.
fn threats_after(board: &Board, geometry: &Geometry, index: usize, player: Mark) -> usize {
    let next = board.with_move(index, player);
    let win = geometry.win_length();
    geometry
        .combos_through(index)
        .filter(|combo| {
            let (mine, theirs, empty) = tally(&next, combo, player);
            theirs == 0 && empty == 1 && mine + 1 == win
        })
        .count()
}

/// Find the square where `player` creates the most simultaneous
/// one-short lines, if some square creates at least two.
///
/// Ties go to the lowest index.
#[must_use]
pub fn detect_fork(board: &Board, geometry: &Geometry, player: Mark) -> Option<Fork> {
    let mut best: Option<Fork> = None;

    for index in board.available_moves() {
        let threats = threats_after(board, geometry, index, player);
        if threats >= 2 && best.map_or(true, |b| threats > b.threats) {
            best = Some(Fork { index, threats });
        }
    }

    best
}

/// Find the first empty square where an opponent mark would leave the
/// opponent with a fork on their following move.
///
/// Returns `None` when the win length is too long for fork forecasts.
#[must_use]
pub fn detect_opponent_fork_threat(
    board: &Board,
    geometry: &Geometry,
    player: Mark,
) -> Option<usize> {
    if geometry.win_length() > FORK_MAX_WIN_LENGTH {
        return None;
    }
    let opponent = player.opponent();

    board.available_moves().into_iter().find(|&index| {
        let next = board.with_move(index, opponent);
        detect_fork(&next, geometry, opponent).is_some()
    })
}

/// Look for lines holding two or more opponent marks and return the first
/// empty square on such a line that, if the opponent took it, would give
/// them a fork.
///
/// Only used on boards of size 5 and up with win length at most 5.
#[must_use]
pub fn prevent_common_fork_patterns(
    board: &Board,
    geometry: &Geometry,
    player: Mark,
) -> Option<usize> {
    if geometry.win_length() > FORK_MAX_WIN_LENGTH || geometry.size() < FORK_PATTERN_MIN_SIZE {
        return None;
    }
    let opponent = player.opponent();

    for combo in geometry.combos() {
        let (theirs, _, empty) = tally(board, combo, opponent);
        if theirs < 2 || empty == 0 {
            continue;
        }
        let hit = combo
            .cells()
            .iter()
            .copied()
            .filter(|&i| board.is_empty_at(i))
            .find(|&i| detect_fork(&board.with_move(i, opponent), geometry, opponent).is_some());
        if hit.is_some() {
            return hit;
        }
    }

    None
}

/// Scan the first candidates and return one that, if the opponent took it,
/// would leave them two immediate wins among their first replies.
#[must_use]
pub fn find_double_threat_reply(
    board: &Board,
    geometry: &Geometry,
    player: Mark,
    candidates: &[usize],
) -> Option<usize> {
    let opponent = player.opponent();

    candidates
        .iter()
        .take(DOUBLE_THREAT_CANDIDATES)
        .copied()
        .find(|&index| {
            let next = board.with_move(index, opponent);
            next.available_moves()
                .into_iter()
                .take(DOUBLE_THREAT_REPLIES)
                .filter(|&reply| {
                    find_winner(&next.with_move(reply, opponent), geometry) == Some(opponent)
                })
                .nth(1)
                .is_some()
        })
}

/// Local density around `index`: every occupied square within two rows and
/// two columns adds `max(0, 3 - manhattan distance)`.
#[must_use]
pub fn proximity(board: &Board, index: usize) -> i32 {
    #[allow(clippy::cast_possible_wrap)]
    let n = board.size() as isize;
    let (row, col) = board.row_col(index);
    #[allow(clippy::cast_possible_wrap)]
    let (row, col) = (row as isize, col as isize);
    let mut score = 0;

    for dr in -2..=2_isize {
        for dc in -2..=2_isize {
            if dr == 0 && dc == 0 {
                continue;
            }
            let (r, c) = (row + dr, col + dc);
            if r < 0 || c < 0 || r >= n || c >= n {
                continue;
            }
            #[allow(clippy::cast_sign_loss)]
            let neighbour = (r * n + c) as usize;
            if board.get(neighbour).is_some() {
                #[allow(clippy::cast_possible_truncation)]
                let distance = (dr.abs() + dc.abs()) as i32;
                score += (3 - distance).max(0);
            }
        }
    }

    score
}
