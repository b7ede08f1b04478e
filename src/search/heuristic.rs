//! Constant-time move selection for blitz play
//!
//! No lookahead beyond one ply: win, block, then a fixed preference for
//! the center, corners and edges.

use crate::board::{Board, Geometry, Mark};
use crate::rules::find_immediate_win;

/// Pick a move by fixed priorities.
///
/// 1. A square that wins immediately
/// 2. A square that blocks the opponent's immediate win
/// 3. The center
/// 4. A corner, preferring the one diagonally opposite an opponent corner
/// 5. A non-corner border square
/// 6. The first empty square
///
/// Returns `None` only when the board is full.
#[must_use]
pub fn heuristic_move(board: &Board, geometry: &Geometry, player: Mark) -> Option<usize> {
    let opponent = player.opponent();

    if let Some(idx) = find_immediate_win(board, geometry, player) {
        return Some(idx);
    }
    if let Some(idx) = find_immediate_win(board, geometry, opponent) {
        return Some(idx);
    }

    let center = board.center();
    if board.is_empty_at(center) {
        return Some(center);
    }

    // corners() is [top-left, top-right, bottom-left, bottom-right], so the
    // opposite of corners[i] is corners[3 - i]
    let corners = board.corners();
    for (i, &corner) in corners.iter().enumerate() {
        let opposite = corners[3 - i];
        if board.get(corner) == Some(opponent) && board.is_empty_at(opposite) {
            return Some(opposite);
        }
    }
    if let Some(&corner) = corners.iter().find(|&&c| board.is_empty_at(c)) {
        return Some(corner);
    }

    let available = board.available_moves();
    available
        .iter()
        .copied()
        .find(|&idx| board.is_border(idx) && !corners.contains(&idx))
        .or_else(|| available.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_takes_win_before_block() {
        let geometry = Geometry::classic();
        let b = board("XX. OO. ...");
        assert_eq!(heuristic_move(&b, &geometry, Mark::X), Some(2));
        assert_eq!(heuristic_move(&b, &geometry, Mark::O), Some(5));
    }

    #[test]
    fn test_blocks() {
        let geometry = Geometry::classic();
        assert_eq!(heuristic_move(&board("XX. ... .O."), &geometry, Mark::O), Some(2));
        assert_eq!(heuristic_move(&board("X.. X.. .O."), &geometry, Mark::O), Some(6));
    }

    #[test]
    fn test_center_first() {
        let geometry = Geometry::classic();
        assert_eq!(heuristic_move(&Board::new(3), &geometry, Mark::X), Some(4));
        assert_eq!(heuristic_move(&Board::new(5), &Geometry::new(5, 4), Mark::X), Some(12));
    }

    #[test]
    fn test_opposite_corner() {
        let geometry = Geometry::classic();
        assert_eq!(heuristic_move(&board("... .X. ..O"), &geometry, Mark::X), Some(0));
        assert_eq!(heuristic_move(&board("..O .X. ..."), &geometry, Mark::X), Some(6));
        assert_eq!(heuristic_move(&board("O.. .X. ..."), &geometry, Mark::X), Some(8));
    }

    #[test]
    fn test_first_free_corner_then_edge() {
        let geometry = Geometry::classic();
        assert_eq!(heuristic_move(&board("... .O. ..."), &geometry, Mark::X), Some(0));
        // Corners and center taken, no line threats
        let b = board("X..O .O.. ..X. O..X");
        assert_eq!(heuristic_move(&b, &Geometry::new(4, 4), Mark::X), Some(1));
    }

    #[test]
    fn test_full_board() {
        let geometry = Geometry::classic();
        assert_eq!(heuristic_move(&board("XOX XOO OXX"), &geometry, Mark::X), None);
    }
}
