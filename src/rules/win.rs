//! Terminal detection
//!
//! A position is won when every square of some winning line holds the same
//! mark, drawn when no line is complete and no square is empty, and still
//! ongoing otherwise. Evaluators assume an ongoing board, so search code
//! calls [`check_terminal`] first.

use crate::board::{Board, Geometry, Mark};

/// Result of terminal detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A complete line of this mark exists
    Winner(Mark),
    /// Board full, no complete line
    Draw,
    /// Play continues
    Ongoing,
}

impl Outcome {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    #[inline]
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(mark),
            _ => None,
        }
    }
}

/// Classify a board snapshot. The first complete line found decides the winner.
#[must_use]
pub fn check_terminal(board: &Board, geometry: &Geometry) -> Outcome {
    if let Some(mark) = find_winner(board, geometry) {
        return Outcome::Winner(mark);
    }
    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

/// Find the mark owning a complete line, if any
#[must_use]
pub fn find_winner(board: &Board, geometry: &Geometry) -> Option<Mark> {
    geometry.combos().iter().find_map(|combo| {
        let (&first, rest) = combo.cells().split_first()?;
        let mark = board.get(first)?;
        rest.iter().all(|&i| board.get(i) == Some(mark)).then_some(mark)
    })
}

/// Check whether placing `mark` at the empty square `index` completes a line.
///
/// Only lines through `index` are inspected.
#[inline]
pub fn completes_line(board: &Board, geometry: &Geometry, index: usize, mark: Mark) -> bool {
    geometry.combos_through(index).any(|combo| {
        combo
            .cells()
            .iter()
            .all(|&i| i == index || board.get(i) == Some(mark))
    })
}

/// Every empty square where `mark` would win immediately, in index order
#[must_use]
pub fn winning_moves(board: &Board, geometry: &Geometry, mark: Mark) -> Vec<usize> {
    board
        .available_moves()
        .into_iter()
        .filter(|&idx| completes_line(board, geometry, idx, mark))
        .collect()
}

/// First empty square where `mark` would win immediately
#[must_use]
pub fn find_immediate_win(board: &Board, geometry: &Geometry, mark: Mark) -> Option<usize> {
    board
        .available_moves()
        .into_iter()
        .find(|&idx| completes_line(board, geometry, idx, mark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_board_is_ongoing() {
        let geometry = Geometry::classic();
        assert_eq!(check_terminal(&Board::new(3), &geometry), Outcome::Ongoing);
    }

    #[test]
    fn test_row_column_diagonal_wins() {
        let geometry = Geometry::classic();
        assert_eq!(
            check_terminal(&board("XXX OO. ..."), &geometry),
            Outcome::Winner(Mark::X)
        );
        assert_eq!(
            check_terminal(&board("OX. OX. O.X"), &geometry),
            Outcome::Winner(Mark::O)
        );
        assert_eq!(
            check_terminal(&board("X.O .XO ..X"), &geometry),
            Outcome::Winner(Mark::X)
        );
        assert_eq!(
            check_terminal(&board("X.O XO. O.X"), &geometry),
            Outcome::Winner(Mark::O)
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let geometry = Geometry::classic();
        let b = board("XOX XOO OXX");
        assert_eq!(check_terminal(&b, &geometry), Outcome::Draw);
        assert!(Outcome::Draw.is_terminal());
        assert_eq!(Outcome::Draw.winner(), None);
    }

    #[test]
    fn test_win_on_full_board_beats_draw() {
        let geometry = Geometry::classic();
        let b = board("XXX OOX XOO");
        assert_eq!(check_terminal(&b, &geometry), Outcome::Winner(Mark::X));
    }

    #[test]
    fn test_mega_board_run_length() {
        let geometry = Geometry::new(5, 4);
        let mut b = Board::new(5);
        for col in 0..3 {
            b = b.with_move(b.index(2, col), Mark::O);
        }
        assert_eq!(check_terminal(&b, &geometry), Outcome::Ongoing);
        b = b.with_move(b.index(2, 3), Mark::O);
        assert_eq!(check_terminal(&b, &geometry), Outcome::Winner(Mark::O));
    }

    #[test]
    fn test_no_combos_never_wins() {
        let geometry = Geometry::new(3, 4);
        assert_eq!(check_terminal(&board("XXX ... ..."), &geometry), Outcome::Ongoing);
        assert_eq!(check_terminal(&board("XXX XXX XXX"), &geometry), Outcome::Draw);
    }

    #[test]
    fn test_winning_moves() {
        let geometry = Geometry::classic();
        let b = board("XX. OO. X..");
        assert_eq!(winning_moves(&b, &geometry, Mark::X), vec![2]);
        assert_eq!(find_immediate_win(&b, &geometry, Mark::X), Some(2));
        assert_eq!(find_immediate_win(&b, &geometry, Mark::O), Some(5));
        assert!(completes_line(&b, &geometry, 2, Mark::X));
        assert!(!completes_line(&b, &geometry, 8, Mark::X));
    }

    fn arb_board(size: usize) -> impl Strategy<Value = Board> {
        proptest::collection::vec(
            prop_oneof![Just(None), Just(Some(Mark::X)), Just(Some(Mark::O))],
            size * size,
        )
        .prop_map(move |cells| Board::from_cells(size, cells).unwrap())
    }

    proptest! {
        #[test]
        fn prop_complete_line_always_wins(b in arb_board(4), line in 0usize..10, x_wins in any::<bool>()) {
            let geometry = Geometry::new(4, 4);
            let mark = if x_wins { Mark::X } else { Mark::O };
            let combo = geometry.combos()[line].clone();
            let mut b = b;
            // Break complete lines of the other mark so the winner is unambiguous
            for other in geometry.combos() {
                if other.cells().iter().all(|&i| b.get(i) == Some(mark.opponent())) {
                    if let Some(&i) = other.cells().iter().find(|i| !combo.contains(**i)) {
                        b = b.without(i);
                    }
                }
            }
            for &i in combo.cells() {
                b = b.with_move(i, mark);
            }
            prop_assert_eq!(check_terminal(&b, &geometry), Outcome::Winner(mark));
        }

        #[test]
        fn prop_no_line_means_draw_or_ongoing(b in arb_board(3)) {
            let geometry = Geometry::classic();
            if find_winner(&b, &geometry).is_none() {
                let expected = if b.is_full() { Outcome::Draw } else { Outcome::Ongoing };
                prop_assert_eq!(check_terminal(&b, &geometry), expected);
            }
        }
    }
}
