use super::*;
use crate::error::BoardError;

#[test]
fn test_mark_opponent() {
    assert_eq!(Mark::X.opponent(), Mark::O);
    assert_eq!(Mark::O.opponent(), Mark::X);
}

#[test]
fn test_mark_parse() {
    assert_eq!("x".parse::<Mark>(), Ok(Mark::X));
    assert_eq!(" O ".parse::<Mark>(), Ok(Mark::O));
    assert!("Z".parse::<Mark>().is_err());
}

#[test]
fn test_board_new_is_empty() {
    let board = Board::new(3);
    assert_eq!(board.size(), 3);
    assert_eq!(board.cell_count(), 9);
    assert_eq!(board.mark_count(), 0);
    assert_eq!(board.available_moves(), (0..9).collect::<Vec<_>>());
    assert!(!board.is_full());
}

#[test]
fn test_with_move_does_not_alias() {
    let board = Board::new(3);
    let a = board.with_move(4, Mark::X);
    let b = board.with_move(0, Mark::O);

    assert_eq!(board.mark_count(), 0);
    assert_eq!(a.get(4), Some(Mark::X));
    assert_eq!(a.get(0), None);
    assert_eq!(b.get(0), Some(Mark::O));
    assert_eq!(b.get(4), None);
}

#[test]
fn test_board_indexing() {
    let board = Board::new(5);
    assert_eq!(board.index(2, 3), 13);
    assert_eq!(board.row_col(13), (2, 3));
    assert_eq!(board.center(), 12);
    assert_eq!(board.corners(), [0, 4, 20, 24]);
    assert!(board.is_border(1));
    assert!(board.is_border(9));
    assert!(!board.is_border(12));
}

#[test]
fn test_board_parse_and_display() {
    let board: Board = "XX. / OO. / ...".parse().unwrap();
    assert_eq!(board.size(), 3);
    assert_eq!(board.get(0), Some(Mark::X));
    assert_eq!(board.get(3), Some(Mark::O));
    assert_eq!(board.to_string(), "XX.OO....");
    assert_eq!(board.count(Mark::X), 2);
    assert_eq!(board.count(Mark::O), 2);
}

#[test]
fn test_board_parse_errors() {
    assert_eq!("XX.OO...".parse::<Board>(), Err(BoardError::NotSquare(8)));
    assert_eq!("XX.OO...Q".parse::<Board>(), Err(BoardError::UnknownSymbol('Q')));
    assert!(Board::from_cells(3, vec![None; 4]).is_err());
}

#[test]
fn test_classic_combos() {
    let combos = generate_win_combos(3, 3);
    let cells: Vec<&[usize]> = combos.iter().map(WinCombo::cells).collect();
    assert_eq!(
        cells,
        vec![
            &[0, 1, 2][..],
            &[3, 4, 5],
            &[6, 7, 8],
            &[0, 3, 6],
            &[1, 4, 7],
            &[2, 5, 8],
            &[0, 4, 8],
            &[2, 4, 6],
        ]
    );
}

#[test]
fn test_columns_enumerated_column_by_column() {
    let combos = generate_win_combos(4, 3);
    // 8 horizontal lines come first
    let verticals: Vec<&[usize]> = combos[8..16].iter().map(WinCombo::cells).collect();
    assert_eq!(
        verticals,
        vec![
            &[0, 4, 8][..],
            &[4, 8, 12],
            &[1, 5, 9],
            &[5, 9, 13],
            &[2, 6, 10],
            &[6, 10, 14],
            &[3, 7, 11],
            &[7, 11, 15],
        ]
    );
    assert_eq!(combos[16].cells(), &[0, 5, 10]);
    assert_eq!(combos[20].cells(), &[2, 5, 8]);
}

#[test]
fn test_combo_counts_for_larger_boards() {
    // 5x5, four in a row: 2 per row/column, 4 per diagonal direction
    assert_eq!(generate_win_combos(5, 4).len(), 10 + 10 + 4 + 4);
    // 7x7, five in a row
    assert_eq!(generate_win_combos(7, 5).len(), 21 + 21 + 9 + 9);
    for combo in generate_win_combos(6, 4) {
        assert_eq!(combo.len(), 4);
        assert!(combo.cells().iter().all(|&i| i < 36));
    }
}

#[test]
fn test_degenerate_win_length() {
    assert!(generate_win_combos(3, 4).is_empty());
    assert!(generate_win_combos(3, 0).is_empty());
    assert!(Geometry::new(3, 4).combos().is_empty());
}

#[test]
fn test_geometry_combos_through() {
    let geometry = Geometry::classic();
    assert_eq!(geometry.combos_through(4).count(), 4);
    assert_eq!(geometry.combos_through(0).count(), 3);
    assert_eq!(geometry.combos_through(1).count(), 2);
    assert!(geometry.combos_through(1).all(|c| c.contains(1)));
    assert_eq!(geometry.combos_through(99).count(), 0);
}
