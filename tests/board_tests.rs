//! Board tests - collision, merge and line clearing through the public API

use proptest::prelude::*;

use stacklogic::core::{Board, Piece, RotateDir};
use stacklogic::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_board_set_out_of_bounds() {
    let mut board = Board::new();

    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, -1, Some(PieceKind::T)));
    assert!(!board.set(BOARD_WIDTH as i8, 0, Some(PieceKind::T)));
    assert!(!board.set(0, BOARD_HEIGHT as i8, Some(PieceKind::T)));
    assert!(board.cells().iter().all(|c| c.is_none()));
}

#[test]
fn test_rows_above_top_never_collide_with_content() {
    let mut board = Board::new();
    board.fill_row(0, PieceKind::I);

    // O at y=-2 covers rows -2 and -1 only.
    let o = Piece::spawn(PieceKind::O);
    assert!(!board.collides(&o));
    assert!(board.collides(&o.translated(0, 1)));
}

#[test]
fn test_side_walls_collide_above_top() {
    let board = Board::new();
    let o = Piece::spawn(PieceKind::O);
    assert!(board.collides(&Piece { x: -1, ..o }));
    assert!(board.collides(&Piece { x: BOARD_WIDTH as i8 - 1, ..o }));
}

#[test]
fn test_merge_reports_overflow() {
    let mut board = Board::new();
    let i = Piece::spawn(PieceKind::I).rotated(RotateDir::Clockwise);
    // Vertical I with its top two cells above the board.
    let straddling = Piece { y: -2, ..i };
    assert!(board.merge(&straddling));
    assert!(board.is_occupied(5, 0));
    assert!(board.is_occupied(5, 1));

    let mut board = Board::new();
    assert!(!board.merge(&Piece { y: 10, ..i }));
}

#[test]
fn test_clear_two_separated_rows() {
    let mut board = Board::new();
    board.fill_row(19, PieceKind::I);
    board.fill_row(16, PieceKind::L);
    board.set(0, 18, Some(PieceKind::T));
    board.set(9, 17, Some(PieceKind::S));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.len(), 2);
    assert_eq!(cleared.as_slice(), &[19, 16]);

    // Survivors keep their order at the bottom.
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
    assert_eq!(board.get(9, 18), Some(Some(PieceKind::S)));
    assert!(board.is_row_empty(0));
    assert!(board.is_row_empty(1));
}

#[test]
fn test_clear_nothing() {
    let mut board = Board::new();
    board.set(3, 19, Some(PieceKind::Z));
    assert!(board.clear_full_rows().is_empty());
    assert!(board.is_occupied(3, 19));
}

fn arb_board() -> impl Strategy<Value = Board> {
    proptest::collection::vec(any::<bool>(), (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize)).prop_map(
        |bits| {
            let mut board = Board::new();
            for (i, filled) in bits.into_iter().enumerate() {
                if filled {
                    let x = (i % BOARD_WIDTH as usize) as i8;
                    let y = (i / BOARD_WIDTH as usize) as i8;
                    board.set(x, y, Some(PieceKind::J));
                }
            }
            board
        },
    )
}

proptest! {
    #[test]
    fn prop_full_rows_leave_no_full_rows(board in arb_board()) {
        let mut board = board;
        let full_before = (0..BOARD_HEIGHT as usize).filter(|&y| board.is_row_full(y)).count();
        let filled_before = board.cells().iter().filter(|c| c.is_some()).count();

        let cleared = board.clear_full_rows();

        prop_assert_eq!(cleared.len(), full_before);
        prop_assert!((0..BOARD_HEIGHT as usize).all(|y| !board.is_row_full(y)));
        let filled_after = board.cells().iter().filter(|c| c.is_some()).count();
        prop_assert_eq!(filled_after, filled_before - full_before * BOARD_WIDTH as usize);
        for y in 0..full_before {
            prop_assert!(board.is_row_empty(y));
        }
    }
}
