//! Tests for terminal play.

use tictactoe_arena::{Board, Cell, Mark, Outcome, Position, parse_move, play};

#[test]
fn test_parse_move() {
    assert_eq!(parse_move("1"), Some(0));
    assert_eq!(parse_move(" 9\n"), Some(8));
    assert_eq!(parse_move("0"), None);
    assert_eq!(parse_move("10"), None);
    assert_eq!(parse_move("center"), Some(4));
    assert_eq!(parse_move("Top left"), Some(0));
    assert_eq!(parse_move("bottom_right"), Some(8));
    assert_eq!(parse_move("middle"), None);
    assert_eq!(parse_move(""), None);
}

#[test]
fn test_terminal_game_finishes_without_human_win() {
    let input = "junk\n1\n2\n3\n4\n5\n6\n7\n8\n9\n".repeat(5);
    let mut output = Vec::new();

    let outcome = play(Mark::X, Mark::X, input.as_bytes(), &mut output).expect("game finishes");
    assert_ne!(outcome, Outcome::Won(Mark::X));

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Unrecognized cell: junk"));
    assert!(text.contains("Computer plays"));
    assert!(text.contains(
        "Open: Top-left, Top-center, Top-right, Middle-left, Center, Middle-right, Bottom-left, Bottom-center, Bottom-right"
    ));
}

#[test]
fn test_terminal_input_closed_early() {
    let mut output = Vec::new();
    assert!(play(Mark::O, Mark::O, "5\n".as_bytes(), &mut output).is_err());
}

#[test]
fn test_open_cells_skip_marked_ones() {
    let mut cells = [Cell::Empty; 9];
    cells[0] = Cell::Marked(Mark::X);
    cells[4] = Cell::Marked(Mark::O);
    let open = Position::valid_moves(&Board::from_cells(cells));

    assert_eq!(open.len(), 7);
    assert!(!open.contains(&Position::TopLeft));
    assert!(!open.contains(&Position::Center));
    assert_eq!(open[0], Position::TopCenter);
}
