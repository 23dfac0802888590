//! Draw detection logic for tic-tac-toe.

use super::super::{Board, Cell};

/// Checks if the board is full (all cells occupied).
///
/// A full board with no winner indicates a draw.
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|cell| *cell != Cell::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::super::{Mark, Outcome};
    use super::super::evaluate_terminal;
    use super::*;

    fn parse(cells: [&str; 9]) -> Board {
        Board::from_cells(cells.map(|c| match c {
            "X" => Cell::Marked(Mark::X),
            "O" => Cell::Marked(Mark::O),
            _ => Cell::Empty,
        }))
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let board = parse(["", "", "", "", "X", "", "", "", ""]);
        assert!(!is_full(&board));
        assert_eq!(evaluate_terminal(&board), None);
    }

    #[test]
    fn test_single_gap_not_full() {
        let board = parse(["X", "O", "X", "X", "O", "O", "O", "X", ""]);
        assert!(!is_full(&board));
    }

    #[test]
    fn test_draw_detection() {
        let board = parse(["X", "O", "X", "X", "O", "O", "O", "X", "X"]);
        assert!(is_full(&board));
        assert_eq!(evaluate_terminal(&board), Some(Outcome::Draw));
    }

    #[test]
    fn test_full_board_with_line_is_a_win() {
        let board = parse(["X", "X", "X", "O", "O", "X", "O", "X", "O"]);
        assert_eq!(evaluate_terminal(&board), Some(Outcome::Won(Mark::X)));
    }
}
