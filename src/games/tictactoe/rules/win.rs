//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark};
use tracing::instrument;

/// The eight winning lines: rows, then columns, then diagonals.
///
/// Scan order is part of the contract: the first complete line wins.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if the mark has three in a row,
/// `None` otherwise.
#[instrument(level = "trace", skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    let cells = board.cells();
    for [a, b, c] in LINES {
        if let Cell::Marked(mark) = cells[a]
            && cells[b] == cells[a]
            && cells[c] == cells[a]
        {
            return Some(mark);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(mark: Mark, indices: &[usize]) -> Board {
        let mut cells = [Cell::Empty; 9];
        for &i in indices {
            cells[i] = Cell::Marked(mark);
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            assert_eq!(check_winner(&board_with(Mark::X, &line)), Some(Mark::X));
            assert_eq!(check_winner(&board_with(Mark::O, &line)), Some(Mark::O));
        }
    }

    #[test]
    fn test_no_winner_incomplete() {
        assert_eq!(check_winner(&board_with(Mark::X, &[0, 1])), None);
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::Marked(Mark::X);
        cells[1] = Cell::Marked(Mark::O);
        cells[2] = Cell::Marked(Mark::X);
        assert_eq!(check_winner(&Board::from_cells(cells)), None);
    }

    #[test]
    fn test_first_line_in_order_wins() {
        // Not reachable in play, but the scan order still decides.
        let mut cells = [Cell::Empty; 9];
        for i in [0, 1, 2] {
            cells[i] = Cell::Marked(Mark::O);
        }
        for i in [6, 7, 8] {
            cells[i] = Cell::Marked(Mark::X);
        }
        assert_eq!(check_winner(&Board::from_cells(cells)), Some(Mark::O));
    }
}
