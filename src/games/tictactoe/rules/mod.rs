//! Game rules for tic-tac-toe.
//!
//! Pure functions over [`Board`] values. Nothing here knows whose turn it
//! is; turn order belongs to the match controller.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner};

use super::{Board, Mark, MoveError, Outcome};
use tracing::instrument;

/// Returns a fresh board with all nine cells empty.
pub fn empty_board() -> Board {
    Board::new()
}

/// True iff `index` is on the board and that cell is empty.
pub fn is_move_legal(board: &Board, index: usize) -> bool {
    board.is_empty(index)
}

/// Places `mark` at `index` on a copy of `board`.
///
/// # Errors
///
/// `InvalidIndex` if `index` is off the board, `CellOccupied` if the cell
/// already holds a mark. The input board is never modified.
#[instrument(skip(board))]
pub fn apply_move(board: &Board, index: usize, mark: Mark) -> Result<Board, MoveError> {
    if index >= Board::SIZE {
        return Err(MoveError::InvalidIndex(index));
    }
    if !is_move_legal(board, index) {
        return Err(MoveError::CellOccupied(index));
    }
    Ok(board.with_mark(index, mark))
}

/// Determines whether the board is terminal.
///
/// Returns the mark on the first completed line in [`LINES`] order, a
/// draw for a full board without a line, and `None` while play continues.
pub fn evaluate_terminal(board: &Board) -> Option<Outcome> {
    if let Some(mark) = check_winner(board) {
        return Some(Outcome::Won(mark));
    }
    if is_full(board) {
        return Some(Outcome::Draw);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Cell;

    #[test]
    fn test_empty_board_all_legal() {
        let board = empty_board();
        assert!((0..9).all(|i| is_move_legal(&board, i)));
        assert!(!is_move_legal(&board, 9));
    }

    #[test]
    fn test_apply_move_leaves_input_untouched() {
        let board = empty_board();
        let next = apply_move(&board, 4, Mark::X).unwrap();
        assert_eq!(board, empty_board());
        assert_eq!(next.get(4), Some(Cell::Marked(Mark::X)));
    }

    #[test]
    fn test_apply_move_rejects_occupied() {
        let board = apply_move(&empty_board(), 0, Mark::O).unwrap();
        assert_eq!(
            apply_move(&board, 0, Mark::X),
            Err(MoveError::CellOccupied(0))
        );
        assert_eq!(board.get(0), Some(Cell::Marked(Mark::O)));
    }

    #[test]
    fn test_apply_move_rejects_out_of_bounds() {
        assert_eq!(
            apply_move(&empty_board(), 9, Mark::X),
            Err(MoveError::InvalidIndex(9))
        );
    }

    #[test]
    fn test_evaluate_terminal_ongoing() {
        assert_eq!(evaluate_terminal(&empty_board()), None);
    }
}
