//! Exhaustive minimax search for the computer opponent.
//!
//! The full game tree of a 3x3 board is small enough to enumerate on every
//! call, so there is no depth limit, pruning, or transposition table. This
//! does not carry over to larger boards.

use super::rules::{apply_move, evaluate_terminal};
use super::{Board, Mark, MoveError, Outcome};
use tracing::{debug, instrument};

/// Score of a position won by the searching mark.
pub const WIN_SCORE: i32 = 10;

/// Score of a position won by the opponent.
pub const LOSS_SCORE: i32 = -WIN_SCORE;

/// Whose ply a search node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ply {
    /// The searching mark moves and picks the highest value.
    Maximizing,
    /// The opponent moves and picks the lowest value.
    Minimizing,
}

impl Ply {
    fn next(self) -> Self {
        match self {
            Ply::Maximizing => Ply::Minimizing,
            Ply::Minimizing => Ply::Maximizing,
        }
    }
}

/// Returns the index of an optimal move for `searching`.
///
/// Candidates are tried in ascending index order and only a strictly
/// better value replaces the current best, so ties resolve to the lowest
/// index. On the empty board this is index 0.
///
/// # Errors
///
/// `NoLegalMove` if the board has no empty cell.
#[instrument(skip(board), fields(board = ?board.cells()))]
pub fn find_best_move(board: &Board, searching: Mark, opponent: Mark) -> Result<usize, MoveError> {
    let mut best: Option<(usize, i32)> = None;

    for index in board.empty_indices() {
        let child = apply_move(board, index, searching)?;
        let value = minimax(&child, Ply::Minimizing, searching, opponent);
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((index, value));
        }
    }

    let (index, value) = best.ok_or(MoveError::NoLegalMove)?;
    debug!(index, value, mark = %searching, "Search chose move");
    Ok(index)
}

/// Minimax value of `board` from the searching mark's point of view.
///
/// Stops at the first terminal position without looking further.
fn minimax(board: &Board, ply: Ply, searching: Mark, opponent: Mark) -> i32 {
    if let Some(outcome) = evaluate_terminal(board) {
        return score(outcome, searching, opponent);
    }

    let mover = match ply {
        Ply::Maximizing => searching,
        Ply::Minimizing => opponent,
    };

    let values = board.empty_indices().map(|index| {
        let child = board.with_mark(index, mover);
        minimax(&child, ply.next(), searching, opponent)
    });

    // Non-terminal boards always have an empty cell.
    match ply {
        Ply::Maximizing => values.max().unwrap_or(0),
        Ply::Minimizing => values.min().unwrap_or(0),
    }
}

fn score(outcome: Outcome, searching: Mark, opponent: Mark) -> i32 {
    match outcome {
        Outcome::Won(mark) if mark == searching => WIN_SCORE,
        Outcome::Won(mark) if mark == opponent => LOSS_SCORE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Cell;

    #[test]
    fn test_full_board_has_no_move() {
        let board = Board::from_cells([Cell::Marked(Mark::X); 9]);
        assert_eq!(
            find_best_move(&board, Mark::O, Mark::X),
            Err(MoveError::NoLegalMove)
        );
    }

    #[test]
    fn test_single_empty_cell_is_chosen() {
        let mut cells = [
            Cell::Marked(Mark::X),
            Cell::Marked(Mark::O),
            Cell::Marked(Mark::X),
            Cell::Marked(Mark::X),
            Cell::Marked(Mark::O),
            Cell::Marked(Mark::O),
            Cell::Marked(Mark::O),
            Cell::Marked(Mark::X),
            Cell::Marked(Mark::X),
        ];
        cells[7] = Cell::Empty;
        let board = Board::from_cells(cells);
        assert_eq!(find_best_move(&board, Mark::X, Mark::O), Ok(7));
    }

    #[test]
    fn test_score_is_relative_to_searching_mark() {
        assert_eq!(score(Outcome::Won(Mark::O), Mark::O, Mark::X), WIN_SCORE);
        assert_eq!(score(Outcome::Won(Mark::X), Mark::O, Mark::X), LOSS_SCORE);
        assert_eq!(score(Outcome::Draw, Mark::O, Mark::X), 0);
    }
}
