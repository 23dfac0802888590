//! Move rejection reasons.

use super::Mark;

/// Error that can occur when validating or applying a move.
///
/// Every variant leaves the board and match untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The index is outside 0-8.
    #[display("Index {} is outside the board (must be 0-8)", _0)]
    InvalidIndex(usize),

    /// The cell at the index already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(usize),

    /// The move was submitted for a mark that may not move now.
    #[display("It's not {}'s turn", _0)]
    WrongTurn(Mark),

    /// The match already has a winner or ended in a draw.
    #[display("Match is already over")]
    MatchTerminal,

    /// Search was asked for a move on a full board.
    #[display("No legal move left on the board")]
    NoLegalMove,
}

impl MoveError {
    /// True for caller-sequencing bugs rather than bad player input.
    pub fn is_internal(&self) -> bool {
        matches!(self, MoveError::NoLegalMove)
    }
}

impl std::error::Error for MoveError {}
