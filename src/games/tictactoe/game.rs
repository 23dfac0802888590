//! Match controller: one game's mutable state and turn rules.
//!
//! A [`Match`] is created fresh for every game and owned by whoever holds
//! it (a session slot, a room). Operations validate everything before
//! touching state, so a rejected move leaves the match exactly as it was.

use super::rules::{apply_move, empty_board, evaluate_terminal, is_move_legal};
use super::search::find_best_move;
use super::{Board, Mark, MoveError, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

/// How the two marks are controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum GameMode {
    /// One human against the computer.
    #[serde(rename = "ai")]
    #[strum(serialize = "ai")]
    Computer,
    /// Two humans, local or networked.
    #[serde(rename = "pvp")]
    #[strum(serialize = "pvp")]
    TwoPlayer,
}

/// Display name per mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNames {
    /// Name shown for X.
    #[serde(rename = "X")]
    x: String,
    /// Name shown for O.
    #[serde(rename = "O")]
    o: String,
}

impl PlayerNames {
    /// Creates a name table.
    pub fn new(x: impl Into<String>, o: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            o: o.into(),
        }
    }

    /// Returns the name bound to `mark`.
    pub fn get(&self, mark: Mark) -> &str {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }

    /// Rebinds the name for `mark`.
    pub fn set(&mut self, mark: Mark, name: impl Into<String>) {
        match mark {
            Mark::X => self.x = name.into(),
            Mark::O => self.o = name.into(),
        }
    }
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self::new("Player X", "Player O")
    }
}

/// State of a single match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    board: Board,
    to_move: Mark,
    winner: Option<Outcome>,
    mode: GameMode,
    names: PlayerNames,
    /// Human seat in computer mode; `None` for two-player matches.
    human: Option<Mark>,
    history: Vec<usize>,
}

impl Match {
    /// Creates a fresh match.
    ///
    /// `human_mark` only matters in computer mode, where it defaults to X
    /// and the computer takes the other mark.
    #[instrument]
    pub fn new(mode: GameMode, starting: Mark, human_mark: Option<Mark>) -> Self {
        let human = match mode {
            GameMode::Computer => Some(human_mark.unwrap_or(Mark::X)),
            GameMode::TwoPlayer => None,
        };
        info!(%mode, %starting, ?human, "Creating match");
        Self {
            board: empty_board(),
            to_move: starting,
            winner: None,
            mode,
            names: PlayerNames::default(),
            human,
            history: Vec::new(),
        }
    }

    /// Creates a computer-opponent match with the human on `human`.
    pub fn computer(human: Mark, starting: Mark) -> Self {
        Self::new(GameMode::Computer, starting, Some(human))
    }

    /// Creates a two-player match.
    pub fn two_player(starting: Mark) -> Self {
        Self::new(GameMode::TwoPlayer, starting, None)
    }

    /// Replaces the display names.
    pub fn with_names(mut self, names: PlayerNames) -> Self {
        self.names = names;
        self
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark to move.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the outcome once the match is over.
    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// Returns the game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the display names.
    pub fn names(&self) -> &PlayerNames {
        &self.names
    }

    /// Returns the human-controlled mark in computer mode.
    pub fn human_mark(&self) -> Option<Mark> {
        self.human
    }

    /// Returns the computer-controlled mark in computer mode.
    pub fn computer_mark(&self) -> Option<Mark> {
        self.human.map(Mark::opponent)
    }

    /// Indices played so far, in order.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// True once a winner or draw is recorded.
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// True when the computer should move next.
    pub fn is_computer_turn(&self) -> bool {
        !self.is_terminal() && self.computer_mark() == Some(self.to_move)
    }

    /// Sets the display name for `mark`.
    pub fn set_player_name(&mut self, mark: Mark, name: impl Into<String>) {
        self.names.set(mark, name);
    }

    /// Applies a human move for `mark` at `index`.
    ///
    /// In two-player mode `mark` is whoever submitted the move; in
    /// computer mode it must also be the human seat. Returns the outcome if
    /// this move ended the match.
    ///
    /// # Errors
    ///
    /// `MatchTerminal`, `InvalidIndex`, `CellOccupied` or `WrongTurn`. The
    /// match is unchanged on error.
    #[instrument(skip(self), fields(to_move = %self.to_move, mode = %self.mode))]
    pub fn apply_human_move(&mut self, index: usize, mark: Mark) -> Result<Option<Outcome>, MoveError> {
        if self.is_terminal() {
            warn!("Move attempted on finished match");
            return Err(MoveError::MatchTerminal);
        }
        if !is_move_legal(&self.board, index) {
            let err = if index >= Board::SIZE {
                MoveError::InvalidIndex(index)
            } else {
                MoveError::CellOccupied(index)
            };
            warn!(error = %err, "Illegal human move");
            return Err(err);
        }
        let seat_ok = match self.mode {
            GameMode::Computer => self.human == Some(mark),
            GameMode::TwoPlayer => true,
        };
        if mark != self.to_move || !seat_ok {
            warn!("Human moved out of turn");
            return Err(MoveError::WrongTurn(mark));
        }

        self.commit(index, mark)
    }

    /// Lets the computer pick and play its move.
    ///
    /// Returns the index it played.
    ///
    /// # Errors
    ///
    /// `MatchTerminal` after the match ended, `WrongTurn` in two-player
    /// mode or when the human is to move. `NoLegalMove` would mean the
    /// terminal check and the board disagree and is logged as an internal
    /// error.
    #[instrument(skip(self), fields(to_move = %self.to_move, mode = %self.mode))]
    pub fn apply_computer_move(&mut self) -> Result<usize, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::MatchTerminal);
        }
        let computer = match self.computer_mark() {
            Some(mark) if mark == self.to_move => mark,
            seat => {
                warn!("Computer asked to move out of turn");
                return Err(MoveError::WrongTurn(seat.unwrap_or(self.to_move)));
            }
        };

        let index = find_best_move(&self.board, computer, computer.opponent()).inspect_err(|e| {
            error!(error = %e, board = ?self.board.cells(), "Search found no move on a live board");
        })?;
        self.commit(index, computer)?;
        Ok(index)
    }

    /// Plays a human move for `mark` and, unless that ends the match, the
    /// computer's reply.
    ///
    /// Both moves land or neither does. Returns the computer's index when it
    /// replied.
    ///
    /// # Errors
    ///
    /// Any error from [`Match::apply_human_move`] or
    /// [`Match::apply_computer_move`]; the match is unchanged.
    #[instrument(skip(self), fields(to_move = %self.to_move, mode = %self.mode))]
    pub fn play_turn(&mut self, index: usize, mark: Mark) -> Result<Option<usize>, MoveError> {
        let mut next = self.clone();
        next.apply_human_move(index, mark)?;
        let reply = if next.is_terminal() {
            None
        } else {
            Some(next.apply_computer_move()?)
        };
        *self = next;
        Ok(reply)
    }

    /// Applies an already-validated move and advances the turn.
    fn commit(&mut self, index: usize, mark: Mark) -> Result<Option<Outcome>, MoveError> {
        let board = apply_move(&self.board, index, mark)?;
        self.board = board;
        self.history.push(index);
        self.winner = evaluate_terminal(&self.board);
        if self.winner.is_none() {
            self.to_move = mark.opponent();
        }
        info!(index, %mark, winner = ?self.winner, "Move applied");
        Ok(self.winner)
    }
}
