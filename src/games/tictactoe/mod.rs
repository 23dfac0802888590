mod error;
mod game;
mod position;
mod types;

pub mod rules;
pub mod search;

pub use error::MoveError;
pub use game::{GameMode, Match, PlayerNames};
pub use position::Position;
pub use rules::{apply_move, empty_board, evaluate_terminal, is_move_legal};
pub use search::find_best_move;
pub use types::{Board, Cell, Mark, Outcome};
