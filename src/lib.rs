//! Tic-tac-toe arena library
//!
//! A rules engine, an exhaustive minimax opponent, and a match controller,
//! plus the collaborators that host matches over HTTP.
//!
//! # Architecture
//!
//! - **Rules**: pure functions over immutable [`Board`] values
//! - **Search**: full-depth minimax with a lowest-index tie-break
//! - **Match**: per-game turn and mode state machine
//! - **Sessions / Rooms**: explicit stores for single-player and
//!   two-player matches, keyed by id
//! - **Server**: axum routes translating requests into match operations
//!
//! # Example
//!
//! ```
//! use tictactoe_arena::{Mark, Match};
//!
//! let mut game = Match::computer(Mark::X, Mark::X);
//! game.apply_human_move(4, Mark::X).unwrap();
//! let reply = game.apply_computer_move().unwrap();
//! assert_ne!(reply, 4);
//! assert_eq!(game.to_move(), Mark::X);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod games;
mod room;
mod server;
mod session;
mod terminal;

// Crate-level exports - Game types and engine
pub use games::tictactoe::{
    Board, Cell, GameMode, Mark, Match, MoveError, Outcome, PlayerNames, Position, apply_move,
    empty_board, evaluate_terminal, find_best_move, is_move_legal, rules, search,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Session management
pub use session::{SessionError, SessionErrorKind, SessionId, SessionManager};

// Crate-level exports - Rooms
pub use room::{
    ConnectionId, MAX_NAME_LEN, Room, RoomError, RoomId, RoomManager, RoomStatus, Seat, WAITING_NAME,
    sanitize_name,
};

// Crate-level exports - HTTP server
pub use server::{
    AiMoveRequest, ApiError, ApiJson, ApiResponse, AppState, COMPUTER_NAME, GameView, MoveRequest, NewGameRequest,
    RoomMoveRequest, RoomPlayerRequest, RoomView, SeatView, parse_index, router, serve,
};

// Crate-level exports - Terminal play
pub use terminal::{parse_move, play, self_play};
