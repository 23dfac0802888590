//! Networked two-player rooms.
//!
//! A room binds connections to marks and holds one two-player [`Match`].
//! It owns no game rules: every move goes through the match controller.

use crate::games::tictactoe::{Mark, Match, MoveError, Outcome, PlayerNames};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Identifier of a room: six uppercase hex characters.
pub type RoomId = String;

/// Identifier of a client connection bound to a seat.
pub type ConnectionId = String;

/// Longest display name kept after sanitizing.
pub const MAX_NAME_LEN: usize = 40;

/// Name shown for O until someone joins.
pub const WAITING_NAME: &str = "Waiting";

/// Trims `name` and clips it to `max_len` characters.
///
/// Returns `fallback` when nothing is left.
pub fn sanitize_name(name: Option<&str>, fallback: &str, max_len: usize) -> String {
    match name.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.chars().take(max_len).collect(),
        _ => fallback.to_string(),
    }
}

/// Lifecycle of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "camelCase")]
pub enum RoomStatus {
    /// Creator seated as X, O still open.
    WaitingForOpponent,
    /// Both seats filled; moves accepted.
    Active,
    /// A player left; the room accepts nothing further.
    Closed,
}

/// A connection seated at one mark.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Seat {
    /// Connection bound to this seat.
    connection: ConnectionId,
    /// Sanitized display name.
    name: String,
}

/// One two-player room.
#[derive(Debug, Clone, Getters)]
pub struct Room {
    /// Room id.
    id: RoomId,
    /// The match played in this room.
    game: Match,
    /// Seat holding X.
    x: Seat,
    /// Seat holding O, once joined.
    o: Option<Seat>,
    /// Current lifecycle state.
    status: RoomStatus,
}

impl Room {
    /// Resolves a connection to the mark it is seated at.
    pub fn mark_of(&self, connection: &str) -> Option<Mark> {
        if self.x.connection == connection {
            Some(Mark::X)
        } else if self.o.as_ref().is_some_and(|seat| seat.connection == connection) {
            Some(Mark::O)
        } else {
            None
        }
    }
}

/// Reasons a room operation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum RoomError {
    /// No room with this id.
    #[display("Room {} not found", _0)]
    RoomNotFound(#[error(not(source))] RoomId),

    /// Both seats are taken.
    #[display("Room already full")]
    RoomFull,

    /// The connection is not seated in the room.
    #[display("Player not part of this room")]
    NotInRoom,

    /// The room is waiting for a second player or already closed.
    #[display("Room is {}", _0)]
    NotActive(#[error(not(source))] RoomStatus),

    /// The match refused the move.
    #[display("Move rejected: {}", _0)]
    #[from]
    Move(MoveError),

    /// The room table lock was poisoned.
    #[display("Room store lock poisoned")]
    Poisoned,
}

/// Tracks every open room.
///
/// Clones share the same table.
#[derive(Debug, Clone)]
pub struct RoomManager {
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
    max_name_len: usize,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(MAX_NAME_LEN)
    }
}

impl RoomManager {
    /// Creates an empty room table.
    #[instrument]
    pub fn new(max_name_len: usize) -> Self {
        info!("Creating room manager");
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            max_name_len,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<RoomId, Room>>, RoomError> {
        self.rooms.lock().map_err(|_| RoomError::Poisoned)
    }

    fn generate_id(rooms: &HashMap<RoomId, Room>) -> RoomId {
        loop {
            let id = format!("{:06X}", rand::random::<u32>() & 0x00ff_ffff);
            if !rooms.contains_key(&id) {
                return id;
            }
        }
    }

    /// Opens a room with the creator seated as X.
    #[instrument(skip(self))]
    pub fn create_room(&self, name: Option<&str>, connection: ConnectionId) -> Result<Room, RoomError> {
        let mut rooms = self.lock()?;
        let id = Self::generate_id(&rooms);
        let name = sanitize_name(name, "Player X", self.max_name_len);
        let game = Match::two_player(Mark::X).with_names(PlayerNames::new(name.clone(), WAITING_NAME));
        let room = Room {
            id: id.clone(),
            game,
            x: Seat { connection, name },
            o: None,
            status: RoomStatus::WaitingForOpponent,
        };
        rooms.insert(id.clone(), room.clone());
        info!(room_id = %id, "Room created");
        Ok(room)
    }

    /// Seats `connection` as O and starts the match.
    #[instrument(skip(self))]
    pub fn join_room(&self, id: &str, name: Option<&str>, connection: ConnectionId) -> Result<Room, RoomError> {
        let mut rooms = self.lock()?;
        let room = rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.to_string()))?;
        if room.o.is_some() || room.status != RoomStatus::WaitingForOpponent {
            warn!(room_id = id, "Join refused, room full");
            return Err(RoomError::RoomFull);
        }

        let name = sanitize_name(name, "Player O", self.max_name_len);
        room.game.set_player_name(Mark::O, name.clone());
        room.o = Some(Seat { connection, name });
        room.status = RoomStatus::Active;
        info!(room_id = id, "Second player joined, match active");
        Ok(room.clone())
    }

    /// Returns a copy of the room.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Room, RoomError> {
        let rooms = self.lock()?;
        rooms
            .get(id)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(id.to_string()))
    }

    /// Resolves `connection` to its mark in room `id`.
    pub fn resolve_mark(&self, id: &str, connection: &str) -> Result<Option<Mark>, RoomError> {
        Ok(self.get(id)?.mark_of(connection))
    }

    /// Plays `index` for whichever mark `connection` holds.
    ///
    /// Returns the updated room and the outcome if the move ended the match.
    #[instrument(skip(self))]
    pub fn play(&self, id: &str, connection: &str, index: usize) -> Result<(Room, Option<Outcome>), RoomError> {
        let mut rooms = self.lock()?;
        let room = rooms
            .get_mut(id)
            .ok_or_else(|| RoomError::RoomNotFound(id.to_string()))?;
        let mark = room.mark_of(connection).ok_or_else(|| {
            warn!(room_id = id, "Move from connection outside the room");
            RoomError::NotInRoom
        })?;
        if room.status != RoomStatus::Active {
            return Err(RoomError::NotActive(room.status));
        }

        let outcome = room.game.apply_human_move(index, mark)?;
        debug!(room_id = id, %mark, index, "Room move applied");
        Ok((room.clone(), outcome))
    }

    /// Closes and removes the room `connection` sits in.
    ///
    /// Returns the closed room so remaining observers can be told.
    #[instrument(skip(self))]
    pub fn disconnect(&self, connection: &str) -> Result<Option<Room>, RoomError> {
        let mut rooms = self.lock()?;
        let id = rooms
            .values()
            .find(|room| room.mark_of(connection).is_some())
            .map(|room| room.id.clone());

        Ok(id.and_then(|id| rooms.remove(&id)).map(|mut room| {
            room.status = RoomStatus::Closed;
            info!(room_id = %room.id, "Player disconnected, room closed");
            room
        }))
    }

    /// Number of open rooms.
    pub fn len(&self) -> Result<usize, RoomError> {
        Ok(self.lock()?.len())
    }

    /// True when no room is open.
    pub fn is_empty(&self) -> Result<bool, RoomError> {
        Ok(self.len()? == 0)
    }
}
