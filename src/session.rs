//! Per-session match storage for single-player games.
//!
//! Each session owns at most one [`Match`]. Starting a new game replaces
//! the previous match outright.

use crate::games::tictactoe::Match;
use derive_more::{Display, Error};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Session lookup or locking failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", message, file, line)]
pub struct SessionError {
    /// Error message.
    pub message: String,
    /// Kind of failure.
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

/// Classifies a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorKind {
    /// No match is stored under the id.
    NotFound,
    /// The store lock was poisoned by a panicking holder.
    Poisoned,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    #[track_caller]
    fn not_found(id: &str) -> Self {
        Self::new(SessionErrorKind::NotFound, format!("Session {} not found", id))
    }
}

/// A stored match behind its own lock.
type SharedMatch = Arc<Mutex<Match>>;

/// Manages all single-player sessions.
///
/// Clones share the same store. The table lock only guards lookups; each
/// match has its own lock, so a search in one session never waits on
/// another.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SharedMatch>>>,
}

#[track_caller]
fn lock_match(game: &SharedMatch) -> Result<MutexGuard<'_, Match>, SessionError> {
    game.lock()
        .map_err(|_| SessionError::new(SessionErrorKind::Poisoned, "Match lock poisoned"))
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::default()
    }

    /// Generates a fresh random session id.
    pub fn generate_id() -> SessionId {
        format!("{:012x}", rand::random::<u64>() & 0xffff_ffff_ffff)
    }

    #[track_caller]
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SharedMatch>>, SessionError> {
        self.sessions
            .lock()
            .map_err(|_| SessionError::new(SessionErrorKind::Poisoned, "Session store lock poisoned"))
    }

    #[track_caller]
    fn entry(&self, id: &str) -> Result<SharedMatch, SessionError> {
        self.lock()?.get(id).cloned().ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::not_found(id)
        })
    }

    /// Stores `game` under `id`, discarding any previous match there.
    #[instrument(skip(self, game))]
    pub fn start(&self, id: SessionId, game: Match) -> Result<Match, SessionError> {
        let mut sessions = self.lock()?;
        if sessions
            .insert(id.clone(), Arc::new(Mutex::new(game.clone())))
            .is_some()
        {
            debug!(session_id = %id, "Replaced previous match");
        }
        info!(session_id = %id, "Started match");
        Ok(game)
    }

    /// Returns a copy of the match stored under `id`.
    #[instrument(skip(self))]
    pub fn snapshot(&self, id: &str) -> Result<Match, SessionError> {
        let game = self.entry(id)?;
        let game = lock_match(&game)?;
        Ok(game.clone())
    }

    /// Runs `f` against the stored match while holding that match's lock.
    ///
    /// This serializes every read-modify-write on a session. Other
    /// sessions stay available while `f` runs.
    #[instrument(skip(self, f))]
    pub fn with_match<T>(&self, id: &str, f: impl FnOnce(&mut Match) -> T) -> Result<T, SessionError> {
        let game = self.entry(id).inspect_err(|_| warn!(session_id = id, "Move for unknown session"))?;
        let mut game = lock_match(&game)?;
        Ok(f(&mut game))
    }

    /// Drops the match stored under `id`.
    #[instrument(skip(self))]
    pub fn end(&self, id: &str) -> Result<Match, SessionError> {
        let game = self.lock()?.remove(id).ok_or_else(|| SessionError::not_found(id))?;
        let game = lock_match(&game)?.clone();
        info!(session_id = id, "Ended session");
        Ok(game)
    }

    /// Lists all active session IDs.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<SessionId>, SessionError> {
        let sessions = self.lock()?;
        let ids: Vec<_> = sessions.keys().cloned().collect();
        debug!(count = ids.len(), "Listed sessions");
        Ok(ids)
    }
}
