//! HTTP API over the match controller.
//!
//! Single-player games live in a [`SessionManager`], two-player games in a
//! [`RoomManager`]. Handlers validate input at the boundary, run one
//! operation under the owning store's lock, and answer with a
//! `{success, message, data}` envelope.

use crate::config::ServerConfig;
use crate::games::tictactoe::{Board, GameMode, Mark, Match, MoveError, Outcome, PlayerNames};
use crate::room::{Room, RoomError, RoomId, RoomManager, RoomStatus, sanitize_name};
use crate::session::{SessionError, SessionErrorKind, SessionId, SessionManager};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::ServiceBuilder;
use tracing::{error, info, instrument, warn};

/// Name shown for the computer seat.
pub const COMPUTER_NAME: &str = "AI";

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    sessions: SessionManager,
    rooms: RoomManager,
    max_name_len: usize,
}

impl AppState {
    /// Creates empty stores sized by `config`.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            sessions: SessionManager::new(),
            rooms: RoomManager::new(*config.max_name_len()),
            max_name_len: *config.max_name_len(),
        }
    }

    /// Single-player session store.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Two-player room store.
    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }
}

// ─────────────────────────────────────────────────────────────
//  Wire types
// ─────────────────────────────────────────────────────────────

/// Response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was applied.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

/// Request to start a game against the computer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameRequest {
    /// Reuse this session id; a new one is generated when absent.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Human's display name.
    #[serde(default)]
    pub player_name: Option<String>,
    /// Mark for the human, `"X"` (default) or `"O"`.
    #[serde(default)]
    pub player_symbol: Option<String>,
    /// Mark that moves first, `"X"` (default) or `"O"`.
    #[serde(default)]
    pub start_player: Option<String>,
}

/// Request to play a human move in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Session holding the match.
    pub session_id: SessionId,
    /// Cell index, validated at the boundary.
    #[serde(default)]
    pub index: Option<Value>,
}

/// Request for the computer's move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMoveRequest {
    /// Session holding the match.
    pub session_id: SessionId,
}

/// Request to open or join a room.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPlayerRequest {
    /// Player's display name.
    #[serde(default)]
    pub player_name: Option<String>,
}

/// Request to play a move in a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMoveRequest {
    /// Id returned when the player created or joined the room.
    pub player_id: String,
    /// Cell index, validated at the boundary.
    #[serde(default)]
    pub index: Option<Value>,
}

/// Snapshot of a single-player match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// Session holding the match.
    pub session_id: SessionId,
    /// The nine cells.
    pub board: Board,
    /// Mark to move.
    pub current_player: Mark,
    /// `"X"`, `"O"`, `"draw"` or null.
    pub winner: Option<Outcome>,
    /// Display name per mark.
    pub players: PlayerNames,
    /// Game mode.
    pub mode: GameMode,
    /// Human seat.
    pub human_symbol: Option<Mark>,
    /// Computer seat.
    pub ai_symbol: Option<Mark>,
}

impl GameView {
    fn new(session_id: SessionId, game: &Match) -> Self {
        Self {
            session_id,
            board: *game.board(),
            current_player: game.to_move(),
            winner: game.winner(),
            players: game.names().clone(),
            mode: game.mode(),
            human_symbol: game.human_mark(),
            ai_symbol: game.computer_mark(),
        }
    }
}

/// Snapshot of a room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    /// Room id.
    pub room_id: RoomId,
    /// Lifecycle state.
    pub status: RoomStatus,
    /// The nine cells.
    pub board: Board,
    /// Mark to move.
    pub current_player: Mark,
    /// `"X"`, `"O"`, `"draw"` or null.
    pub winner: Option<Outcome>,
    /// Display name per mark.
    pub players: PlayerNames,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        let game = room.game();
        Self {
            room_id: room.id().clone(),
            status: *room.status(),
            board: *game.board(),
            current_player: game.to_move(),
            winner: game.winner(),
            players: game.names().clone(),
        }
    }
}

/// A seat handed to a player who opened or joined a room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    /// Secret used to submit moves and to leave.
    pub player_id: String,
    /// Mark the player holds.
    pub mark: Mark,
    /// Room state after seating.
    pub room: RoomView,
}

// ─────────────────────────────────────────────────────────────
//  Errors
// ─────────────────────────────────────────────────────────────

/// Failure answered to the client.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ApiError {
    /// Bad input or a rejected move.
    #[display("{}", _0)]
    BadRequest(String),
    /// Unknown session, room or player.
    #[display("{}", _0)]
    NotFound(String),
    /// A contract violation inside the server.
    #[display("{}", _0)]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiResponse::<()> {
            success: false,
            message: self.to_string(),
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

impl From<MoveError> for ApiError {
    fn from(err: MoveError) -> Self {
        if err.is_internal() {
            error!(error = %err, "Internal move error");
            return ApiError::Internal(err.to_string());
        }
        match err {
            MoveError::MatchTerminal => {
                ApiError::BadRequest("Game already finished. Start a new game.".to_string())
            }
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err.kind {
            SessionErrorKind::NotFound => ApiError::NotFound("Game has not been started yet".to_string()),
            SessionErrorKind::Poisoned => {
                error!(error = %err, "Session store unavailable");
                ApiError::Internal(err.message)
            }
        }
    }
}

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::RoomNotFound(_) => ApiError::NotFound(err.to_string()),
            RoomError::Poisoned => ApiError::Internal(err.to_string()),
            RoomError::Move(inner) => inner.into(),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

/// JSON body extractor whose rejections use the response envelope.
///
/// Missing content type, malformed JSON and missing fields all come back
/// as 400 with `{success: false, message}`.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Reads a new-game body; an empty body means all defaults.
fn new_game_request(body: &[u8]) -> Result<NewGameRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewGameRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected new-game body");
        ApiError::BadRequest(format!("Failed to parse the request body as JSON: {}", e))
    })
}

/// Runs `f` on a session's match off the async workers.
///
/// The match is cloned back out only when `f` succeeds.
async fn run_on_match<F>(sessions: &SessionManager, id: &str, f: F) -> Result<Match, ApiError>
where
    F: FnOnce(&mut Match) -> Result<(), MoveError> + Send + 'static,
{
    let sessions = sessions.clone();
    let id = id.to_string();
    let outcome = tokio::task::spawn_blocking(move || {
        sessions.with_match(&id, |game| {
            f(game)?;
            Ok::<_, MoveError>(game.clone())
        })
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Move task failed");
        ApiError::Internal("Move task failed".to_string())
    })?;
    Ok(outcome??)
}

/// Validates a JSON move index.
///
/// Mirrors what a browser client can send: missing, non-numeric,
/// fractional and out-of-range values each get their own message.
pub fn parse_index(value: Option<&Value>) -> Result<usize, ApiError> {
    let number = match value {
        None | Some(Value::Null) => return Err(ApiError::BadRequest("Move index is required".to_string())),
        Some(Value::Number(number)) => number,
        Some(_) => return Err(ApiError::BadRequest("Move index must be a number".to_string())),
    };

    let value = number.as_f64().unwrap_or(f64::NAN);
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(ApiError::BadRequest("Move index must be an integer".to_string()));
    }
    if !(0.0..Board::SIZE as f64).contains(&value) {
        return Err(ApiError::BadRequest("Move index must be between 0 and 8".to_string()));
    }
    Ok(value as usize)
}

/// Reads a mark leniently: anything other than the alternative means the default.
fn mark_or(value: Option<&str>, default: Mark) -> Mark {
    value
        .and_then(|s| s.trim().parse::<Mark>().ok())
        .unwrap_or(default)
}

fn connection_id() -> String {
    format!("{:016x}", rand::random::<u64>())
}

// ─────────────────────────────────────────────────────────────
//  Handlers: single player
// ─────────────────────────────────────────────────────────────

async fn index() -> &'static str {
    "Tic Tac Toe Backend Running"
}

#[instrument(skip(state, body))]
async fn new_game(State(state): State<AppState>, body: Bytes) -> Result<Json<ApiResponse<GameView>>, ApiError> {
    let req = new_game_request(&body)?;
    let human_name = sanitize_name(req.player_name.as_deref(), "Player", state.max_name_len);
    let human = mark_or(req.player_symbol.as_deref(), Mark::X);
    let start = mark_or(req.start_player.as_deref(), Mark::X);
    let names = match human {
        Mark::X => PlayerNames::new(human_name, COMPUTER_NAME),
        Mark::O => PlayerNames::new(COMPUTER_NAME, human_name),
    };

    let session_id = req.session_id.unwrap_or_else(SessionManager::generate_id);
    let game = state
        .sessions
        .start(session_id.clone(), Match::computer(human, start).with_names(names))?;

    info!(session_id = %session_id, %human, %start, "New game started");
    Ok(ApiResponse::ok("New game started", GameView::new(session_id, &game)))
}

#[instrument(skip(state), fields(session_id = %req.session_id))]
async fn play_move(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MoveRequest>,
) -> Result<Json<ApiResponse<GameView>>, ApiError> {
    let index = parse_index(req.index.as_ref()).inspect_err(|e| warn!(error = %e, "Bad move index"))?;

    let game = run_on_match(&state.sessions, &req.session_id, move |game| {
        let human = game.human_mark().ok_or(MoveError::WrongTurn(game.to_move()))?;
        game.play_turn(index, human)?;
        Ok(())
    })
    .await?;

    let message = if game.is_terminal() { "Game concluded" } else { "Moves applied" };
    Ok(ApiResponse::ok(message, GameView::new(req.session_id, &game)))
}

#[instrument(skip(state), fields(session_id = %req.session_id))]
async fn ai_move(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AiMoveRequest>,
) -> Result<Json<ApiResponse<GameView>>, ApiError> {
    let game = run_on_match(&state.sessions, &req.session_id, |game| {
        game.apply_computer_move()?;
        Ok(())
    })
    .await?;

    let message = if game.is_terminal() { "Game concluded" } else { "AI moved" };
    Ok(ApiResponse::ok(message, GameView::new(req.session_id, &game)))
}

#[instrument(skip(state))]
async fn game_state(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<Json<ApiResponse<GameView>>, ApiError> {
    let game = state.sessions.snapshot(&session_id)?;
    Ok(ApiResponse::ok("Current game", GameView::new(session_id, &game)))
}

// ─────────────────────────────────────────────────────────────
//  Handlers: rooms
// ─────────────────────────────────────────────────────────────

#[instrument(skip(state))]
async fn create_room(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RoomPlayerRequest>,
) -> Result<Json<ApiResponse<SeatView>>, ApiError> {
    let player_id = connection_id();
    let room = state.rooms.create_room(req.player_name.as_deref(), player_id.clone())?;
    Ok(ApiResponse::ok(
        "Room created",
        SeatView {
            player_id,
            mark: Mark::X,
            room: RoomView::from(&room),
        },
    ))
}

#[instrument(skip(state))]
async fn join_room(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    ApiJson(req): ApiJson<RoomPlayerRequest>,
) -> Result<Json<ApiResponse<SeatView>>, ApiError> {
    let player_id = connection_id();
    let room = state
        .rooms
        .join_room(&room_id, req.player_name.as_deref(), player_id.clone())?;
    Ok(ApiResponse::ok(
        "Game started",
        SeatView {
            player_id,
            mark: Mark::O,
            room: RoomView::from(&room),
        },
    ))
}

#[instrument(skip(state, req))]
async fn room_move(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    ApiJson(req): ApiJson<RoomMoveRequest>,
) -> Result<Json<ApiResponse<RoomView>>, ApiError> {
    let index = parse_index(req.index.as_ref())?;
    let (room, outcome) = state.rooms.play(&room_id, &req.player_id, index)?;
    let message = match outcome {
        Some(outcome) => format!("Game over: {}", outcome),
        None => "Board updated".to_string(),
    };
    Ok(ApiResponse::ok(message, RoomView::from(&room)))
}

#[instrument(skip(state))]
async fn room_state(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> Result<Json<ApiResponse<RoomView>>, ApiError> {
    let room = state.rooms.get(&room_id)?;
    Ok(ApiResponse::ok("Current room", RoomView::from(&room)))
}

#[instrument(skip(state, player_id))]
async fn leave_room(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<ApiResponse<RoomView>>, ApiError> {
    let room = state
        .rooms
        .disconnect(&player_id)?
        .ok_or_else(|| ApiError::NotFound("Player not part of any room".to_string()))?;
    Ok(ApiResponse::ok("A player disconnected", RoomView::from(&room)))
}

// ─────────────────────────────────────────────────────────────
//  Router
// ─────────────────────────────────────────────────────────────

fn log_request(req: Request) -> Request {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/game/new-game", post(new_game))
        .route("/api/game/move", post(play_move))
        .route("/api/game/ai-move", post(ai_move))
        .route("/api/game/{session_id}", get(game_state))
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/players/{player_id}", delete(leave_room))
        .route("/api/rooms/{room_id}", get(room_state))
        .route("/api/rooms/{room_id}/join", post(join_room))
        .route("/api/rooms/{room_id}/move", post(room_move))
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(state)
}

/// Binds `config.host:config.port` and serves until the process exits.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &ServerConfig) -> std::io::Result<()> {
    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());
    axum::serve(listener, app).await
}
