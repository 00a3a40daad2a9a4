//! REST API and static front-end.
//!
//! Every state-machine rejection is reported as HTTP 200 with
//! `{success: false, message}`; clients branch on `success`, not on status.

use crate::store::{DEFAULT_SESSION, SessionStore};
use axum::body::Bytes;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::path::Path;
use strictly_workshop::{
    CurrentQuiz, ExitOutcome, GameSnapshot, Outcome, QuizAnswer, SessionError, Task, Workshop,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, instrument};

/// Header naming the client's session.
pub const SESSION_HEADER: &str = "x-session-id";

/// Envelope for every mutating endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    /// Whether the operation was applied.
    pub success: bool,
    /// Quiz answers only: whether the answer was right.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    /// Message for the player.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Exit only: whether the player won.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub won: Option<bool>,
    /// Session state after a successful operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameSnapshot>,
}

impl ActionResponse {
    fn applied(message: Option<String>, game_state: GameSnapshot) -> Self {
        Self {
            success: true,
            correct: None,
            message,
            won: None,
            game_state: Some(game_state),
        }
    }
}

impl From<Outcome> for ActionResponse {
    fn from(outcome: Outcome) -> Self {
        Self::applied(Some(outcome.message), outcome.snapshot)
    }
}

impl From<QuizAnswer> for ActionResponse {
    fn from(answer: QuizAnswer) -> Self {
        Self {
            correct: Some(answer.correct),
            ..Self::applied(Some(answer.message), answer.snapshot)
        }
    }
}

impl From<ExitOutcome> for ActionResponse {
    fn from(exit: ExitOutcome) -> Self {
        Self {
            won: Some(exit.won),
            ..Self::applied(Some(exit.message), exit.snapshot)
        }
    }
}

impl From<SessionError> for ActionResponse {
    fn from(err: SessionError) -> Self {
        Self {
            success: false,
            correct: None,
            message: Some(err.to_string()),
            won: None,
            game_state: None,
        }
    }
}

fn respond<T: Into<ActionResponse>>(result: Result<T, SessionError>) -> Json<ActionResponse> {
    Json(match result {
        Ok(done) => done.into(),
        Err(err) => {
            debug!(code = err.code(), "Operation rejected");
            err.into()
        }
    })
}

/// Reads the chosen option out of a `POST /api/submit-quiz` body.
///
/// The body is taken as-is so that no request shape is rejected before the
/// session sees it. Anything other than an integral `answer` number (an
/// absent or malformed body, a string, a fractional number) maps to `-1`,
/// which never matches an option. `1.0` compares equal to `1`.
pub fn parse_answer(body: &[u8]) -> i64 {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return -1;
    };
    match value.get("answer") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .unwrap_or(-1),
        _ => -1,
    }
}

/// Session selected by the `x-session-id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey(pub String);

impl<S: Send + Sync> FromRequestParts<S> for SessionKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SESSION);
        Ok(Self(id.to_string()))
    }
}

/// Builds the API routes only.
pub fn api_router(store: SessionStore) -> Router {
    Router::new()
        .route("/api/game-state", get(game_state))
        .route("/api/checkin", post(check_in))
        .route("/api/start-workshop", post(start_workshop))
        .route("/api/complete-task", post(complete_task))
        .route("/api/submit-quiz", post(submit_quiz))
        .route("/api/exit", post(exit))
        .route("/api/current-task", get(current_task))
        .route("/api/current-workshop", get(current_workshop))
        .route("/api/current-quiz", get(current_quiz))
        .route("/api/reset", post(reset))
        .with_state(store)
}

/// Builds the full application: API, static front-end, CORS and request tracing.
#[instrument(skip(store), fields(static_dir = %static_dir.display()))]
pub fn app(store: SessionStore, static_dir: &Path) -> Router {
    api_router(store)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[instrument(skip(store))]
async fn game_state(State(store): State<SessionStore>, SessionKey(id): SessionKey) -> Json<GameSnapshot> {
    Json(store.snapshot(&id))
}

#[instrument(skip(store))]
async fn check_in(State(store): State<SessionStore>, SessionKey(id): SessionKey) -> Json<ActionResponse> {
    respond(store.with_session(&id, |s| s.check_in()))
}

#[instrument(skip(store))]
async fn start_workshop(
    State(store): State<SessionStore>,
    SessionKey(id): SessionKey,
) -> Json<ActionResponse> {
    respond(store.with_session(&id, |s| s.start_workshop()))
}

#[instrument(skip(store))]
async fn complete_task(
    State(store): State<SessionStore>,
    SessionKey(id): SessionKey,
) -> Json<ActionResponse> {
    respond(store.with_session(&id, |s| s.complete_task()))
}

#[instrument(skip(store, body))]
async fn submit_quiz(
    State(store): State<SessionStore>,
    SessionKey(id): SessionKey,
    body: Bytes,
) -> Json<ActionResponse> {
    let answer = parse_answer(&body);
    debug!(answer, "Parsed quiz answer");
    respond(store.with_session(&id, |s| s.submit_answer(answer)))
}

#[instrument(skip(store))]
async fn exit(State(store): State<SessionStore>, SessionKey(id): SessionKey) -> Json<ActionResponse> {
    respond(store.with_session(&id, |s| s.exit()))
}

#[instrument(skip(store))]
async fn current_task(State(store): State<SessionStore>, SessionKey(id): SessionKey) -> Json<Option<Task>> {
    Json(store.peek(&id, |s| s.current_task().cloned()))
}

#[instrument(skip(store))]
async fn current_workshop(
    State(store): State<SessionStore>,
    SessionKey(id): SessionKey,
) -> Json<Option<Workshop>> {
    Json(store.peek(&id, |s| s.current_workshop_intro().cloned()))
}

#[instrument(skip(store))]
async fn current_quiz(
    State(store): State<SessionStore>,
    SessionKey(id): SessionKey,
) -> Json<Option<CurrentQuiz>> {
    Json(store.peek(&id, |s| s.current_quiz()))
}

#[instrument(skip(store))]
async fn reset(State(store): State<SessionStore>, SessionKey(id): SessionKey) -> Json<ActionResponse> {
    Json(ActionResponse::applied(None, store.reset(&id)))
}
