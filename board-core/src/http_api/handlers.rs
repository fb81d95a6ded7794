//! HTTP API handlers for the board

use super::state::AppState;
use super::types::*;
use crate::core_board::{ActorId, BoardError, Record};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::error;

/// Error type for API responses
#[derive(Debug)]
pub enum ApiError {
    /// The store refused the request
    Board(BoardError),

    /// The actor header was absent; carries the header name
    MissingActor(String),

    /// The request body or path could not be extracted
    Rejected { status: StatusCode, message: String },

    /// The request could not be run to completion
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingActor(_) => StatusCode::UNAUTHORIZED,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Board(BoardError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Board(err) if err.is_invalid_input() => StatusCode::BAD_REQUEST,
            ApiError::Board(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = match self {
            ApiError::Board(err) => (err.kind(), err.to_string()),
            ApiError::MissingActor(header) => {
                ("missing_actor", format!("Missing actor header '{}'", header))
            }
            ApiError::Rejected { message, .. } => ("invalid_request", message),
            ApiError::Internal(message) => ("internal", message),
        };

        if status.is_server_error() {
            error!(kind = error, message = %message, "Request failed");
        }

        let body = ErrorResponse { error: error.to_string(), message };
        (status, Json(body)).into_response()
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        ApiError::Board(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected { status: rejection.status(), message: rejection.body_text() }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected { status: rejection.status(), message: rejection.body_text() }
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Actor id set by the authentication layer in front of the API
fn caller(state: &AppState, headers: &HeaderMap) -> ApiResult<ActorId> {
    let value = headers
        .get(&state.actor_header)
        .ok_or_else(|| ApiError::MissingActor(state.actor_header.to_string()))?;
    let text = value
        .to_str()
        .map_err(|_| BoardError::InvalidActorId("header value is not visible ASCII".to_string()))?;
    Ok(ActorId::parse(text.trim())?)
}

// ============================================================================
// Message Handlers
// ============================================================================

/// POST /messages - Post a message as the calling actor
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let author = caller(&state, &headers)?;
    let Json(req) = payload?;

    // The append syncs the durable log, keep it off the async workers
    let store = state.store.clone();
    let index = tokio::task::spawn_blocking(move || store.post(author, req.content))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((StatusCode::CREATED, Json(PostResponse { index })))
}

/// GET /messages/:index - Get a single message
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    index: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Record>> {
    let Path(index) = index?;
    Ok(Json(state.store.get(index)?))
}

/// GET /messages/count - Number of messages on the board
pub async fn count_messages(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    Json(CountResponse { count: state.store.count() })
}

/// GET /messages - Every message in posting order
pub async fn list_messages(State(state): State<Arc<AppState>>) -> Json<Vec<Record>> {
    Json(state.store.get_all())
}

// ============================================================================
// Author Handlers
// ============================================================================

/// GET /authors/:author/messages - Messages by one author
pub async fn messages_by_author(
    State(state): State<Arc<AppState>>,
    author: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<Record>>> {
    let Path(author) = author?;
    let author = ActorId::parse(&author)?;
    Ok(Json(state.store.get_by_author(&author)))
}

/// GET /health - Liveness check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        count: state.store.count(),
        persistent: state.store.is_persistent(),
    })
}
