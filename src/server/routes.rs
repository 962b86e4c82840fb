//! Route handlers for the collaborative editing host.
//!
//! Each handler maps one host operation onto HTTP. Editing a replica only
//! queues its message; other replicas see the edit after `POST /dispatch`.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::crdt::{EditorError, Message, SiteId};
use crate::network::NetworkServer;

/// Shared application state
pub type AppState = Arc<NetworkServer>;

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ReplicaResponse {
    pub site_id: SiteId,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ApplyResponse {
    pub site_id: SiteId,
    pub content: String,
    pub applied: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DispatchResponse {
    pub delivered: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct InsertRequest {
    pub index: usize,
    pub value: char,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct EraseRequest {
    pub index: usize,
}

/// Error body returned by every failing handler.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// An [`EditorError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub EditorError);

impl From<EditorError> for ApiError {
    fn from(error: EditorError) -> Self {
        ApiError(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            EditorError::UnknownSite(_) => StatusCode::NOT_FOUND,
            EditorError::IndexOutOfRange { .. }
            | EditorError::InvalidPosition(_)
            | EditorError::Codec(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self.0, "request failed");
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn replica_response(state: &NetworkServer, site_id: SiteId) -> Result<Json<ReplicaResponse>, ApiError> {
    let content = state.render(site_id)?;
    Ok(Json(ReplicaResponse { site_id, content }))
}

/// Basic health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running!".to_string(),
    })
}

pub async fn register_replica(State(state): State<AppState>) -> Result<Json<ReplicaResponse>, ApiError> {
    let site_id = state.register_replica();
    replica_response(&state, site_id)
}

pub async fn get_replica(
    State(state): State<AppState>,
    Path(site_id): Path<SiteId>,
) -> Result<Json<ReplicaResponse>, ApiError> {
    replica_response(&state, site_id)
}

pub async fn deregister_replica(
    State(state): State<AppState>,
    Path(site_id): Path<SiteId>,
) -> Result<StatusCode, ApiError> {
    state.deregister_replica(site_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn insert(
    State(state): State<AppState>,
    Path(site_id): Path<SiteId>,
    Json(request): Json<InsertRequest>,
) -> Result<Json<ReplicaResponse>, ApiError> {
    let id = state.local_insert(site_id, request.index, request.value)?;
    info!(site_id, index = request.index, value = ?request.value, %id, "insert");
    replica_response(&state, site_id)
}

pub async fn erase(
    State(state): State<AppState>,
    Path(site_id): Path<SiteId>,
    Json(request): Json<EraseRequest>,
) -> Result<Json<ReplicaResponse>, ApiError> {
    let symbol = state.local_erase(site_id, request.index)?;
    info!(site_id, index = request.index, id = %symbol.id(), "erase");
    replica_response(&state, site_id)
}

/// Applies a wire-encoded message to one replica.
///
/// The body is taken as a raw string so malformed messages come back through
/// the same error path as every other failure.
pub async fn apply_message(
    State(state): State<AppState>,
    Path(site_id): Path<SiteId>,
    body: String,
) -> Result<Json<ApplyResponse>, ApiError> {
    let message = Message::from_json(&body)?;
    let applied = state.apply_remote(site_id, &message)?;
    info!(site_id, origin = message.origin(), kind = ?message.kind(), applied, "applied message");

    let content = state.render(site_id)?;
    Ok(Json(ApplyResponse {
        site_id,
        content,
        applied,
    }))
}

pub async fn dispatch(State(state): State<AppState>) -> Json<DispatchResponse> {
    let delivered = state.dispatch_pending();
    info!(delivered, "dispatch");
    Json(DispatchResponse { delivered })
}

/// Creates and configures the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/replicas", post(register_replica))
        .route(
            "/replicas/:site_id",
            get(get_replica).delete(deregister_replica),
        )
        .route("/replicas/:site_id/insert", post(insert))
        .route("/replicas/:site_id/erase", post(erase))
        .route("/replicas/:site_id/messages", post(apply_message))
        .route("/dispatch", post(dispatch))
        .with_state(state)
}
