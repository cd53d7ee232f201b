//! The error taxonomy shared by the ingress handler and the HTTP surface.
//!
//! Peer-unreachable and causal-pending conditions never reach this type: the first is logged and
//! swallowed by the replicator, the second is silently buffered by the ingress handler. Only
//! client-visible failures are represented here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    /// Malformed request body or a required field (e.g. a non-empty key) is missing.
    #[error("bad request: {0}")]
    BadInput(String),
    /// Any unexpected failure within a handler; does not roll back partial state.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            NodeError::BadInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            NodeError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
