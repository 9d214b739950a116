//! API route definitions

pub mod tokens;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json,
};
use scorer::{GraphAccess, ScoreError};
use serde_json::json;

use crate::AppState;

/// Create all API routes
pub fn api_routes<G>() -> axum::Router<Arc<AppState<G>>>
where
    G: GraphAccess + Send + Sync + 'static,
{
    axum::Router::new()
        .route("/tokens", get(tokens::get_tokens::<G>))
        .route("/tokens/:address", get(tokens::get_token::<G>))
        .route(
            "/tokens/:address/believers",
            get(tokens::get_token_believers::<G>),
        )
}

/// Failure returned by a handler, rendered as `{ "error": ... }`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(&'static str),

    #[error("Request timed out")]
    Timeout,
}

impl ApiError {
    /// Map a pipeline failure, logging anything that is not a plain miss
    pub fn from_score(err: ScoreError, context: &'static str) -> Self {
        if err.is_not_found() {
            return Self::NotFound(err.to_string());
        }
        tracing::error!(error = %err, "{}", context);
        Self::Internal(context)
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
