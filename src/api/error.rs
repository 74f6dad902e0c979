//! JSON error bodies shared by the handlers.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

/// Rejection type returned by the handlers.
pub type ApiRejection = (StatusCode, Json<ApiError>);

pub fn reject(status: StatusCode, message: impl Into<String>) -> ApiRejection {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
}
