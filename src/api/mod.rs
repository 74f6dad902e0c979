pub mod error;
pub mod health;
pub mod summarize;
pub mod upload;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload::upload_handler))
        .route("/summarize", post(summarize::summarize_handler))
        .route("/health", get(health::health_handler))
}
