pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as words;
use crate::layout::handlers as export;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Words API
        .route("/api/v1/words/today", get(words::handle_today))
        .route("/api/v1/words/details", post(words::handle_details))
        // Export API
        .route("/api/v1/export/pdf", post(export::handle_export_pdf))
        .with_state(state)
}
