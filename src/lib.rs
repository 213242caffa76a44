pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod services;

use crate::services::file_manager::FileManager;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub file_manager: Arc<FileManager>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::handlers::health::health_check))
        .route("/mcp", post(api::handlers::mcp::handle_rpc))
        .with_state(state)
}
