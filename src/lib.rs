// Document Assistant - chat with PDFs and spreadsheets through a local Ollama model

pub mod config;
pub mod types;
pub mod models;
pub mod chunker;
pub mod session;
pub mod agents;
pub mod llm;
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
