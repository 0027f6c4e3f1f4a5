use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod cors;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod translator;

use config::Config;
use translator::TranslationRunner;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub runner: Arc<dyn TranslationRunner>,
}

impl AppState {
    pub fn new(config: Config, runner: Arc<dyn TranslationRunner>) -> Self {
        Self {
            config: Arc::new(config),
            runner,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    // OPTIONS /translate is answered by the CORS layer, then normalized to 204.
    Router::new()
        .route("/", get(http::handlers::health))
        .route("/debug/port", get(http::handlers::debug_port))
        .route("/translate", post(http::handlers::translate))
        .layer(cors::cors_layer(state.config.allowed_origin.clone()))
        .layer(middleware::from_fn(cors::preflight_no_content))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
