//! Axum HTTP handlers for the relay
//!
//! Provides the translation endpoint, the health check, and a port diagnostic endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::cors::apply_translate_headers;
use crate::domain::relay::{self, TranslationRequest};
use crate::{errors::AppError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DebugPortResponse {
    pub port: String,
    pub env_port: Option<String>,
    pub server_name: String,
}

pub async fn health() -> Json<HealthResponse> {
    info!("health check endpoint called");
    Json(HealthResponse { status: "healthy" })
}

pub async fn debug_port(State(state): State<AppState>) -> Json<DebugPortResponse> {
    let port = state.config.bind_port.to_string();
    info!(port = %port, "current server port");

    Json(DebugPortResponse {
        port,
        env_port: state.config.env_port.clone(),
        server_name: state.config.bind_addr.clone(),
    })
}

pub async fn translate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    info!(
        received_at = %chrono::Utc::now().to_rfc3339(),
        headers = ?headers,
        "new translation request"
    );

    let request: TranslationRequest =
        serde_json::from_slice(&body).map_err(|err| AppError::internal(err.to_string()))?;
    info!(request = ?request, "translation request data");

    let translation = relay::translate(&state, &request).await?;

    let mut response = Json(translation).into_response();
    apply_translate_headers(response.headers_mut(), &state.config.allowed_origin);
    Ok(response)
}
