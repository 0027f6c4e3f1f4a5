use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Riva directory not found")]
    RivaDirectoryNotFound,
    #[error("NMT script not found")]
    ScriptNotFound,
    #[error("{stderr}")]
    TranslationFailed { stderr: String },
    #[error("Translation process timed out")]
    TimedOut,
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn translation_failed(stderr: &str) -> Self {
        Self::TranslationFailed {
            stderr: stderr.trim().to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RivaDirectoryNotFound | Self::ScriptNotFound | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::TranslationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::TimedOut => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = status.as_u16(), error = %self, "translation request failed");

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
