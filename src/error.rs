use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Request error: {0}")]
    FetchTransport(String),

    #[error("Failed to fetch page: {status}")]
    FetchStatus { status: u16 },

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unhandled(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Only 4xx/5xx upstream codes are passed through.
            AppError::FetchStatus { status } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::FetchTransport(_)
            | AppError::Summarization(_)
            | AppError::Config(_)
            | AppError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Validation(_) | AppError::FetchStatus { .. } => {
                tracing::warn!(status = status.as_u16(), error = %self, "request failed");
            }
            _ => tracing::error!(status = status.as_u16(), error = %self, "request failed"),
        }
        response::error(status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
