//! Web error types and their HTTP mappings.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum WebError {
    /// Invalid request parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Export was requested but no records matched the filters.
    #[error("No data to export")]
    NoExportData,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for web handlers.
pub type Result<T> = std::result::Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::BadRequest(_) | WebError::NoExportData => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Config(_) | WebError::Io(_) | WebError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = WebError::NoExportData.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = WebError::NotFound("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = WebError::Internal("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
