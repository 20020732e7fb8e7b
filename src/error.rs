use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use sqlx::error::ErrorKind;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum JournalError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JournalError {
    /// Map a failed write so that NOT NULL / CHECK violations surface as
    /// `InvalidEntry` instead of an opaque database failure.
    pub fn from_write(err: SqlxError) -> Self {
        match err.as_database_error().map(|db| db.kind()) {
            Some(ErrorKind::NotNullViolation) | Some(ErrorKind::CheckViolation) => {
                JournalError::InvalidEntry(err.to_string())
            }
            _ => JournalError::Database(err),
        }
    }
}

impl IntoResponse for JournalError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            JournalError::Database(_)
            | JournalError::PasswordHash(_)
            | JournalError::Config(_)
            | JournalError::Io(_) => {
                error!(error = %self, "request failed");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                (status, body)
            }
            JournalError::InvalidEntry(msg) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ApiErrorBody {
                    code: "INVALID_ENTRY".to_string(),
                    message: msg,
                };
                (status, body)
            }
            JournalError::MissingParameter(name) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ApiErrorBody {
                    code: "MISSING_PARAMETER".to_string(),
                    message: format!("missing required parameter `{name}`"),
                };
                (status, body)
            }
            JournalError::NotFound => {
                let status = StatusCode::NOT_FOUND;
                let body = ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "Resource not found.".to_string(),
                };
                (status, body)
            }
            JournalError::Unauthorized => {
                let status = StatusCode::FORBIDDEN;
                let body = ApiErrorBody {
                    code: "FORBIDDEN".to_string(),
                    message: "Login required.".to_string(),
                };
                (status, body)
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
