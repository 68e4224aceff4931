/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ballotbox_core::LedgerError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Authorization failed: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl ServerError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Auth(_) | ServerError::Jwt(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::Ledger(e) => ledger_status(e),
            ServerError::Config(_) | ServerError::Bcrypt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::Validation(_) | LedgerError::InvalidOption { .. } => StatusCode::BAD_REQUEST,
        LedgerError::Auth => StatusCode::UNAUTHORIZED,
        LedgerError::Forbidden(_) => StatusCode::FORBIDDEN,
        LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
        LedgerError::ClosedPoll(_)
        | LedgerError::DuplicateVote { .. }
        | LedgerError::DuplicateLogin(_)
        | LedgerError::DuplicateEmail(_) => StatusCode::CONFLICT,
        LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            ServerError::Auth(msg) | ServerError::Forbidden(msg) => msg,
            ServerError::Ledger(LedgerError::Storage(ref msg)) => {
                tracing::error!("Storage error: {}", msg);
                "Storage error".to_string()
            }
            ServerError::Ledger(e) => e.to_string(),
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
            ServerError::Jwt(ref e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid token".to_string()
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                "Password error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
