//! Error handling for the API services

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use infagent_wallet::Error as WalletError;

/// Error type shared by all services and handlers
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Malformed upstream payload: {0}")]
    BadUpstream(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Upstream(_) | ServiceError::BadUpstream(_) => StatusCode::BAD_GATEWAY,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Wallet(e) => match e {
                WalletError::InvalidAddress(_) | WalletError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                WalletError::NotInitialized | WalletError::NoAccounts => StatusCode::CONFLICT,
                WalletError::NotConnected(_) => StatusCode::NOT_FOUND,
                WalletError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// The message shown to the dashboard. Upstream failures collapse to a
    /// generic retry-suggesting message; the detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            ServiceError::Upstream(_) | ServiceError::BadUpstream(_) => {
                "A backend service failed to respond; please retry".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
