use reqwest::StatusCode;
use thiserror::Error;

/// Shown for every failed prediction, whatever the cause
pub const PREDICTION_FAILED_MESSAGE: &str = "Failed to get prediction. Please try again.";
/// Used when the login endpoint rejects a request without a message
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
/// Used when the login endpoint cannot be reached
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// API-specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("{}", NETWORK_ERROR_MESSAGE)]
    NetworkError,

    #[error("{}", PREDICTION_FAILED_MESSAGE)]
    RequestFailed,

    #[error("Failed to access local storage: {0}")]
    Storage(#[source] anyhow::Error),
}

impl ApiError {
    /// Login rejection, preferring the server's message
    pub fn login_rejected(status: StatusCode, message: Option<String>) -> Self {
        tracing::debug!("Login rejected with status {}", status);

        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string());

        ApiError::AuthenticationFailed(message)
    }
}
