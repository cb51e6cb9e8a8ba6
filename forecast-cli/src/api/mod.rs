use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ApiConfig;
use crate::models::{PredictionResult, StudentRecord};
use crate::storage::{Store, AUTH_TOKEN_KEY};

mod error;

pub use error::{ApiError, LOGIN_FAILED_MESSAGE, NETWORK_ERROR_MESSAGE, PREDICTION_FAILED_MESSAGE};

/// Login request payload
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Login response from API. Both fields are optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the forecasting backend.
///
/// Every call is a single attempt: there is no retry or backoff.
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Store,
}

impl ApiClient {
    /// Create a new API client that keeps its token in `store`
    pub fn new(config: &ApiConfig, store: Store) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stored bearer token, if any
    pub fn auth_token(&self) -> Result<Option<String>> {
        self.store.get(AUTH_TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.auth_token()?.is_some())
    }

    /// Drop the stored token
    pub fn logout(&self) -> Result<()> {
        self.store.delete(AUTH_TOKEN_KEY)
    }

    /// Log in against the backend and store the returned token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let url = format!("{}/auth/login", self.base_url);

        tracing::debug!("Logging in as {}", email);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Login error: {}", e);
                ApiError::NetworkError
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Login error: {}", e);
            ApiError::NetworkError
        })?;

        // A body that is not JSON counts as a rejection without a message
        let LoginResponse { token, message } =
            serde_json::from_str::<LoginResponse>(&body).unwrap_or_default();

        match token.filter(|t| !t.is_empty()) {
            Some(token) if status.is_success() => {
                self.store
                    .put(AUTH_TOKEN_KEY, &token)
                    .map_err(ApiError::Storage)?;

                tracing::info!("Successfully logged in as {}", email);
                Ok(token)
            }
            _ => Err(ApiError::login_rejected(status, message)),
        }
    }

    /// Request a GPA prediction for one student.
    ///
    /// Every failure collapses into [`ApiError::RequestFailed`]; the cause is
    /// only logged.
    pub async fn predict(&self, record: &StudentRecord) -> Result<PredictionResult, ApiError> {
        self.send_prediction(record).await.map_err(|e| {
            tracing::error!("Prediction error: {:#}", e);
            ApiError::RequestFailed
        })
    }

    async fn send_prediction(&self, record: &StudentRecord) -> Result<PredictionResult> {
        let url = format!("{}/predict", self.base_url);

        // Without a token the header is still sent; the server rejects it
        let token = self.auth_token()?.unwrap_or_default();

        tracing::debug!("Requesting prediction for {}", record.enrollment_number);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(record)
            .send()
            .await
            .context("Failed to send prediction request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Prediction request failed with status {}", status);
        }

        let prediction: PredictionResult = response
            .json()
            .await
            .context("Failed to parse prediction response")?;

        tracing::info!(
            "Received prediction for {}: {:.2} ({})",
            prediction.enrollment_number,
            prediction.predicted_gpa,
            prediction.academic_risk_level
        );
        Ok(prediction)
    }
}
