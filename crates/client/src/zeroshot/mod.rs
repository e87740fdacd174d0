//! Hosted zero-shot classification client.
//!
//! ### Contract
//!
//! - **Endpoint**: `POST {base_url}/models/{model_id}`
//! - **Authentication**: `Authorization: Bearer <token>`.
//! - **Body**: `{inputs, parameters: {candidate_labels, multi_label: false}}`.
//! - **Rate Limiting**: minimum interval between calls; no retries. A failed
//!   call fails the classification and with it the current cycle.
//! - **Normalization**: both response shapes become a [`ZeroShotOutput`].

pub mod error;
pub mod request;
pub mod response;

pub use error::ZeroShotError;
pub use request::{MAX_INPUT_CHARS, ZeroShotParameters, ZeroShotRequest};
pub use response::ZeroShotApiResponse;

use std::sync::Arc;
use std::time::{Duration, Instant};

use dealwatch_core::classify::{ZeroShotModel, ZeroShotOutput};
use dealwatch_core::{AppConfig, Error};
use reqwest::{StatusCode, header};
use tokio::sync::Mutex;

/// Default base URL for the hosted inference API.
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default request timeout. Cold models answer slowly.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "dealwatch/0.1";

/// Minimum interval between requests.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(200);

/// Inference client configuration.
#[derive(Debug, Clone)]
pub struct HfConfig {
    /// API token from DEALWATCH_HF_API_TOKEN.
    pub api_token: String,
    /// Base URL (default: https://api-inference.huggingface.co).
    pub base_url: String,
    /// Model repository id (default: facebook/bart-large-mnli).
    pub model_id: String,
    /// Request timeout (default: 60s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for HfConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_id: "facebook/bart-large-mnli".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HfConfig {
    /// Take token and model from the application config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ZeroShotError> {
        let api_token = config.require_hf_api_token().map_err(|_| ZeroShotError::MissingToken)?;
        Ok(Self { api_token: api_token.to_string(), model_id: config.model_id.clone(), ..Default::default() })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model_id)
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Zero-shot classifier backed by the hosted inference API.
#[derive(Debug, Clone)]
pub struct HfZeroShotClient {
    http: reqwest::Client,
    config: HfConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl HfZeroShotClient {
    pub fn new(config: HfConfig) -> Result<Self, ZeroShotError> {
        if config.api_token.trim().is_empty() {
            return Err(ZeroShotError::MissingToken);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ZeroShotError::Network(Arc::new(e)))?;

        Ok(Self { http, config, rate_limiter: Arc::new(RateLimiter::new(MIN_REQUEST_INTERVAL)) })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, ZeroShotError> {
        Self::new(HfConfig::from_app_config(config)?)
    }

    /// Score `text` against `labels`.
    pub async fn classify(&self, text: &str, labels: &[String]) -> Result<ZeroShotOutput, ZeroShotError> {
        let req = ZeroShotRequest::new(text, labels);
        req.validate()?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        tracing::debug!(model = %self.config.model_id, labels = labels.len(), "zero-shot request");

        let http_response = self
            .http
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_token)
            .header(header::ACCEPT, "application/json")
            .json(&req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("inference API response status: {}", status);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(ZeroShotError::AuthError),
            StatusCode::TOO_MANY_REQUESTS => return Err(ZeroShotError::RateLimited),
            StatusCode::SERVICE_UNAVAILABLE => {
                let body = http_response.text().await.unwrap_or_default();
                let reason = serde_json::from_str::<response::LoadingResponse>(&body)
                    .map(|b| b.error)
                    .unwrap_or_else(|_| "service unavailable".to_string());
                return Err(ZeroShotError::ModelLoading(reason));
            }
            s if s.is_client_error() || s.is_server_error() => {
                return Err(ZeroShotError::HttpError { status: s.as_u16() });
            }
            _ => {}
        }

        let bytes = http_response.bytes().await?;
        let raw: ZeroShotApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| ZeroShotError::Parse(e.to_string()))?;
        let output = ZeroShotOutput::from(raw);

        if output.labels.len() != output.scores.len() {
            return Err(ZeroShotError::Parse(format!(
                "{} labels but {} scores",
                output.labels.len(),
                output.scores.len()
            )));
        }

        tracing::debug!("zero-shot completed in {:?}", start.elapsed());
        Ok(output)
    }
}

#[async_trait::async_trait]
impl ZeroShotModel for HfZeroShotClient {
    async fn classify_zero_shot(&self, text: &str, labels: &[String]) -> Result<ZeroShotOutput, Error> {
        Ok(self.classify(text, labels).await?)
    }
}
