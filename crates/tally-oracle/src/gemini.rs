//! Gemini-backed oracle implementation
//!
//! Talks to the hosted Generative Language REST API with the page image
//! attached inline. Both oracle contracts share one HTTP path; only the
//! prompt and the expected response schema differ.
//!
//! # Features
//!
//! - Async HTTP with per-request timeout
//! - Retry with exponential backoff on transient failures
//! - Fence-tolerant JSON response parsing

use crate::error::OracleError;
use crate::images::PageImage;
use crate::parser::parse_oracle_response;
use crate::types::{ClaimDigest, PageVerification, ReviewVerdict};
use crate::{ReviewOracle, VerificationOracle};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default vision model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default per-request timeout (verification calls run minutes, not hours)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Hosted vision oracle
///
/// Cloning is cheap; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct GeminiOracle {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Minimal view of a generateContent response
#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

impl GeminiOracle {
    /// Create a new oracle client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (see [`DEFAULT_ENDPOINT`])
    /// - `model`: vision model name (see [`DEFAULT_MODEL`])
    /// - `api_key`: API key, typically read from the environment by the CLI
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| OracleError::Communication(format!("Client build failed: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create an oracle against the default endpoint and model
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, OracleError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, api_key)
    }

    /// Set the maximum number of attempts per call
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, OracleError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Communication(format!("Client build failed: {}", e)))?;
        Ok(self)
    }

    /// Send one prompt with an attached page image, returning the raw text
    async fn generate(&self, image: &PageImage, prompt: &str) -> Result<String, OracleError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    {
                        "inline_data": {
                            "mime_type": "image/png",
                            "data": BASE64.encode(&image.png),
                        }
                    }
                ]
            }]
        });

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        let parsed: GenerateResponse = response.json().await.map_err(|e| {
                            OracleError::InvalidResponse(format!(
                                "Failed to parse API envelope: {}",
                                e
                            ))
                        })?;

                        let text = parsed
                            .candidates
                            .first()
                            .and_then(|c| c.content.parts.first())
                            .map(|p| p.text.clone())
                            .ok_or_else(|| {
                                OracleError::InvalidResponse("Empty candidate list".to_string())
                            })?;

                        debug!(page = image.page, chars = text.len(), "oracle reply received");
                        return Ok(text);
                    }

                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(OracleError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(OracleError::Timeout);
                }
                Err(e) => {
                    last_error = Some(OracleError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(page = image.page, attempt = attempts, "oracle call failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| OracleError::Communication("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl VerificationOracle for GeminiOracle {
    async fn verify_page(
        &self,
        image: &PageImage,
        _claims: &[ClaimDigest],
        prompt: &str,
    ) -> Result<PageVerification, OracleError> {
        let raw = self.generate(image, prompt).await?;
        parse_oracle_response(&raw)
    }
}

#[async_trait]
impl ReviewOracle for GeminiOracle {
    async fn review_claim(
        &self,
        image: &PageImage,
        _claim: &ClaimDigest,
        prompt: &str,
    ) -> Result<ReviewVerdict, OracleError> {
        let raw = self.generate(image, prompt).await?;
        parse_oracle_response(&raw)
    }
}
