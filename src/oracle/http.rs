//! Sentiment oracle backed by a remote scoring service
//!
//! The service receives the whole headline batch and answers with one
//! aggregate reading:
//!
//! ```text
//! POST {url}/score   {"headlines": ["...", "..."]}
//! 200                {"confidence": 0.9993, "label": "negative"}
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::common::errors::{Result, TraderError};
use crate::common::traits::SentimentOracle;
use crate::common::types::{SentimentLabel, SentimentReading};

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    headlines: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    confidence: f64,
    label: String,
}

/// HTTP client for the scoring service
#[derive(Debug, Clone)]
pub struct HttpSentimentOracle {
    client: Client,
    base_url: String,
}

impl HttpSentimentOracle {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TraderError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SentimentOracle for HttpSentimentOracle {
    #[instrument(skip(self, headlines), fields(count = headlines.len()))]
    async fn score(&self, headlines: &[String]) -> Result<SentimentReading> {
        if headlines.is_empty() {
            return Ok(SentimentReading::neutral());
        }

        let url = format!("{}/score", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ScoreRequest { headlines })
            .send()
            .await
            .map_err(|e| TraderError::OracleFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TraderError::OracleFailure(format!(
                "Scoring service returned status {}: {}",
                status, body
            )));
        }

        let scored: ScoreResponse = response
            .json()
            .await
            .map_err(|e| TraderError::OracleFailure(format!("Invalid score payload: {}", e)))?;

        let label: SentimentLabel = scored.label.parse().map_err(TraderError::OracleFailure)?;
        if !(0.0..=1.0).contains(&scored.confidence) {
            return Err(TraderError::OracleFailure(format!(
                "confidence {} outside [0, 1]",
                scored.confidence
            )));
        }

        debug!(?label, confidence = scored.confidence, "Scored headlines");
        Ok(SentimentReading::new(scored.confidence, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_batch_is_neutral_without_request() {
        // Nothing listens on this port; a request would fail.
        let oracle = HttpSentimentOracle::new("http://127.0.0.1:9").unwrap();
        let reading = oracle.score(&[]).await.unwrap();
        assert_eq!(reading, SentimentReading::neutral());
    }

    #[test]
    fn test_url_normalization() {
        let oracle = HttpSentimentOracle::new("http://localhost:8000/").unwrap();
        assert_eq!(oracle.base_url, "http://localhost:8000");
    }
}
