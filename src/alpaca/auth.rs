//! Authentication headers for the Alpaca API

use crate::common::errors::{Result, TraderError};
use crate::config::types::ApiCredentials;

pub const API_KEY_HEADER: &str = "APCA-API-KEY-ID";
pub const API_SECRET_HEADER: &str = "APCA-API-SECRET-KEY";

/// Authentication headers for API requests
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub api_key: String,
    pub api_secret: String,
}

impl AuthHeaders {
    /// Build headers from credentials, rejecting blank keys up front
    pub fn from_credentials(credentials: &ApiCredentials) -> Result<Self> {
        if credentials.api_key.trim().is_empty() || credentials.api_secret.trim().is_empty() {
            return Err(TraderError::Authentication(
                "Alpaca API key and secret must both be set".to_string(),
            ));
        }
        Ok(Self {
            api_key: credentials.api_key.clone(),
            api_secret: credentials.api_secret.clone(),
        })
    }

    /// Add authentication headers to a reqwest RequestBuilder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_SECRET_HEADER, &self.api_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_applied() {
        let headers = AuthHeaders::from_credentials(&ApiCredentials::new(
            "key-id".to_string(),
            "secret".to_string(),
        ))
        .unwrap();

        let request = headers
            .apply_to_request(reqwest::Client::new().get("http://localhost/v2/account"))
            .build()
            .unwrap();

        assert_eq!(request.headers()[API_KEY_HEADER], "key-id");
        assert_eq!(request.headers()[API_SECRET_HEADER], "secret");
    }

    #[test]
    fn test_blank_credentials_rejected() {
        let result = AuthHeaders::from_credentials(&ApiCredentials::new(
            "key-id".to_string(),
            "  ".to_string(),
        ));
        assert!(matches!(result, Err(TraderError::Authentication(_))));
    }
}
