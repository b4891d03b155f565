// src/session.rs
use crate::types::{Config, ScanError};
use reqwest::Client;
use std::time::Duration;

/// HTTP session used by the harvest sources.
#[derive(Clone)]
pub struct Session {
    pub client: Client,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .connect_timeout(config.fetch_timeout.min(Duration::from_secs(10)))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ScanError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Session { client })
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ScanError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| ScanError::Network(e.to_string()))
    }

    /// GET `url` and return the body, treating any non-2xx status as an error.
    pub async fn get_text(&self, url: &str) -> Result<String, ScanError> {
        let response = self.get(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ScanError::Network(e.to_string()))
    }
}
