//! HTTP client for talking to a running Heirloom server.

use anyhow::Result;
use serde::Deserialize;
use url::Url;

/// Health check response from the server.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Activity table counters from the server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub tracked: usize,
    pub stale: usize,
    pub idle_timeout_ms: u64,
    pub sweep_interval_ms: u64,
}

/// HTTP client for the Heirloom server.
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a new client for the given server URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            http: reqwest::Client::new(),
        })
    }

    /// Check server health.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get_json("/health").await
    }

    /// Fetch activity table counters.
    pub async fn session_stats(&self) -> Result<SessionStats> {
        self.get_json("/api/v1/session/stats").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path)?;
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Server returned error: {}", response.status());
        }

        Ok(response.json().await?)
    }
}
