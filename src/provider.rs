//! Forecast provider abstraction and the HTTP implementation.
//!
//! The service only ever talks to [`ForecastProvider`], so tests can swap in
//! a scripted provider and the HTTP client stays a thin shell.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::WeatherError;
use crate::models::wire::ProviderResponse;

/// A remote source of forecast sample batches for a city.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetches a fresh batch of raw samples for `city`. Non-success upstream
    /// responses surface as [`WeatherError::Provider`].
    async fn fetch(&self, city: &str) -> Result<ProviderResponse, WeatherError>;
}

/// HTTP client for a five-day/three-hour style forecast endpoint. The city
/// name is appended to the configured base URL; the API key, when present,
/// travels as the `appid` query parameter.
#[derive(Debug, Clone)]
pub struct HttpForecastProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpForecastProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("weatherservice/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl ForecastProvider for HttpForecastProvider {
    #[instrument(skip(self))]
    async fn fetch(&self, city: &str) -> Result<ProviderResponse, WeatherError> {
        let url = format!("{}{}", self.base_url, city);
        debug!(%url, "calling forecast provider");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("appid", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| WeatherError::provider(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::provider(format!(
                "provider returned status {status}"
            )));
        }

        let payload: ProviderResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::provider(format!("invalid provider payload: {e}")))?;

        debug!(samples = payload.list.len(), "provider batch received");
        Ok(payload)
    }
}
