//! HTTP client for the product catalogue API
//!
//! One shared `reqwest::Client` (connection pool) serves every request of a
//! run. All ids of a range are dispatched together, a semaphore caps how many
//! are in flight, and each request carries the configured timeout.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{FetchError, FetchOutcome, ProductIdRange, ProductRecord, ProductSource};
use crate::infrastructure::config::ApiConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API root, products live under `{base_url}/products/{id}`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum requests in flight at once
    pub max_concurrent_requests: usize,
    /// User agent string
    pub user_agent: String,
}

impl HttpClientConfig {
    pub fn from_api_config(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            timeout_seconds: api.timeout_seconds,
            max_concurrent_requests: api.max_concurrent_requests,
            user_agent: api.user_agent.clone(),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_api_config(&ApiConfig::default())
    }
}

#[derive(Clone)]
pub struct ProductApiClient {
    client: Client,
    base_url: Url,
    in_flight: Arc<Semaphore>,
    config: HttpClientConfig,
}

impl ProductApiClient {
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        if config.max_concurrent_requests == 0 {
            return Err(anyhow!("max_concurrent_requests must be greater than 0"));
        }

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot hold a path: {}", config.base_url));
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            in_flight: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            config,
        })
    }

    pub fn from_api_config(api: &ApiConfig) -> Result<Self> {
        Self::new(HttpClientConfig::from_api_config(api))
    }

    /// `{base_url}/products/{id}`, any path on the base URL is kept
    pub fn product_url(&self, product_id: u32) -> Url {
        let mut url = self.base_url.clone();
        // `new` only accepts base URLs that have path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("products")
                .push(&product_id.to_string());
        }
        url
    }

    /// Fetch and decode one product. Never fails: problems become `Skipped`.
    pub async fn fetch_product(&self, product_id: u32) -> FetchOutcome {
        match self.try_fetch_product(product_id).await {
            Ok(record) => FetchOutcome::Fetched(record),
            Err(err) => {
                warn!("{err}");
                FetchOutcome::Skipped(err)
            }
        }
    }

    async fn try_fetch_product(&self, product_id: u32) -> Result<ProductRecord, FetchError> {
        let url = self.product_url(product_id);

        let _permit = self
            .in_flight
            .acquire()
            .await
            .map_err(|e| FetchError::Network {
                id: product_id,
                message: e.to_string(),
            })?;

        debug!("🌐 HTTP GET: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(product_id, &e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                id: product_id,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(product_id, &e))?;

        serde_json::from_str::<ProductRecord>(&body).map_err(|e| FetchError::Decode {
            id: product_id,
            status: status.as_u16(),
            message: e.to_string(),
        })
    }

    fn transport_error(&self, product_id: u32, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                id: product_id,
                timeout_seconds: self.config.timeout_seconds,
            }
        } else {
            FetchError::Network {
                id: product_id,
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ProductSource for ProductApiClient {
    async fn fetch_range(&self, range: ProductIdRange) -> Vec<FetchOutcome> {
        info!(
            "Fetching {} products {} (max {} in flight)",
            range.len(),
            range,
            self.config.max_concurrent_requests
        );

        // join_all keeps input order whatever the completion order
        let outcomes = join_all(range.ids().map(|id| self.fetch_product(id))).await;

        let fetched = outcomes.iter().filter(|o| o.record().is_some()).count();
        info!("Fetched {}/{} products", fetched, outcomes.len());
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(base_url: &str) -> HttpClientConfig {
        HttpClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = ProductApiClient::new(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_product_url() {
        let client = ProductApiClient::new(HttpClientConfig::default()).unwrap();
        assert_eq!(
            client.product_url(7).as_str(),
            "https://fakestoreapi.com/products/7"
        );
    }

    #[test]
    fn test_product_url_keeps_base_path() {
        for base in ["http://127.0.0.1:9000/api", "http://127.0.0.1:9000/api/"] {
            let client = ProductApiClient::new(config_for(base)).unwrap();
            assert_eq!(
                client.product_url(12).as_str(),
                "http://127.0.0.1:9000/api/products/12"
            );
        }
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = HttpClientConfig {
            max_concurrent_requests: 0,
            ..Default::default()
        };
        assert!(ProductApiClient::new(config).is_err());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(ProductApiClient::new(config_for("::not a url::")).is_err());
    }

    #[test]
    fn test_base_url_without_path_is_rejected() {
        let err = ProductApiClient::new(config_for("data:text/plain,catalogue"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("cannot hold a path"));
    }

    #[test]
    fn test_product_url_on_bare_host() {
        let client = ProductApiClient::new(config_for("http://127.0.0.1:9000")).unwrap();
        assert_eq!(client.product_url(3).as_str(), "http://127.0.0.1:9000/products/3");
    }
}
