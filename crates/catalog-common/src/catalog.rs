use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::error::CatalogError;
use crate::model::{CatalogEnvelope, Product};

/// Anything that can hand over the current, full product catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<Product>, CatalogError>;
}

#[derive(Clone, Debug)]
pub struct CatalogClientConfig {
    pub base_url: String,
    pub path: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_error_body_bytes: usize,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pastebin.com/raw".to_string(),
            path: "JucRNpWs".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_millis(5_000),
            max_error_body_bytes: 8 * 1024,
        }
    }
}

impl CatalogClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("CATALOG_BASE_URL").unwrap_or(defaults.base_url);
        let path = std::env::var("CATALOG_PATH").unwrap_or(defaults.path);

        let timeout = std::env::var("CATALOG_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let max_retries = std::env::var("CATALOG_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.max_retries);

        let initial_backoff = std::env::var("CATALOG_RETRY_INITIAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.initial_backoff);

        let max_backoff = std::env::var("CATALOG_RETRY_MAX_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_backoff);

        let max_error_body_bytes = std::env::var("CATALOG_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_error_body_bytes);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path.trim_start_matches('/').to_string(),
            timeout,
            max_retries,
            initial_backoff,
            max_backoff,
            max_error_body_bytes,
        }
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

/// HTTP client for the static catalog document. Retries transient failures;
/// every other failure is handed back to the caller untouched.
#[derive(Clone)]
pub struct CatalogClient {
    config: CatalogClientConfig,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent("catalog-api/catalog-client")
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &CatalogClientConfig {
        &self.config
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<Product>, CatalogError> {
        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
            return Err(CatalogError::Upstream { status, body });
        }

        let content = resp.text().await?;
        debug!(content = %content, "raw catalog payload");
        parse_catalog(&content)
    }

    async fn request_with_retry<T, Fut, F>(&self, mut f: F) -> Result<T, CatalogError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, CatalogError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    if attempt > self.config.max_retries || !should_retry(&e) {
                        return Err(e);
                    }
                    let delay = backoff_delay(
                        self.config.initial_backoff,
                        self.config.max_backoff,
                        attempt - 1,
                    );
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "catalog request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_catalog(&self) -> Result<Vec<Product>, CatalogError> {
        let url = self.config.catalog_url();
        info!(url = %url, "fetching products from the catalog source");
        let products = self
            .request_with_retry(|| self.fetch_once(&url))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to fetch catalog"))?;
        info!(products = products.len(), "fetched and parsed catalog");
        Ok(products)
    }
}

/// Decode the catalog envelope. A missing or `null` product list is an empty catalog.
pub fn parse_catalog(content: &str) -> Result<Vec<Product>, CatalogError> {
    let envelope: CatalogEnvelope = serde_json::from_str(content)?;
    match envelope.products {
        Some(products) => Ok(products),
        None => {
            warn!("no products found in the catalog response");
            Ok(Vec::new())
        }
    }
}

fn should_retry(err: &CatalogError) -> bool {
    match err {
        CatalogError::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        CatalogError::Upstream { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        CatalogError::InvalidJson(_) => false,
    }
}

fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let mult = 1u128.checked_shl(exponent).unwrap_or(u128::MAX);
    let base_ms = initial.as_millis().saturating_mul(mult);
    let capped_ms = std::cmp::min(base_ms, max.as_millis()) as u64;
    let jitter_cap = std::cmp::max(1, capped_ms / 4);
    Duration::from_millis(capped_ms.saturating_add(pseudo_jitter_ms(jitter_cap)))
}

fn pseudo_jitter_ms(max_inclusive: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0));
    u64::from(now.subsec_nanos()) % (max_inclusive + 1)
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read catalog error body");
            "<failed to read error body>".to_string()
        }
    }
}
