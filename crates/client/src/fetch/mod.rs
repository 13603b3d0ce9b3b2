//! Network boundary of the offline cache.
//!
//! ### Transport vs. HTTP failures
//! - A response with any status code (including 4xx/5xx) is a successful
//!   transport result and is returned as `Ok`.
//! - Only connection, timeout and body-read failures are `NetworkError`s;
//!   those are what trigger the cache fallback.
//!
//! ### URL Resolution
//! - Relative request paths resolve against the configured origin
//! - Lowercase host, remove fragments, preserve query string

pub mod url;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use kakei_core::{AppConfig, CachedEntry, Error};
use reqwest::{Client, header};

pub use self::url::{UrlError, parse_origin, resolve};
pub use reqwest::{Method, StatusCode};

/// Transport-level failure talking to the app server.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NetworkError {
    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Could not reach the server at all.
    #[error("connection failed: {0}")]
    Connect(Arc<reqwest::Error>),

    /// Connection dropped while reading the body.
    #[error("failed to read response: {0}")]
    Body(String),

    /// Simulated or otherwise unclassified transport failure.
    #[error("transport failure: {0}")]
    Other(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_body() || err.is_decode() {
            NetworkError::Body(err.to_string())
        } else {
            NetworkError::Connect(Arc::new(err))
        }
    }
}

impl From<NetworkError> for Error {
    fn from(err: NetworkError) -> Self {
        Error::Network(err.to_string())
    }
}

/// A request passing through the offline layer.
#[derive(Debug, Clone)]
pub struct ShellRequest {
    pub method: Method,
    /// Absolute URL; also the cache key.
    pub url: ::url::Url,
    pub body: Option<Bytes>,
}

impl ShellRequest {
    pub fn get(url: ::url::Url) -> Self {
        Self { method: Method::GET, url, body: None }
    }

    pub fn new(method: Method, url: ::url::Url) -> Self {
        Self { method, url, body: None }
    }
}

/// A response from the network or rebuilt from the cache.
///
/// Cloning is cheap: the body is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellResponse {
    pub url: ::url::Url,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl ShellResponse {
    /// Snapshot this response for storage.
    pub fn to_entry(&self) -> CachedEntry {
        CachedEntry {
            url: self.url.to_string(),
            status: self.status.as_u16(),
            content_type: self.content_type.clone(),
            headers: self.headers.clone(),
            body: self.body.to_vec(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuild a response from a stored entry.
    pub fn from_entry(entry: CachedEntry) -> Result<Self, Error> {
        let url = ::url::Url::parse(&entry.url).map_err(|e| Error::CorruptEntry(format!("{}: {e}", entry.url)))?;
        let status = StatusCode::from_u16(entry.status)
            .map_err(|e| Error::CorruptEntry(format!("{}: status {}: {e}", entry.url, entry.status)))?;
        Ok(Self { url, status, content_type: entry.content_type, headers: entry.headers, body: Bytes::from(entry.body) })
    }
}

/// Anything that can carry a [`ShellRequest`] to the app server.
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request. HTTP error statuses are `Ok`.
    async fn fetch(&self, request: &ShellRequest) -> Result<ShellResponse, NetworkError>;
}

#[async_trait]
impl<N: Network + ?Sized> Network for Arc<N> {
    async fn fetch(&self, request: &ShellRequest) -> Result<ShellResponse, NetworkError> {
        (**self).fetch(request).await
    }
}

/// Configuration for the HTTP network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// User agent string (default: "kakei-shell/0.1")
    pub user_agent: String,

    /// Request timeout (default: 10s)
    pub timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { user_agent: "kakei-shell/0.1".to_string(), timeout: Duration::from_millis(10_000) }
    }
}

impl From<&AppConfig> for NetworkConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout() }
    }
}

/// reqwest-backed [`Network`].
pub struct HttpNetwork {
    http: Client,
    config: NetworkConfig,
}

impl HttpNetwork {
    /// Create a new HTTP network with the given configuration.
    pub fn new(config: NetworkConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &ShellRequest) -> Result<ShellResponse, NetworkError> {
        let start = Instant::now();

        let mut builder = self.http.request(request.method.clone(), request.url.as_str());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;

        let status = response.status();
        let final_url = response.url().clone();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.bytes().await?;

        tracing::debug!(
            "fetched {} {} -> {} in {}ms ({} bytes)",
            request.method,
            request.url,
            status.as_u16(),
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(ShellResponse { url: final_url, status, content_type, headers, body })
    }
}
