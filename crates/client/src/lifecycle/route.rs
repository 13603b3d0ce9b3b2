//! Per-request routing: network-only or network-first-with-cache-fallback.

use kakei_core::Error;
use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::ShellRequest;

/// Why a request skips the cache entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BypassReason {
    /// Path under the API prefix: always live data.
    Api,
    /// Only GET responses are stored.
    NonGet,
    /// Another origin; never stored in this app's cache.
    CrossOrigin,
}

/// Routing decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    NetworkOnly(BypassReason),
    NetworkFirst,
}

/// Decides how each request is served.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    origin: Url,
    api: Regex,
}

impl RoutePolicy {
    /// Build a policy for `origin` whose API lives under `api_prefix`.
    pub fn new(origin: Url, api_prefix: &str) -> Result<Self, Error> {
        let api = Regex::new(&format!("^{}", regex::escape(api_prefix)))
            .map_err(|e| Error::InvalidInput(format!("api_prefix: {e}")))?;
        Ok(Self { origin, api })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Whether `url` falls under the API prefix.
    pub fn is_api(&self, url: &Url) -> bool {
        self.api.is_match(url.path())
    }

    pub fn route(&self, request: &ShellRequest) -> Route {
        if request.url.origin() != self.origin.origin() {
            return Route::NetworkOnly(BypassReason::CrossOrigin);
        }
        if self.is_api(&request.url) {
            return Route::NetworkOnly(BypassReason::Api);
        }
        if request.method != Method::GET {
            return Route::NetworkOnly(BypassReason::NonGet);
        }
        Route::NetworkFirst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RoutePolicy {
        RoutePolicy::new(Url::parse("http://127.0.0.1:8000").unwrap(), "/api/").unwrap()
    }

    fn get(path: &str) -> ShellRequest {
        ShellRequest::get(Url::parse("http://127.0.0.1:8000").unwrap().join(path).unwrap())
    }

    #[test]
    fn test_api_requests_bypass() {
        assert_eq!(policy().route(&get("/api/daily_chart")), Route::NetworkOnly(BypassReason::Api));
        assert_eq!(policy().route(&get("/api/monthly_chart?month=5")), Route::NetworkOnly(BypassReason::Api));
    }

    #[test]
    fn test_prefix_is_anchored() {
        assert_eq!(policy().route(&get("/static/api/x.js")), Route::NetworkFirst);
        assert_eq!(policy().route(&get("/apiary")), Route::NetworkFirst);
    }

    #[test]
    fn test_shell_requests_network_first() {
        assert_eq!(policy().route(&get("/")), Route::NetworkFirst);
        assert_eq!(policy().route(&get("/static/style.css")), Route::NetworkFirst);
    }

    #[test]
    fn test_non_get_bypasses() {
        let mut request = get("/register");
        request.method = Method::POST;
        assert_eq!(policy().route(&request), Route::NetworkOnly(BypassReason::NonGet));
    }

    #[test]
    fn test_cross_origin_bypasses() {
        let request = ShellRequest::get(Url::parse("https://cdn.example.com/chart.js").unwrap());
        assert_eq!(policy().route(&request), Route::NetworkOnly(BypassReason::CrossOrigin));

        let other_port = ShellRequest::get(Url::parse("http://127.0.0.1:9000/").unwrap());
        assert_eq!(policy().route(&other_port), Route::NetworkOnly(BypassReason::CrossOrigin));
    }

    #[test]
    fn test_prefix_metacharacters_are_literal() {
        let policy = RoutePolicy::new(Url::parse("http://h").unwrap(), "/a.i/").unwrap();
        assert!(policy.is_api(&Url::parse("http://h/a.i/x").unwrap()));
        assert!(!policy.is_api(&Url::parse("http://h/abi/x").unwrap()));
    }
}
