//! Offline cache lifecycle tools.
//!
//! Each tool drives the shared [`CacheLifecycleManager`](kakei_client::CacheLifecycleManager):
//! `shell_install` and `shell_activate` step through the lifecycle,
//! `shell_fetch` serves one request, `shell_status` reports state.

pub mod activate;
pub mod fetch;
pub mod install;
pub mod status;

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use kakei_client::{CacheLifecycleManager, Network, NetworkError, ShellRequest, ShellResponse, StatusCode};
    use kakei_core::{AppConfig, CacheDb};

    pub const ORIGIN: &str = "http://127.0.0.1:8000";

    /// App server stand-in: every known URL answers 200.
    #[derive(Default)]
    pub struct StubNetwork {
        pages: Mutex<HashMap<String, &'static str>>,
        offline: AtomicBool,
    }

    impl StubNetwork {
        pub fn serve(&self, path: &str, body: &'static str) {
            self.pages.lock().unwrap().insert(format!("{ORIGIN}{path}"), body);
        }

        pub fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Network for StubNetwork {
        async fn fetch(&self, request: &ShellRequest) -> Result<ShellResponse, NetworkError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(NetworkError::Other("offline".into()));
            }
            let page = self.pages.lock().unwrap().get(request.url.as_str()).copied();
            let (status, body) = match page {
                Some(body) => (StatusCode::OK, body),
                None => (StatusCode::NOT_FOUND, "not found"),
            };
            Ok(ShellResponse {
                url: request.url.clone(),
                status,
                content_type: Some("text/html; charset=utf-8".into()),
                headers: Vec::new(),
                body: Bytes::from_static(body.as_bytes()),
            })
        }
    }

    pub fn config(version: &str) -> AppConfig {
        AppConfig {
            origin: ORIGIN.into(),
            cache_version: version.into(),
            shell_manifest: vec!["/".into(), "/static/style.css".into()],
            ..Default::default()
        }
    }

    /// Manager over an in-memory store whose network serves the shell.
    pub async fn manager(version: &str) -> (CacheLifecycleManager<Arc<StubNetwork>>, Arc<StubNetwork>) {
        let db = CacheDb::open_in_memory().await.unwrap();
        let network = Arc::new(StubNetwork::default());
        network.serve("/", "<html>家計簿</html>");
        network.serve("/static/style.css", "body{}");
        let manager = CacheLifecycleManager::new(db, network.clone(), &config(version)).unwrap();
        (manager, network)
    }
}
