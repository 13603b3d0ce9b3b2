//! Offline cache lifecycle: install, activate and per-request fetch.
//!
//! ### Install
//! - Open the worker's generation and store every app-shell resource.
//! - Any transport failure or non-success status aborts the install;
//!   entries already written are left for the next attempt to overwrite.
//! - On success, request activation-skip.
//!
//! ### Activate
//! - Delete every generation except the current one, then claim clients.
//!
//! ### Fetch
//! - Network-only for API paths, non-GET and cross-origin requests.
//! - Everything else is network-first: store a copy of the network
//!   response, fall back to the cache only on transport failure.

pub mod route;
pub mod state;

use kakei_core::cache::hash::manifest_fingerprint;
use kakei_core::{AppConfig, CacheDb, Error};
use reqwest::StatusCode;
use tokio::sync::RwLock;
use url::Url;

use crate::fetch::{Network, ShellRequest, ShellResponse, parse_origin, resolve};

pub use route::{BypassReason, Route, RoutePolicy};
pub use state::{ActivateReport, InstallReport, LifecycleStatus, WorkerState};

use state::Worker;

/// How a fetch was served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Network response for a cacheable request; a copy was offered to the cache.
    Fresh(ShellResponse),
    /// Network response for a request that never touches the cache.
    Passthrough(ShellResponse),
    /// Network unreachable; last stored response.
    Cached(ShellResponse),
    /// Network unreachable and nothing usable stored.
    Unavailable,
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&ShellResponse> {
        match self {
            FetchOutcome::Fresh(r) | FetchOutcome::Passthrough(r) | FetchOutcome::Cached(r) => Some(r),
            FetchOutcome::Unavailable => None,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            FetchOutcome::Fresh(_) => "network",
            FetchOutcome::Passthrough(_) => "network_only",
            FetchOutcome::Cached(_) => "cache",
            FetchOutcome::Unavailable => "unavailable",
        }
    }
}

/// Owns the install/activate/fetch protocol for one worker version.
pub struct CacheLifecycleManager<N> {
    db: CacheDb,
    network: N,
    generation: String,
    manifest: Vec<Url>,
    fingerprint: String,
    routes: RoutePolicy,
    worker: RwLock<Worker>,
}

impl<N: Network> CacheLifecycleManager<N> {
    /// Build a manager for the generation described by `config`.
    pub fn new(db: CacheDb, network: N, config: &AppConfig) -> Result<Self, Error> {
        let origin = parse_origin(&config.origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let manifest = config
            .shell_manifest
            .iter()
            .map(|path| resolve(&origin, path).map_err(|e| Error::InvalidUrl(format!("{path}: {e}"))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            db,
            network,
            generation: config.generation_name(),
            manifest,
            fingerprint: manifest_fingerprint(&config.shell_manifest),
            routes: RoutePolicy::new(origin, &config.api_prefix)?,
            worker: RwLock::new(Worker::default()),
        })
    }

    /// Name of the generation this worker owns.
    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn routes(&self) -> &RoutePolicy {
        &self.routes
    }

    pub async fn state(&self) -> WorkerState {
        self.worker.read().await.state
    }

    /// Resolve a request target (path or absolute URL) against the origin.
    pub fn resolve(&self, target: &str) -> Result<Url, Error> {
        resolve(self.routes.origin(), target).map_err(|e| Error::InvalidUrl(e.to_string()))
    }

    async fn transition(&self, allowed: fn(WorkerState) -> bool, next: WorkerState) -> Result<(), Error> {
        let mut worker = self.worker.write().await;
        if !allowed(worker.state) {
            return Err(Error::InvalidState(format!("cannot move from {:?} to {:?}", worker.state, next)));
        }
        worker.state = next;
        Ok(())
    }

    /// Fetch and store the app shell.
    ///
    /// # Errors
    ///
    /// Returns `Error::InstallFailed` if any manifest resource fails to
    /// fetch or answers with a non-success status, `Error::InvalidState` if
    /// this worker is already installing or installed.
    pub async fn install(&self) -> Result<InstallReport, Error> {
        self.transition(WorkerState::can_install, WorkerState::Installing).await?;
        tracing::info!(generation = %self.generation, resources = self.manifest.len(), "installing app shell");

        match self.cache_shell().await {
            Ok(report) => {
                let mut worker = self.worker.write().await;
                worker.state = WorkerState::Installed;
                worker.skip_waiting = true;
                tracing::info!(generation = %self.generation, "app shell installed; skipping wait");
                Ok(report)
            }
            Err(e) => {
                self.worker.write().await.state = WorkerState::Failed;
                tracing::warn!(generation = %self.generation, error = %e, "install failed; previous generation stays active");
                Err(e)
            }
        }
    }

    async fn cache_shell(&self) -> Result<InstallReport, Error> {
        let previous = self.db.open_generation(&self.generation, &self.fingerprint).await?;
        let manifest_changed_without_bump = previous.as_deref().is_some_and(|fp| fp != self.fingerprint);
        if manifest_changed_without_bump {
            tracing::warn!(
                generation = %self.generation,
                "app-shell manifest changed but the cache version was not bumped"
            );
        }

        let mut cached = Vec::with_capacity(self.manifest.len());
        for url in &self.manifest {
            let request = ShellRequest::get(url.clone());
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed(format!("{url}: {e}")))?;

            if !response.status.is_success() {
                return Err(Error::InstallFailed(format!("{url}: status {}", response.status.as_u16())));
            }

            let mut entry = response.to_entry();
            entry.url = url.to_string();
            self.db.put_entry(&self.generation, &entry).await?;
            cached.push(url.to_string());
        }

        Ok(InstallReport { generation: self.generation.clone(), cached, manifest_changed_without_bump })
    }

    /// Make this worker's generation the only one and claim open clients.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` unless install completed first.
    pub async fn activate(&self) -> Result<ActivateReport, Error> {
        self.transition(WorkerState::can_activate, WorkerState::Activating).await?;
        tracing::info!(generation = %self.generation, "activating");

        match self.evict_stale().await {
            Ok(deleted) => {
                let mut worker = self.worker.write().await;
                worker.clients_claimed = true;
                worker.state = WorkerState::Ready;
                tracing::info!(generation = %self.generation, deleted = deleted.len(), "activated; clients claimed");
                Ok(ActivateReport { generation: self.generation.clone(), deleted })
            }
            Err(e) => {
                self.worker.write().await.state = WorkerState::Installed;
                Err(e)
            }
        }
    }

    async fn evict_stale(&self) -> Result<Vec<String>, Error> {
        let mut deleted = Vec::new();
        for info in self.db.list_generations().await? {
            if info.name == self.generation {
                continue;
            }
            if self.db.delete_generation(&info.name).await? {
                tracing::debug!(generation = %info.name, entries = info.entries, "deleted stale generation");
                deleted.push(info.name);
            }
        }
        Ok(deleted)
    }

    /// Serve one request.
    ///
    /// Transport failures never surface as errors here: they become a cache
    /// hit or `FetchOutcome::Unavailable`. Errors are reserved for a
    /// broken cache store.
    pub async fn fetch(&self, request: &ShellRequest) -> Result<FetchOutcome, Error> {
        match self.routes.route(request) {
            Route::NetworkOnly(reason) => {
                tracing::debug!(url = %request.url, ?reason, "network only");
                match self.network.fetch(request).await {
                    Ok(response) => Ok(FetchOutcome::Passthrough(response)),
                    Err(e) => {
                        tracing::debug!(url = %request.url, error = %e, "network-only request failed");
                        Ok(FetchOutcome::Unavailable)
                    }
                }
            }
            Route::NetworkFirst => self.network_first(request).await,
        }
    }

    async fn network_first(&self, request: &ShellRequest) -> Result<FetchOutcome, Error> {
        match self.network.fetch(request).await {
            Ok(response) => {
                self.write_through(request, &response).await;
                Ok(FetchOutcome::Fresh(response))
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "network failed; trying cache");
                let key = request.url.as_str();
                match self.db.match_entry(key, &self.generation).await? {
                    Some(entry) => Ok(FetchOutcome::Cached(ShellResponse::from_entry(entry)?)),
                    None => Ok(FetchOutcome::Unavailable),
                }
            }
        }
    }

    /// Store a copy of `response` under the request URL. Failures are
    /// logged and swallowed: the cache is a side effect, not the source of
    /// truth.
    async fn write_through(&self, request: &ShellRequest, response: &ShellResponse) {
        if !self.worker.read().await.state.writes_through() {
            return;
        }
        // Partial content cannot be replayed as a full response.
        if response.status == StatusCode::PARTIAL_CONTENT {
            return;
        }

        let mut entry = response.to_entry();
        entry.url = request.url.to_string();
        if let Err(e) = self.db.put_entry(&self.generation, &entry).await {
            tracing::warn!(url = %request.url, error = %e, "write-through failed");
        }
    }

    /// Current lifecycle state plus stored generations.
    pub async fn status(&self) -> Result<LifecycleStatus, Error> {
        let worker = *self.worker.read().await;
        Ok(LifecycleStatus {
            state: worker.state,
            generation: self.generation.clone(),
            skip_waiting: worker.skip_waiting,
            clients_claimed: worker.clients_claimed,
            generations: self.db.list_generations().await?,
        })
    }
}
