//! Worker lifecycle states.

use kakei_core::GenerationInfo;
use serde::{Deserialize, Serialize};

/// Where a worker is in its install/activate lifecycle.
///
/// `New -> Installing -> Installed -> Activating -> Ready`. A failed install
/// ends in `Failed`, from which install may be retried; a failed activate
/// returns to `Installed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    New,
    Installing,
    Installed,
    Activating,
    Ready,
    Failed,
}

impl WorkerState {
    pub fn can_install(self) -> bool {
        matches!(self, WorkerState::New | WorkerState::Failed)
    }

    pub fn can_activate(self) -> bool {
        self == WorkerState::Installed
    }

    /// Whether fetch responses are written through to this worker's generation.
    pub fn writes_through(self) -> bool {
        matches!(self, WorkerState::Installed | WorkerState::Activating | WorkerState::Ready)
    }
}

/// Mutable per-worker state, owned by the lifecycle manager.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Worker {
    pub state: WorkerState,
    /// Set after install: do not wait for old clients to close.
    pub skip_waiting: bool,
    /// Set after activate: open clients are governed without a reload.
    pub clients_claimed: bool,
}

impl Default for Worker {
    fn default() -> Self {
        Self { state: WorkerState::New, skip_waiting: false, clients_claimed: false }
    }
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReport {
    pub generation: String,
    /// Absolute URLs stored during install, in manifest order.
    pub cached: Vec<String>,
    /// The generation already existed with a different manifest.
    pub manifest_changed_without_bump: bool,
}

/// Result of a successful activate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateReport {
    pub generation: String,
    /// Stale generations deleted, oldest first.
    pub deleted: Vec<String>,
}

/// Snapshot of the manager for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleStatus {
    pub state: WorkerState,
    pub generation: String,
    pub skip_waiting: bool,
    pub clients_claimed: bool,
    pub generations: Vec<GenerationInfo>,
}
