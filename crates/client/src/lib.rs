//! Offline resilience layer for kakei-shell.
//!
//! This crate provides the network boundary and the cache lifecycle
//! (install, activate, network-first fetch) that keeps the expense UI usable
//! without connectivity.

pub mod fetch;
pub mod lifecycle;

pub use fetch::{HttpNetwork, Method, Network, NetworkConfig, NetworkError, ShellRequest, ShellResponse, StatusCode};
pub use lifecycle::{
    ActivateReport, BypassReason, CacheLifecycleManager, FetchOutcome, InstallReport, LifecycleStatus, Route,
    RoutePolicy, WorkerState,
};
