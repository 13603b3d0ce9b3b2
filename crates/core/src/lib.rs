//! Core types and shared functionality for kakei-shell.
//!
//! This crate provides:
//! - Incremental table search (script normalization, fuzzy scoring, row
//!   projection, filtering and aggregation)
//! - Cache generation store with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod search;

pub use cache::{CacheDb, CachedEntry, GenerationInfo};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use search::{FilterEngine, FilterOutcome, SummaryLocale, TableKind};
