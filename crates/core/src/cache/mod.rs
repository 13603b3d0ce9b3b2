//! SQLite-backed store for offline cache generations.
//!
//! A generation is a named set of request/response pairs keyed by absolute
//! URL. The store itself has no notion of which generation is current; that
//! is decided by the lifecycle manager in `kakei-client`. It supports:
//!
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Upsert-per-URL writes and whole-generation deletion

pub mod connection;
pub mod entries;
pub mod generations;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::CachedEntry;
pub use generations::GenerationInfo;
