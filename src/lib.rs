//! Production-credits catalog library.
//!
//! Exposes the catalog store, loader and reporting modules for the two
//! binaries and for integration tests.

pub mod charts;
pub mod config;
pub mod credits_store;
pub mod loader;
pub mod network_graph;
pub mod related;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use credits_store::{CreditsStore, SqliteCreditsStore};
pub use related::{NoRelated, RelatedLookup};
pub use server::run_server;
