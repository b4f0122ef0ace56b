//! SQLite persistence adapters.
//!
//! Provides the diesel-backed store for events, odds observations, and
//! alerts, together with its connection pool and embedded migrations.

pub mod database;
pub mod store;

pub use store::SqliteStore;
