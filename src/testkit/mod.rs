//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for events, bookmakers, odds, and feed payloads.
//! - [`feed`] - `ScriptedFeed`, a canned [`OddsFeed`](crate::port::outbound::feed::OddsFeed).
//! - [`store`] - `InMemoryStore`, implementing every store port.

pub mod domain;
pub mod feed;
pub mod store;
