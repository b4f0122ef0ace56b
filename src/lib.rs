//! Sharpline - sportsbook odds analysis.
//!
//! Collects decimal odds from many bookmakers and flags three kinds of
//! opportunity: cross-book arbitrage, value bets against a de-vigged sharp
//! reference, and significant line movements.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] - Pure detectors and the types they exchange. No I/O.
//! - [`port`] - Traits for the odds feed and the store.
//! - [`application`] - Use cases: ingestion, alert generation, scheduling.
//! - [`adapter`] - The Odds API client, SQLite store, and the CLI.
//! - [`infrastructure`] - Configuration, logging, and runtime wiring.
//! - [`error`] - Error types for the crate.
//!
//! # Features
//!
//! - `testkit` - Expose in-memory store, scripted feed, and fixtures for
//!   integration tests.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use rust_decimal_macros::dec;
//! use sharpline::domain::{find_arbitrage, EventId, EventRef, OddsSnapshot};
//!
//! let event = EventRef::new(EventId::from("evt"), "Lakers", "Celtics");
//! let mut odds = BTreeMap::new();
//! odds.insert("Lakers".to_string(), vec![OddsSnapshot::new("a", "A", "Lakers", dec!(2.20))]);
//! odds.insert("Celtics".to_string(), vec![OddsSnapshot::new("b", "B", "Celtics", dec!(1.95))]);
//!
//! let arb = find_arbitrage(&event, "h2h", &odds, dec!(0)).unwrap();
//! assert_eq!(arb.profit_pct, dec!(3.2634));
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
