//! Storage-agnostic domain types and the pure odds detectors.
//!
//! Everything here is synchronous and free of I/O. The detectors take
//! in-memory snapshots and return owned results, so they are safe to call
//! concurrently over disjoint inputs.

mod alert;
mod event;
mod id;
mod money;
mod odds;

pub mod arbitrage;
pub mod movement;
pub mod value;

// Core domain types
pub use alert::{Alert, AlertKind, MovementMark};
pub use event::{is_exchange_key, Bookmaker, Event, EventRef, Sport};
pub use id::{AlertId, BookmakerId, BookmakerKey, EventId};
pub use money::{implied_probability, round_to, Price, Probability};
pub use odds::{EventQuotes, OddsBatch, OddsRecord, OddsSnapshot, PricePoint, Quote};

// Detectors
pub use arbitrage::{find_arbitrage, scan_for_arbitrage, ArbMarket, ArbOpportunity, ArbOutcome};
pub use movement::{calculate_clv, detect_line_movements, LineKey, LineMovement};
pub use value::{find_value_bets, remove_overround, SharpBooks, ValueBet};
