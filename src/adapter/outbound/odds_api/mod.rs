//! The Odds API (v4) feed adapter.
//!
//! Fetches the sports catalog and per-sport odds in decimal format, and
//! tracks the request quota reported in response headers.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::{OddsApiClient, QuotaUsage};
pub use settings::{OddsApiConfig, OddsApiHttpConfig, DECIMAL_ODDS_FORMAT};
