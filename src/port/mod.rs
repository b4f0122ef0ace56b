//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the pure detectors and the outside world:
//! the odds store, the alert sink, and the upstream pricing feed.
//!
//! # Available Ports
//!
//! - [`outbound::store::OddsStore`], [`outbound::store::AlertStore`],
//!   [`outbound::store::IngestStore`] - Persistence
//! - [`outbound::feed::OddsFeed`] - Upstream pricing feed

pub mod outbound;
