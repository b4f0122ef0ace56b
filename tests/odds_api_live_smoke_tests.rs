//! Live smoke test against The Odds API.
//!
//! Gated behind the `integration-tests` feature and ignored by default:
//!
//! ```bash
//! ODDS_API_KEY=... cargo test --features integration-tests -- --ignored
//! ```

#![cfg(feature = "integration-tests")]

use std::env;
use std::time::Duration;

use sharpline::adapter::outbound::odds_api::{OddsApiClient, OddsApiConfig};
use sharpline::port::outbound::feed::OddsFeed;
use tokio::time::timeout;

fn api_key() -> Option<String> {
    env::var("ODDS_API_KEY").ok().filter(|k| !k.is_empty())
}

#[tokio::test]
#[ignore = "requires ODDS_API_KEY and network access"]
async fn smoke_odds_api_sports_catalog() {
    let Some(key) = api_key() else {
        eprintln!("Skipping smoke test (set ODDS_API_KEY to enable)");
        return;
    };

    let client = OddsApiClient::from_config(&OddsApiConfig::default(), Some(key));

    let sports = timeout(Duration::from_secs(20), client.sports())
        .await
        .expect("Timed out querying sports catalog")
        .expect("Failed to fetch sports");

    assert!(!sports.is_empty(), "Expected at least one sport");
}
