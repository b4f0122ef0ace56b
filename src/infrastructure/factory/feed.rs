//! Feed factory for the upstream odds client.

use std::sync::Arc;

use crate::adapter::outbound::odds_api::OddsApiClient;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::feed::OddsFeed;

/// Build the odds feed. A missing API key surfaces on the first request.
#[must_use]
pub fn build_feed(config: &Config) -> Arc<dyn OddsFeed> {
    Arc::new(OddsApiClient::from_config(&config.feed, config.api_key.clone()))
}
