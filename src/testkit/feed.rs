//! Scripted odds feed.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Sport;
use crate::error::{Error, Result};
use crate::port::outbound::feed::{FeedEvent, OddsFeed};

/// An [`OddsFeed`] that replays canned responses and records calls.
#[derive(Debug, Default)]
pub struct ScriptedFeed {
    sports: Vec<Sport>,
    odds: HashMap<String, Vec<FeedEvent>>,
    failing: HashSet<String>,
    fail_sports: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sports(mut self, sports: Vec<Sport>) -> Self {
        self.sports = sports;
        self
    }

    #[must_use]
    pub fn with_odds(mut self, sport_key: &str, events: Vec<FeedEvent>) -> Self {
        self.odds.insert(sport_key.to_string(), events);
        self
    }

    /// Requests for this sport fail with a connection error.
    #[must_use]
    pub fn failing_sport(mut self, sport_key: &str) -> Self {
        self.failing.insert(sport_key.to_string());
        self
    }

    /// The sports catalog request fails.
    #[must_use]
    pub fn failing_catalog(mut self) -> Self {
        self.fail_sports = true;
        self
    }

    /// Endpoints requested so far, e.g. `sports` or `odds:basketball_nba`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl OddsFeed for ScriptedFeed {
    async fn sports(&self) -> Result<Vec<Sport>> {
        self.calls.lock().push("sports".to_string());
        if self.fail_sports {
            return Err(Error::Connection("scripted catalog failure".to_string()));
        }
        Ok(self.sports.clone())
    }

    async fn odds(&self, sport_key: &str) -> Result<Vec<FeedEvent>> {
        self.calls.lock().push(format!("odds:{sport_key}"));
        if self.failing.contains(sport_key) {
            return Err(Error::Connection(format!("scripted failure for {sport_key}")));
        }
        Ok(self.odds.get(sport_key).cloned().unwrap_or_default())
    }

    fn feed_name(&self) -> &'static str {
        "scripted"
    }
}
