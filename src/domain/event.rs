//! Sports, events, and bookmakers as tracked by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BookmakerId, BookmakerKey, EventId};

/// Keys that identify betting exchanges rather than sportsbooks.
const EXCHANGE_KEYS: [&str; 2] = ["matchbook", "smarkets"];

/// A sport category from the upstream catalog (e.g. `basketball_nba`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sport {
    pub key: String,
    pub title: String,
    pub active: bool,
}

/// A sporting event (game or match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Identifier assigned by the upstream feed.
    pub external_id: String,
    pub sport_key: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    pub completed: bool,
}

impl Event {
    /// Identity fields carried through every detector output.
    #[must_use]
    pub fn event_ref(&self) -> EventRef {
        EventRef::new(self.id.clone(), &self.home_team, &self.away_team)
    }

    /// `"Away @ Home"` label used in alert titles.
    #[must_use]
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}

/// The identifying fields of an event, carried verbatim into signals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRef {
    pub event_id: EventId,
    pub home_team: String,
    pub away_team: String,
}

impl EventRef {
    pub fn new(
        event_id: EventId,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
    ) -> Self {
        Self {
            event_id,
            home_team: home_team.into(),
            away_team: away_team.into(),
        }
    }
}

/// A sportsbook or exchange in the bookmaker registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmaker {
    pub id: BookmakerId,
    pub key: BookmakerKey,
    pub name: String,
    pub is_exchange: bool,
    pub active: bool,
}

impl Bookmaker {
    /// Create a registry entry, classifying exchanges by key.
    pub fn new(key: BookmakerKey, name: impl Into<String>) -> Self {
        let is_exchange = is_exchange_key(key.as_str());
        Self {
            id: BookmakerId::new(),
            key,
            name: name.into(),
            is_exchange,
            active: true,
        }
    }
}

/// Whether a bookmaker key belongs to a betting exchange.
#[must_use]
pub fn is_exchange_key(key: &str) -> bool {
    key.contains("betfair_ex") || EXCHANGE_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_keys_are_classified() {
        assert!(is_exchange_key("betfair_ex_uk"));
        assert!(is_exchange_key("matchbook"));
        assert!(is_exchange_key("smarkets"));
        assert!(!is_exchange_key("pinnacle"));
        assert!(!is_exchange_key("fanduel"));
    }

    #[test]
    fn new_bookmaker_is_active() {
        let bm = Bookmaker::new(BookmakerKey::from("betfair_ex_eu"), "Betfair");
        assert!(bm.active);
        assert!(bm.is_exchange);
        assert_eq!(bm.name, "Betfair");
    }

    #[test]
    fn matchup_lists_away_first() {
        let event = Event {
            id: EventId::from("e1"),
            external_id: "ext".into(),
            sport_key: "basketball_nba".into(),
            home_team: "Lakers".into(),
            away_team: "Celtics".into(),
            commence_time: Utc::now(),
            completed: false,
        };
        assert_eq!(event.matchup(), "Celtics @ Lakers");
        assert_eq!(event.event_ref().home_team, "Lakers");
    }
}
