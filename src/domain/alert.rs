//! Alerts materialized from detector output.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::arbitrage::ArbOpportunity;
use super::id::{AlertId, BookmakerKey, EventId};
use super::movement::LineMovement;
use super::value::ValueBet;

/// The detector that produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Arbitrage,
    ValueBet,
    LineMovement,
}

impl AlertKind {
    /// Stable tag used in storage and JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Arbitrage => "arbitrage",
            Self::ValueBet => "value_bet",
            Self::LineMovement => "line_movement",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arbitrage" => Ok(Self::Arbitrage),
            "value_bet" => Ok(Self::ValueBet),
            "line_movement" => Ok(Self::LineMovement),
            other => Err(format!("unknown alert kind: {other}")),
        }
    }
}

/// A notification about a detected opportunity.
///
/// Alerts are append-only; only `is_read` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub kind: AlertKind,
    pub event_id: EventId,
    pub title: String,
    /// Serialized detector output. Decimals are carried as strings.
    pub details: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    fn build(
        kind: AlertKind,
        event_id: &EventId,
        title: String,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: AlertId::new(),
            kind,
            event_id: event_id.clone(),
            title,
            details,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Alert for an arbitrage opportunity.
    pub fn arbitrage(arb: &ArbOpportunity) -> serde_json::Result<Self> {
        let title = format!(
            "Arb {}%: {} @ {} ({})",
            arb.profit_pct, arb.event.away_team, arb.event.home_team, arb.market_type
        );
        Ok(Self::build(
            AlertKind::Arbitrage,
            &arb.event.event_id,
            title,
            serde_json::to_value(arb)?,
        ))
    }

    /// Alert for a value bet.
    pub fn value_bet(bet: &ValueBet) -> serde_json::Result<Self> {
        let title = format!(
            "Value {}%: {} @ {} ({})",
            bet.edge_pct, bet.outcome_name, bet.bookmaker_name, bet.market_type
        );
        Ok(Self::build(
            AlertKind::ValueBet,
            &bet.event.event_id,
            title,
            serde_json::to_value(bet)?,
        ))
    }

    /// Alert for a line movement. `bookmaker_name` is the display name.
    pub fn line_movement(movement: &LineMovement, bookmaker_name: &str) -> serde_json::Result<Self> {
        let title = format!(
            "Move {}%: {} @ {} ({})",
            movement.price_change_pct, movement.outcome_name, bookmaker_name, movement.market_type
        );
        Ok(Self::build(
            AlertKind::LineMovement,
            &movement.event.event_id,
            title,
            serde_json::to_value(movement)?,
        ))
    }

    /// The series and end time of a line-movement alert, read back from its
    /// details. `None` for other kinds or details that do not parse.
    #[must_use]
    pub fn movement_mark(&self) -> Option<MovementMark> {
        if self.kind != AlertKind::LineMovement {
            return None;
        }
        serde_json::from_value(self.details.clone()).ok()
    }
}

/// Where an alerted movement sits: its price series and the observation it
/// ends at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovementMark {
    pub bookmaker_key: BookmakerKey,
    pub market_type: String,
    pub outcome_name: String,
    pub new_timestamp: DateTime<Utc>,
}

impl MovementMark {
    /// `(bookmaker, market, outcome)` of the series.
    #[must_use]
    pub fn series(&self) -> (BookmakerKey, String, String) {
        (
            self.bookmaker_key.clone(),
            self.market_type.clone(),
            self.outcome_name.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arbitrage::{find_arbitrage, OddsByOutcome};
    use crate::domain::event::EventRef;
    use crate::domain::movement::{detect_line_movements, LineKey};
    use crate::domain::odds::{OddsSnapshot, PricePoint};
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn kind_round_trips_through_tag() {
        for kind in [AlertKind::Arbitrage, AlertKind::ValueBet, AlertKind::LineMovement] {
            assert_eq!(kind.as_str().parse::<AlertKind>().unwrap(), kind);
        }
        assert!("bogus".parse::<AlertKind>().is_err());
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(AlertKind::ValueBet).unwrap(),
            serde_json::json!("value_bet")
        );
    }

    #[test]
    fn arbitrage_alert_title_and_details() {
        let mut odds = OddsByOutcome::new();
        odds.insert(
            "Lakers".into(),
            vec![OddsSnapshot::new("book1", "Book One", "Lakers", dec!(2.20))],
        );
        odds.insert(
            "Celtics".into(),
            vec![OddsSnapshot::new("book2", "Book Two", "Celtics", dec!(1.95))],
        );
        let event = EventRef::new(EventId::from("evt1"), "Lakers", "Celtics");
        let arb = find_arbitrage(&event, "h2h", &odds, Decimal::ZERO).unwrap();

        let alert = Alert::arbitrage(&arb).unwrap();

        assert_eq!(alert.kind, AlertKind::Arbitrage);
        assert_eq!(alert.title, "Arb 3.2634%: Celtics @ Lakers (h2h)");
        assert_eq!(alert.event_id.as_str(), "evt1");
        assert!(!alert.is_read);
        assert_eq!(alert.details["profit_pct"], "3.2634");
        assert_eq!(alert.details["market_type"], "h2h");
        assert_eq!(alert.details["outcomes"].as_array().unwrap().len(), 2);
        assert!(alert.movement_mark().is_none());
    }

    #[test]
    fn movement_alert_reads_back_its_series() {
        let key = LineKey {
            event: EventRef::new(EventId::from("evt1"), "Lakers", "Celtics"),
            bookmaker_key: BookmakerKey::from("fanduel"),
            market_type: "h2h".into(),
            outcome_name: "Lakers".into(),
        };
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let t1 = t0 + Duration::minutes(10);
        let history = [
            PricePoint::new(dec!(2.00), None, t0),
            PricePoint::new(dec!(2.20), None, t1),
        ];
        let movement = detect_line_movements(&key, &history, dec!(2)).remove(0);

        let mark = Alert::line_movement(&movement, "FanDuel")
            .unwrap()
            .movement_mark()
            .unwrap();

        assert_eq!(
            mark.series(),
            (BookmakerKey::from("fanduel"), "h2h".to_string(), "Lakers".to_string())
        );
        assert_eq!(mark.new_timestamp, t1);
    }
}
