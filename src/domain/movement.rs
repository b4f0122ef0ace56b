//! Line movement tracking and closing line value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::event::EventRef;
use super::id::BookmakerKey;
use super::money::{implied_probability, round_to, Price, HUNDRED, PCT_DP};
use super::odds::PricePoint;

/// Default minimum absolute price change for a reported movement.
pub const DEFAULT_MIN_MOVEMENT_PCT: Decimal = Decimal::TWO;

/// Identifies one price series: a single outcome at a single bookmaker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub event: EventRef,
    pub bookmaker_key: BookmakerKey,
    pub market_type: String,
    pub outcome_name: String,
}

/// A significant change between two consecutive observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMovement {
    #[serde(flatten)]
    pub event: EventRef,
    pub bookmaker_key: BookmakerKey,
    pub market_type: String,
    pub outcome_name: String,
    pub old_price: Price,
    pub new_price: Price,
    pub price_change: Decimal,
    pub price_change_pct: Decimal,
    pub old_point: Option<Decimal>,
    pub new_point: Option<Decimal>,
    pub point_change: Option<Decimal>,
    pub old_timestamp: DateTime<Utc>,
    pub new_timestamp: DateTime<Utc>,
}

/// Detect movements between consecutive observations of one series.
///
/// History is sorted by timestamp first; observations sharing a timestamp
/// keep their input order. Each consecutive pair is judged on its own, so
/// a move up followed by a move down yields two movements.
#[must_use]
pub fn detect_line_movements(
    key: &LineKey,
    history: &[PricePoint],
    min_price_change_pct: Decimal,
) -> Vec<LineMovement> {
    if history.len() < 2 {
        return Vec::new();
    }

    let mut sorted: Vec<&PricePoint> = history.iter().collect();
    sorted.sort_by_key(|p| p.observed_at);

    sorted
        .windows(2)
        .filter_map(|pair| {
            let (old, new) = (pair[0], pair[1]);
            let change = new.price - old.price;
            // A zero base price has no measurable percentage change.
            let pct = change.checked_div(old.price)? * HUNDRED;
            if pct.abs() < min_price_change_pct {
                return None;
            }

            let point_change = match (old.point, new.point) {
                (Some(o), Some(n)) => Some(n - o),
                _ => None,
            };

            Some(LineMovement {
                event: key.event.clone(),
                bookmaker_key: key.bookmaker_key.clone(),
                market_type: key.market_type.clone(),
                outcome_name: key.outcome_name.clone(),
                old_price: old.price,
                new_price: new.price,
                price_change: round_to(change, PCT_DP),
                price_change_pct: round_to(pct, PCT_DP),
                old_point: old.point,
                new_point: new.point,
                point_change,
                old_timestamp: old.observed_at,
                new_timestamp: new.observed_at,
            })
        })
        .collect()
}

/// Closing line value of a bet, as a percentage.
///
/// Positive when the bet was struck at longer odds than the closing line.
/// A zero bet or closing price yields zero.
#[must_use]
pub fn calculate_clv(bet_price: Price, closing_price: Price) -> Decimal {
    let (Some(bet_implied), Some(close_implied)) = (
        implied_probability(bet_price),
        implied_probability(closing_price),
    ) else {
        return Decimal::ZERO;
    };

    (close_implied - bet_implied)
        .checked_div(bet_implied)
        .map_or(Decimal::ZERO, |ratio| round_to(ratio * HUNDRED, PCT_DP))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::EventId;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn key() -> LineKey {
        LineKey {
            event: EventRef::new(EventId::from("evt1"), "Home", "Away"),
            bookmaker_key: BookmakerKey::from("fanduel"),
            market_type: "h2h".into(),
            outcome_name: "Home".into(),
        }
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn point(price: Decimal, minutes: i64) -> PricePoint {
        PricePoint::new(price, None, at(minutes))
    }

    #[test]
    fn reports_move_past_threshold() {
        let history = [point(dec!(2.00), 0), point(dec!(2.20), 30)];

        let moves = detect_line_movements(&key(), &history, dec!(5));

        assert_eq!(moves.len(), 1);
        let m = &moves[0];
        assert_eq!(m.old_price, dec!(2.00));
        assert_eq!(m.new_price, dec!(2.20));
        assert_eq!(m.price_change, dec!(0.2000));
        assert_eq!(m.price_change_pct, dec!(10.0000));
        assert_eq!(m.old_timestamp, at(0));
        assert_eq!(m.new_timestamp, at(30));
        assert!(m.point_change.is_none());
    }

    #[test]
    fn small_move_is_ignored() {
        let history = [point(dec!(2.00), 0), point(dec!(2.01), 30)];
        assert!(detect_line_movements(&key(), &history, dec!(2)).is_empty());
    }

    #[test]
    fn consecutive_moves_are_not_merged() {
        let history = [
            point(dec!(2.00), 0),
            point(dec!(2.30), 30),
            point(dec!(1.90), 60),
        ];

        let moves = detect_line_movements(&key(), &history, dec!(5));

        assert_eq!(moves.len(), 2);
        assert!(moves[0].price_change_pct > Decimal::ZERO);
        assert!(moves[1].price_change_pct < Decimal::ZERO);
    }

    #[test]
    fn unordered_history_is_sorted_first() {
        let history = [point(dec!(2.20), 30), point(dec!(2.00), 0)];

        let moves = detect_line_movements(&key(), &history, dec!(5));

        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].old_price, dec!(2.00));
        assert_eq!(moves[0].price_change_pct, dec!(10));
    }

    #[test]
    fn spread_move_reports_point_change() {
        let history = [
            PricePoint::new(dec!(1.91), Some(dec!(-3.5)), at(0)),
            PricePoint::new(dec!(1.87), Some(dec!(-4.5)), at(60)),
        ];

        let moves = detect_line_movements(&key(), &history, dec!(1));

        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].point_change, Some(dec!(-1.0)));
        assert_eq!(moves[0].price_change, dec!(-0.04));
    }

    #[test]
    fn zero_base_price_is_skipped() {
        let history = [
            point(Decimal::ZERO, 0),
            point(dec!(2.00), 30),
            point(dec!(2.50), 60),
        ];
        let moves = detect_line_movements(&key(), &history, dec!(5));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].old_price, dec!(2.00));
    }

    #[test]
    fn short_history_has_no_movements() {
        assert!(detect_line_movements(&key(), &[], dec!(2)).is_empty());
        assert!(detect_line_movements(&key(), &[point(dec!(2.0), 0)], dec!(2)).is_empty());
    }

    #[test]
    fn detection_is_repeatable() {
        let history = [point(dec!(2.00), 0), point(dec!(2.30), 30)];
        assert_eq!(
            detect_line_movements(&key(), &history, dec!(2)),
            detect_line_movements(&key(), &history, dec!(2)),
        );
    }

    #[test]
    fn clv_sign_convention() {
        assert!(calculate_clv(dec!(2.10), dec!(1.90)) > Decimal::ZERO);
        assert!(calculate_clv(dec!(1.80), dec!(2.10)) < Decimal::ZERO);
        assert_eq!(calculate_clv(dec!(2.00), dec!(2.00)), Decimal::ZERO);
    }

    #[test]
    fn clv_guards_zero_prices() {
        assert_eq!(calculate_clv(dec!(2.00), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(calculate_clv(Decimal::ZERO, dec!(2.00)), Decimal::ZERO);
    }

    #[test]
    fn clv_value_is_rounded() {
        // (1/1.90 - 1/2.10) / (1/2.10) = 2.10/1.90 - 1
        assert_eq!(calculate_clv(dec!(2.10), dec!(1.90)), dec!(10.5263));
    }
}
