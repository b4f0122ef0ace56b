//! Arbitrage detection across bookmakers for one event market.
//!
//! Taking the best available price on every outcome of a complete market
//! guarantees a profit when the implied probabilities of those prices sum
//! to less than one. Stakes split in proportion to implied probability
//! return the same amount whichever outcome wins.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::event::EventRef;
use super::id::BookmakerKey;
use super::money::{implied_probability, round_to, Price, HUNDRED, PCT_DP, PROB_DP, STAKE_DP};
use super::odds::OddsSnapshot;

/// Default minimum profit: report any detectable arbitrage.
pub const DEFAULT_MIN_PROFIT_PCT: Decimal = Decimal::ZERO;

/// Snapshots grouped by outcome name for a single event market.
pub type OddsByOutcome = BTreeMap<String, Vec<OddsSnapshot>>;

/// An outcome with the best price available across bookmakers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArbOutcome {
    pub outcome_name: String,
    pub best_price: Price,
    pub bookmaker_key: BookmakerKey,
    pub bookmaker_name: String,
}

/// A detected arbitrage opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArbOpportunity {
    #[serde(flatten)]
    pub event: EventRef,
    pub market_type: String,
    pub outcomes: Vec<ArbOutcome>,
    /// `(1 - total_implied_prob) * 100`, 4 dp.
    pub profit_pct: Decimal,
    /// Sum of implied probabilities of the best prices, 6 dp.
    pub total_implied_prob: Decimal,
}

impl ArbOpportunity {
    /// Split `total_stake` across outcomes for an equal return on every result.
    ///
    /// Each outcome receives `implied / total_implied * total_stake`, rounded
    /// to 2 dp. Rounding means the parts can miss the total by a few cents.
    #[must_use]
    pub fn stake_allocation(&self, total_stake: Decimal) -> BTreeMap<String, Decimal> {
        let implied: Vec<(&str, Decimal)> = self
            .outcomes
            .iter()
            .filter_map(|o| implied_probability(o.best_price).map(|p| (o.outcome_name.as_str(), p)))
            .collect();
        let total: Decimal = implied.iter().map(|(_, p)| *p).sum();

        implied
            .into_iter()
            .map(|(name, p)| {
                let stake = p
                    .checked_div(total)
                    .map_or(Decimal::ZERO, |share| share * total_stake);
                (name.to_string(), round_to(stake, STAKE_DP))
            })
            .collect()
    }
}

/// One event market to check, as consumed by [`scan_for_arbitrage`].
#[derive(Debug, Clone)]
pub struct ArbMarket {
    pub event: EventRef,
    pub market_type: String,
    pub odds_by_outcome: OddsByOutcome,
}

/// Pick the snapshot with the highest price. Ties keep the first seen.
fn best_snapshot(snapshots: &[OddsSnapshot]) -> Option<&OddsSnapshot> {
    snapshots.iter().fold(None, |best, snap| match best {
        Some(current) if current.price >= snap.price => Some(current),
        _ => Some(snap),
    })
}

/// Check whether arbitrage exists for a single event market.
///
/// Returns `None` when the market has fewer than two outcomes, when any
/// outcome has no snapshots, when the best prices sum to an implied
/// probability of one or more, or when the profit is below
/// `min_profit_pct`.
#[must_use]
pub fn find_arbitrage(
    event: &EventRef,
    market_type: &str,
    odds_by_outcome: &OddsByOutcome,
    min_profit_pct: Decimal,
) -> Option<ArbOpportunity> {
    if odds_by_outcome.len() < 2 {
        return None;
    }

    let mut outcomes = Vec::with_capacity(odds_by_outcome.len());
    let mut total_implied = Decimal::ZERO;

    for (outcome_name, snapshots) in odds_by_outcome {
        let best = best_snapshot(snapshots)?;
        if best.price <= Decimal::ZERO {
            return None;
        }
        total_implied += implied_probability(best.price)?;
        outcomes.push(ArbOutcome {
            outcome_name: outcome_name.clone(),
            best_price: best.price,
            bookmaker_key: best.bookmaker_key.clone(),
            bookmaker_name: best.bookmaker_name.clone(),
        });
    }

    if total_implied >= Decimal::ONE {
        return None;
    }

    let profit_pct = (Decimal::ONE - total_implied) * HUNDRED;
    if profit_pct < min_profit_pct {
        return None;
    }

    Some(ArbOpportunity {
        event: event.clone(),
        market_type: market_type.to_string(),
        outcomes,
        profit_pct: round_to(profit_pct, PCT_DP),
        total_implied_prob: round_to(total_implied, PROB_DP),
    })
}

/// Run [`find_arbitrage`] over each market independently.
#[must_use]
pub fn scan_for_arbitrage(markets: &[ArbMarket], min_profit_pct: Decimal) -> Vec<ArbOpportunity> {
    let opportunities: Vec<ArbOpportunity> = markets
        .iter()
        .filter_map(|m| find_arbitrage(&m.event, &m.market_type, &m.odds_by_outcome, min_profit_pct))
        .collect();

    info!(
        scanned = markets.len(),
        found = opportunities.len(),
        "Scanned event-markets for arbitrage"
    );
    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::EventId;
    use rust_decimal_macros::dec;

    fn event() -> EventRef {
        EventRef::new(EventId::from("evt1"), "Team A", "Team B")
    }

    fn snap(book: &str, outcome: &str, price: Decimal) -> OddsSnapshot {
        OddsSnapshot::new(book, book.to_uppercase(), outcome, price)
    }

    fn two_way(a: &[(&str, Decimal)], b: &[(&str, Decimal)]) -> OddsByOutcome {
        let mut odds = OddsByOutcome::new();
        odds.insert(
            "Team A".into(),
            a.iter().map(|(bk, p)| snap(bk, "Team A", *p)).collect(),
        );
        odds.insert(
            "Team B".into(),
            b.iter().map(|(bk, p)| snap(bk, "Team B", *p)).collect(),
        );
        odds
    }

    #[test]
    fn detects_two_way_arb_with_best_prices() {
        let odds = two_way(
            &[("book1", dec!(2.20)), ("book2", dec!(2.10))],
            &[("book1", dec!(1.80)), ("book2", dec!(1.95))],
        );

        let arb = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).unwrap();

        assert_eq!(arb.outcomes.len(), 2);
        assert_eq!(arb.outcomes[0].best_price, dec!(2.20));
        assert_eq!(arb.outcomes[0].bookmaker_key.as_str(), "book1");
        assert_eq!(arb.outcomes[1].best_price, dec!(1.95));
        assert_eq!(arb.outcomes[1].bookmaker_key.as_str(), "book2");
        assert_eq!(arb.total_implied_prob, dec!(0.967366));
        assert_eq!(arb.profit_pct, dec!(3.2634));
    }

    #[test]
    fn threshold_filters_smaller_arbs() {
        let odds = two_way(&[("book1", dec!(2.20))], &[("book2", dec!(1.95))]);

        let any = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO);
        let at_three = find_arbitrage(&event(), "h2h", &odds, dec!(3));
        let at_ten = find_arbitrage(&event(), "h2h", &odds, dec!(10));

        assert!(any.is_some());
        assert_eq!(any, at_three);
        assert!(at_ten.is_none());
    }

    #[test]
    fn no_arb_under_overround() {
        let odds = two_way(&[("book1", dec!(1.80))], &[("book1", dec!(2.00))]);
        assert!(find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).is_none());
    }

    #[test]
    fn no_arb_when_implied_sum_is_exactly_one() {
        let odds = two_way(&[("book1", dec!(2.00))], &[("book2", dec!(2.00))]);
        assert!(find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).is_none());
    }

    #[test]
    fn three_way_market() {
        let mut odds = OddsByOutcome::new();
        odds.insert(
            "Home".into(),
            vec![snap("b1", "Home", dec!(3.60)), snap("b2", "Home", dec!(3.80))],
        );
        odds.insert(
            "Draw".into(),
            vec![snap("b1", "Draw", dec!(4.00)), snap("b2", "Draw", dec!(4.20))],
        );
        odds.insert(
            "Away".into(),
            vec![snap("b1", "Away", dec!(2.10)), snap("b2", "Away", dec!(2.25))],
        );

        let arb = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).unwrap();
        assert_eq!(arb.outcomes.len(), 3);
        assert!(arb.outcomes.iter().all(|o| o.bookmaker_key.as_str() == "b2"));
        assert_eq!(arb.profit_pct, dec!(5.4303));
    }

    #[test]
    fn single_outcome_cannot_arbitrage() {
        let mut odds = OddsByOutcome::new();
        odds.insert("Team A".into(), vec![snap("b1", "Team A", dec!(5.0))]);
        assert!(find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).is_none());
    }

    #[test]
    fn empty_snapshot_list_yields_none() {
        let mut odds = two_way(&[("b1", dec!(3.0))], &[]);
        assert!(find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).is_none());

        odds.insert("Team B".into(), vec![snap("b1", "Team B", dec!(3.0))]);
        assert!(find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).is_some());
    }

    #[test]
    fn zero_price_yields_none() {
        let odds = two_way(&[("b1", Decimal::ZERO)], &[("b2", dec!(3.0))]);
        assert!(find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).is_none());
    }

    #[test]
    fn ties_credit_first_bookmaker() {
        let odds = two_way(
            &[("first", dec!(2.20)), ("second", dec!(2.20))],
            &[("b", dec!(1.95))],
        );
        let arb = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).unwrap();
        assert_eq!(arb.outcomes[0].bookmaker_key.as_str(), "first");
    }

    #[test]
    fn raising_a_best_price_never_lowers_profit() {
        let mut previous = Decimal::ZERO;
        for price in [dec!(2.10), dec!(2.20), dec!(2.35), dec!(2.50), dec!(3.00)] {
            let odds = two_way(&[("b1", price)], &[("b2", dec!(1.95))]);
            let profit = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO)
                .map_or(Decimal::ZERO, |a| a.profit_pct);
            assert!(profit >= previous, "profit dropped at price {price}");
            previous = profit;
        }
        assert!(previous > Decimal::ZERO);
    }

    #[test]
    fn stake_allocation_sums_to_total() {
        let odds = two_way(&[("book1", dec!(2.20))], &[("book2", dec!(1.95))]);
        let arb = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).unwrap();

        for total in [dec!(100), dec!(1000), dec!(1234.56)] {
            let stakes = arb.stake_allocation(total);
            let sum: Decimal = stakes.values().copied().sum();
            assert!((sum - total).abs() <= dec!(0.1), "sum {sum} vs {total}");
        }

        let stakes = arb.stake_allocation(dec!(1000));
        assert_eq!(stakes["Team A"], dec!(469.88));
        assert_eq!(stakes["Team B"], dec!(530.12));
    }

    #[test]
    fn stake_allocation_equalizes_returns() {
        let odds = two_way(&[("book1", dec!(2.20))], &[("book2", dec!(1.95))]);
        let arb = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).unwrap();
        let stakes = arb.stake_allocation(dec!(1000));

        let ret_a = stakes["Team A"] * dec!(2.20);
        let ret_b = stakes["Team B"] * dec!(1.95);
        assert!((ret_a - ret_b).abs() < dec!(0.05));
    }

    #[test]
    fn scan_keeps_only_qualifying_markets() {
        let markets = vec![
            ArbMarket {
                event: EventRef::new(EventId::from("evt1"), "A", "B"),
                market_type: "h2h".into(),
                odds_by_outcome: two_way(&[("b1", dec!(2.20))], &[("b2", dec!(1.95))]),
            },
            ArbMarket {
                event: EventRef::new(EventId::from("evt2"), "C", "D"),
                market_type: "h2h".into(),
                odds_by_outcome: two_way(&[("b1", dec!(1.50))], &[("b1", dec!(2.40))]),
            },
        ];

        let found = scan_for_arbitrage(&markets, Decimal::ZERO);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].event.event_id.as_str(), "evt1");
    }

    #[test]
    fn detection_is_repeatable() {
        let odds = two_way(
            &[("book1", dec!(2.20)), ("book2", dec!(2.10))],
            &[("book1", dec!(1.80)), ("book2", dec!(1.95))],
        );
        let first = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO);
        let second = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO);
        assert_eq!(first, second);
    }

    #[test]
    fn serializes_decimals_as_strings() {
        let odds = two_way(&[("book1", dec!(2.20))], &[("book2", dec!(1.95))]);
        let arb = find_arbitrage(&event(), "h2h", &odds, Decimal::ZERO).unwrap();
        let value = serde_json::to_value(&arb).unwrap();

        assert_eq!(value["profit_pct"], "3.2634");
        assert_eq!(value["event_id"], "evt1");
        assert_eq!(value["outcomes"][0]["best_price"], "2.20");
    }
}
