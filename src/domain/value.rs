//! Value bet detection against a sharp reference line.
//!
//! A sharp bookmaker's prices, with the overround removed, stand in for
//! the true probability of each outcome. Any other bookmaker paying more
//! than the resulting fair odds is offering value.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::event::EventRef;
use super::id::BookmakerKey;
use super::money::{
    implied_probability, round_to, Price, Probability, HUNDRED, PCT_DP, PROB_DP,
};

/// Default minimum edge for a value bet.
pub const DEFAULT_MIN_EDGE_PCT: Decimal = Decimal::ONE;

/// Sharp bookmakers in reference priority order.
pub const DEFAULT_SHARP_BOOKS: [&str; 4] =
    ["pinnacle", "betfair_ex_uk", "betfair_ex_eu", "betfair_ex_au"];

/// Prices for one market: bookmaker key → outcome name → price.
pub type OddsByBookmaker = BTreeMap<BookmakerKey, BTreeMap<String, Price>>;

/// Ordered set of sharp bookmakers.
///
/// Order matters: the first book present in a market becomes the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharpBooks(Vec<BookmakerKey>);

impl SharpBooks {
    /// Build from keys in priority order. Repeated keys are dropped.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<BookmakerKey>,
    {
        let mut ordered: Vec<BookmakerKey> = Vec::new();
        for key in keys {
            let key = key.into();
            if !ordered.contains(&key) {
                ordered.push(key);
            }
        }
        Self(ordered)
    }

    #[must_use]
    pub fn contains(&self, key: &BookmakerKey) -> bool {
        self.0.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookmakerKey> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SharpBooks {
    fn default() -> Self {
        Self::new(DEFAULT_SHARP_BOOKS)
    }
}

/// A price beating the sharp-derived fair odds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueBet {
    #[serde(flatten)]
    pub event: EventRef,
    pub market_type: String,
    pub outcome_name: String,
    pub bookmaker_key: BookmakerKey,
    pub bookmaker_name: String,
    pub odds: Price,
    pub sharp_odds: Price,
    pub sharp_bookmaker: BookmakerKey,
    /// De-vigged probability, 6 dp.
    pub true_probability: Probability,
    /// 4 dp.
    pub edge_pct: Decimal,
    /// Expected profit per unit stake, 6 dp.
    pub expected_value: Decimal,
}

/// Normalize implied probabilities so they sum to one.
///
/// Returns an empty map when the prices cannot form a distribution
/// (no prices, a zero price, or a non-positive overround).
#[must_use]
pub fn remove_overround(prices: &BTreeMap<String, Price>) -> BTreeMap<String, Probability> {
    let mut implied = BTreeMap::new();
    for (outcome, price) in prices {
        match implied_probability(*price) {
            Some(p) => {
                implied.insert(outcome.clone(), p);
            }
            None => return BTreeMap::new(),
        }
    }

    let overround: Decimal = implied.values().copied().sum();
    if overround <= Decimal::ZERO {
        return BTreeMap::new();
    }

    implied
        .into_iter()
        .filter_map(|(outcome, p)| p.checked_div(overround).map(|t| (outcome, t)))
        .collect()
}

/// First sharp book, in priority order, with a non-empty price map.
fn reference_book<'a>(
    odds_by_bookmaker: &'a OddsByBookmaker,
    sharp_books: &SharpBooks,
) -> Option<(&'a BookmakerKey, &'a BTreeMap<String, Price>)> {
    sharp_books.iter().find_map(|key| {
        odds_by_bookmaker
            .get_key_value(key)
            .filter(|(_, prices)| !prices.is_empty())
    })
}

/// Find value bets in one event market.
///
/// Every non-sharp bookmaker is checked on every outcome the reference
/// also prices. All qualifying pairs are returned.
#[must_use]
pub fn find_value_bets(
    event: &EventRef,
    market_type: &str,
    odds_by_bookmaker: &OddsByBookmaker,
    bookmaker_names: &HashMap<BookmakerKey, String>,
    sharp_books: &SharpBooks,
    min_edge_pct: Decimal,
) -> Vec<ValueBet> {
    let Some((sharp_key, sharp_prices)) = reference_book(odds_by_bookmaker, sharp_books) else {
        return Vec::new();
    };

    let true_probs = remove_overround(sharp_prices);
    if true_probs.is_empty() {
        return Vec::new();
    }

    let mut value_bets = Vec::new();

    for (bm_key, outcomes) in odds_by_bookmaker {
        if sharp_books.contains(bm_key) {
            continue;
        }

        for (outcome_name, &price) in outcomes {
            let Some(&true_prob) = true_probs.get(outcome_name) else {
                continue;
            };
            let Some(fair_odds) = implied_probability(true_prob) else {
                continue;
            };
            if price <= fair_odds {
                continue;
            }
            let Some(implied) = implied_probability(price) else {
                continue;
            };
            let Some(edge_ratio) = (true_prob - implied).checked_div(implied) else {
                continue;
            };

            let edge_pct = edge_ratio * HUNDRED;
            if edge_pct < min_edge_pct {
                continue;
            }
            let ev = true_prob * (price - Decimal::ONE) - (Decimal::ONE - true_prob);

            value_bets.push(ValueBet {
                event: event.clone(),
                market_type: market_type.to_string(),
                outcome_name: outcome_name.clone(),
                bookmaker_key: bm_key.clone(),
                bookmaker_name: bookmaker_names
                    .get(bm_key)
                    .cloned()
                    .unwrap_or_else(|| bm_key.to_string()),
                odds: price,
                sharp_odds: sharp_prices.get(outcome_name).copied().unwrap_or_default(),
                sharp_bookmaker: sharp_key.clone(),
                true_probability: round_to(true_prob, PROB_DP),
                edge_pct: round_to(edge_pct, PCT_DP),
                expected_value: round_to(ev, PROB_DP),
            });
        }
    }

    debug!(
        event_id = %event.event_id,
        market = market_type,
        found = value_bets.len(),
        "Scanned market for value bets"
    );
    value_bets
}
