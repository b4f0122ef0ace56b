//! Decimal price and probability helpers.
//!
//! All odds math runs on [`Decimal`]. Rounding goes through [`round_to`],
//! which uses banker's rounding (midpoint to even) at a fixed number of
//! decimal places.

use rust_decimal::Decimal;

/// Decimal (European) odds. A fair coin flip is priced at 2.00.
pub type Price = Decimal;

/// Probability in `[0, 1]`.
pub type Probability = Decimal;

/// Decimal places for percentages (profit, edge, price change, CLV).
pub const PCT_DP: u32 = 4;

/// Decimal places for probabilities and expected value.
pub const PROB_DP: u32 = 6;

/// Decimal places for stake allocations.
pub const STAKE_DP: u32 = 2;

/// One hundred, for percentage conversions.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Implied probability of a decimal price (`1 / price`).
///
/// Returns `None` for a zero price.
#[must_use]
pub fn implied_probability(price: Price) -> Option<Probability> {
    Decimal::ONE.checked_div(price)
}

/// Round to `dp` decimal places using banker's rounding.
#[must_use]
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp(dp)
}
