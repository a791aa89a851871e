//! Deterministic decimal arithmetic for monetary amounts.
//!
//! CRITICAL: Rounding strategy:
//! - Intermediate sums keep full `Decimal` precision
//! - Only figures leaving the engine are rounded, to the currency's places
//! - Rounding is half-up (midpoint away from zero), never banker's
//! - Equality checks on computed amounts go through [`amounts_match`]

use rust_decimal::{Decimal, RoundingStrategy};

use gescom_shared::types::Currency;

/// Tolerance used when comparing computed amounts (0.000001).
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Rounds an amount to `precision` decimal places, half-up.
#[must_use]
pub fn round(amount: Decimal, precision: u32) -> Decimal {
    amount.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an amount to the precision of `currency`.
#[must_use]
pub fn round_for(amount: Decimal, currency: Currency) -> Decimal {
    round(amount, currency.decimal_places())
}

/// Applies a percentage rate to a base: `base * rate / 100`, unrounded.
#[must_use]
pub fn apply_percentage(base: Decimal, rate: Decimal) -> Decimal {
    base * rate / Decimal::ONE_HUNDRED
}

/// Returns true if two amounts differ by less than [`EPSILON`].
#[must_use]
pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < EPSILON
}
