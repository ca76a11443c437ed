//! Currency rounding helpers.
//!
//! All intermediate math in the engine runs on exact [`Decimal`] values; this
//! module owns the single conversion to 2-decimal currency amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// One cent, the smallest currency step the engine redistributes.
pub(crate) const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Half of [`CENT`]; reconciliation stops below this magnitude.
pub(crate) const HALF_CENT: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Rounds to 2 decimal places, half-up: exact halves move away from zero,
/// so `2.345` becomes `2.35` and `-2.345` becomes `-2.35`.
///
/// The result always carries exactly two decimal digits.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Returns `true` if `value` is a whole number of cents.
pub(crate) fn cent_aligned(value: Decimal) -> bool {
    value == value.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}
