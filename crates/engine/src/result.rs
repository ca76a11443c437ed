//! Output of one compute pass.
//!
//! A [`CalculationResult`] is a value snapshot: produced fresh on every call,
//! never mutated afterwards, consumed read-only by rendering or export.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What one person owes.
///
/// The `fractional_*` fields carry the exact pre-rounding values so the
/// reconciliation choices stay auditable next to the rounded ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonBreakdown {
    pub person_id: String,
    pub subtotal: Decimal,
    pub tax_share: Decimal,
    /// Rounded `subtotal + tax_share`, including any residual cent applied
    /// during reconciliation.
    pub total: Decimal,
    pub fractional_subtotal: Decimal,
    pub fractional_tax_share: Decimal,
    pub fractional_total: Decimal,
}

/// One ±0.01 correction applied during reconciliation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResidualAdjustment {
    pub person_id: String,
    pub delta: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMethod {
    HalfUp,
}

impl RoundingMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HalfUp => "half-up",
        }
    }
}

/// How rounding was performed and which corrections it required.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundingSummary {
    pub method: RoundingMethod,
    pub residual_applied: Vec<ResidualAdjustment>,
}

/// Per-person breakdowns plus receipt-level aggregates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// One entry per person in the draft, in first-appearance order.
    pub per_person: Vec<PersonBreakdown>,
    /// Exact sum of every item price, assigned or not.
    pub receipt_subtotal: Decimal,
    /// The order-level tax as supplied.
    pub receipt_tax: Decimal,
    /// `receipt_subtotal + receipt_tax` rounded to cents; the target the
    /// per-person totals reconcile against.
    pub receipt_grand: Decimal,
    pub rounding: RoundingSummary,
    /// Problems found while computing, in discovery order.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_method_serializes_kebab_case() {
        assert_eq!(RoundingMethod::HalfUp.as_str(), "half-up");
        assert_eq!(
            serde_json::to_string(&RoundingMethod::HalfUp).unwrap(),
            "\"half-up\""
        );
    }
}
