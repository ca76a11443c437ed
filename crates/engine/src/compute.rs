//! The calculation pass.
//!
//! One call walks the draft exactly once: item prices are split across their
//! payers on exact decimals, the order-level tax is apportioned to pre-tax
//! shares, and a single rounding pass with penny reconciliation makes the
//! per-person totals sum to the rounded receipt grand total.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::draft::ReceiptDraft;
use crate::result::{
    CalculationResult, PersonBreakdown, ResidualAdjustment, RoundingMethod, RoundingSummary,
};
use crate::rounding::{CENT, HALF_CENT, round2};

/// Computes the per-person breakdown for a draft.
///
/// Total over all well-typed drafts: semantic problems (unassigned items,
/// dangling payer ids, tax without any attributed subtotal) surface as
/// warnings on the result, never as failures. The same draft always yields
/// the same result.
#[must_use]
pub fn compute(draft: &ReceiptDraft) -> CalculationResult {
    let mut warnings: Vec<String> = Vec::new();

    // One accumulator per person, in order of first appearance. A duplicated
    // id keeps its first accumulator; the validator reports the duplication.
    let mut ids: Vec<&str> = Vec::with_capacity(draft.people.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(draft.people.len());
    for person in &draft.people {
        if !index.contains_key(person.id.as_str()) {
            index.insert(person.id.as_str(), ids.len());
            ids.push(person.id.as_str());
        }
    }
    let mut subtotals = vec![Decimal::ZERO; ids.len()];

    // Split every item across its distinct payers. Unassigned items and
    // shares of unknown payers still count toward the receipt subtotal, so
    // the receipt can total more than what was attributed to people.
    let mut receipt_subtotal = Decimal::ZERO;
    for item in &draft.items {
        receipt_subtotal += item.price;

        let payers = distinct_payers(&item.payers);
        if payers.is_empty() {
            warnings.push(format!("item \"{}\" has no payers", item.name));
            continue;
        }

        let share = item.price / Decimal::from(payers.len());
        for payer in payers {
            match index.get(payer) {
                Some(&i) => subtotals[i] += share,
                None => warnings.push(format!(
                    "item \"{}\" references unknown payer \"{payer}\"",
                    item.name
                )),
            }
        }
    }

    // Apportion the order-level tax to pre-tax shares. A zero denominator
    // never divides: it degrades to all-zero shares and a warning.
    let total_subtotal: Decimal = subtotals.iter().copied().sum();
    let mut tax_shares = vec![Decimal::ZERO; subtotals.len()];
    if total_subtotal.is_zero() {
        if draft.tax_total > Decimal::ZERO {
            warnings.push("cannot allocate tax when no items have payers".to_string());
        }
    } else {
        for (tax_share, subtotal) in tax_shares.iter_mut().zip(&subtotals) {
            *tax_share = draft.tax_total * *subtotal / total_subtotal;
        }
    }

    // The single rounding pass. Fractional values stay on the breakdown for
    // audit and drive the reconciliation order below.
    let mut per_person: Vec<PersonBreakdown> = Vec::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        let fractional_subtotal = subtotals[i];
        let fractional_tax_share = tax_shares[i];
        let fractional_total = fractional_subtotal + fractional_tax_share;
        per_person.push(PersonBreakdown {
            person_id: (*id).to_string(),
            subtotal: round2(fractional_subtotal),
            tax_share: round2(fractional_tax_share),
            total: round2(fractional_total),
            fractional_subtotal,
            fractional_tax_share,
            fractional_total,
        });
    }

    let receipt_grand = round2(receipt_subtotal + draft.tax_total);
    let rounded_sum: Decimal = per_person.iter().map(|person| person.total).sum();
    let residual_applied = reconcile(&mut per_person, receipt_grand - rounded_sum);

    CalculationResult {
        per_person,
        receipt_subtotal,
        receipt_tax: draft.tax_total,
        receipt_grand,
        rounding: RoundingSummary {
            method: RoundingMethod::HalfUp,
            residual_applied,
        },
        warnings,
    }
}

/// First occurrence of each payer id, in the item's order. A repeated id
/// carries no extra weight.
fn distinct_payers(payers: &[String]) -> Vec<&str> {
    let mut distinct: Vec<&str> = Vec::with_capacity(payers.len());
    for payer in payers {
        if !distinct.contains(&payer.as_str()) {
            distinct.push(payer.as_str());
        }
    }
    distinct
}

/// Distributes `delta` in ±0.01 steps: largest rounding remainder first,
/// ties broken by ascending person id, at most one step per person.
///
/// `delta` is a whole number of cents (both operands carry two decimals), so
/// the loop either reaches zero or runs out of people. Running out only
/// happens when part of the receipt was never attributed to anyone; the
/// remaining gap then stays, mirroring the warnings already emitted.
fn reconcile(per_person: &mut [PersonBreakdown], mut delta: Decimal) -> Vec<ResidualAdjustment> {
    let mut applied = Vec::new();
    if delta.abs() < HALF_CENT {
        return applied;
    }

    let step = if delta > Decimal::ZERO { CENT } else { -CENT };

    let mut order: Vec<usize> = (0..per_person.len()).collect();
    order.sort_by(|&a, &b| {
        let remainder_a = (per_person[a].fractional_total - per_person[a].total).abs();
        let remainder_b = (per_person[b].fractional_total - per_person[b].total).abs();
        remainder_b
            .cmp(&remainder_a)
            .then_with(|| per_person[a].person_id.cmp(&per_person[b].person_id))
    });

    for i in order {
        if delta.abs() < HALF_CENT {
            break;
        }
        per_person[i].total += step;
        applied.push(ResidualAdjustment {
            person_id: per_person[i].person_id.clone(),
            delta: step,
        });
        delta -= step;
    }

    applied
}
