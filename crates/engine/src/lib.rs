//! Receipt-splitting core.
//!
//! A [`ReceiptDraft`] records who bought what: a list of items, the people
//! sharing them, and one order-level tax. [`validate`] reports data problems
//! as warnings and [`compute`] produces the per-person breakdown. Both are
//! pure functions over an immutable draft: nothing here mutates, fails or
//! performs I/O, so the hosting application can rerun the pair on every edit.

pub use compute::compute;
pub use draft::{Item, Person, ReceiptDraft};
pub use result::{
    CalculationResult, PersonBreakdown, ResidualAdjustment, RoundingMethod, RoundingSummary,
};
pub use rounding::round2;
pub use validate::validate;

mod compute;
mod draft;
mod result;
mod rounding;
mod validate;
