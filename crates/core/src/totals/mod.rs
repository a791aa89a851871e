//! Document totals: subtotal, discount, taxes and grand total.
//!
//! One calculator serves quotes, invoices, delivery notes, deposit invoices
//! and supplier invoices. Totals are always recomputed from scratch.
//!
//! Percentage discounts apply to the document-level subtotal, not pro-rated
//! per line before tax. When lines nominally carry different tax rates this
//! departs from strict per-line tax bases; it is kept deliberately so that
//! every document type reports the same figures, and is flagged for audit.

pub mod calculator;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::DocumentTotalsCalculator;
pub use types::{Discount, DiscountKind, DocumentInput, LineItem, LineView, TaxAmount, Totals};
