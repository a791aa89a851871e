//! Value types for document totals.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gescom_shared::types::TaxId;

use crate::error::InputValidationError;
use crate::money::amounts_match;

/// One line of a document.
///
/// Quantity and price may be negative (credit notes); no sign
/// normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text description.
    pub description: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit price before tax.
    pub unit_price: Decimal,
    /// Tax shown next to the line. Display hint only: document totals are
    /// computed from the document-level tax selection.
    #[serde(default)]
    pub display_tax_id: Option<TaxId>,
}

impl LineItem {
    /// Creates a line without a display tax.
    #[must_use]
    pub fn new(description: &str, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.to_string(),
            quantity,
            unit_price,
            display_tax_id: None,
        }
    }

    /// Sets the tax shown next to this line.
    #[must_use]
    pub fn with_display_tax(mut self, tax_id: TaxId) -> Self {
        self.display_tax_id = Some(tax_id);
        self
    }

    /// Unrounded `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// Percent of the subtotal.
    Percentage,
    /// Flat amount.
    Amount,
}

/// Document-level discount, applied once before any tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// Whether the discount applies at all.
    pub enabled: bool,
    /// Percentage or amount.
    pub kind: DiscountKind,
    /// Percent or flat amount, never negative.
    pub value: Decimal,
}

impl Default for Discount {
    fn default() -> Self {
        Self::none()
    }
}

impl Discount {
    /// No discount.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            enabled: false,
            kind: DiscountKind::Amount,
            value: Decimal::ZERO,
        }
    }

    /// Percentage discount.
    #[must_use]
    pub const fn percentage(value: Decimal) -> Self {
        Self {
            enabled: true,
            kind: DiscountKind::Percentage,
            value,
        }
    }

    /// Flat-amount discount.
    #[must_use]
    pub const fn amount(value: Decimal) -> Self {
        Self {
            enabled: true,
            kind: DiscountKind::Amount,
            value,
        }
    }

    /// Validates the discount. A disabled discount is always valid.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative value or a percentage above 100.
    pub fn validate(&self) -> Result<(), InputValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if self.value < Decimal::ZERO {
            return Err(InputValidationError::NegativeDiscount(self.value));
        }
        if self.kind == DiscountKind::Percentage && self.value > Decimal::ONE_HUNDRED {
            return Err(InputValidationError::DiscountPercentageOutOfRange(self.value));
        }
        Ok(())
    }
}

/// Amount computed for one tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAmount {
    /// The tax.
    pub tax_id: TaxId,
    /// Its code, for display.
    pub code: String,
    /// Rounded amount.
    pub amount: Decimal,
}

/// Computed totals of a document. Immutable; recompute on every change.
///
/// `total_ttc == net_ht_after_discount + percentage_tax_total + fixed_tax_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of line totals.
    pub subtotal_ht: Decimal,
    /// Discount taken off the subtotal.
    pub discount_amount: Decimal,
    /// Subtotal minus discount; the base of every percentage tax.
    pub net_ht_after_discount: Decimal,
    /// One entry per selected tax: percentage taxes first, then fixed,
    /// each group in catalog order.
    pub per_tax_amounts: Vec<TaxAmount>,
    /// Sum of fixed taxes.
    pub fixed_tax_total: Decimal,
    /// Sum of percentage taxes.
    pub percentage_tax_total: Decimal,
    /// Grand total.
    pub total_ttc: Decimal,
}

impl Totals {
    /// All-zero totals.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            subtotal_ht: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            net_ht_after_discount: Decimal::ZERO,
            per_tax_amounts: Vec::new(),
            fixed_tax_total: Decimal::ZERO,
            percentage_tax_total: Decimal::ZERO,
            total_ttc: Decimal::ZERO,
        }
    }

    /// Net HT plus all taxes.
    #[must_use]
    pub fn expected_ttc(&self) -> Decimal {
        self.net_ht_after_discount + self.percentage_tax_total + self.fixed_tax_total
    }

    /// Returns true if the reconciliation identity holds.
    #[must_use]
    pub fn reconciles(&self) -> bool {
        amounts_match(self.total_ttc, self.expected_ttc())
            && amounts_match(
                self.net_ht_after_discount,
                self.subtotal_ht - self.discount_amount,
            )
    }
}

/// A document as submitted for computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Lines.
    #[serde(default)]
    pub lines: Vec<LineItem>,
    /// Discount.
    #[serde(default)]
    pub discount: Discount,
    /// Taxes applied to the whole document.
    #[serde(default)]
    pub selected_tax_ids: BTreeSet<TaxId>,
}

/// Per-line figures for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    /// Line description.
    pub description: String,
    /// Rounded `quantity * unit_price`.
    pub line_total: Decimal,
    /// Tax shown next to the line, when it has one.
    pub display_tax: Option<TaxAmount>,
}
