//! Document totals calculation.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use gescom_shared::types::{Currency, TaxId};

use super::types::{Discount, DiscountKind, LineItem, LineView, TaxAmount, Totals};
use crate::error::{EngineResult, InputValidationError, InvariantViolation};
use crate::money::{self, apply_percentage};
use crate::tax::{TaxCatalog, TaxKind};

/// Computes document totals against a tenant's tax catalog.
///
/// Stateless apart from the borrowed configuration; safe to share across
/// threads and to call concurrently.
#[derive(Debug, Clone, Copy)]
pub struct DocumentTotalsCalculator<'a> {
    catalog: &'a TaxCatalog,
    currency: Currency,
}

impl<'a> DocumentTotalsCalculator<'a> {
    /// Creates a calculator for the given catalog and settlement currency.
    #[must_use]
    pub const fn new(catalog: &'a TaxCatalog, currency: Currency) -> Self {
        Self { catalog, currency }
    }

    /// Computes the totals of a document.
    ///
    /// The order of operations is fixed:
    /// 1. subtotal = sum of `quantity * unit_price`, unrounded per line
    /// 2. discount on the document-level subtotal
    /// 3. net HT = subtotal - discount
    /// 4. selected taxes split into percentage and fixed
    /// 5. each percentage tax on the same net HT, no cascading
    /// 6. fixed taxes added flat
    /// 7. TTC = net HT + percentage taxes + fixed taxes
    ///
    /// Intermediate values keep full precision; each reported figure is
    /// rounded half-up to the currency's places. Each tax is rounded on its
    /// own, and the tax totals, net HT and TTC are sums of rounded figures,
    /// so the printed document adds up.
    ///
    /// # Errors
    ///
    /// - `InputValidation` for an invalid discount or an unknown tax id
    /// - `InvariantViolation` if the result fails to reconcile
    pub fn compute_totals(
        &self,
        lines: &[LineItem],
        discount: &Discount,
        selected_tax_ids: &BTreeSet<TaxId>,
    ) -> EngineResult<Totals> {
        if let Err(err) = self.validate_input(discount, selected_tax_ids) {
            warn!(error = %err, "Document totals input rejected");
            return Err(err.into());
        }

        // 1-3. Full-precision base
        let subtotal: Decimal = lines.iter().map(LineItem::line_total).sum();
        let discount_full = Self::discount_on(subtotal, discount);
        let net = subtotal - discount_full;

        // 4. Partition selected taxes
        let applicable = self.catalog.list_applicable(selected_tax_ids);

        // 5. Percentage taxes, each on the same base
        let mut per_tax_amounts =
            Vec::with_capacity(applicable.percentage.len() + applicable.fixed.len());
        let mut percentage_tax_total = Decimal::ZERO;
        for tax in &applicable.percentage {
            let amount = self.round(apply_percentage(net, tax.value));
            percentage_tax_total += amount;
            per_tax_amounts.push(TaxAmount {
                tax_id: tax.id,
                code: tax.code.clone(),
                amount,
            });
        }

        // 6. Fixed taxes
        let mut fixed_tax_total = Decimal::ZERO;
        for tax in &applicable.fixed {
            let amount = self.round(tax.value);
            fixed_tax_total += amount;
            per_tax_amounts.push(TaxAmount {
                tax_id: tax.id,
                code: tax.code.clone(),
                amount,
            });
        }

        // 7. Rounded output
        let subtotal_ht = self.round(subtotal);
        let discount_amount = self.round(discount_full);
        let net_ht_after_discount = subtotal_ht - discount_amount;
        let total_ttc = net_ht_after_discount + percentage_tax_total + fixed_tax_total;

        let totals = Totals {
            subtotal_ht,
            discount_amount,
            net_ht_after_discount,
            per_tax_amounts,
            fixed_tax_total,
            percentage_tax_total,
            total_ttc,
        };

        if !totals.reconciles() {
            error!(
                total_ttc = %totals.total_ttc,
                expected = %totals.expected_ttc(),
                "Document totals failed to reconcile"
            );
            return Err(InvariantViolation::TotalsMismatch {
                expected: totals.expected_ttc(),
                actual: totals.total_ttc,
            }
            .into());
        }

        debug!(
            lines = lines.len(),
            subtotal_ht = %totals.subtotal_ht,
            discount = %totals.discount_amount,
            total_ttc = %totals.total_ttc,
            "Computed document totals"
        );

        Ok(totals)
    }

    /// Per-line totals for display, with the informational tax of each line.
    ///
    /// Never feeds [`Totals`]: a line's display tax is computed on that
    /// line alone, before any document discount. Display taxes that are not
    /// percentage taxes in the catalog are left out.
    #[must_use]
    pub fn line_breakdown(&self, lines: &[LineItem]) -> Vec<LineView> {
        lines
            .iter()
            .map(|line| {
                let line_total = line.line_total();
                let display_tax = line
                    .display_tax_id
                    .and_then(|id| self.catalog.get(id))
                    .filter(|tax| tax.kind == TaxKind::Percentage)
                    .map(|tax| TaxAmount {
                        tax_id: tax.id,
                        code: tax.code.clone(),
                        amount: self.round(apply_percentage(line_total, tax.value)),
                    });

                LineView {
                    description: line.description.clone(),
                    line_total: self.round(line_total),
                    display_tax,
                }
            })
            .collect()
    }

    fn validate_input(
        &self,
        discount: &Discount,
        selected_tax_ids: &BTreeSet<TaxId>,
    ) -> Result<(), InputValidationError> {
        discount.validate()?;
        self.catalog.ensure_known(selected_tax_ids)
    }

    fn discount_on(subtotal: Decimal, discount: &Discount) -> Decimal {
        if !discount.enabled {
            return Decimal::ZERO;
        }
        match discount.kind {
            DiscountKind::Percentage => apply_percentage(subtotal, discount.value),
            DiscountKind::Amount => discount.value,
        }
    }

    fn round(&self, amount: Decimal) -> Decimal {
        money::round_for(amount, self.currency)
    }
}
