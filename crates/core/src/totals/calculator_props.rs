//! Property-based tests for document totals.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rust_decimal::Decimal;

use gescom_shared::types::{Currency, TaxId};

use super::calculator::DocumentTotalsCalculator;
use super::types::{Discount, LineItem};
use crate::money::amounts_match;
use crate::tax::{Tax, TaxCatalog, TaxKind};

/// Quantities from -50.00 to 500.00 (negatives model credit notes).
fn quantity() -> impl Strategy<Value = Decimal> {
    (-5_000i64..50_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Unit prices from 0.000 to 100,000.000.
fn unit_price() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

fn lines_strategy() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(
        (quantity(), unit_price()).prop_map(|(q, p)| LineItem::new("line", q, p)),
        0..20,
    )
}

fn discount_strategy() -> impl Strategy<Value = Discount> {
    prop_oneof![
        Just(Discount::none()),
        (0i64..=10_000i64).prop_map(|n| Discount::percentage(Decimal::new(n, 2))),
        (0i64..1_000_000i64).prop_map(|n| Discount::amount(Decimal::new(n, 2))),
    ]
}

fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Dzd), Just(Currency::Tnd), Just(Currency::Eur)]
}

fn catalog() -> TaxCatalog {
    TaxCatalog::new(vec![
        Tax::new("TVA19", "TVA 19%", TaxKind::Percentage, Decimal::from(19)),
        Tax::new("TVA9", "TVA 9%", TaxKind::Percentage, Decimal::from(9)),
        Tax::new("TIMBRE", "Droit de timbre", TaxKind::Fixed, Decimal::new(250, 2)),
    ])
    .unwrap()
}

fn selection_strategy() -> impl Strategy<Value = BTreeSet<TaxId>> {
    prop::collection::vec(
        prop_oneof![Just("TVA19"), Just("TVA9"), Just("TIMBRE")],
        0..3,
    )
    .prop_map(|codes| codes.into_iter().map(TaxId::from_name).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Without discount and taxes, TTC equals the subtotal.
    #[test]
    fn prop_no_discount_no_tax_ttc_equals_subtotal(
        lines in lines_strategy(),
        currency in currency_strategy(),
    ) {
        let catalog = catalog();
        let calc = DocumentTotalsCalculator::new(&catalog, currency);

        let totals = calc.compute_totals(&lines, &Discount::none(), &BTreeSet::new()).unwrap();
        prop_assert_eq!(totals.total_ttc, totals.subtotal_ht);
        prop_assert_eq!(totals.discount_amount, Decimal::ZERO);
    }

    /// TTC always equals net HT plus percentage and fixed taxes.
    #[test]
    fn prop_totals_reconcile(
        lines in lines_strategy(),
        discount in discount_strategy(),
        selected in selection_strategy(),
        currency in currency_strategy(),
    ) {
        let catalog = catalog();
        let calc = DocumentTotalsCalculator::new(&catalog, currency);

        let totals = calc.compute_totals(&lines, &discount, &selected).unwrap();
        prop_assert!(amounts_match(
            totals.total_ttc,
            totals.net_ht_after_discount + totals.percentage_tax_total + totals.fixed_tax_total
        ));
        prop_assert_eq!(totals.per_tax_amounts.len(), selected.len());
        prop_assert!(totals.total_ttc.scale() <= currency.decimal_places());
    }

    /// Same input, same output.
    #[test]
    fn prop_compute_is_idempotent(
        lines in lines_strategy(),
        discount in discount_strategy(),
        selected in selection_strategy(),
    ) {
        let catalog = catalog();
        let calc = DocumentTotalsCalculator::new(&catalog, Currency::Dzd);

        let first = calc.compute_totals(&lines, &discount, &selected).unwrap();
        let second = calc.compute_totals(&lines, &discount, &selected).unwrap();
        prop_assert_eq!(&first, &second);
        // Bit-identical, not merely numerically equal.
        prop_assert_eq!(first.total_ttc.serialize(), second.total_ttc.serialize());
    }

    /// Each percentage tax is computed on the same post-discount base.
    #[test]
    fn prop_percentage_taxes_are_additive(
        lines in lines_strategy(),
        discount in discount_strategy(),
    ) {
        let catalog = catalog();
        let calc = DocumentTotalsCalculator::new(&catalog, Currency::Dzd);
        let one = |code: &str| BTreeSet::from([TaxId::from_name(code)]);

        let both = calc
            .compute_totals(&lines, &discount, &BTreeSet::from([
                TaxId::from_name("TVA19"),
                TaxId::from_name("TVA9"),
            ]))
            .unwrap();
        let t19 = calc.compute_totals(&lines, &discount, &one("TVA19")).unwrap();
        let t9 = calc.compute_totals(&lines, &discount, &one("TVA9")).unwrap();

        prop_assert_eq!(
            both.percentage_tax_total,
            t19.percentage_tax_total + t9.percentage_tax_total
        );
    }

    /// The printed per-tax amounts add up to the printed tax totals.
    #[test]
    fn prop_per_tax_amounts_sum_to_totals(
        lines in lines_strategy(),
        discount in discount_strategy(),
        selected in selection_strategy(),
        currency in currency_strategy(),
    ) {
        let catalog = catalog();
        let calc = DocumentTotalsCalculator::new(&catalog, currency);

        let totals = calc.compute_totals(&lines, &discount, &selected).unwrap();
        let sum_of = |kind: TaxKind| -> Decimal {
            totals
                .per_tax_amounts
                .iter()
                .filter(|t| catalog.get(t.tax_id).is_some_and(|tax| tax.kind == kind))
                .map(|t| t.amount)
                .sum()
        };
        prop_assert_eq!(sum_of(TaxKind::Percentage), totals.percentage_tax_total);
        prop_assert_eq!(sum_of(TaxKind::Fixed), totals.fixed_tax_total);
    }
}
