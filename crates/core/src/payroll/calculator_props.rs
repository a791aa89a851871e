//! Property-based tests for payroll.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gescom_shared::types::Currency;

use crate::money::{apply_percentage, round_for};

use super::brackets::{BracketTable, TaxBracket};
use super::calculator::PayrollCalculator;
use super::types::{ContributionRates, PayrollInput};

/// Amounts from 0.00 to 1,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A rate from 0.00 to 25.00 percent.
fn rate() -> impl Strategy<Value = Decimal> {
    (0i64..=2_500i64).prop_map(|n| Decimal::new(n, 2))
}

fn rates_strategy() -> impl Strategy<Value = ContributionRates> {
    (rate(), rate(), rate(), rate())
        .prop_map(|(a, b, c, d)| ContributionRates::new(a, b, c, d).unwrap())
}

fn ladder() -> BracketTable {
    BracketTable::new(vec![
        TaxBracket {
            ordre: 1,
            min: dec!(0),
            max: Some(dec!(1500)),
            rate: dec!(0),
        },
        TaxBracket {
            ordre: 2,
            min: dec!(1500),
            max: Some(dec!(3500)),
            rate: dec!(15),
        },
        TaxBracket {
            ordre: 3,
            min: dec!(3500),
            max: Some(dec!(12000)),
            rate: dec!(25),
        },
        TaxBracket {
            ordre: 4,
            min: dec!(12000),
            max: None,
            rate: dec!(35),
        },
    ])
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Net pay is never negative and always reconciles.
    #[test]
    fn prop_net_never_negative(
        gross in amount(),
        avantages in amount(),
        autres_retenues in amount(),
        rates in rates_strategy(),
    ) {
        let table = ladder();
        let calc = PayrollCalculator::new(&rates, &table, Currency::Dzd);

        let result = calc
            .calculate(&PayrollInput { gross_salary: gross, avantages, autres_retenues })
            .unwrap();
        prop_assert!(result.net_a_payer >= Decimal::ZERO);
        prop_assert_eq!(result.net_a_payer, result.expected_net());
    }

    /// Contributions never exceed gross. CNSS is always exactly its rate on
    /// gross, rounded, and so is every other component once gross leaves
    /// room for four half-up roundings.
    #[test]
    fn prop_contributions_follow_their_rates(
        gross in amount(),
        rates in rates_strategy(),
    ) {
        let table = ladder();
        let calc = PayrollCalculator::new(&rates, &table, Currency::Dzd);

        let result = calc
            .calculate(&PayrollInput { gross_salary: gross, ..PayrollInput::default() })
            .unwrap();
        let expected = |rate: Decimal| round_for(apply_percentage(gross, rate), Currency::Dzd);
        let cotisations = &result.cotisations;

        prop_assert!(cotisations.total() <= gross);
        prop_assert_eq!(cotisations.cnss, expected(rates.cnss));
        prop_assert!(cotisations.assurance <= expected(rates.assurance));
        prop_assert!(cotisations.retraite <= expected(rates.retraite));
        prop_assert!(cotisations.autres <= expected(rates.autres));

        let headroom = apply_percentage(gross, Decimal::ONE_HUNDRED - rates.total());
        if headroom >= dec!(0.02) {
            prop_assert_eq!(cotisations.assurance, expected(rates.assurance));
            prop_assert_eq!(cotisations.retraite, expected(rates.retraite));
            prop_assert_eq!(cotisations.autres, expected(rates.autres));
        }
    }

    /// Progressive tax never exceeds the top marginal rate on the whole base,
    /// and never goes down when the base goes up.
    #[test]
    fn prop_progressive_tax_bounded_and_monotonic(
        base in amount(),
        bump in amount(),
    ) {
        let table = ladder();
        let tax = table.progressive_tax(base);
        prop_assert!(tax >= Decimal::ZERO);
        prop_assert!(tax <= base * dec!(0.35));
        prop_assert!(table.progressive_tax(base + bump) >= tax);
    }

    /// A base inside the zero-rate band is untaxed.
    #[test]
    fn prop_zero_band_untaxed(cents in 0i64..=150_000i64) {
        let table = ladder();
        prop_assert_eq!(table.progressive_tax(Decimal::new(cents, 2)), Decimal::ZERO);
    }
}
