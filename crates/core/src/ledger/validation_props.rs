//! Property-based tests for ledger line validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::LedgerLine;
use super::validation::validate_lines;
use crate::error::InvariantViolation;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn line(account: &str, debit: Decimal, credit: Decimal) -> LedgerLine {
    LedgerLine {
        account_number: account.to_string(),
        account_label: String::new(),
        label: String::new(),
        debit,
        credit,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Debits split over several lines against one credit always validate.
    #[test]
    fn prop_split_debits_balance(amounts in prop::collection::vec(positive_amount(), 1..8)) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<LedgerLine> = amounts
            .iter()
            .map(|a| line("607000", *a, Decimal::ZERO))
            .collect();
        lines.push(line("401000", Decimal::ZERO, total));

        let totals = validate_lines(&lines).unwrap();
        prop_assert_eq!(totals.total_debit, total);
        prop_assert!(totals.equilibre);
    }

    /// Any cent of difference is reported as unbalanced.
    #[test]
    fn prop_difference_detected(
        amount in positive_amount(),
        delta_cents in 1i64..10_000i64,
    ) {
        let delta = Decimal::new(delta_cents, 2);
        let lines = vec![
            line("411000", amount + delta, Decimal::ZERO),
            line("707000", Decimal::ZERO, amount),
        ];
        prop_assert_eq!(
            validate_lines(&lines),
            Err(InvariantViolation::UnbalancedEntry {
                debit: amount + delta,
                credit: amount,
            })
        );
    }

    /// A line carrying both sides is rejected even when the entry balances.
    #[test]
    fn prop_two_sided_line_rejected(amount in positive_amount()) {
        let lines = vec![
            line("411000", amount, amount),
            line("707000", amount, Decimal::ZERO),
            line("445710", Decimal::ZERO, amount),
        ];
        prop_assert_eq!(
            validate_lines(&lines),
            Err(InvariantViolation::LineBothSides("411000".to_string()))
        );
    }
}
