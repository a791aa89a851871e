//! Property-based tests for ledger entry building.
//!
//! Every event kind, fed randomized positive amounts, yields an entry whose
//! debits equal its credits.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use gescom_shared::types::DocumentId;

use super::balance::{AccountBalance, TrialBalance};
use super::builder::LedgerEntryBuilder;
use super::entry::{LedgerEntry, OriginRef};
use super::events::{BusinessEvent, DocumentAmounts, EventHeader, PaymentMethod, PayrollPosting};
use super::mapping::ChartOfAccountsMapping;
use super::mapping::tests::full_config;
use super::reversal::reverse_entry;

/// Strategy to generate a positive amount from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a non-negative amount from 0.00 to 100,000.00.
fn small_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![Just(PaymentMethod::Banque), Just(PaymentMethod::Caisse)]
}

fn header(seq: u32) -> EventHeader {
    let number = format!("DOC-{seq:05}");
    EventHeader {
        origin: OriginRef {
            document_id: DocumentId::from_name(&number),
            document_number: number.clone(),
        },
        entry_number: format!("E-{seq:05}"),
        date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        counterparty: None,
    }
}

/// Invoice amounts where TTC covers HT + TVA plus an optional fixed tax.
fn amounts_strategy() -> impl Strategy<Value = DocumentAmounts> {
    (positive_amount(), small_amount(), small_amount()).prop_map(|(ht, tva, fixed)| {
        DocumentAmounts {
            ht,
            tva,
            ttc: ht + tva + fixed,
        }
    })
}

/// A payroll run whose net is derived from its components.
fn payroll_strategy() -> impl Strategy<Value = PayrollPosting> {
    (
        positive_amount(),
        small_amount(),
        0u32..=30,
        0u32..=30,
        0u32..=20,
    )
        .prop_map(|(gross, avantages, cot_pct, irpp_pct, other_pct)| {
            let cotisations = (gross * Decimal::from(cot_pct) / Decimal::ONE_HUNDRED).round_dp(2);
            let irpp = (gross * Decimal::from(irpp_pct) / Decimal::ONE_HUNDRED).round_dp(2);
            let autres_retenues =
                (gross * Decimal::from(other_pct) / Decimal::ONE_HUNDRED).round_dp(2);
            PayrollPosting {
                gross,
                avantages,
                cotisations,
                irpp,
                autres_retenues,
                net: gross - cotisations - irpp - autres_retenues + avantages,
            }
        })
}

fn event_strategy() -> impl Strategy<Value = BusinessEvent> {
    prop_oneof![
        (0u32..1000, amounts_strategy()).prop_map(|(seq, amounts)| {
            BusinessEvent::SaleInvoiceIssued {
                header: header(seq),
                amounts,
            }
        }),
        (0u32..1000, positive_amount(), method_strategy()).prop_map(|(seq, amount, method)| {
            BusinessEvent::SalePaymentReceived {
                header: header(seq),
                amount,
                method,
            }
        }),
        (0u32..1000, amounts_strategy()).prop_map(|(seq, amounts)| {
            BusinessEvent::PurchaseInvoiceReceived {
                header: header(seq),
                amounts,
            }
        }),
        (0u32..1000, positive_amount(), method_strategy()).prop_map(|(seq, amount, method)| {
            BusinessEvent::PurchasePaymentMade {
                header: header(seq),
                amount,
                method,
            }
        }),
        (0u32..1000, payroll_strategy(), method_strategy()).prop_map(|(seq, payroll, method)| {
            BusinessEvent::PayrollValidated {
                header: header(seq),
                payroll,
                method,
            }
        }),
    ]
}

fn mapping() -> ChartOfAccountsMapping {
    ChartOfAccountsMapping::from_config(&full_config()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every event kind produces a balanced entry with one-sided,
    /// non-negative lines.
    #[test]
    fn prop_every_event_balances(event in event_strategy()) {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let entry = builder.build_from_event(&event).unwrap();
        let totals = entry.totals();

        prop_assert!(totals.equilibre);
        prop_assert_eq!(totals.total_debit, totals.total_credit);
        prop_assert!((2..=5).contains(&entry.lines.len()));
        for line in &entry.lines {
            prop_assert!(line.debit >= Decimal::ZERO && line.credit >= Decimal::ZERO);
            prop_assert!(line.debit.is_zero() != line.credit.is_zero());
        }
        prop_assert_eq!(entry.idempotency_key, event.idempotency_key());
    }

    /// An entry and its reversal cancel out on every account.
    #[test]
    fn prop_reversal_cancels(event in event_strategy()) {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let entry = builder.build_from_event(&event).unwrap();
        let reversed = reverse_entry(&entry, "X-1", entry.date).unwrap();

        let balances = AccountBalance::from_entries([&entry, &reversed]);
        for balance in &balances {
            prop_assert_eq!(balance.balance(), Decimal::ZERO);
        }
    }

    /// The trial balance of any set of built entries is balanced.
    #[test]
    fn prop_trial_balance_balanced(events in prop::collection::vec(event_strategy(), 1..10)) {
        let mapping = mapping();
        let builder = LedgerEntryBuilder::new(&mapping);

        let entries: Vec<LedgerEntry> = events
            .iter()
            .map(|e| builder.build_from_event(e).unwrap())
            .collect();
        let trial = TrialBalance::from_balances(&AccountBalance::from_entries(&entries));
        prop_assert!(trial.is_balanced());
    }
}
