//! Per-account balances across ledger entries.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntry;
use crate::money::amounts_match;

/// Debit and credit movements on one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account number.
    pub account_number: String,
    /// Account label as first seen.
    pub account_label: String,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance.
    #[must_use]
    pub fn new(account_number: &str, account_label: &str) -> Self {
        Self {
            account_number: account_number.to_string(),
            account_label: account_label.to_string(),
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
        }
    }

    /// Adds a debit amount.
    pub fn add_debit(&mut self, amount: Decimal) {
        self.debit_total += amount;
    }

    /// Adds a credit amount.
    pub fn add_credit(&mut self, amount: Decimal) {
        self.credit_total += amount;
    }

    /// Net balance, debit minus credit. Positive means a debit balance.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.debit_total - self.credit_total
    }

    /// Sums movements per account across `entries`, ordered by account
    /// number.
    #[must_use]
    pub fn from_entries<'a, I>(entries: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut accounts: BTreeMap<&str, Self> = BTreeMap::new();

        for entry in entries {
            for line in &entry.lines {
                let balance = accounts
                    .entry(line.account_number.as_str())
                    .or_insert_with(|| Self::new(&line.account_number, &line.account_label));
                balance.add_debit(line.debit);
                balance.add_credit(line.credit);
            }
        }

        accounts.into_values().collect()
    }
}

/// Grand totals over a set of account balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Sum of all debits.
    pub total_debit: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
}

impl TrialBalance {
    /// Sums the given balances.
    #[must_use]
    pub fn from_balances(balances: &[AccountBalance]) -> Self {
        Self {
            total_debit: balances.iter().map(|b| b.debit_total).sum(),
            total_credit: balances.iter().map(|b| b.credit_total).sum(),
        }
    }

    /// Returns true if total debits equal total credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        amounts_match(self.total_debit, self.total_credit)
    }
}
