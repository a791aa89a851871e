//! Payroll: employee contributions, progressive income tax and net pay.

pub mod brackets;
pub mod calculator;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use brackets::{BracketTable, TaxBracket};
pub use calculator::PayrollCalculator;
pub use types::{ContributionRates, Cotisations, PayrollInput, PayrollResult, Retenues};
