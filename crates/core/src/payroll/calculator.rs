//! Payslip calculation.

use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use gescom_shared::types::Currency;

use super::brackets::BracketTable;
use super::types::{ContributionRates, Cotisations, PayrollInput, PayrollResult, Retenues};
use crate::error::{EngineResult, InputValidationError, InvariantViolation};
use crate::money::{self, amounts_match, apply_percentage};

/// Computes payslips from a tenant's active payroll tables.
#[derive(Debug, Clone, Copy)]
pub struct PayrollCalculator<'a> {
    rates: &'a ContributionRates,
    brackets: &'a BracketTable,
    currency: Currency,
}

impl<'a> PayrollCalculator<'a> {
    /// Creates a calculator over validated tables.
    #[must_use]
    pub const fn new(
        rates: &'a ContributionRates,
        brackets: &'a BracketTable,
        currency: Currency,
    ) -> Self {
        Self {
            rates,
            brackets,
            currency,
        }
    }

    /// Computes one payslip.
    ///
    /// 1. Each contribution is a flat percentage of gross salary
    /// 2. Taxable base = gross - contributions
    /// 3. Income tax walks the bracket table progressively
    /// 4. Other deductions are capped at what remains, so net pay never
    ///    goes negative
    /// 5. Bonuses are added after tax, untaxed
    ///
    /// # Errors
    ///
    /// - `InputValidation` for a negative salary, bonus or deduction
    /// - `InvariantViolation` if net pay fails to reconcile
    pub fn calculate(&self, input: &PayrollInput) -> EngineResult<PayrollResult> {
        if let Err(err) = Self::validate_input(input) {
            warn!(error = %err, "Payroll input rejected");
            return Err(err.into());
        }

        let gross = self.round(input.gross_salary);
        let cotisations = self.contributions_on(gross);

        let taxable_base = gross - cotisations.total();
        let irpp = self.round(self.brackets.progressive_tax(taxable_base));

        let available = (taxable_base - irpp).max(Decimal::ZERO);
        let autres = self.round(input.autres_retenues).min(available);
        let avantages = self.round(input.avantages);
        let net_a_payer = available - autres + avantages;

        let result = PayrollResult {
            salary_brut: gross,
            cotisations,
            retenues: Retenues { irpp, autres },
            avantages,
            taxable_base,
            net_a_payer,
        };

        if net_a_payer < Decimal::ZERO || !amounts_match(net_a_payer, result.expected_net()) {
            error!(
                net_a_payer = %net_a_payer,
                expected = %result.expected_net(),
                "Payslip failed to reconcile"
            );
            return Err(InvariantViolation::PayrollMismatch {
                expected: result.expected_net(),
                actual: net_a_payer,
            }
            .into());
        }

        debug!(
            gross = %result.salary_brut,
            cotisations = %result.cotisations.total(),
            irpp = %result.retenues.irpp,
            net = %result.net_a_payer,
            "Computed payslip"
        );

        Ok(result)
    }

    /// Each contribution is its own rate on gross, rounded on its own.
    ///
    /// A component is capped at what is left of gross, which only binds
    /// when the rates add up to 100% and rounding would overshoot.
    fn contributions_on(&self, gross: Decimal) -> Cotisations {
        let mut remaining = gross;
        let mut take = |rate: Decimal| {
            let amount = self.round(apply_percentage(gross, rate)).min(remaining);
            remaining -= amount;
            amount
        };

        Cotisations {
            cnss: take(self.rates.cnss),
            assurance: take(self.rates.assurance),
            retraite: take(self.rates.retraite),
            autres: take(self.rates.autres),
        }
    }

    fn validate_input(input: &PayrollInput) -> Result<(), InputValidationError> {
        if input.gross_salary < Decimal::ZERO {
            return Err(InputValidationError::NegativeSalary(input.gross_salary));
        }
        if input.avantages < Decimal::ZERO {
            return Err(InputValidationError::NegativeAmount {
                field: "avantages",
                value: input.avantages,
            });
        }
        if input.autres_retenues < Decimal::ZERO {
            return Err(InputValidationError::NegativeAmount {
                field: "autres_retenues",
                value: input.autres_retenues,
            });
        }
        Ok(())
    }

    fn round(&self, amount: Decimal) -> Decimal {
        money::round_for(amount, self.currency)
    }
}
