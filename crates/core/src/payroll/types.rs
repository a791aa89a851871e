//! Payroll value types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gescom_shared::config::ContributionRatesConfig;

use crate::error::ConfigurationError;

/// Employee contribution rates, in percent of gross salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    /// Social security.
    pub cnss: Decimal,
    /// Insurance.
    pub assurance: Decimal,
    /// Retirement.
    pub retraite: Decimal,
    /// Any other contribution.
    pub autres: Decimal,
}

impl ContributionRates {
    /// Validates a set of rates.
    ///
    /// # Errors
    ///
    /// Returns an error if a rate lies outside [0, 100] or the rates sum
    /// above 100.
    pub fn new(
        cnss: Decimal,
        assurance: Decimal,
        retraite: Decimal,
        autres: Decimal,
    ) -> Result<Self, ConfigurationError> {
        let rates = Self {
            cnss,
            assurance,
            retraite,
            autres,
        };

        for (name, value) in [
            ("cnss", cnss),
            ("assurance", assurance),
            ("retraite", retraite),
            ("autres", autres),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(ConfigurationError::InvalidRate {
                    name: name.to_string(),
                    value,
                });
            }
        }

        let total = rates.total();
        if total > Decimal::ONE_HUNDRED {
            return Err(ConfigurationError::ContributionRatesExceedGross(total));
        }

        Ok(rates)
    }

    /// Builds rates from raw configuration.
    ///
    /// # Errors
    ///
    /// See [`ContributionRates::new`].
    pub fn from_config(cfg: &ContributionRatesConfig) -> Result<Self, ConfigurationError> {
        Self::new(cfg.cnss, cfg.assurance, cfg.retraite, cfg.autres)
    }

    /// Sum of all rates.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cnss + self.assurance + self.retraite + self.autres
    }
}

/// One payslip to compute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// Gross salary.
    pub gross_salary: Decimal,
    /// Bonuses and indemnities, added after tax and never taxed.
    #[serde(default)]
    pub avantages: Decimal,
    /// Other deductions (advances, garnishments), taken after tax.
    #[serde(default)]
    pub autres_retenues: Decimal,
}

/// Employee contributions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cotisations {
    /// Social security.
    pub cnss: Decimal,
    /// Insurance.
    pub assurance: Decimal,
    /// Retirement.
    pub retraite: Decimal,
    /// Other.
    pub autres: Decimal,
}

impl Cotisations {
    /// Sum of all contributions.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cnss + self.assurance + self.retraite + self.autres
    }
}

/// Deductions taken after contributions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retenues {
    /// Progressive income tax.
    pub irpp: Decimal,
    /// Other deductions actually applied.
    pub autres: Decimal,
}

impl Retenues {
    /// Sum of all deductions.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.irpp + self.autres
    }
}

/// A computed payslip.
///
/// `net_a_payer == salary_brut - cotisations - retenues + avantages`, and
/// `net_a_payer >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Gross salary.
    pub salary_brut: Decimal,
    /// Employee contributions.
    pub cotisations: Cotisations,
    /// Income tax and other deductions.
    pub retenues: Retenues,
    /// Untaxed bonuses.
    pub avantages: Decimal,
    /// Gross minus contributions; the income-tax base.
    pub taxable_base: Decimal,
    /// Net pay.
    pub net_a_payer: Decimal,
}

impl PayrollResult {
    /// Net pay recomputed from the components.
    #[must_use]
    pub fn expected_net(&self) -> Decimal {
        self.salary_brut - self.cotisations.total() - self.retenues.total() + self.avantages
    }
}
