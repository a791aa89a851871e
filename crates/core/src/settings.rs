//! Validated tenant settings.
//!
//! Raw [`TenantConfig`] is plain data. [`TenantSettings::from_config`] turns
//! it into the validated objects every computation takes, so a malformed
//! setup fails here, before anything is computed.

use tracing::{debug, error};

use gescom_shared::TenantConfig;
use gescom_shared::types::Currency;

use crate::error::ConfigurationError;
use crate::ledger::{ChartOfAccountsMapping, LedgerEntryBuilder};
use crate::payroll::{BracketTable, ContributionRates, PayrollCalculator};
use crate::tax::TaxCatalog;
use crate::totals::DocumentTotalsCalculator;
use crate::words::Vocabulary;

/// Everything one tenant's computations need.
#[derive(Debug, Clone)]
pub struct TenantSettings {
    /// Currency of all amounts.
    pub currency: Currency,
    /// Tax catalog.
    pub catalog: TaxCatalog,
    /// Chart-of-accounts mapping.
    pub accounts: ChartOfAccountsMapping,
    /// Active income tax brackets.
    pub brackets: BracketTable,
    /// Active social contribution rates.
    pub rates: ContributionRates,
    /// Words for amounts in words.
    pub vocabulary: Vocabulary,
}

impl TenantSettings {
    /// Validates a raw configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` found, checking taxes,
    /// accounts, brackets, rates and vocabulary in that order.
    pub fn from_config(config: &TenantConfig) -> Result<Self, ConfigurationError> {
        let settings = Self::resolve(config).map_err(|err| {
            error!(error = %err, "Invalid tenant configuration");
            err
        })?;

        debug!(
            currency = %settings.currency,
            taxes = settings.catalog.taxes().len(),
            brackets = settings.brackets.brackets().len(),
            "Tenant settings loaded"
        );

        Ok(settings)
    }

    fn resolve(config: &TenantConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            currency: config.currency,
            catalog: TaxCatalog::from_config(&config.taxes)?,
            accounts: ChartOfAccountsMapping::from_config(&config.accounts)?,
            brackets: BracketTable::from_config(&config.payroll.brackets)?,
            rates: ContributionRates::from_config(&config.payroll.contributions)?,
            vocabulary: Vocabulary::from_config(&config.words, config.currency)?,
        })
    }

    /// Document totals calculator over this tenant's catalog.
    #[must_use]
    pub const fn totals_calculator(&self) -> DocumentTotalsCalculator<'_> {
        DocumentTotalsCalculator::new(&self.catalog, self.currency)
    }

    /// Payroll calculator over this tenant's active tables.
    #[must_use]
    pub const fn payroll_calculator(&self) -> PayrollCalculator<'_> {
        PayrollCalculator::new(&self.rates, &self.brackets, self.currency)
    }

    /// Ledger entry builder over this tenant's accounts.
    #[must_use]
    pub const fn ledger_builder(&self) -> LedgerEntryBuilder<'_> {
        LedgerEntryBuilder::new(&self.accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"
currency = "DZD"

[[taxes]]
code = "TVA19"
name = "TVA 19%"
kind = "percentage"
value = "19"

[[taxes]]
code = "TIMBRE"
name = "Droit de timbre"
kind = "fixed"
value = "5"

[accounts]
fournisseurs = { number = "401000" }
clients = { number = "411000" }
banque = { number = "512000" }
caisse = { number = "531000" }
tva_deductible = { number = "445660" }
tva_collectee = { number = "445710" }
achats = { number = "607000" }
ventes = { number = "707000" }
salaires = { number = "641000" }
organismes_sociaux = { number = "431000" }
irpp = { number = "442000" }
autres_taxes = { number = "447000" }

[payroll.contributions]
cnss = "9"

[[payroll.brackets]]
ordre = 1
min = "0"
max = "1500"
rate = "0"

[[payroll.brackets]]
ordre = 2
min = "1500"
max = "3500"
rate = "15"

[[payroll.brackets]]
ordre = 3
min = "3500"
rate = "25"
"#;

    fn config() -> TenantConfig {
        TenantConfig::from_toml_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_sample_resolves() {
        let settings = TenantSettings::from_config(&config()).unwrap();
        assert_eq!(settings.currency, Currency::Dzd);
        assert_eq!(settings.catalog.taxes().len(), 2);
        assert_eq!(settings.brackets.brackets().len(), 3);
        assert_eq!(settings.rates.cnss, dec!(9));
        assert_eq!(settings.vocabulary.decimal_places, 2);
        assert_eq!(settings.accounts.clients.number, "411000");
    }

    #[test]
    fn test_missing_account_fails_at_load() {
        let mut config = config();
        config.accounts.irpp = None;
        assert_eq!(
            TenantSettings::from_config(&config).unwrap_err(),
            ConfigurationError::MissingAccount("irpp")
        );
    }

    #[test]
    fn test_gapped_brackets_fail_at_load() {
        let mut config = config();
        config.payroll.brackets[1].min = dec!(1600);
        assert_eq!(
            TenantSettings::from_config(&config).unwrap_err(),
            ConfigurationError::BracketGap {
                previous_max: dec!(1500),
                next_min: dec!(1600),
            }
        );
    }

    #[test]
    fn test_empty_bracket_table_fails_at_load() {
        let mut config = config();
        config.payroll.brackets.clear();
        assert_eq!(
            TenantSettings::from_config(&config).unwrap_err(),
            ConfigurationError::EmptyBracketTable
        );
    }

    #[test]
    fn test_calculators_share_settings() {
        let settings = TenantSettings::from_config(&config()).unwrap();
        let payroll = settings
            .payroll_calculator()
            .calculate(&crate::payroll::PayrollInput {
                gross_salary: dec!(5000),
                ..Default::default()
            })
            .unwrap();
        // 9% CNSS leaves 4550 taxable: 2000 * 15% + 1050 * 25% = 562.50
        assert_eq!(payroll.retenues.irpp, dec!(562.50));
        assert_eq!(payroll.net_a_payer, dec!(3987.50));
    }
}
