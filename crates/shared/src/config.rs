//! Tenant configuration management.
//!
//! Raw, unvalidated configuration as read from files and the environment.
//! The core turns these into validated objects (tax catalog, account
//! mapping, bracket table) and rejects malformed setups at that point.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppResult;
use crate::types::Currency;

/// Configuration of one tenant, as consumed by the computation engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenantConfig {
    /// Settlement currency; drives rounding precision.
    #[serde(default)]
    pub currency: Currency,
    /// Configured taxes, in catalog order.
    #[serde(default)]
    pub taxes: Vec<TaxConfig>,
    /// Chart-of-accounts mapping used for automatic postings.
    #[serde(default)]
    pub accounts: AccountMappingConfig,
    /// Payroll contribution rates and income-tax brackets.
    #[serde(default)]
    pub payroll: PayrollConfig,
    /// Currency vocabulary for amounts in words.
    #[serde(default)]
    pub words: VocabularyConfig,
}

/// Kind of a configured tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxKindConfig {
    /// Rate applied to a base amount (e.g. TVA 19).
    Percentage,
    /// Flat amount (e.g. stamp duty).
    Fixed,
}

/// A tax as written in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxConfig {
    /// Stable code; the tax id is derived from it.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Percentage or fixed.
    pub kind: TaxKindConfig,
    /// Rate in percent, or flat amount.
    pub value: Decimal,
}

/// A ledger account reference.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Account number in the tenant's chart of accounts (e.g. "411000").
    pub number: String,
    /// Optional label; a default label is used when absent.
    #[serde(default)]
    pub label: Option<String>,
}

/// Chart-of-accounts mapping, every entry optional at this stage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountMappingConfig {
    /// Suppliers (e.g. 401).
    pub fournisseurs: Option<AccountConfig>,
    /// Customers (e.g. 411).
    pub clients: Option<AccountConfig>,
    /// Bank (e.g. 512).
    pub banque: Option<AccountConfig>,
    /// Cash (e.g. 531).
    pub caisse: Option<AccountConfig>,
    /// Deductible VAT (e.g. 4456).
    pub tva_deductible: Option<AccountConfig>,
    /// Collected VAT (e.g. 4457).
    pub tva_collectee: Option<AccountConfig>,
    /// Purchases (e.g. 607).
    pub achats: Option<AccountConfig>,
    /// Sales (e.g. 707).
    pub ventes: Option<AccountConfig>,
    /// Salaries expense (e.g. 641).
    pub salaires: Option<AccountConfig>,
    /// Social security bodies (e.g. 431).
    pub organismes_sociaux: Option<AccountConfig>,
    /// Income tax withheld (e.g. 442).
    pub irpp: Option<AccountConfig>,
    /// Other taxes collected, such as stamp duty. Only needed when used.
    pub autres_taxes: Option<AccountConfig>,
    /// Other payroll deductions. Only needed when used.
    pub autres_retenues: Option<AccountConfig>,
}

/// Payroll tables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayrollConfig {
    /// Employee contribution rates, in percent of gross salary.
    #[serde(default)]
    pub contributions: ContributionRatesConfig,
    /// Progressive income-tax brackets.
    #[serde(default)]
    pub brackets: Vec<BracketConfig>,
}

/// Employee contribution rates, in percent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContributionRatesConfig {
    /// Social security.
    #[serde(default)]
    pub cnss: Decimal,
    /// Insurance.
    #[serde(default)]
    pub assurance: Decimal,
    /// Retirement.
    #[serde(default)]
    pub retraite: Decimal,
    /// Any other contribution.
    #[serde(default)]
    pub autres: Decimal,
}

/// One income-tax bracket.
#[derive(Debug, Clone, Deserialize)]
pub struct BracketConfig {
    /// Position in the ladder.
    pub ordre: u32,
    /// Lower bound (inclusive).
    pub min: Decimal,
    /// Upper bound (exclusive); absent for the top bracket.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// Rate in percent.
    pub rate: Decimal,
}

/// Words used to spell out amounts.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyConfig {
    /// Currency unit, singular ("dinar").
    #[serde(default = "default_word_singular")]
    pub word_singular: String,
    /// Currency unit, plural ("dinars").
    #[serde(default = "default_word_plural")]
    pub word_plural: String,
    /// Fraction unit, singular ("centime").
    #[serde(default = "default_fraction_singular")]
    pub word_fraction_singular: String,
    /// Fraction unit, plural ("centimes").
    #[serde(default = "default_fraction_plural")]
    pub word_fraction_plural: String,
    /// Fraction digits; defaults to the currency's precision.
    #[serde(default)]
    pub decimal_places: Option<u32>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            word_singular: default_word_singular(),
            word_plural: default_word_plural(),
            word_fraction_singular: default_fraction_singular(),
            word_fraction_plural: default_fraction_plural(),
            decimal_places: None,
        }
    }
}

fn default_word_singular() -> String {
    "dinar".to_string()
}

fn default_word_plural() -> String {
    "dinars".to_string()
}

fn default_fraction_singular() -> String {
    "centime".to_string()
}

fn default_fraction_plural() -> String {
    "centimes".to_string()
}

impl TenantConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, the explicit `path` if given,
    /// then `GESCOM__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or decoded.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("GESCOM").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid tenant configuration.
    pub fn from_toml_str(toml: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
