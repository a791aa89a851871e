//! Tenant chart-of-accounts mapping.

use serde::{Deserialize, Serialize};

use gescom_shared::config::{AccountConfig, AccountMappingConfig};

use super::events::PaymentMethod;
use crate::error::ConfigurationError;

/// A resolved account: number plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Account number (e.g. "411000").
    pub number: String,
    /// Display label.
    pub label: String,
}

/// Maps each accounting role to the tenant's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOfAccountsMapping {
    /// Suppliers payable.
    pub fournisseurs: AccountRef,
    /// Customers receivable.
    pub clients: AccountRef,
    /// Bank.
    pub banque: AccountRef,
    /// Cash on hand.
    pub caisse: AccountRef,
    /// Deductible VAT on purchases.
    pub tva_deductible: AccountRef,
    /// Collected VAT on sales.
    pub tva_collectee: AccountRef,
    /// Purchases expense.
    pub achats: AccountRef,
    /// Sales revenue.
    pub ventes: AccountRef,
    /// Salary expense.
    pub salaires: AccountRef,
    /// Social security bodies payable.
    pub organismes_sociaux: AccountRef,
    /// Income tax withheld payable.
    pub irpp: AccountRef,
    /// Other taxes collected on sales. Only needed by invoices carrying
    /// fixed taxes.
    pub autres_taxes: Option<AccountRef>,
    /// Other payroll deductions payable. Only needed by payslips carrying
    /// other deductions.
    pub autres_retenues: Option<AccountRef>,
}

impl ChartOfAccountsMapping {
    /// Resolves the mapping from configuration.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccount` naming the first required role that is
    /// absent or has a blank account number.
    pub fn from_config(config: &AccountMappingConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            fournisseurs: required(config.fournisseurs.as_ref(), "fournisseurs", "Fournisseurs")?,
            clients: required(config.clients.as_ref(), "clients", "Clients")?,
            banque: required(config.banque.as_ref(), "banque", "Banque")?,
            caisse: required(config.caisse.as_ref(), "caisse", "Caisse")?,
            tva_deductible: required(
                config.tva_deductible.as_ref(),
                "tva_deductible",
                "TVA déductible",
            )?,
            tva_collectee: required(
                config.tva_collectee.as_ref(),
                "tva_collectee",
                "TVA collectée",
            )?,
            achats: required(config.achats.as_ref(), "achats", "Achats")?,
            ventes: required(config.ventes.as_ref(), "ventes", "Ventes")?,
            salaires: required(config.salaires.as_ref(), "salaires", "Salaires")?,
            organismes_sociaux: required(
                config.organismes_sociaux.as_ref(),
                "organismes_sociaux",
                "Organismes sociaux",
            )?,
            irpp: required(config.irpp.as_ref(), "irpp", "IRPP")?,
            autres_taxes: optional(config.autres_taxes.as_ref(), "Autres taxes"),
            autres_retenues: optional(config.autres_retenues.as_ref(), "Autres retenues"),
        })
    }

    /// Returns the treasury account a payment method settles through.
    #[must_use]
    pub const fn treasury(&self, method: PaymentMethod) -> &AccountRef {
        match method {
            PaymentMethod::Banque => &self.banque,
            PaymentMethod::Caisse => &self.caisse,
        }
    }

    /// Returns the other-taxes account.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccount` if the tenant has not mapped it.
    pub fn autres_taxes(&self) -> Result<&AccountRef, ConfigurationError> {
        self.autres_taxes
            .as_ref()
            .ok_or(ConfigurationError::MissingAccount("autres_taxes"))
    }

    /// Returns the other-deductions account.
    ///
    /// # Errors
    ///
    /// Returns `MissingAccount` if the tenant has not mapped it.
    pub fn autres_retenues(&self) -> Result<&AccountRef, ConfigurationError> {
        self.autres_retenues
            .as_ref()
            .ok_or(ConfigurationError::MissingAccount("autres_retenues"))
    }
}

fn required(
    config: Option<&AccountConfig>,
    role: &'static str,
    default_label: &str,
) -> Result<AccountRef, ConfigurationError> {
    optional(config, default_label).ok_or(ConfigurationError::MissingAccount(role))
}

fn optional(config: Option<&AccountConfig>, default_label: &str) -> Option<AccountRef> {
    let config = config?;
    let number = config.number.trim();
    if number.is_empty() {
        return None;
    }

    let label = config
        .label
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(default_label);

    Some(AccountRef {
        number: number.to_string(),
        label: label.to_string(),
    })
}
