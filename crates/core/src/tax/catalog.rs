//! Tax catalog lookup.

use std::collections::{BTreeSet, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gescom_shared::config::{TaxConfig, TaxKindConfig};
use gescom_shared::types::TaxId;

use crate::error::{ConfigurationError, InputValidationError};

/// How a tax is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxKind {
    /// `value` is a rate in percent applied to a base amount.
    Percentage,
    /// `value` is a flat amount, independent of any base.
    Fixed,
}

impl From<TaxKindConfig> for TaxKind {
    fn from(kind: TaxKindConfig) -> Self {
        match kind {
            TaxKindConfig::Percentage => Self::Percentage,
            TaxKindConfig::Fixed => Self::Fixed,
        }
    }
}

/// A configured tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Unique identifier.
    pub id: TaxId,
    /// Tenant-facing short code (e.g. "TVA19").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Percentage or fixed.
    pub kind: TaxKind,
    /// Rate in percent, or flat amount.
    pub value: Decimal,
}

impl Tax {
    /// Creates a tax whose id is derived from its code.
    #[must_use]
    pub fn new(code: &str, name: &str, kind: TaxKind, value: Decimal) -> Self {
        Self {
            id: TaxId::from_name(code),
            code: code.to_string(),
            name: name.to_string(),
            kind,
            value,
        }
    }

    /// Returns true for rate-based taxes.
    #[must_use]
    pub fn is_percentage(&self) -> bool {
        self.kind == TaxKind::Percentage
    }
}

/// Selected taxes split by kind, each list in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicableTaxes<'a> {
    /// Rate-based taxes.
    pub percentage: Vec<&'a Tax>,
    /// Flat taxes.
    pub fixed: Vec<&'a Tax>,
}

impl ApplicableTaxes<'_> {
    /// Returns true if no tax was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.percentage.is_empty() && self.fixed.is_empty()
    }
}

/// Immutable snapshot of a tenant's taxes.
///
/// An empty catalog is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxCatalog {
    taxes: Vec<Tax>,
}

impl TaxCatalog {
    /// Builds a catalog, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids, negative values, or percentage
    /// rates above 100.
    pub fn new(taxes: Vec<Tax>) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::with_capacity(taxes.len());

        for tax in &taxes {
            if !seen.insert(tax.id) {
                return Err(ConfigurationError::DuplicateTaxId(tax.id));
            }
            if tax.value < Decimal::ZERO {
                return Err(ConfigurationError::InvalidTaxValue {
                    code: tax.code.clone(),
                    value: tax.value,
                });
            }
            if tax.is_percentage() && tax.value > Decimal::ONE_HUNDRED {
                return Err(ConfigurationError::InvalidRate {
                    name: tax.code.clone(),
                    value: tax.value,
                });
            }
        }

        Ok(Self { taxes })
    }

    /// Builds a catalog from raw configuration.
    ///
    /// # Errors
    ///
    /// See [`TaxCatalog::new`].
    pub fn from_config(configs: &[TaxConfig]) -> Result<Self, ConfigurationError> {
        let taxes = configs
            .iter()
            .map(|cfg| Tax::new(&cfg.code, &cfg.name, cfg.kind.into(), cfg.value))
            .collect();
        Self::new(taxes)
    }

    /// All taxes in catalog order.
    #[must_use]
    pub fn taxes(&self) -> &[Tax] {
        &self.taxes
    }

    /// Looks up a tax by id.
    #[must_use]
    pub fn get(&self, id: TaxId) -> Option<&Tax> {
        self.taxes.iter().find(|tax| tax.id == id)
    }

    /// Returns the selected taxes partitioned by kind, in catalog order.
    ///
    /// Ids absent from the catalog are skipped; use [`TaxCatalog::ensure_known`]
    /// first when unknown ids must be refused.
    #[must_use]
    pub fn list_applicable(&self, tax_ids: &BTreeSet<TaxId>) -> ApplicableTaxes<'_> {
        let (percentage, fixed) = self
            .taxes
            .iter()
            .filter(|tax| tax_ids.contains(&tax.id))
            .partition(|tax| tax.is_percentage());

        ApplicableTaxes { percentage, fixed }
    }

    /// Checks that every id refers to a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns the first unknown id.
    pub fn ensure_known(&self, tax_ids: &BTreeSet<TaxId>) -> Result<(), InputValidationError> {
        match tax_ids.iter().find(|id| self.get(**id).is_none()) {
            Some(id) => Err(InputValidationError::UnknownTax(*id)),
            None => Ok(()),
        }
    }
}
