//! Progressive income-tax bracket table.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gescom_shared::config::BracketConfig;

use crate::error::ConfigurationError;
use crate::money::apply_percentage;

/// One band of the income-tax ladder: `[min, max)` taxed at `rate` percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Position in the ladder.
    pub ordre: u32,
    /// Lower bound, inclusive.
    pub min: Decimal,
    /// Upper bound, exclusive; `None` means unbounded.
    pub max: Option<Decimal>,
    /// Rate in percent.
    pub rate: Decimal,
}

impl TaxBracket {
    /// Tax due on the part of `base` that falls inside this bracket.
    #[must_use]
    pub fn tax_on(&self, base: Decimal) -> Decimal {
        if base <= self.min {
            return Decimal::ZERO;
        }
        let upper = self.max.map_or(base, |max| base.min(max));
        apply_percentage(upper - self.min, self.rate)
    }
}

/// A validated bracket table.
///
/// Brackets are ordered by `ordre` and tile `[0, ∞)` exactly: the first
/// starts at zero, each starts where the previous one stops, and only the
/// last is unbounded. A table that cannot be built is a configuration
/// error, raised when the tenant configuration is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates and orders a bracket table.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` describing the first defect found.
    pub fn new(mut brackets: Vec<TaxBracket>) -> Result<Self, ConfigurationError> {
        if brackets.is_empty() {
            return Err(ConfigurationError::EmptyBracketTable);
        }

        let mut seen = HashSet::with_capacity(brackets.len());
        for bracket in &brackets {
            if !seen.insert(bracket.ordre) {
                return Err(ConfigurationError::DuplicateBracketOrder(bracket.ordre));
            }
        }
        brackets.sort_by_key(|b| b.ordre);

        for bracket in &brackets {
            Self::validate_bracket(bracket)?;
        }

        let first_min = brackets[0].min;
        if !first_min.is_zero() {
            return Err(ConfigurationError::BracketTableMustStartAtZero(first_min));
        }

        for pair in brackets.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            let Some(previous_max) = previous.max else {
                return Err(ConfigurationError::UnboundedBracketNotLast(previous.ordre));
            };
            if previous_max < next.min {
                return Err(ConfigurationError::BracketGap {
                    previous_max,
                    next_min: next.min,
                });
            }
            if previous_max > next.min {
                return Err(ConfigurationError::BracketOverlap {
                    previous_max,
                    next_min: next.min,
                });
            }
        }

        if let Some(max) = brackets.last().and_then(|b| b.max) {
            return Err(ConfigurationError::LastBracketBounded(max));
        }

        Ok(Self { brackets })
    }

    /// Builds a table from raw configuration.
    ///
    /// # Errors
    ///
    /// See [`BracketTable::new`].
    pub fn from_config(configs: &[BracketConfig]) -> Result<Self, ConfigurationError> {
        let brackets = configs
            .iter()
            .map(|cfg| TaxBracket {
                ordre: cfg.ordre,
                min: cfg.min,
                max: cfg.max,
                rate: cfg.rate,
            })
            .collect();
        Self::new(brackets)
    }

    fn validate_bracket(bracket: &TaxBracket) -> Result<(), ConfigurationError> {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE_HUNDRED {
            return Err(ConfigurationError::InvalidRate {
                name: format!("bracket {}", bracket.ordre),
                value: bracket.rate,
            });
        }
        if let Some(max) = bracket.max
            && max <= bracket.min
        {
            return Err(ConfigurationError::InvalidBracketBounds {
                ordre: bracket.ordre,
                min: bracket.min,
                max,
            });
        }
        Ok(())
    }

    /// Brackets in ladder order.
    #[must_use]
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Progressive tax on `taxable_base`, unrounded.
    ///
    /// Each bracket taxes only the slice of the base inside its own range.
    #[must_use]
    pub fn progressive_tax(&self, taxable_base: Decimal) -> Decimal {
        self.brackets.iter().map(|b| b.tax_on(taxable_base)).sum()
    }
}
