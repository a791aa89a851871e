//! Currency vocabulary for amounts in words.

use serde::{Deserialize, Serialize};

use gescom_shared::config::VocabularyConfig;
use gescom_shared::types::Currency;

use crate::error::ConfigurationError;

/// Highest supported number of fraction digits.
pub const MAX_DECIMAL_PLACES: u32 = 6;

/// Words naming a currency and its fraction unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Unit, singular ("dinar").
    pub word_singular: String,
    /// Unit, plural ("dinars").
    pub word_plural: String,
    /// Fraction unit, singular ("centime").
    pub word_fraction_singular: String,
    /// Fraction unit, plural ("centimes").
    pub word_fraction_plural: String,
    /// Number of fraction digits.
    pub decimal_places: u32,
}

impl Vocabulary {
    /// Creates a vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDecimalPlaces` above [`MAX_DECIMAL_PLACES`].
    pub fn new(
        word_singular: &str,
        word_plural: &str,
        word_fraction_singular: &str,
        word_fraction_plural: &str,
        decimal_places: u32,
    ) -> Result<Self, ConfigurationError> {
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigurationError::InvalidDecimalPlaces(decimal_places));
        }

        Ok(Self {
            word_singular: word_singular.to_string(),
            word_plural: word_plural.to_string(),
            word_fraction_singular: word_fraction_singular.to_string(),
            word_fraction_plural: word_fraction_plural.to_string(),
            decimal_places,
        })
    }

    /// Builds the vocabulary from configuration. Decimal places default to
    /// the currency's precision.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDecimalPlaces` above [`MAX_DECIMAL_PLACES`].
    pub fn from_config(
        config: &VocabularyConfig,
        currency: Currency,
    ) -> Result<Self, ConfigurationError> {
        Self::new(
            &config.word_singular,
            &config.word_plural,
            &config.word_fraction_singular,
            &config.word_fraction_plural,
            config.decimal_places.unwrap_or_else(|| currency.decimal_places()),
        )
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            word_singular: "dinar".to_string(),
            word_plural: "dinars".to_string(),
            word_fraction_singular: "centime".to_string(),
            word_fraction_plural: "centimes".to_string(),
            decimal_places: 2,
        }
    }
}
