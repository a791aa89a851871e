//! Currencies and their monetary precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; this module only knows
//! how many decimal places each currency settles to.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Algerian Dinar
    #[default]
    Dzd,
    /// Moroccan Dirham
    Mad,
    /// Tunisian Dinar (millimes, 3 places)
    Tnd,
    /// Kuwaiti Dinar (fils, 3 places)
    Kwd,
    /// Euro
    Eur,
    /// US Dollar
    Usd,
}

impl Currency {
    /// Number of decimal places amounts in this currency are rounded to.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        match self {
            Self::Tnd | Self::Kwd => 3,
            Self::Dzd | Self::Mad | Self::Eur | Self::Usd => 2,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dzd => write!(f, "DZD"),
            Self::Mad => write!(f, "MAD"),
            Self::Tnd => write!(f, "TND"),
            Self::Kwd => write!(f, "KWD"),
            Self::Eur => write!(f, "EUR"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DZD" => Ok(Self::Dzd),
            "MAD" => Ok(Self::Mad),
            "TND" => Ok(Self::Tnd),
            "KWD" => Ok(Self::Kwd),
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
