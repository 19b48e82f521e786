//! Currency codes and decimal precision rules for money amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` throughout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Nigerian Naira
    #[default]
    Ngn,
    /// Ghanaian Cedi
    Ghs,
    /// Kenyan Shilling
    Kes,
    /// US Dollar
    Usd,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ngn => write!(f, "NGN"),
            Self::Ghs => write!(f, "GHS"),
            Self::Kes => write!(f, "KES"),
            Self::Usd => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NGN" => Ok(Self::Ngn),
            "GHS" => Ok(Self::Ghs),
            "KES" => Ok(Self::Kes),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Largest scale a ledger amount may carry. The journal line columns are
/// `NUMERIC(19, 4)`, so anything finer would be rounded on insert.
pub const MAX_DECIMAL_SCALE: u32 = 4;

/// Returns true if `amount` is exactly representable with at most `scale`
/// fractional digits.
///
/// Trailing zeros do not count: `10.500` fits a scale of 2, `10.505` does not.
#[must_use]
pub fn fits_scale(amount: Decimal, scale: u32) -> bool {
    amount.normalize().scale() <= scale
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
