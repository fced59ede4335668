use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-letter currency code attached to monetary values.
///
/// Loans may carry their own code; everything else falls back to the
/// system default configured via `DEFAULT_CURRENCY`. Codes are stored
/// uppercase so formatting and comparisons stay case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rounds a decimal value to the two-decimal display scale
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp(2)
    }

    /// Formats an amount for display strings: `"KES 1200.00"`
    pub fn format_amount(&self, amount: Decimal) -> String {
        format!("{} {:.2}", self.0, amount.round_dp(2))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("Invalid currency code: {}", s));
        }
        Ok(CurrencyCode(trimmed.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
