use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO-4217 currency code, validated against `^[A-Z]{3}$` (spec §3 invariant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(code: &str) -> Result<Self, String> {
        let code = code.trim();
        let valid = code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase());
        if !valid {
            return Err(format!(
                "currency code '{code}' must match ^[A-Z]{{3}}$"
            ));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_codes() {
        assert!(CurrencyCode::parse("USD").is_ok());
        assert!(CurrencyCode::parse(" EUR ").is_ok());
    }

    #[test]
    fn rejects_invalid_codes() {
        assert!(CurrencyCode::parse("usd").is_err());
        assert!(CurrencyCode::parse("US").is_err());
        assert!(CurrencyCode::parse("DOLLAR").is_err());
    }
}
