use std::fmt;

use crate::config::MARKET;

use super::validate::ValidationError;

/// A resolved, exchange-qualified symbol as passed to the data provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize free-text symbol input: trim, uppercase, and qualify bare
    /// numeric codes with the default local-market suffix so e.g. `2330`
    /// resolves to `2330.TW`. Anything else passes through unchanged.
    pub fn resolve(input: &str) -> Result<Self, ValidationError> {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }

        if symbol.chars().all(|c| c.is_ascii_digit()) && !symbol.ends_with(MARKET.default_suffix) {
            return Ok(Ticker(format!("{}{}", symbol, MARKET.default_suffix)));
        }

        Ok(Ticker(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
