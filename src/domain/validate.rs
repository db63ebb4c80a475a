use std::error::Error;
use std::fmt;

use super::date_range::DateRange;
use super::ticker::Ticker;

/// Rejected user input. Never reaches the network layer; always recoverable
/// by correcting the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTicker,
    InvalidFormat(String),
    InvalidDate(String),
    RangeInverted { start: String, end: String },
    FutureMonth(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::EmptyTicker => write!(f, "Ticker symbol is empty"),
            ValidationError::InvalidFormat(value) => {
                write!(f, "Invalid month format '{}' (expected YYYY-MM)", value)
            }
            ValidationError::InvalidDate(value) => {
                write!(f, "Invalid calendar month '{}'", value)
            }
            ValidationError::RangeInverted { start, end } => {
                write!(f, "Start month {} is after end month {}", start, end)
            }
            ValidationError::FutureMonth(value) => {
                write!(f, "Month {} is later than the current month", value)
            }
        }
    }
}

impl Error for ValidationError {}

/// Parse and validate raw user input into a resolved ticker and a closed
/// date range. Pure function of its inputs and the current system date.
pub fn validate(
    symbol_input: &str,
    start_month: &str,
    end_month: &str,
) -> Result<(Ticker, DateRange), ValidationError> {
    let ticker = Ticker::resolve(symbol_input)?;
    let range = DateRange::from_months(start_month, end_month)?;
    Ok((ticker, range))
}
