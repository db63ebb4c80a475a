use chrono::{Datelike, Local, NaiveDate};

use super::validate::ValidationError;

/// A year-month pair at month precision, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Accepts the literal `YYYY-MM` pattern only. A shape mismatch is a
    /// format error; a correctly shaped but impossible month (e.g. `2024-13`)
    /// is a date error.
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let bytes = raw.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(ValidationError::InvalidFormat(raw.to_owned()));
        }

        let year: i32 = raw[..4]
            .parse()
            .map_err(|_| ValidationError::InvalidDate(raw.to_owned()))?;
        let month: u32 = raw[5..]
            .parse()
            .map_err(|_| ValidationError::InvalidDate(raw.to_owned()))?;
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidDate(raw.to_owned()));
        }

        Ok(YearMonth { year, month })
    }

    fn first_day(self) -> Result<NaiveDate, ValidationError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| ValidationError::InvalidDate(format!("{:04}-{:02}", self.year, self.month)))
    }

    fn last_day(self) -> Result<NaiveDate, ValidationError> {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| ValidationError::InvalidDate(format!("{:04}-{:02}", self.year, self.month)))
    }
}

/// A closed calendar interval: the 1st of the start month through the last
/// day of the end month. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range from two `YYYY-MM` strings, validated against the
    /// current system date.
    pub fn from_months(start_month: &str, end_month: &str) -> Result<Self, ValidationError> {
        Self::from_months_at(start_month, end_month, Local::now().date_naive())
    }

    pub(crate) fn from_months_at(
        start_month: &str,
        end_month: &str,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let start = YearMonth::parse(start_month)?;
        let end = YearMonth::parse(end_month)?;

        if start > end {
            return Err(ValidationError::RangeInverted {
                start: start_month.to_owned(),
                end: end_month.to_owned(),
            });
        }

        let current = YearMonth {
            year: today.year(),
            month: today.month(),
        };
        if end > current {
            // start > current is implied by start <= end
            let offending = if start > current { start_month } else { end_month };
            return Err(ValidationError::FutureMonth(offending.to_owned()));
        }

        Ok(DateRange {
            start: start.first_day()?,
            end: end.last_day()?,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn range(start: &str, end: &str) -> Result<DateRange, ValidationError> {
        DateRange::from_months_at(start, end, today())
    }

    #[test]
    fn expands_to_first_and_last_day_of_month() {
        let r = range("2024-03", "2024-04").unwrap();
        assert_eq!(r.start(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(r.end(), NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
    }

    #[test]
    fn leap_year_february_ends_on_the_29th() {
        let leap = range("2024-02", "2024-02").unwrap();
        assert_eq!(leap.end().day(), 29);

        let common = range("2023-02", "2023-02").unwrap();
        assert_eq!(common.end().day(), 28);
    }

    #[test]
    fn december_end_rolls_into_next_year_correctly() {
        let r = range("2024-12", "2024-12").unwrap();
        assert_eq!(r.end(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn malformed_strings_fail_with_format_error() {
        for bad in ["2024/01", "2024-1", "202401", "24-01", "2024-001", "abcd-ef"] {
            match range(bad, "2024-02") {
                Err(ValidationError::InvalidFormat(v)) => assert_eq!(v, bad),
                other => panic!("expected format error for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn impossible_month_fails_with_date_error_not_range_error() {
        // End before start AND an impossible start month: the date error wins.
        match range("2024-13", "2024-01") {
            Err(ValidationError::InvalidDate(v)) => assert_eq!(v, "2024-13"),
            other => panic!("expected date error, got {other:?}"),
        }
        assert!(matches!(
            range("2024-01", "2024-00"),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            range("2024-05", "2024-04"),
            Err(ValidationError::RangeInverted { .. })
        ));
    }

    #[test]
    fn future_months_are_rejected() {
        assert!(matches!(
            range("2025-07", "2025-08"),
            Err(ValidationError::FutureMonth(_))
        ));
        // End month in the future is enough even when start is valid.
        assert!(matches!(
            range("2025-01", "2025-07"),
            Err(ValidationError::FutureMonth(_))
        ));
    }

    #[test]
    fn current_month_is_allowed() {
        let r = range("2025-06", "2025-06").unwrap();
        assert_eq!(r.end(), NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }
}
