use std::error::Error;
use std::fmt;

use anyhow::Result;
use chrono::NaiveDate;
use itertools::izip;

use crate::domain::{Candle, DateRange, Ticker};
use crate::models::IndicatorSeries;

use super::provider::MarketDataProvider;
use super::raw_series::{RawColumn, RawSeries};

/// The five columns a usable daily bar needs, post-normalization.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// The provider answered, but its table cannot be turned into a usable
/// series. Carries the diagnostic context the user needs to correct the
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    NoData {
        symbol: String,
    },
    TickerNotFound {
        symbol: String,
        available: Vec<String>,
    },
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProcessingError::NoData { symbol } => {
                write!(f, "No data returned for {}", symbol)
            }
            ProcessingError::TickerNotFound { symbol, available } => {
                write!(
                    f,
                    "Ticker {} not found in the provider response (available: {})",
                    symbol,
                    available.join(", ")
                )
            }
            ProcessingError::MissingColumns { missing, found } => {
                write!(
                    f,
                    "Response is missing required columns {} (found: {})",
                    missing.join(", "),
                    found.join(", ")
                )
            }
        }
    }
}

impl Error for ProcessingError {}

/// Runs the acquire -> normalize -> filter -> derive pipeline for one
/// request. Owns nothing between calls; every invocation allocates its own
/// working data.
pub struct SeriesProcessor {
    provider: Box<dyn MarketDataProvider>,
}

impl SeriesProcessor {
    pub fn new(provider: Box<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn process(&self, ticker: &Ticker, range: &DateRange) -> Result<IndicatorSeries> {
        let raw = self
            .provider
            .fetch(std::slice::from_ref(ticker), range)
            .await?;
        Ok(process_raw(ticker, raw)?)
    }
}

/// The pure half of the pipeline: everything after acquisition.
pub fn process_raw(ticker: &Ticker, raw: RawSeries) -> Result<IndicatorSeries, ProcessingError> {
    if raw.row_count() == 0 {
        return Err(ProcessingError::NoData {
            symbol: ticker.as_str().to_owned(),
        });
    }

    let (dates, columns) = flatten(ticker, raw)?;
    let columns = canonicalize(columns);

    let found: Vec<String> = columns.iter().map(|c| c.label.clone()).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !found.iter().any(|label| label == *required))
        .map(|required| (*required).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(ProcessingError::MissingColumns { missing, found });
    }

    let candles = collect_complete_rows(&dates, &columns);
    Ok(IndicatorSeries::from_candles(
        ticker.as_str().to_owned(),
        candles,
    ))
}

/// Resolve the wire shape down to one label per column. For a dual-level
/// table the ticker is looked up at the secondary label level first, then
/// the primary; the surviving columns keep the other level's label.
fn flatten(
    ticker: &Ticker,
    raw: RawSeries,
) -> Result<(Vec<NaiveDate>, Vec<RawColumn>), ProcessingError> {
    match raw {
        RawSeries::SingleLevel { dates, columns } => Ok((dates, columns)),
        RawSeries::DualLevel { dates, columns } => {
            let symbol = ticker.as_str();

            let flat: Vec<RawColumn> = if columns.iter().any(|c| c.symbol == symbol) {
                columns
                    .into_iter()
                    .filter(|c| c.symbol == symbol)
                    .map(|c| RawColumn {
                        label: c.field,
                        values: c.values,
                    })
                    .collect()
            } else if columns.iter().any(|c| c.field == symbol) {
                columns
                    .into_iter()
                    .filter(|c| c.field == symbol)
                    .map(|c| RawColumn {
                        label: c.symbol,
                        values: c.values,
                    })
                    .collect()
            } else {
                let mut available: Vec<String> = Vec::new();
                for c in &columns {
                    if !available.contains(&c.symbol) {
                        available.push(c.symbol.clone());
                    }
                }
                return Err(ProcessingError::TickerNotFound {
                    symbol: symbol.to_owned(),
                    available,
                });
            };

            Ok((dates, flat))
        }
    }
}

/// Trim and title-case every label so downstream lookups are insensitive to
/// provider variance ("close", "CLOSE", " close " all become "Close").
fn canonicalize(columns: Vec<RawColumn>) -> Vec<RawColumn> {
    columns
        .into_iter()
        .map(|c| RawColumn {
            label: title_case(&c.label),
            values: c.values,
        })
        .collect()
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn column_values<'a>(columns: &'a [RawColumn], label: &str) -> &'a [Option<f64>] {
    columns
        .iter()
        .find(|c| c.label == label)
        .map(|c| c.values.as_slice())
        .unwrap_or(&[])
}

/// Keep only rows where every required cell is present, preserving order.
fn collect_complete_rows(dates: &[NaiveDate], columns: &[RawColumn]) -> Vec<Candle> {
    let open = column_values(columns, "Open");
    let high = column_values(columns, "High");
    let low = column_values(columns, "Low");
    let close = column_values(columns, "Close");
    let volume = column_values(columns, "Volume");

    let mut candles = Vec::with_capacity(dates.len());
    for (date, o, h, l, c, v) in izip!(dates, open, high, low, close, volume) {
        if let (Some(o), Some(h), Some(l), Some(c), Some(v)) = (o, h, l, c, v) {
            candles.push(Candle::new(*date, *o, *h, *l, *c, *v));
        }
    }
    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::raw_series::DualColumn;

    fn ticker(symbol: &str) -> Ticker {
        Ticker::resolve(symbol).unwrap()
    }

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
            .collect()
    }

    fn filled(label: &str, values: Vec<Option<f64>>) -> RawColumn {
        RawColumn {
            label: label.to_owned(),
            values,
        }
    }

    fn single_level_table(rows: u32) -> RawSeries {
        let base: Vec<Option<f64>> = (0..rows).map(|i| Some(100.0 + i as f64)).collect();
        RawSeries::SingleLevel {
            dates: dates(rows),
            columns: vec![
                filled("open", base.clone()),
                filled("HIGH", base.iter().map(|v| v.map(|x| x + 2.0)).collect()),
                filled(" low ", base.iter().map(|v| v.map(|x| x - 2.0)).collect()),
                filled("Close", base.clone()),
                filled("volume", base.iter().map(|_| Some(1_000.0)).collect()),
            ],
        }
    }

    #[test]
    fn empty_response_is_a_no_data_error() {
        let err = process_raw(&ticker("2330"), RawSeries::empty()).unwrap_err();
        assert_eq!(
            err,
            ProcessingError::NoData {
                symbol: "2330.TW".into()
            }
        );
    }

    #[test]
    fn labels_are_case_and_whitespace_insensitive() {
        let series = process_raw(&ticker("2330"), single_level_table(5)).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.symbol, "2330.TW");
        assert_eq!(series.close[0], 100.0);
        assert_eq!(series.high[0], 102.0);
    }

    #[test]
    fn missing_columns_are_named_along_with_what_was_found() {
        let raw = RawSeries::SingleLevel {
            dates: dates(3),
            columns: vec![
                filled("open", vec![Some(1.0); 3]),
                filled("close", vec![Some(1.0); 3]),
            ],
        };

        match process_raw(&ticker("2330"), raw).unwrap_err() {
            ProcessingError::MissingColumns { missing, found } => {
                assert_eq!(missing, vec!["High", "Low", "Volume"]);
                assert_eq!(found, vec!["Open", "Close"]);
            }
            other => panic!("expected missing-columns error, got {other:?}"),
        }
    }

    #[test]
    fn incomplete_rows_are_dropped_in_place() {
        let mut raw = single_level_table(5);
        if let RawSeries::SingleLevel { columns, .. } = &mut raw {
            columns[3].values[1] = None; // close missing on row 2
            columns[4].values[4] = None; // volume missing on row 5
        }

        let series = process_raw(&ticker("2330"), raw).unwrap();
        assert_eq!(series.len(), 3);
        // Remaining rows keep their relative order.
        assert_eq!(
            series.dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            ]
        );
    }

    fn dual_level_table(field_level_first: bool) -> RawSeries {
        let values: Vec<Option<f64>> = vec![Some(10.0), Some(11.0), Some(12.0)];
        let fields = ["open", "high", "low", "close", "volume"];
        let symbols = ["2330.TW", "2317.TW"];

        let columns = symbols
            .iter()
            .flat_map(|sym| {
                fields.iter().map(|field| {
                    if field_level_first {
                        DualColumn {
                            field: (*field).to_owned(),
                            symbol: (*sym).to_owned(),
                            values: values.clone(),
                        }
                    } else {
                        // Ticker at the primary level, field at the secondary.
                        DualColumn {
                            field: (*sym).to_owned(),
                            symbol: (*field).to_owned(),
                            values: values.clone(),
                        }
                    }
                })
            })
            .collect();

        RawSeries::DualLevel {
            dates: dates(3),
            columns,
        }
    }

    #[test]
    fn dual_level_resolves_at_the_secondary_label_level() {
        let series = process_raw(&ticker("2330"), dual_level_table(true)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.close, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn dual_level_falls_back_to_the_primary_label_level() {
        let series = process_raw(&ticker("2330"), dual_level_table(false)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.open, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn unknown_ticker_reports_the_available_identifiers() {
        match process_raw(&ticker("9999"), dual_level_table(true)).unwrap_err() {
            ProcessingError::TickerNotFound { symbol, available } => {
                assert_eq!(symbol, "9999.TW");
                assert_eq!(available, vec!["2330.TW", "2317.TW"]);
            }
            other => panic!("expected ticker-not-found error, got {other:?}"),
        }
    }

    #[test]
    fn derived_columns_come_back_with_the_series() {
        let series = process_raw(&ticker("2330"), single_level_table(12)).unwrap();
        assert!(series.ma5[3].is_none());
        assert!(series.ma5[4].is_some());
        assert!(series.rsv[8].is_some());
        assert_eq!(series.k[8], series.rsv[8]);
    }
}
