use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::config::MARKET;
use crate::domain::{DateRange, Ticker};

use super::raw_series::{DualColumn, RawColumn, RawSeries};

/// Abstract interface for fetching daily market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch daily OHLCV rows for the given symbols over a closed date
    /// range. A batch of more than one symbol comes back dual-level
    /// labeled; an unknown symbol yields an empty series, not an error.
    async fn fetch(&self, symbols: &[Ticker], range: &DateRange) -> Result<RawSeries>;
}

/// Provider backed by the Yahoo Finance v8 chart endpoint.
pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(MARKET.user_agent)
            .build()
            .expect("failed to construct http client");
        Self { client }
    }

    async fn fetch_one(&self, symbol: &Ticker, range: &DateRange) -> Result<Option<SymbolFrame>> {
        let url = format!("{}/{}", MARKET.chart_base_url, symbol);

        // The endpoint treats period2 as exclusive; push it one day past the
        // closed range end so the final trading day is included.
        let period1 = day_start_epoch(range.start())?;
        let period2 = day_start_epoch(range.end().succ_opt().unwrap_or(range.end()))?;

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", MARKET.bar_interval.to_string()),
                ("events", "div,split".to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("chart request failed for {}", symbol))?;

        let body = response
            .text()
            .await
            .with_context(|| format!("chart response unreadable for {}", symbol))?;

        parse_chart_payload(symbol.as_str(), &body)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch(&self, symbols: &[Ticker], range: &DateRange) -> Result<RawSeries> {
        match symbols {
            [] => Ok(RawSeries::empty()),
            [symbol] => Ok(match self.fetch_one(symbol, range).await? {
                Some(frame) => RawSeries::SingleLevel {
                    dates: frame.dates,
                    columns: frame.columns,
                },
                None => RawSeries::empty(),
            }),
            _ => {
                let mut dates: Vec<NaiveDate> = Vec::new();
                let mut columns: Vec<DualColumn> = Vec::new();

                for symbol in symbols {
                    let Some(frame) = self.fetch_one(symbol, range).await? else {
                        continue;
                    };
                    if columns.is_empty() {
                        dates = frame.dates;
                    } else if frame.dates != dates {
                        bail!("misaligned trading calendars in batched response");
                    }
                    for col in frame.columns {
                        columns.push(DualColumn {
                            field: col.label,
                            symbol: symbol.as_str().to_owned(),
                            values: col.values,
                        });
                    }
                }

                Ok(RawSeries::DualLevel { dates, columns })
            }
        }
    }
}

fn day_start_epoch(date: NaiveDate) -> Result<i64> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid date {}", date))?;
    Ok(midnight.and_utc().timestamp())
}

/// One symbol's rows straight off the wire, labels untouched (the processor
/// canonicalizes them).
#[derive(Debug)]
pub(crate) struct SymbolFrame {
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) columns: Vec<RawColumn>,
}

// --- Wire payload ---

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartNode,
}

#[derive(Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Deserialize, Default)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Decode a chart response body. `Ok(None)` means the service answered
/// "no such symbol / no rows"; transport-level or unexpected service errors
/// propagate unchanged.
pub(crate) fn parse_chart_payload(symbol: &str, body: &str) -> Result<Option<SymbolFrame>> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .with_context(|| format!("malformed chart payload for {}", symbol))?;

    if let Some(err) = envelope.chart.error {
        if err.code.eq_ignore_ascii_case("not found") {
            log::warn!("chart api found no data for {}", symbol);
            return Ok(None);
        }
        bail!(
            "chart api error for {}: {}: {}",
            symbol,
            err.code,
            err.description.unwrap_or_default()
        );
    }

    let Some(result) = envelope.chart.result.and_then(|mut r| {
        if r.is_empty() { None } else { Some(r.remove(0)) }
    }) else {
        return Ok(None);
    };

    let mut dates = Vec::with_capacity(result.timestamp.len());
    for ts in &result.timestamp {
        let dt = DateTime::from_timestamp(*ts, 0)
            .with_context(|| format!("invalid timestamp {} for {}", ts, symbol))?;
        dates.push(dt.date_naive());
    }

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let rows = dates.len();
    let columns = vec![
        column("open", quote.open, rows),
        column("high", quote.high, rows),
        column("low", quote.low, rows),
        column("close", quote.close, rows),
        column("volume", quote.volume, rows),
    ];

    Ok(Some(SymbolFrame { dates, columns }))
}

/// A field the service omitted or truncated is padded with nulls so every
/// column stays row-aligned.
fn column(label: &str, mut values: Vec<Option<f64>>, rows: usize) -> RawColumn {
    values.resize(rows, None);
    RawColumn {
        label: label.to_owned(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_keeps_nulls() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "2330.TW"},
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": {"quote": [{
                        "open": [590.0, 593.0, 595.0],
                        "high": [595.0, 598.0, 601.0],
                        "low": [588.0, 591.0, 594.0],
                        "close": [593.0, null, 600.0],
                        "volume": [21000000, 18000000, 25000000]
                    }]}
                }],
                "error": null
            }
        }"#;

        let frame = parse_chart_payload("2330.TW", body).unwrap().unwrap();
        assert_eq!(frame.dates.len(), 3);
        assert_eq!(frame.dates[0].to_string(), "2024-01-02");
        assert_eq!(frame.columns.len(), 5);

        let close = frame.columns.iter().find(|c| c.label == "close").unwrap();
        assert_eq!(close.values, vec![Some(593.0), None, Some(600.0)]);
        let volume = frame.columns.iter().find(|c| c.label == "volume").unwrap();
        assert_eq!(volume.values[2], Some(25_000_000.0));
    }

    #[test]
    fn not_found_answer_becomes_empty() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        assert!(parse_chart_payload("NOPE.TW", body).unwrap().is_none());
    }

    #[test]
    fn other_service_errors_propagate() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Too Many Requests", "description": "Rate limited"}
            }
        }"#;

        let err = parse_chart_payload("2330.TW", body).unwrap_err();
        assert!(err.to_string().contains("Too Many Requests"));
    }

    #[test]
    fn short_field_vectors_are_padded_to_row_count() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000],
                    "indicators": {"quote": [{
                        "open": [590.0],
                        "high": [595.0, 598.0],
                        "low": [588.0, 591.0],
                        "close": [593.0, 596.0]
                    }]}
                }],
                "error": null
            }
        }"#;

        let frame = parse_chart_payload("2330.TW", body).unwrap().unwrap();
        let open = frame.columns.iter().find(|c| c.label == "open").unwrap();
        assert_eq!(open.values, vec![Some(590.0), None]);
        let volume = frame.columns.iter().find(|c| c.label == "volume").unwrap();
        assert_eq!(volume.values, vec![None, None]);
    }
}
