use crate::domain::{DateRange, Ticker};
use crate::models::IndicatorSeries;

/// A request to fetch and derive one chart
#[derive(Debug, Clone)]
pub struct FetchJob {
    /// Dispatch order; the newest dispatched sequence wins the display.
    pub seq: u64,
    pub ticker: Ticker,
    pub range: DateRange,
}

/// The result returned by the worker
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub symbol: String,
    pub duration_ms: u128,

    pub result: Result<IndicatorSeries, String>,
}
