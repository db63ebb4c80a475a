mod processor;
mod provider;
mod raw_series;

pub use processor::{ProcessingError, SeriesProcessor, process_raw};
pub use provider::{MarketDataProvider, YahooProvider};
pub use raw_series::{DualColumn, RawColumn, RawSeries};
