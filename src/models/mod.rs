mod series;

pub use series::IndicatorSeries;
