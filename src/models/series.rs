use chrono::NaiveDate;

use crate::analysis::indicators::{exp_smooth, raw_stochastic, trailing_mean};
use crate::config::INDICATORS;
use crate::domain::Candle;

/// The finished product of one fetch: complete daily bars in strictly
/// increasing date order, augmented with the derived indicator columns.
/// Built fresh per request and handed to the presentation layer; `None`
/// marks rows where an indicator is undefined.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    /// The resolved symbol the data was requested under.
    pub symbol: String,

    pub dates: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,

    pub ma5: Vec<Option<f64>>,
    pub ma10: Vec<Option<f64>>,
    pub ma20: Vec<Option<f64>>,
    pub ma60: Vec<Option<f64>>,

    pub rsv: Vec<Option<f64>>,
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Build the series from filtered, date-ordered bars and derive every
    /// indicator column in one pass over the struct-of-vecs layout.
    pub fn from_candles(symbol: String, candles: Vec<Candle>) -> Self {
        let len = candles.len();

        let mut dates = Vec::with_capacity(len);
        let mut open = Vec::with_capacity(len);
        let mut high = Vec::with_capacity(len);
        let mut low = Vec::with_capacity(len);
        let mut close = Vec::with_capacity(len);
        let mut volume = Vec::with_capacity(len);

        for c in &candles {
            dates.push(c.date);
            open.push(c.open);
            high.push(c.high);
            low.push(c.low);
            close.push(c.close);
            volume.push(c.volume);
        }

        let [w5, w10, w20, w60] = INDICATORS.ma_windows;
        let ma5 = trailing_mean(&close, w5);
        let ma10 = trailing_mean(&close, w10);
        let ma20 = trailing_mean(&close, w20);
        let ma60 = trailing_mean(&close, w60);

        let rsv = raw_stochastic(&high, &low, &close, INDICATORS.stochastic_window);
        let k = exp_smooth(&rsv, INDICATORS.smoothing_com);
        let d = exp_smooth(&k, INDICATORS.smoothing_com);

        Self {
            symbol,
            dates,
            open,
            high,
            low,
            close,
            volume,
            ma5,
            ma10,
            ma20,
            ma60,
            rsv,
            k,
            d,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn candle(&self, idx: usize) -> Candle {
        Candle::new(
            self.dates[idx],
            self.open[idx],
            self.high[idx],
            self.low[idx],
            self.close[idx],
            self.volume[idx],
        )
    }

    /// The moving-average overlays with their display names, shortest first.
    pub fn ma_lines(&self) -> [(&'static str, &[Option<f64>]); 4] {
        [
            ("MA5", &self.ma5),
            ("MA10", &self.ma10),
            ("MA20", &self.ma20),
            ("MA60", &self.ma60),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Candle {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        Candle::new(date, close - 0.5, close + 1.0, close - 1.0, close, 1_000.0)
    }

    #[test]
    fn columns_are_wired_in_row_order() {
        let candles: Vec<Candle> = (1..=6).map(|d| bar(d, d as f64 * 10.0)).collect();
        let series = IndicatorSeries::from_candles("TEST".into(), candles);

        assert_eq!(series.len(), 6);
        assert_eq!(series.close, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(series.candle(2).date.to_string(), "2024-03-03");

        // MA5 undefined through row 4, defined from row 5 on.
        assert!(series.ma5[3].is_none());
        assert_eq!(series.ma5[4], Some(30.0));
        assert_eq!(series.ma5[5], Some(40.0));

        // Nine-row stochastic never warms up on six rows.
        assert!(series.rsv.iter().all(Option::is_none));
        assert!(series.k.iter().all(Option::is_none));
    }

    #[test]
    fn k_and_d_follow_rsv_once_warm() {
        let candles: Vec<Candle> = (1..=12).map(|d| bar(d, 100.0 + d as f64)).collect();
        let series = IndicatorSeries::from_candles("TEST".into(), candles);

        assert!(series.rsv[7].is_none());
        assert!(series.rsv[8].is_some());
        // K seeds from the first defined RSV.
        assert_eq!(series.k[8], series.rsv[8]);
        assert_eq!(series.d[8], series.k[8]);
        assert!(series.k[11].is_some());
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = IndicatorSeries::from_candles("TEST".into(), Vec::new());
        assert!(series.is_empty());
        assert!(series.ma60.is_empty());
    }
}
