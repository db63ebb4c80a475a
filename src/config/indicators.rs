pub struct IndicatorConfig {
    /// Trailing windows for the simple moving averages, ascending.
    pub ma_windows: [usize; 4],
    /// Trailing window for the raw stochastic value.
    pub stochastic_window: usize,
    /// Center-of-mass of the K/D exponential smoothing (alpha = 1/(com+1)).
    pub smoothing_com: f64,
}

pub const INDICATORS: IndicatorConfig = IndicatorConfig {
    ma_windows: [5, 10, 20, 60],
    stochastic_window: 9,
    smoothing_com: 2.0,
};
