//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    // --- CANDLESTICKS ---
    // Taiwan market convention: up days red, down days green.
    pub candle_bullish_color: Color32,
    pub candle_bearish_color: Color32,
    pub candle_width_pct: f64,  // 0.0 to 1.0 (relative to one day of x axis)
    pub candle_wick_width: f32, // Pixels

    // --- OVERLAYS ---
    /// Line colors for MA5 / MA10 / MA20 / MA60 in that order.
    pub ma_colors: [Color32; 4],
    pub ma_line_width: f32,

    // --- OSCILLATOR PANEL ---
    pub k_line_color: Color32,
    pub d_line_color: Color32,
    pub oscillator_line_width: f32,

    // --- VOLUME PANEL ---
    pub volume_bar_width_pct: f64,
    pub volume_bar_opacity: f32,

    /// Vertical share of the three panels (price, volume, oscillator).
    pub panel_shares: [f32; 3],
    /// Target number of x-axis tick labels.
    pub x_tick_target: f64,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    candle_bullish_color: Color32::from_rgb(239, 83, 80), // red = up
    candle_bearish_color: Color32::from_rgb(38, 166, 154), // green = down
    candle_width_pct: 0.6,
    candle_wick_width: 1.0,

    ma_colors: [
        Color32::from_rgb(255, 215, 0),   // MA5  gold
        Color32::from_rgb(0, 191, 255),   // MA10 deep sky blue
        Color32::from_rgb(255, 105, 180), // MA20 pink
        Color32::from_rgb(186, 85, 211),  // MA60 orchid
    ],
    ma_line_width: 1.5,

    k_line_color: Color32::from_rgb(100, 149, 237), // cornflower blue
    d_line_color: Color32::from_rgb(255, 165, 0),   // orange
    oscillator_line_width: 1.5,

    volume_bar_width_pct: 0.8,
    volume_bar_opacity: 0.8,

    // 3:1:1 split: price, volume, oscillator
    panel_shares: [0.6, 0.2, 0.2],
    x_tick_target: 8.0,
};
