use chrono::NaiveDate;
use eframe::egui::{Stroke, Ui, Vec2b};
use egui_plot::{
    Axis, AxisHints, Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, PlotUi, Polygon,
    VPlacement,
};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{Candle, CandleKind};
use crate::models::IndicatorSeries;

/// Shared id so the three panels pan/zoom and hover together on x.
const X_LINK_GROUP: &str = "chart_x";

/// Renders one IndicatorSeries as the classic three-panel stack:
/// candlesticks + moving averages, volume, K/D oscillator.
pub struct PlotView;

impl PlotView {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&mut self, ui: &mut Ui, series: &IndicatorSeries) {
        if series.is_empty() {
            ui.label("Every row in the response was incomplete; nothing to plot.");
            return;
        }

        let total_height = ui.available_height();
        let [price_share, volume_share, oscillator_share] = PLOT_CONFIG.panel_shares;

        self.price_panel(ui, series, total_height * price_share);
        self.volume_panel(ui, series, total_height * volume_share);
        self.oscillator_panel(ui, series, total_height * oscillator_share);
    }

    fn price_panel(&self, ui: &mut Ui, series: &IndicatorSeries, height: f32) {
        let dates_for_label = series.dates.clone();

        Plot::new("price_panel")
            .height(height)
            .link_axis(X_LINK_GROUP, Vec2b::new(true, false))
            .link_cursor(X_LINK_GROUP, Vec2b::new(true, false))
            .legend(Legend::default())
            .show_axes(Vec2b::new(false, true))
            .x_grid_spacer(integer_marks)
            .allow_scroll(false)
            .label_formatter(move |name, value| {
                let idx = value.x.round() as isize;
                if idx < 0 || idx as usize >= dates_for_label.len() {
                    return String::new();
                }
                let date = dates_for_label[idx as usize];
                if name.is_empty() {
                    format!("{}\n{:.2}", date, value.y)
                } else {
                    format!("{}  {}\n{:.2}", name, date, value.y)
                }
            })
            .show(ui, |plot_ui| {
                for idx in 0..series.len() {
                    draw_candle(plot_ui, idx as f64, &series.candle(idx));
                }

                for (slot, (name, values)) in series.ma_lines().into_iter().enumerate() {
                    plot_ui.line(
                        Line::new(name, PlotPoints::new(defined_points(values)))
                            .color(PLOT_CONFIG.ma_colors[slot])
                            .width(PLOT_CONFIG.ma_line_width),
                    );
                }
            });
    }

    fn volume_panel(&self, ui: &mut Ui, series: &IndicatorSeries, height: f32) {
        let bars: Vec<Bar> = (0..series.len())
            .map(|idx| {
                let candle = series.candle(idx);
                let color = candle_color(&candle).linear_multiply(PLOT_CONFIG.volume_bar_opacity);
                Bar::new(idx as f64, candle.volume)
                    .width(PLOT_CONFIG.volume_bar_width_pct)
                    .fill(color)
            })
            .collect();

        Plot::new("volume_panel")
            .height(height)
            .link_axis(X_LINK_GROUP, Vec2b::new(true, false))
            .link_cursor(X_LINK_GROUP, Vec2b::new(true, false))
            .show_axes(Vec2b::new(false, true))
            .x_grid_spacer(integer_marks)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new("Volume", bars));
            });
    }

    fn oscillator_panel(&self, ui: &mut Ui, series: &IndicatorSeries, height: f32) {
        Plot::new("oscillator_panel")
            .height(height)
            .link_axis(X_LINK_GROUP, Vec2b::new(true, false))
            .link_cursor(X_LINK_GROUP, Vec2b::new(true, false))
            .legend(Legend::default())
            .custom_x_axes(vec![date_axis(series.dates.clone())])
            .x_grid_spacer(integer_marks)
            .include_y(0.0)
            .include_y(100.0)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("K", PlotPoints::new(defined_points(&series.k)))
                        .color(PLOT_CONFIG.k_line_color)
                        .width(PLOT_CONFIG.oscillator_line_width),
                );
                plot_ui.line(
                    Line::new("D", PlotPoints::new(defined_points(&series.d)))
                        .color(PLOT_CONFIG.d_line_color)
                        .width(PLOT_CONFIG.oscillator_line_width),
                );
            });
    }
}

impl Default for PlotView {
    fn default() -> Self {
        Self::new()
    }
}

fn candle_color(candle: &Candle) -> eframe::egui::Color32 {
    match candle.kind() {
        CandleKind::Bullish => PLOT_CONFIG.candle_bullish_color,
        CandleKind::Bearish => PLOT_CONFIG.candle_bearish_color,
    }
}

fn draw_candle(plot_ui: &mut PlotUi, x: f64, candle: &Candle) {
    let color = candle_color(candle);

    // Wick
    plot_ui.line(
        Line::new("", PlotPoints::new(vec![[x, candle.low], [x, candle.high]]))
            .color(color)
            .width(PLOT_CONFIG.candle_wick_width),
    );

    // Body (a doji still gets a sliver so the row stays visible)
    let (bottom, top_raw) = candle.body_range();
    let top = if (top_raw - bottom).abs() < f64::EPSILON {
        bottom * 1.0001
    } else {
        top_raw
    };

    let half_w = PLOT_CONFIG.candle_width_pct / 2.0;
    let pts = vec![
        [x - half_w, bottom],
        [x + half_w, bottom],
        [x + half_w, top],
        [x - half_w, top],
    ];
    plot_ui.polygon(
        Polygon::new("", PlotPoints::new(pts))
            .fill_color(color)
            .stroke(Stroke::NONE),
    );
}

/// Plot points for the defined slots of an indicator column.
fn defined_points(values: &[Option<f64>]) -> Vec<[f64; 2]> {
    values
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| value.map(|v| [idx as f64, v]))
        .collect()
}

/// Grid marks snapped to whole row indexes in 1/2/5-style steps.
fn integer_marks(input: egui_plot::GridInput) -> Vec<GridMark> {
    let (min, max) = input.bounds;
    let step = nice_step(max - min, PLOT_CONFIG.x_tick_target);

    let start = (min / step).ceil() as i64;
    let end = (max / step).floor() as i64;

    (start..=end)
        .map(|i| GridMark {
            value: i as f64 * step,
            step_size: step,
        })
        .collect()
}

// Human-friendly step size (1, 2, 5, 10, 20, 50...), never below one row.
fn nice_step(range: f64, target_count: f64) -> f64 {
    let raw_step = (range / target_count.max(1.0)).max(1.0);
    let mag = 10.0_f64.powi(raw_step.log10().floor() as i32);
    let normalized = raw_step / mag;

    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };

    (nice * mag).max(1.0)
}

// The bottom panel owns the shared time axis: marks land on row indexes and
// label as the row's calendar date.
fn date_axis(dates: Vec<NaiveDate>) -> AxisHints<'static> {
    AxisHints::new(Axis::X)
        .formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            match dates.get(idx as usize) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => String::new(),
            }
        })
        .placement(VPlacement::Bottom)
}
