use eframe::{
    Frame,
    egui::{CentralPanel, Color32, Context, Grid, Key, RichText, TextEdit, TopBottomPanel},
};

use crate::{
    Cli,
    app::ChartState,
    domain::validate,
    engine::ChartEngine,
    ui::PlotView,
};

/// All interface state lives here and is only touched from the UI thread;
/// the pipeline itself knows nothing about this struct.
pub struct App {
    symbol_input: String,
    start_input: String,
    end_input: String,

    engine: ChartEngine,
    state: ChartState,
    plot_view: PlotView,
}

impl App {
    pub(crate) fn new(_cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        Self {
            symbol_input: args.symbol.unwrap_or_default(),
            start_input: args.start.unwrap_or_default(),
            end_input: args.end.unwrap_or_default(),
            engine: ChartEngine::new(),
            state: ChartState::Idle,
            plot_view: PlotView::new(),
        }
    }

    /// Validate the form and hand the request to the background worker.
    /// The display area is cleared up front so a failed attempt never shows
    /// leftovers from the previous chart.
    fn start_download(&mut self) {
        match validate(&self.symbol_input, &self.start_input, &self.end_input) {
            Ok((ticker, range)) => {
                self.state = ChartState::Loading;
                self.engine.dispatch(ticker, range);
            }
            Err(e) => {
                self.state = ChartState::Failed(e.to_string());
            }
        }
    }

    fn drain_engine(&mut self) {
        if let Some(outcome) = self.engine.poll() {
            log::info!(
                "displaying outcome #{} for {} ({}ms)",
                outcome.seq,
                outcome.symbol,
                outcome.duration_ms
            );
            self.state = match outcome.result {
                Ok(series) => ChartState::Ready(series),
                Err(message) => ChartState::Failed(message),
            };
        }
    }

    fn render_input_panel(&mut self, ctx: &Context) {
        let mut fetch_requested = false;

        TopBottomPanel::top("inputs").show(ctx, |ui| {
            ui.add_space(6.0);
            Grid::new("input_grid").num_columns(2).show(ui, |ui| {
                ui.label("Ticker symbol (e.g. 2330.TW):");
                let symbol_edit = ui.add(
                    TextEdit::singleline(&mut self.symbol_input).hint_text("2330"),
                );
                ui.end_row();

                ui.label("Start month (yyyy-mm):");
                let start_edit = ui.add(
                    TextEdit::singleline(&mut self.start_input).hint_text("2024-01"),
                );
                ui.end_row();

                ui.label("End month (yyyy-mm):");
                let end_edit = ui.add(
                    TextEdit::singleline(&mut self.end_input).hint_text("2024-06"),
                );
                ui.end_row();

                let submitted = [&symbol_edit, &start_edit, &end_edit]
                    .iter()
                    .any(|r| r.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)));
                if submitted {
                    fetch_requested = true;
                }
            });

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("Download & plot").clicked() {
                    fetch_requested = true;
                }
                if self.engine.is_busy() {
                    ui.spinner();
                    ui.label("Downloading data...");
                }
            });
            ui.add_space(6.0);
        });

        if fetch_requested {
            self.start_download();
        }
    }

    fn render_chart_panel(&mut self, ctx: &Context) {
        let Self {
            state, plot_view, ..
        } = self;

        CentralPanel::default().show(ctx, |ui| match state {
            ChartState::Idle => {
                ui.centered_and_justified(|ui| {
                    ui.label("Enter a ticker and a month range, then download.");
                });
            }
            ChartState::Loading => {
                // Keep repainting so the spinner animates and poll() keeps
                // running until the worker reports back.
                ctx.request_repaint();
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            ChartState::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(message.as_str())
                            .color(Color32::from_rgb(255, 100, 100)),
                    );
                });
            }
            ChartState::Ready(series) => {
                ui.heading(format!("{} daily chart", series.symbol));
                plot_view.render(ui, series);
            }
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.drain_engine();
        self.render_input_panel(ctx);
        self.render_chart_panel(ctx);
    }
}
