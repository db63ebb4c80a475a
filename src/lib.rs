// Core modules
pub mod analysis;
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod ui;

// Re-export commonly used types outside of crate
pub use app::App;
pub use domain::{DateRange, Ticker, ValidationError, validate};
pub use models::IndicatorSeries;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pre-fill the ticker symbol field (e.g. 2330 or AAPL)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Pre-fill the start month field (yyyy-mm)
    #[arg(long)]
    pub start: Option<String>,

    /// Pre-fill the end month field (yyyy-mm)
    #[arg(long)]
    pub end: Option<String>,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> App {
    App::new(cc, args)
}
