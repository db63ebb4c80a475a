mod root;
mod state;

pub(crate) use state::ChartState;

pub use root::App;
