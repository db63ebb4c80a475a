use crate::models::IndicatorSeries;

/// What the central display area is showing. A new dispatch replaces the
/// whole state, so no stale chart survives into the next attempt.
#[derive(Debug, Default)]
pub(crate) enum ChartState {
    #[default]
    Idle,
    Loading,
    Ready(IndicatorSeries),
    Failed(String),
}
