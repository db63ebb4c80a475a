use chrono::NaiveDate;

/// One column of a single-level table.
#[derive(Debug, Clone)]
pub struct RawColumn {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// One column of a dual-level table, labeled with a (field, symbol) pair.
#[derive(Debug, Clone)]
pub struct DualColumn {
    pub field: String,
    pub symbol: String,
    pub values: Vec<Option<f64>>,
}

/// The provider's wire shape, resolved once at ingestion. Providers that
/// batch several symbols into one response label columns on two levels;
/// a single-symbol response stays flat. Cells keep the provider's nulls
/// until the row filter runs.
#[derive(Debug, Clone)]
pub enum RawSeries {
    SingleLevel {
        dates: Vec<NaiveDate>,
        columns: Vec<RawColumn>,
    },
    DualLevel {
        dates: Vec<NaiveDate>,
        columns: Vec<DualColumn>,
    },
}

impl RawSeries {
    pub fn empty() -> Self {
        RawSeries::SingleLevel {
            dates: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            RawSeries::SingleLevel { dates, .. } => dates.len(),
            RawSeries::DualLevel { dates, .. } => dates.len(),
        }
    }
}
