mod candle;
mod date_range;
mod ticker;
mod validate;

pub use candle::{Candle, CandleKind};
pub use date_range::DateRange;
pub use ticker::Ticker;
pub use validate::{ValidationError, validate};
