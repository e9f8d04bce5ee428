//! Domain types for PairLab

pub mod series;
pub mod ticker;

pub use series::{PricePoint, PriceSeries, SeriesError};
pub use ticker::{Ticker, TickerError, MAX_TICKER_LEN};
