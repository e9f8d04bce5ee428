//! The price-source seam: [`DataProvider`] plus the errors it can raise.
//!
//! Yahoo Finance and the synthetic random walk both sit behind this trait, and
//! the pipeline tests plug in canned stubs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceSeries, SeriesError, Ticker};

/// Why a provider could not hand back a series.
///
/// Both front ends show these verbatim, so messages name the symbol where one
/// is known.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not reach the price source: {0}")]
    Network(String),

    #[error("unknown symbol {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("price source answered HTTP {status} for {symbol}")]
    HttpStatus { symbol: String, status: u16 },

    #[error("unexpected response from the price source: {0}")]
    UnexpectedResponse(String),

    #[error("no prices for {symbol} between {start} and {end}")]
    EmptySeries {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("price series rejected: {0}")]
    MalformedSeries(#[from] SeriesError),

    #[error("could not build HTTP client: {0}")]
    Client(String),
}

/// Where the prices came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Yahoo,
    Synthetic,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Yahoo => "Yahoo Finance",
            DataSource::Synthetic => "synthetic",
        }
    }
}

/// Trait for price providers.
///
/// `fetch` blocks until the whole series is available. Implementations own
/// their timeout and retry policy; callers treat any error as "data
/// unavailable for this request".
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Which source this provider draws from.
    fn source(&self) -> DataSource;

    /// Fetch daily closing prices for `ticker` over the inclusive range
    /// `[start, end]`.
    fn fetch(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;
}
