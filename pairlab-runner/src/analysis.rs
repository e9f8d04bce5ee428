//! Pair analysis pipeline: validate → fetch → align → summarize/correlate.
//!
//! `run_analysis()` is the single entry point shared by the CLI and the TUI.
//! It performs no I/O of its own beyond the provider's fetch, keeps no state
//! between calls, and maps every failure onto one of three request-level
//! error kinds.

use std::fmt;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pairlab_core::data::{align, DataError, DataProvider, DataSource, TickerCatalog};
use pairlab_core::domain::Ticker;
use pairlab_core::stats::{correlation, summarize, Leg, StatsError, SummaryStats};

/// Request-level error categories, used for UI styling and CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    DataUnavailable,
    InsufficientData,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "Invalid input",
            ErrorKind::DataUnavailable => "Data unavailable",
            ErrorKind::InsufficientData => "Insufficient data",
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::InvalidInput => 2,
            ErrorKind::DataUnavailable => 3,
            ErrorKind::InsufficientData => 4,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why an analysis request failed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("data unavailable for {ticker}: {source}")]
    DataUnavailable {
        ticker: Ticker,
        #[source]
        source: DataError,
    },

    #[error("insufficient data: {what} needs at least {needed}, found {found}")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        found: usize,
    },

    /// Prices were fetched but cannot be summarized (non-finite or out of range).
    #[error("insufficient data: prices for {ticker} are unusable: {source}")]
    UnusablePrices {
        ticker: Ticker,
        #[source]
        source: StatsError,
    },
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::InvalidInput(_) => ErrorKind::InvalidInput,
            AnalysisError::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            AnalysisError::InsufficientData { .. } | AnalysisError::UnusablePrices { .. } => {
                ErrorKind::InsufficientData
            }
        }
    }

    /// Map a statistics failure on `ticker`'s column.
    fn from_stats(err: StatsError, ticker: &Ticker) -> Self {
        match err {
            StatsError::InsufficientData { what, needed, found } => {
                AnalysisError::InsufficientData { what, needed, found }
            }
            source => AnalysisError::UnusablePrices {
                ticker: ticker.clone(),
                source,
            },
        }
    }
}

/// A validated pair-analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub first: Ticker,
    pub second: Ticker,
    /// Inclusive.
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
}

impl AnalysisRequest {
    /// Validate raw ticker input (labels or bare codes) and a date range.
    ///
    /// With `allow_custom` false, both tickers must be catalog members.
    /// The same ticker on both sides is accepted.
    pub fn new(
        first: &str,
        second: &str,
        start: NaiveDate,
        end: NaiveDate,
        catalog: &TickerCatalog,
        allow_custom: bool,
    ) -> Result<Self, AnalysisError> {
        let first = resolve_ticker(first, catalog, allow_custom)?;
        let second = resolve_ticker(second, catalog, allow_custom)?;
        if end < start {
            return Err(AnalysisError::InvalidInput(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self {
            first,
            second,
            start,
            end,
        })
    }
}

fn resolve_ticker(
    input: &str,
    catalog: &TickerCatalog,
    allow_custom: bool,
) -> Result<Ticker, AnalysisError> {
    let ticker = catalog
        .resolve(input)
        .map_err(|e| AnalysisError::InvalidInput(e.to_string()))?;
    if !allow_custom && !catalog.contains(&ticker) {
        return Err(AnalysisError::InvalidInput(format!(
            "{ticker} is not in the ticker list and custom tickers are disabled"
        )));
    }
    Ok(ticker)
}

/// `[end - lookback_days, end]`, with the start clamped to the earliest
/// representable date.
pub fn default_range(end: NaiveDate, lookback_days: u32) -> (NaiveDate, NaiveDate) {
    let start = end
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN);
    (start, end)
}

/// Shift a date by whole months, clamping to the month's last day.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Pearson coefficient, or the reason it does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Correlation {
    Defined { value: f64 },
    Undefined { reason: String },
}

impl Correlation {
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Defined { value } => Some(*value),
            Correlation::Undefined { .. } => None,
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Defined { value } => write!(f, "{value:.2}"),
            Correlation::Undefined { reason } => write!(f, "undefined: {reason}"),
        }
    }
}

/// Everything a presentation shell needs to render one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub first: Ticker,
    pub second: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub source: DataSource,
    pub correlation: Correlation,
    pub first_summary: SummaryStats,
    pub second_summary: SummaryStats,
    /// Shared trading days, ascending.
    pub dates: Vec<NaiveDate>,
    pub first_prices: Vec<f64>,
    pub second_prices: Vec<f64>,
    /// Dates only the first ticker traded.
    pub first_only_dropped: usize,
    /// Dates only the second ticker traded.
    pub second_only_dropped: usize,
}

impl AnalysisReport {
    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn title(&self) -> String {
        format!("Correlation between {} and {}", self.first, self.second)
    }
}

/// Run one analysis end to end.
pub fn run_analysis(
    provider: &dyn DataProvider,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, AnalysisError> {
    let fetch = |ticker: &Ticker| {
        provider
            .fetch(ticker, request.start, request.end)
            .map_err(|source| match source {
                // A known symbol with no sessions in range (weekend, holiday,
                // future dates) leaves nothing to align.
                DataError::EmptySeries { .. } => {
                    tracing::info!(%ticker, "no trading days in range");
                    AnalysisError::InsufficientData {
                        what: "aligned trading days",
                        needed: 2,
                        found: 0,
                    }
                }
                source => {
                    tracing::warn!(%ticker, error = %source, "fetch failed");
                    AnalysisError::DataUnavailable {
                        ticker: ticker.clone(),
                        source,
                    }
                }
            })
            .map(|series| {
                tracing::debug!(
                    %ticker,
                    points = series.len(),
                    from = ?series.first_date(),
                    to = ?series.last_date(),
                    "fetched"
                );
                series
            })
    };

    let first_series = fetch(&request.first)?;
    let second_series = fetch(&request.second)?;
    let table = align(&first_series, &second_series);

    if table.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            what: "aligned trading days",
            needed: 2,
            found: table.len(),
        });
    }

    let first_prices = table.first_prices();
    let second_prices = table.second_prices();
    let first_summary =
        summarize(&first_prices).map_err(|e| AnalysisError::from_stats(e, &request.first))?;
    let second_summary =
        summarize(&second_prices).map_err(|e| AnalysisError::from_stats(e, &request.second))?;

    let correlation = match correlation(&table) {
        Ok(value) => Correlation::Defined { value },
        Err(StatsError::ZeroVariance { leg }) => {
            let ticker = match leg {
                Leg::First => &request.first,
                Leg::Second => &request.second,
            };
            Correlation::Undefined {
                reason: format!("{ticker} price is constant over the range"),
            }
        }
        Err(e) => return Err(AnalysisError::from_stats(e, &request.first)),
    };

    tracing::info!(
        first = %request.first,
        second = %request.second,
        rows = table.len(),
        dropped = table.first_only + table.second_only,
        correlation = %correlation,
        "analysis complete"
    );

    Ok(AnalysisReport {
        first: request.first.clone(),
        second: request.second.clone(),
        start: request.start,
        end: request.end,
        source: provider.source(),
        correlation,
        first_summary,
        second_summary,
        dates: table.dates(),
        first_prices,
        second_prices,
        first_only_dropped: table.first_only,
        second_only_dropped: table.second_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn request_accepts_labels_and_codes() {
        let catalog = TickerCatalog::popular();
        let req =
            AnalysisRequest::new("🍎 AAPL", "msft", d("2024-01-01"), d("2024-02-01"), &catalog, false)
                .unwrap();
        assert_eq!(req.first.as_str(), "AAPL");
        assert_eq!(req.second.as_str(), "MSFT");
    }

    #[test]
    fn custom_ticker_needs_permission() {
        let catalog = TickerCatalog::popular();
        let denied =
            AnalysisRequest::new("SPY", "AAPL", d("2024-01-01"), d("2024-02-01"), &catalog, false);
        assert_eq!(denied.unwrap_err().kind(), ErrorKind::InvalidInput);

        let allowed =
            AnalysisRequest::new("SPY", "AAPL", d("2024-01-01"), d("2024-02-01"), &catalog, true);
        assert!(allowed.is_ok());
    }

    #[test]
    fn malformed_ticker_is_invalid_even_when_custom_allowed() {
        let catalog = TickerCatalog::popular();
        let err = AnalysisRequest::new("", "AAPL", d("2024-01-01"), d("2024-02-01"), &catalog, true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn reversed_range_is_invalid() {
        let catalog = TickerCatalog::popular();
        let err =
            AnalysisRequest::new("AAPL", "MSFT", d("2024-02-01"), d("2024-01-01"), &catalog, false)
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("before start"));
    }

    #[test]
    fn single_day_range_is_a_valid_request() {
        let catalog = TickerCatalog::popular();
        assert!(
            AnalysisRequest::new("AAPL", "AAPL", d("2024-01-02"), d("2024-01-02"), &catalog, false)
                .is_ok()
        );
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            ErrorKind::InvalidInput.exit_code(),
            ErrorKind::DataUnavailable.exit_code(),
            ErrorKind::InsufficientData.exit_code(),
        ];
        assert_eq!(codes, [2, 3, 4]);
    }

    #[test]
    fn default_range_looks_back() {
        let (start, end) = default_range(d("2024-12-31"), 365);
        assert_eq!(start, d("2024-01-01"));
        assert_eq!(end, d("2024-12-31"));
    }

    #[test]
    fn huge_lookback_clamps_instead_of_panicking() {
        let (start, end) = default_range(d("2024-12-31"), u32::MAX);
        assert_eq!(start, NaiveDate::MIN);
        assert_eq!(end, d("2024-12-31"));
    }

    #[test]
    fn unusable_prices_are_insufficient_data() {
        let ticker = Ticker::parse("AAPL").unwrap();
        let err = AnalysisError::from_stats(StatsError::NonFiniteValue { index: 3 }, &ticker);
        assert!(matches!(err, AnalysisError::UnusablePrices { .. }));
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(err.to_string().contains("AAPL"));

        let short = AnalysisError::from_stats(
            StatsError::InsufficientData {
                what: "summary statistics",
                needed: 2,
                found: 1,
            },
            &ticker,
        );
        assert!(matches!(short, AnalysisError::InsufficientData { found: 1, .. }));
    }

    #[test]
    fn shift_months_clamps_to_month_end() {
        assert_eq!(shift_months(d("2024-03-31"), -1), d("2024-02-29"));
        assert_eq!(shift_months(d("2024-01-15"), 2), d("2024-03-15"));
    }

    #[test]
    fn correlation_display() {
        assert_eq!(Correlation::Defined { value: 0.98765 }.to_string(), "0.99");
        let undefined = Correlation::Undefined {
            reason: "AAPL price is constant over the range".into(),
        };
        assert!(undefined.to_string().starts_with("undefined:"));
        assert_eq!(undefined.value(), None);
    }

    #[test]
    fn correlation_serializes_tagged() {
        let json = serde_json::to_string(&Correlation::Defined { value: 0.5 }).unwrap();
        assert_eq!(json, r#"{"status":"defined","value":0.5}"#);
    }
}
