//! Daily closes from Yahoo Finance's v8 chart endpoint.
//!
//! Connection failures and timeouts are retried with a doubling delay. Any
//! HTTP answer, 429 included, is final. The endpoint is unofficial and its
//! JSON shape can change without notice, so every structural surprise becomes
//! [`DataError::UnexpectedResponse`].

use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::{PricePoint, PriceSeries, Ticker};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::time::Duration;

const CHART_ENDPOINT: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

// Yahoo rejects requests without a browser-like agent.
const BROWSER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

#[derive(Debug, Deserialize)]
struct Envelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<Candles>>,
    error: Option<Fault>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Candles {
    #[serde(rename = "timestamp")]
    timestamps: Option<Vec<i64>>,
    indicators: Columns,
}

#[derive(Debug, Deserialize)]
struct Columns {
    #[serde(rename = "quote")]
    raw: Vec<RawColumn>,
    #[serde(rename = "adjclose")]
    adjusted: Option<Vec<AdjustedColumn>>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjustedColumn {
    adjclose: Vec<Option<f64>>,
}

impl Fault {
    fn into_error(self, symbol: &str) -> DataError {
        if self.code == "Not Found" {
            DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            }
        } else {
            DataError::UnexpectedResponse(format!("{} ({})", self.description, self.code))
        }
    }
}

/// Tunables for [`YahooProvider`].
#[derive(Debug, Clone)]
pub struct YahooOptions {
    pub timeout: Duration,
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each later one.
    pub base_delay: Duration,
}

impl Default for YahooOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Outcome of one HTTP round trip.
enum Attempt {
    Finished(Result<Vec<PricePoint>, DataError>),
    Transient(reqwest::Error),
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    options: YahooOptions,
}

impl YahooProvider {
    pub fn new(options: YahooOptions) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .user_agent(BROWSER_AGENT)
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;
        Ok(Self { client, options })
    }

    /// `period2` is exclusive on Yahoo's side, so it points at midnight after `end`.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let midnight = |day: NaiveDate| day.and_time(NaiveTime::MIN).and_utc().timestamp();
        let from = midnight(start);
        let to = midnight(end.succ_opt().unwrap_or(end));
        format!("{CHART_ENDPOINT}/{symbol}?interval=1d&period1={from}&period2={to}&includeAdjustedClose=true")
    }

    /// Turn a decoded chart into points inside `[start, end]`.
    ///
    /// Adjusted closes win over raw closes. A row with neither is skipped.
    /// When a date repeats (Yahoo appends the live bar to the history), the
    /// later row replaces the earlier one.
    fn points_from(
        symbol: &str,
        envelope: Envelope,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let ChartBody { result, error } = envelope.chart;
        let candles = match (result, error) {
            (Some(list), _) => list.into_iter().next().ok_or_else(|| {
                DataError::UnexpectedResponse("chart result list is empty".into())
            })?,
            (None, Some(fault)) => return Err(fault.into_error(symbol)),
            (None, None) => {
                return Err(DataError::UnexpectedResponse(
                    "chart has neither result nor error".into(),
                ))
            }
        };

        let Columns { raw, adjusted } = candles.indicators;
        let raw = raw
            .into_iter()
            .next()
            .map(|c| c.close)
            .ok_or_else(|| DataError::UnexpectedResponse("chart has no quote column".into()))?;
        let adjusted = adjusted
            .and_then(|cols| cols.into_iter().next())
            .map(|c| c.adjclose)
            .unwrap_or_default();

        let cell = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

        // No timestamps at all means a known symbol with no sessions in range.
        let timestamps = candles.timestamps.unwrap_or_default();
        let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.into_iter().enumerate() {
            let date = DateTime::from_timestamp(ts, 0)
                .map(|t| t.date_naive())
                .ok_or_else(|| DataError::UnexpectedResponse(format!("timestamp {ts} out of range")))?;
            if !(start..=end).contains(&date) {
                continue;
            }
            let Some(close) = cell(&adjusted, i).or_else(|| cell(&raw, i)) else {
                continue;
            };
            if let Some(last) = points.last_mut().filter(|p| p.date == date) {
                last.close = close;
            } else {
                points.push(PricePoint::new(date, close));
            }
        }
        Ok(points)
    }

    fn attempt(&self, url: &str, symbol: &str, start: NaiveDate, end: NaiveDate) -> Attempt {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => return Attempt::Transient(e),
            Err(e) => return Attempt::Finished(Err(DataError::Network(e.to_string()))),
        };

        let status = response.status();
        let outcome = if status == reqwest::StatusCode::NOT_FOUND {
            Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
        } else if !status.is_success() {
            Err(DataError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            })
        } else {
            response
                .json::<Envelope>()
                .map_err(|e| DataError::UnexpectedResponse(format!("{symbol}: {e}")))
                .and_then(|envelope| Self::points_from(symbol, envelope, start, end))
        };
        Attempt::Finished(outcome)
    }

    fn download(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let mut delay = self.options.base_delay;
        let mut attempt = 0;
        loop {
            tracing::debug!(symbol, attempt, %url, "requesting chart");
            match self.attempt(&url, symbol, start, end) {
                Attempt::Finished(outcome) => return outcome,
                Attempt::Transient(e) if attempt < self.options.max_retries => {
                    tracing::warn!(symbol, attempt, ?delay, error = %e, "chart request failed, retrying");
                    std::thread::sleep(delay);
                    delay *= 2;
                    attempt += 1;
                }
                Attempt::Transient(e) => return Err(DataError::Network(e.to_string())),
            }
        }
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn source(&self) -> DataSource {
        DataSource::Yahoo
    }

    fn fetch(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let points = self.download(ticker.as_str(), start, end)?;
        if points.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: ticker.to_string(),
                start,
                end,
            });
        }
        Ok(PriceSeries::new(ticker.clone(), points)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn parse(json: &str, start: &str, end: &str) -> Result<Vec<PricePoint>, DataError> {
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        YahooProvider::points_from("AAPL", envelope, d(start), d(end))
    }

    // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC (US market open)
    const THREE_DAYS: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{"close": [185.64, 184.25, null]}],
                    "adjclose": [{"adjclose": [184.94, null, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn prefers_adjusted_close_and_falls_back_to_close() {
        let points = parse(THREE_DAYS, "2024-01-01", "2024-01-31").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, d("2024-01-02"));
        assert_eq!(points[0].close, 184.94);
        assert_eq!(points[1].date, d("2024-01-03"));
        assert_eq!(points[1].close, 184.25);
    }

    #[test]
    fn drops_rows_outside_requested_range() {
        let points = parse(THREE_DAYS, "2024-01-03", "2024-01-31").unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, d("2024-01-03"));
    }

    #[test]
    fn duplicate_date_keeps_later_row() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704205800, 1704218400],
                    "indicators": {"quote": [{"close": [100.0, 101.5]}]}
                }],
                "error": null
            }
        }"#;
        let points = parse(json, "2024-01-01", "2024-01-31").unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 101.5);
    }

    #[test]
    fn not_found_fault_maps_to_symbol_not_found() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        let err = parse(json, "2024-01-01", "2024-01-31").unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn other_fault_is_unexpected_response() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Bad Request", "description": "Invalid input"}
            }
        }"#;
        let err = parse(json, "2024-01-01", "2024-01-31").unwrap_err();
        assert!(matches!(err, DataError::UnexpectedResponse(_)));
    }

    #[test]
    fn missing_timestamps_yield_no_points() {
        let json = r#"{
            "chart": {
                "result": [{"indicators": {"quote": [{"close": []}]}}],
                "error": null
            }
        }"#;
        assert!(parse(json, "2024-01-01", "2024-01-31").unwrap().is_empty());
    }

    #[test]
    fn chart_url_covers_end_date_inclusively() {
        let url = YahooProvider::chart_url("AAPL", d("2024-01-01"), d("2024-01-31"));
        assert!(url.contains("/AAPL?"));
        assert!(url.contains("period1=1704067200"));
        // 2024-02-01T00:00:00Z
        assert!(url.contains("period2=1706745600"));
        assert!(url.contains("interval=1d"));
    }
}
