//! Daily closing prices for one ticker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ticker::Ticker;

/// One trading day's closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Rejection reasons when building a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("{ticker}: duplicate date {date}")]
    DuplicateDate { ticker: Ticker, date: NaiveDate },

    #[error("{ticker}: close on {date} is not a finite number ({close})")]
    InvalidClose {
        ticker: Ticker,
        date: NaiveDate,
        close: f64,
    },
}

/// Closing prices for one ticker, sorted by date ascending with unique dates.
///
/// Only constructible through [`PriceSeries::new`], so the ordering and
/// uniqueness invariants always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: Ticker,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sort `points` by date and validate them.
    pub fn new(ticker: Ticker, mut points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        points.sort_by_key(|p| p.date);

        for pair in points.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(SeriesError::DuplicateDate {
                    ticker,
                    date: pair[0].date,
                });
            }
        }
        if let Some(bad) = points.iter().find(|p| !p.close.is_finite()) {
            return Err(SeriesError::InvalidClose {
                ticker,
                date: bad.date,
                close: bad.close,
            });
        }

        Ok(Self { ticker, points })
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}
