//! Synthetic price provider.
//!
//! Produces a deterministic weekday random walk per ticker. Clearly fake
//! data: used for offline demos and tests, never mixed with real prices.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::{PricePoint, PriceSeries, Ticker};

/// Random-walk provider seeded from `(ticker, seed)`.
///
/// Like a real feed it has no prices after its `as_of` date (today unless
/// overridden), so a range reaching into the future yields fewer points.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    as_of: NaiveDate,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            as_of: chrono::Utc::now().date_naive(),
        }
    }

    /// Pin the last date with a price.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    fn rng_for(&self, ticker: &Ticker) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ticker.as_str().as_bytes());
        hasher.update(&self.seed.to_le_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Weekday closes for `[start, end]`. The walk always begins at the
    /// ticker's own anchor date so overlapping ranges agree on shared days.
    fn walk(&self, ticker: &Ticker, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
        let mut rng = self.rng_for(ticker);
        let mut price = rng.gen_range(20.0..400.0_f64);
        let mut current = walk_anchor();
        let mut points = Vec::new();

        while current <= end {
            let weekday = current.weekday();
            if weekday != Weekday::Sat && weekday != Weekday::Sun {
                let daily_return: f64 = rng.gen_range(-0.03..0.03);
                price *= 1.0 + daily_return;
                if current >= start {
                    points.push(PricePoint::new(current, price));
                }
            }
            current += chrono::Duration::days(1);
        }

        points
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(42)
    }
}

fn walk_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 3).unwrap_or(NaiveDate::MIN)
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let last = end.min(self.as_of);
        if last < walk_anchor() || last < start {
            return Err(DataError::EmptySeries {
                symbol: ticker.to_string(),
                start,
                end,
            });
        }

        let points = self.walk(ticker, start, last);
        if points.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: ticker.to_string(),
                start,
                end,
            });
        }
        tracing::debug!(ticker = %ticker, points = points.len(), "generated synthetic series");
        Ok(PriceSeries::new(ticker.clone(), points)?)
    }
}
