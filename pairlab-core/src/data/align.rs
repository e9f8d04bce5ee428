//! Two-series time alignment.
//!
//! Joins two price series on date, keeping only dates present in both
//! (inner join). Dates held by only one series are dropped, never filled,
//! so no missing value can reach the statistics.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

use crate::domain::{PriceSeries, Ticker};

/// One shared trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub first: f64,
    pub second: f64,
}

/// Both series restricted to their common dates, ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedTable {
    pub first: Ticker,
    pub second: Ticker,
    pub rows: Vec<AlignedRow>,
    /// Dates only the first series had.
    pub first_only: usize,
    /// Dates only the second series had.
    pub second_only: usize,
}

impl AlignedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn first_prices(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.first).collect()
    }

    pub fn second_prices(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.second).collect()
    }
}

/// Inner-join two series on date.
///
/// Both inputs are sorted with unique dates (a [`PriceSeries`] invariant),
/// so a single merge pass suffices.
pub fn align(first: &PriceSeries, second: &PriceSeries) -> AlignedTable {
    let a = first.points();
    let b = second.points();
    let mut rows = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                rows.push(AlignedRow {
                    date: a[i].date,
                    first: a[i].close,
                    second: b[j].close,
                });
                i += 1;
                j += 1;
            }
        }
    }

    AlignedTable {
        first: first.ticker().clone(),
        second: second.ticker().clone(),
        first_only: a.len() - rows.len(),
        second_only: b.len() - rows.len(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;

    fn series(symbol: &str, rows: &[(&str, f64)]) -> PriceSeries {
        let points = rows
            .iter()
            .map(|(date, close)| {
                PricePoint::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), *close)
            })
            .collect();
        PriceSeries::new(Ticker::parse(symbol).unwrap(), points).unwrap()
    }

    #[test]
    fn align_drops_dates_missing_from_either_side() {
        let spy = series(
            "SPY",
            &[("2024-01-02", 100.0), ("2024-01-03", 101.0), ("2024-01-04", 102.0)],
        );
        // QQQ missing 2024-01-03, has an extra 2024-01-05
        let qqq = series(
            "QQQ",
            &[("2024-01-02", 200.0), ("2024-01-04", 202.0), ("2024-01-05", 203.0)],
        );

        let table = align(&spy, &qqq);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].first, 100.0);
        assert_eq!(table.rows[0].second, 200.0);
        assert_eq!(table.rows[1].first, 102.0);
        assert_eq!(table.rows[1].second, 202.0);
        assert_eq!(table.first_only, 1);
        assert_eq!(table.second_only, 1);
        assert!(table.rows.iter().all(|r| !r.first.is_nan() && !r.second.is_nan()));
    }

    #[test]
    fn identical_calendars_keep_every_row() {
        let a = series("AAPL", &[("2024-01-02", 1.0), ("2024-01-03", 2.0)]);
        let b = series("MSFT", &[("2024-01-02", 3.0), ("2024-01-03", 4.0)]);
        let table = align(&a, &b);
        assert_eq!(table.len(), 2);
        assert_eq!(table.first_prices(), vec![1.0, 2.0]);
        assert_eq!(table.second_prices(), vec![3.0, 4.0]);
        assert_eq!(table.first_only + table.second_only, 0);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let a = series("AAPL", &[]);
        let b = series("MSFT", &[("2024-01-02", 3.0)]);
        let table = align(&a, &b);
        assert!(table.is_empty());
        assert_eq!(table.second_only, 1);
    }

    #[test]
    fn tickers_are_carried_through() {
        let a = series("AAPL", &[("2024-01-02", 1.0)]);
        let b = series("MSFT", &[("2024-01-02", 2.0)]);
        let table = align(&a, &b);
        assert_eq!(table.first.as_str(), "AAPL");
        assert_eq!(table.second.as_str(), "MSFT");
    }
}
