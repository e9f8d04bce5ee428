//! Dashboard state, owned by the UI thread.
//!
//! The selection, the last report and the status line live here. Analyses
//! are handed to the worker and come back over a channel.

use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDate;

use pairlab_core::data::TickerCatalog;
use pairlab_core::domain::Ticker;
use pairlab_runner::{
    default_range, shift_months, AnalysisReport, AnalysisRequest, AppConfig, ErrorKind,
};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Sidebar rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    First,
    Second,
    Start,
    End,
    Analyze,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::First,
        Field::Second,
        Field::Start,
        Field::End,
        Field::Analyze,
    ];

    pub fn index(self) -> usize {
        match self {
            Field::First => 0,
            Field::Second => 1,
            Field::Start => 2,
            Field::End => 3,
            Field::Analyze => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::First => "First stock",
            Field::Second => "Second stock",
            Field::Start => "Start date",
            Field::End => "End date",
            Field::Analyze => "Analyze",
        }
    }

    pub fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    pub fn prev(self) -> Field {
        Field::ALL[(self.index() + Field::ALL.len() - 1) % Field::ALL.len()]
    }

    pub fn is_ticker(self) -> bool {
        matches!(self, Field::First | Field::Second)
    }

    pub fn is_date(self) -> bool {
        matches!(self, Field::Start | Field::End)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    /// Free-text entry for a ticker or a date.
    Edit { field: Field, buffer: String },
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub focus: Field,

    // Selection
    pub catalog: TickerCatalog,
    pub allow_custom: bool,
    pub first: Ticker,
    pub second: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,

    // Results
    pub report: Option<AnalysisReport>,
    pub in_flight: bool,
    pub last_error: Option<ErrorKind>,

    // Worker channels
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Status line and overlays
    pub status_message: Option<(String, StatusLevel)>,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        today: NaiveDate,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> anyhow::Result<Self> {
        let catalog = config.catalog.clone();
        let pick = |i: usize| {
            catalog
                .get(i)
                .or_else(|| catalog.get(0))
                .map(|e| e.ticker.clone())
                .ok_or_else(|| anyhow::anyhow!("ticker catalog is empty"))
        };
        let first = pick(0)?;
        let second = pick(1)?;
        let (start, end) = default_range(today, config.default_lookback_days);

        Ok(Self {
            running: true,
            focus: Field::First,
            catalog,
            allow_custom: config.allow_custom_tickers,
            first,
            second,
            start,
            end,
            report: None,
            in_flight: false,
            last_error: None,
            worker_tx,
            worker_rx,
            status_message: None,
            overlay: Overlay::None,
        })
    }

    pub fn ticker(&self, field: Field) -> Option<&Ticker> {
        match field {
            Field::First => Some(&self.first),
            Field::Second => Some(&self.second),
            _ => None,
        }
    }

    fn ticker_mut(&mut self, field: Field) -> Option<&mut Ticker> {
        match field {
            Field::First => Some(&mut self.first),
            Field::Second => Some(&mut self.second),
            _ => None,
        }
    }

    fn date_mut(&mut self, field: Field) -> Option<&mut NaiveDate> {
        match field {
            Field::Start => Some(&mut self.start),
            Field::End => Some(&mut self.end),
            _ => None,
        }
    }

    /// Step a ticker picker through the catalog, wrapping at both ends.
    /// A custom ticker steps onto the first (or last) catalog entry.
    pub fn cycle_ticker(&mut self, field: Field, forward: bool) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let Some(current) = self.ticker(field) else {
            return;
        };
        let next_index = match (self.catalog.position(current), forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let next = self.catalog.get(next_index).map(|e| e.ticker.clone());
        if let (Some(next), Some(slot)) = (next, self.ticker_mut(field)) {
            *slot = next;
        }
    }

    /// Move a date by `days`; a step past the calendar's ends is ignored.
    pub fn shift_days(&mut self, field: Field, days: i64) {
        if let Some(date) = self.date_mut(field) {
            if let Some(moved) = date.checked_add_signed(chrono::Duration::days(days)) {
                *date = moved;
            }
        }
    }

    pub fn shift_months(&mut self, field: Field, months: i32) {
        if let Some(date) = self.date_mut(field) {
            *date = shift_months(*date, months);
        }
    }

    /// Open the free-text editor on `field`, prefilled with its value.
    pub fn begin_edit(&mut self, field: Field) {
        let buffer = match field {
            Field::First => self.first.to_string(),
            Field::Second => self.second.to_string(),
            Field::Start => self.start.to_string(),
            Field::End => self.end.to_string(),
            Field::Analyze => return,
        };
        if field.is_ticker() && !self.allow_custom {
            self.set_warning("Custom tickers are disabled; use h/l to pick from the list");
            return;
        }
        self.overlay = Overlay::Edit { field, buffer };
    }

    /// Apply edited text to `field`. On error the field keeps its old value.
    pub fn commit_edit(&mut self, field: Field, text: &str) -> Result<(), String> {
        if field.is_ticker() {
            let ticker = self.catalog.resolve(text).map_err(|e| e.to_string())?;
            if !self.allow_custom && !self.catalog.contains(&ticker) {
                return Err(format!("{ticker} is not in the ticker list"));
            }
            if let Some(slot) = self.ticker_mut(field) {
                *slot = ticker;
            }
            return Ok(());
        }
        let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|_| format!("'{}' is not a date (use YYYY-MM-DD)", text.trim()))?;
        if let Some(slot) = self.date_mut(field) {
            *slot = date;
        }
        Ok(())
    }

    /// Validate the current selection and hand it to the worker.
    pub fn request_analysis(&mut self) {
        if self.in_flight {
            self.set_warning("An analysis is already running");
            return;
        }
        let request = match AnalysisRequest::new(
            self.first.as_str(),
            self.second.as_str(),
            self.start,
            self.end,
            &self.catalog,
            self.allow_custom,
        ) {
            Ok(request) => request,
            Err(e) => {
                self.fail(e.kind(), e.to_string());
                return;
            }
        };

        tracing::info!(first = %request.first, second = %request.second, "analysis requested");
        if self.worker_tx.send(WorkerCommand::Analyze(request)).is_err() {
            self.set_error("Worker thread is gone; restart the dashboard");
            return;
        }
        self.in_flight = true;
        self.set_status(format!(
            "Fetching {} and {} from {} to {}...",
            self.first, self.second, self.start, self.end
        ));
    }

    pub fn handle_worker_response(&mut self, response: WorkerResponse) {
        self.in_flight = false;
        match response {
            WorkerResponse::AnalysisDone(report) => {
                let dropped = report.first_only_dropped + report.second_only_dropped;
                let mut msg = format!("{} shared trading days", report.row_count());
                if dropped > 0 {
                    msg.push_str(&format!(", {dropped} unmatched dates dropped"));
                }
                self.last_error = None;
                self.report = Some(*report);
                if dropped > 0 {
                    self.set_warning(msg);
                } else {
                    self.set_status(msg);
                }
            }
            WorkerResponse::AnalysisFailed { kind, message } => self.fail(kind, message),
        }
    }

    /// Record a failed request. The previous report is dropped so its pair
    /// is never shown next to an error about a different one.
    fn fail(&mut self, kind: ErrorKind, message: String) {
        tracing::warn!(kind = %kind, %message, "analysis failed");
        self.report = None;
        self.last_error = Some(kind);
        self.set_error(format!("{kind}: {message}"));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::mpsc;

    pub(crate) fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// App with default config; returns the worker-side ends of the channels.
    pub(crate) fn test_app(
        config: &AppConfig,
    ) -> (AppState, mpsc::Receiver<WorkerCommand>, mpsc::Sender<WorkerResponse>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let app = AppState::new(config, d("2024-12-31"), cmd_tx, resp_rx).unwrap();
        (app, cmd_rx, resp_tx)
    }

    #[test]
    fn field_cycle() {
        assert_eq!(Field::First.next(), Field::Second);
        assert_eq!(Field::Analyze.next(), Field::First);
        assert_eq!(Field::First.prev(), Field::Analyze);
        for f in Field::ALL {
            assert_eq!(f.next().prev(), f);
        }
    }

    #[test]
    fn new_picks_first_two_catalog_entries() {
        let (app, _rx, _tx) = test_app(&AppConfig::default());
        assert_eq!(app.first.as_str(), "AAPL");
        assert_eq!(app.second.as_str(), "MSFT");
        assert_eq!(app.end, d("2024-12-31"));
        assert_eq!(app.start, d("2024-01-01"));
    }

    #[test]
    fn cycle_ticker_wraps() {
        let (mut app, _rx, _tx) = test_app(&AppConfig::default());
        app.cycle_ticker(Field::First, false);
        assert_eq!(app.first.as_str(), "NVDA");
        app.cycle_ticker(Field::First, true);
        assert_eq!(app.first.as_str(), "AAPL");
    }

    #[test]
    fn custom_edit_requires_permission() {
        let (mut app, _rx, _tx) = test_app(&AppConfig::default());
        app.begin_edit(Field::First);
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.commit_edit(Field::First, "SPY").is_err());
        assert_eq!(app.first.as_str(), "AAPL");

        let config = AppConfig {
            allow_custom_tickers: true,
            ..AppConfig::default()
        };
        let (mut app, _rx, _tx) = test_app(&config);
        app.begin_edit(Field::First);
        assert!(matches!(app.overlay, Overlay::Edit { field: Field::First, .. }));
        app.commit_edit(Field::First, "spy").unwrap();
        assert_eq!(app.first.as_str(), "SPY");
        // Custom ticker steps back onto the catalog.
        app.cycle_ticker(Field::First, true);
        assert_eq!(app.first.as_str(), "AAPL");
    }

    #[test]
    fn date_editing_and_shifting() {
        let (mut app, _rx, _tx) = test_app(&AppConfig::default());
        app.commit_edit(Field::Start, "2024-03-31").unwrap();
        app.shift_months(Field::Start, -1);
        assert_eq!(app.start, d("2024-02-29"));
        app.shift_days(Field::Start, 1);
        assert_eq!(app.start, d("2024-03-01"));
        assert!(app.commit_edit(Field::End, "31/12/2024").is_err());
        assert_eq!(app.end, d("2024-12-31"));
    }

    #[test]
    fn request_sends_to_worker_once() {
        let (mut app, cmd_rx, _tx) = test_app(&AppConfig::default());
        app.request_analysis();
        assert!(app.in_flight);
        app.request_analysis();
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);

        let cmd = cmd_rx.try_recv().unwrap();
        assert!(matches!(cmd, WorkerCommand::Analyze(_)));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn reversed_range_fails_without_worker() {
        let (mut app, cmd_rx, _tx) = test_app(&AppConfig::default());
        app.start = d("2025-01-01");
        app.request_analysis();
        assert!(!app.in_flight);
        assert_eq!(app.last_error, Some(ErrorKind::InvalidInput));
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn failure_response_records_kind() {
        let (mut app, _rx, _tx) = test_app(&AppConfig::default());
        app.in_flight = true;
        app.handle_worker_response(WorkerResponse::AnalysisFailed {
            kind: ErrorKind::InsufficientData,
            message: "too few days".into(),
        });
        assert!(!app.in_flight);
        assert_eq!(app.last_error, Some(ErrorKind::InsufficientData));
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Error);
        assert!(msg.starts_with("Insufficient data"));
    }

    #[test]
    fn failure_clears_previous_report() {
        let mut app = crate::ui::tests::app_with_report();
        assert!(app.report.is_some());
        app.in_flight = true;
        app.handle_worker_response(WorkerResponse::AnalysisFailed {
            kind: ErrorKind::DataUnavailable,
            message: "unknown symbol ZZZZ".into(),
        });
        assert!(app.report.is_none());
        assert_eq!(app.last_error, Some(ErrorKind::DataUnavailable));
    }

    #[test]
    fn day_shift_at_calendar_end_keeps_date() {
        let (mut app, _rx, _tx) = test_app(&AppConfig::default());
        app.end = NaiveDate::MAX;
        app.shift_days(Field::End, 1);
        assert_eq!(app.end, NaiveDate::MAX);

        app.start = NaiveDate::MIN;
        app.shift_days(Field::Start, -1);
        assert_eq!(app.start, NaiveDate::MIN);

        app.shift_days(Field::End, -1);
        assert_eq!(app.end, NaiveDate::MAX.pred_opt().unwrap());
    }
}
