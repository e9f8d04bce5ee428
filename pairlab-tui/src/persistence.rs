//! Remembers the last picked pair and date range between sessions.
//!
//! The file holds the selection only, never prices.

use std::path::Path;

use anyhow::Context;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::AppState;

/// What `state.json` holds. Every field is optional so older or partial files still load.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub first: Option<String>,
    pub second: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// A missing or unreadable file yields an empty selection.
pub fn load(path: &Path) -> PersistedState {
    let Ok(text) = std::fs::read_to_string(path) else {
        return PersistedState::default();
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
        PersistedState::default()
    })
}

pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(path, serde_json::to_vec_pretty(state)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Snapshot the current selection.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        first: Some(app.first.to_string()),
        second: Some(app.second.to_string()),
        start: Some(app.start),
        end: Some(app.end),
    }
}

/// Restore a saved selection.
///
/// Saved tickers that the current config no longer allows are skipped, and
/// dates are only restored as a valid pair.
pub fn apply(app: &mut AppState, state: PersistedState) {
    let restore = |app: &AppState, saved: Option<String>| {
        let ticker = app.catalog.resolve(saved.as_deref()?).ok()?;
        (app.allow_custom || app.catalog.contains(&ticker)).then_some(ticker)
    };
    if let Some(t) = restore(app, state.first) {
        app.first = t;
    }
    if let Some(t) = restore(app, state.second) {
        app.second = t;
    }
    if let (Some(start), Some(end)) = (state.start, state.end) {
        if start <= end {
            app.start = start;
            app.end = end;
        }
    }
}
