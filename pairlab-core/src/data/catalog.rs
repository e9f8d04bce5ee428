//! The labelled list of tickers offered in pickers.
//!
//! Labels are free text ending in the ticker code (e.g. `"🍎 AAPL"`).
//! When custom tickers are disabled, only catalog members may be analysed.

use serde::{Deserialize, Serialize};

use crate::domain::{Ticker, TickerError};

/// A catalog entry: display label plus the code it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub label: String,
    pub ticker: Ticker,
}

/// Ordered list of labelled tickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TickerCatalog {
    entries: Vec<CatalogEntry>,
}

impl TickerCatalog {
    /// Build a catalog from labels. Duplicate codes keep their first label.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, TickerError> {
        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref().trim();
            let ticker = Ticker::from_label(label)?;
            if entries.iter().any(|e| e.ticker == ticker) {
                continue;
            }
            entries.push(CatalogEntry {
                label: label.to_string(),
                ticker,
            });
        }
        Ok(Self { entries })
    }

    /// The popular-stock list. Meta trades as META, not the retired FB.
    pub fn popular() -> Self {
        let labels = [
            "🍎 AAPL", "🪟 MSFT", "📦 AMZN", "🔍 GOOGL", "👥 META", "🚗 TSLA", "🎮 NVDA",
        ];
        let entries = labels
            .iter()
            .filter_map(|label| {
                Ticker::from_label(label).ok().map(|ticker| CatalogEntry {
                    label: (*label).to_string(),
                    ticker,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.entries.iter().any(|e| &e.ticker == ticker)
    }

    pub fn position(&self, ticker: &Ticker) -> Option<usize> {
        self.entries.iter().position(|e| &e.ticker == ticker)
    }

    /// Resolve user input that is either a catalog label or a bare code.
    pub fn resolve(&self, input: &str) -> Result<Ticker, TickerError> {
        let input = input.trim();
        if let Some(entry) = self.entries.iter().find(|e| e.label == input) {
            return Ok(entry.ticker.clone());
        }
        Ticker::from_label(input)
    }

    /// Label for a ticker, falling back to the bare code for custom tickers.
    pub fn label_for(&self, ticker: &Ticker) -> String {
        self.entries
            .iter()
            .find(|e| &e.ticker == ticker)
            .map(|e| e.label.clone())
            .unwrap_or_else(|| ticker.to_string())
    }
}

impl Default for TickerCatalog {
    fn default() -> Self {
        Self::popular()
    }
}

impl TryFrom<Vec<String>> for TickerCatalog {
    type Error = TickerError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_labels(&labels)
    }
}

impl From<TickerCatalog> for Vec<String> {
    fn from(catalog: TickerCatalog) -> Self {
        catalog.entries.into_iter().map(|e| e.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popular_catalog_resolves_emoji_labels() {
        let c = TickerCatalog::popular();
        assert_eq!(c.len(), 7);
        assert_eq!(c.get(0).unwrap().ticker.as_str(), "AAPL");
        assert_eq!(c.get(1).unwrap().ticker.as_str(), "MSFT");
        assert!(c.contains(&Ticker::parse("NVDA").unwrap()));
    }

    #[test]
    fn resolve_accepts_label_or_code() {
        let c = TickerCatalog::popular();
        assert_eq!(c.resolve("🚗 TSLA").unwrap().as_str(), "TSLA");
        assert_eq!(c.resolve("tsla").unwrap().as_str(), "TSLA");
        assert!(c.resolve("").is_err());
    }

    #[test]
    fn label_for_custom_ticker_is_the_code() {
        let c = TickerCatalog::popular();
        assert_eq!(c.label_for(&Ticker::parse("AAPL").unwrap()), "🍎 AAPL");
        assert_eq!(c.label_for(&Ticker::parse("SPY").unwrap()), "SPY");
    }

    #[test]
    fn duplicate_codes_keep_first_label() {
        let c = TickerCatalog::from_labels(&["🍎 AAPL", "Apple AAPL", "MSFT"]).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.label_for(&Ticker::parse("AAPL").unwrap()), "🍎 AAPL");
    }

    #[test]
    fn invalid_label_is_rejected() {
        assert!(TickerCatalog::from_labels(&["🍎 AA;PL"]).is_err());
    }

    #[test]
    fn serde_as_label_list() {
        let c: TickerCatalog = serde_json::from_str(r#"["🍎 AAPL", "SPY"]"#).unwrap();
        assert_eq!(c.len(), 2);
        let back = serde_json::to_string(&c).unwrap();
        assert_eq!(back, r#"["🍎 AAPL","SPY"]"#);
    }
}
