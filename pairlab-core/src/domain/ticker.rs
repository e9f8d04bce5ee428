//! A validated security code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest code accepted (covers exchange suffixes like `BRK-B` or `SHOP.TO`).
pub const MAX_TICKER_LEN: usize = 12;

/// Why a ticker string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickerError {
    #[error("ticker is empty")]
    Empty,

    #[error("ticker '{0}' is longer than 12 characters")]
    TooLong(String),

    #[error("ticker '{input}' contains invalid character '{ch}'")]
    InvalidChar { input: String, ch: char },
}

/// Upper-cased security code, e.g. `AAPL`, `BRK-B`, `^GSPC`.
///
/// Accepts ASCII letters, digits and `. - ^ =`. Input is trimmed and
/// upper-cased before validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, TickerError> {
        let code = input.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(TickerError::Empty);
        }
        if code.chars().count() > MAX_TICKER_LEN {
            return Err(TickerError::TooLong(code));
        }
        if let Some(ch) = code
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(TickerError::InvalidChar { input: code, ch });
        }
        Ok(Self(code))
    }

    /// Parse a display label such as `"🍎 AAPL"`: the code is the last
    /// whitespace-separated token.
    pub fn from_label(label: &str) -> Result<Self, TickerError> {
        let token = label.split_whitespace().last().unwrap_or("");
        Self::parse(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uppercases_and_trims() {
        assert_eq!(Ticker::parse("  aapl ").unwrap().as_str(), "AAPL");
    }

    #[test]
    fn parse_accepts_suffixes_and_indices() {
        assert!(Ticker::parse("BRK-B").is_ok());
        assert!(Ticker::parse("SHOP.TO").is_ok());
        assert!(Ticker::parse("^GSPC").is_ok());
        assert!(Ticker::parse("EURUSD=X").is_ok());
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(Ticker::parse("   "), Err(TickerError::Empty));
    }

    #[test]
    fn parse_rejects_bad_chars() {
        let err = Ticker::parse("AA PL").unwrap_err();
        assert!(matches!(err, TickerError::InvalidChar { ch: ' ', .. }));
        assert!(Ticker::parse("AAPL;").is_err());
    }

    #[test]
    fn parse_rejects_too_long() {
        assert!(matches!(
            Ticker::parse("ABCDEFGHIJKLM"),
            Err(TickerError::TooLong(_))
        ));
    }

    #[test]
    fn label_strips_emoji_prefix() {
        assert_eq!(Ticker::from_label("🍎 AAPL").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::from_label("MSFT").unwrap().as_str(), "MSFT");
        assert_eq!(Ticker::from_label(""), Err(TickerError::Empty));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let t: Ticker = serde_json::from_str("\"nvda\"").unwrap();
        assert_eq!(t.as_str(), "NVDA");
        assert!(serde_json::from_str::<Ticker>("\"no good\"").is_err());
    }
}
