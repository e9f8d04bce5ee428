//! Build the configured price provider.

use std::time::Duration;

use pairlab_core::data::{DataError, DataProvider, SyntheticProvider, YahooOptions, YahooProvider};

use crate::config::{ProviderConfig, ProviderKind};

pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn DataProvider>, DataError> {
    let provider: Box<dyn DataProvider> = match config.source {
        ProviderKind::Yahoo => Box::new(YahooProvider::new(YahooOptions {
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            ..YahooOptions::default()
        })?),
        ProviderKind::Synthetic => Box::new(SyntheticProvider::new(config.synthetic_seed)),
    };
    tracing::debug!(provider = provider.name(), "provider ready");
    Ok(provider)
}
