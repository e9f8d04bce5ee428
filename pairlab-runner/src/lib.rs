//! Configuration, logging setup and the pair analysis pipeline shared by the
//! CLI and the TUI.
//!
//! This crate builds on `pairlab-core` to provide:
//! - TOML configuration with defaults and validation
//! - Provider construction from config
//! - Request validation and the fetch → align → stats pipeline
//! - tracing subscriber setup for the CLI and the TUI

pub mod analysis;
pub mod config;
pub mod logging;
pub mod provider;

pub use analysis::{
    default_range, run_analysis, shift_months, AnalysisError, AnalysisReport, AnalysisRequest,
    Correlation, ErrorKind,
};
pub use config::{AppConfig, ConfigError, ProviderConfig, ProviderKind};
pub use provider::build_provider;
