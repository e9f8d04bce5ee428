//! Core types and math for comparing two stocks: tickers, price series,
//! price providers, date alignment and statistics.
//!
//! This crate holds everything the pair analysis needs below the
//! presentation layer:
//! - Domain types (tickers, price points, price series)
//! - Data providers (Yahoo Finance, synthetic random walk) behind one trait
//! - Inner-join alignment of two series on date
//! - Summary statistics and Pearson correlation

pub mod data;
pub mod domain;
pub mod stats;
