//! Price providers, ticker catalog, and series alignment

pub mod align;
pub mod catalog;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use align::{align, AlignedRow, AlignedTable};
pub use catalog::{CatalogEntry, TickerCatalog};
pub use provider::{DataError, DataProvider, DataSource};
pub use synthetic::SyntheticProvider;
pub use yahoo::{YahooOptions, YahooProvider};
