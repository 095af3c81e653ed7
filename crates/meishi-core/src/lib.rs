//! meishi-core: shared building blocks for the meishi workspace
//!
//! Provides the error taxonomy, configuration loading, the bounded
//! ordered list used by card fields and the watchlist, and the
//! persisted user preferences context.

pub mod config;
pub mod context;
pub mod error;
pub mod list;

pub use config::{AppConfig, CardsConfig, Config, StocksConfig};
pub use context::{AppContext, ColorTheme, Preferences};
pub use error::{Error, Result};
pub use list::FieldList;
