//! meishi-stocks: stock information client
//!
//! This crate provides the stock screens' data access.
//!
//! ## Features
//!
//! - `StockDataSource` trait covering quotes, diagnosis, analysis, news,
//!   the daily keyword and the watchlist
//! - `LiveSource` REST client and `DemoSource` with canned data
//! - Local `Watchlist` model and `StockContext` screen state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meishi_stocks::{data_source_from_config, StockContext};
//!
//! let source = data_source_from_config(&config.stocks)?;
//! let mut ctx = StockContext::new(source);
//!
//! ctx.refresh_watchlist().await?;
//! ctx.add("TSLA", "Tesla, Inc.", Some("EV")).await?;
//! ```

pub mod context;
pub mod demo;
pub mod error;
pub mod live;
pub mod source;
pub mod types;
pub mod watchlist;

pub use context::StockContext;
pub use demo::DemoSource;
pub use error::{Result, StockError};
pub use live::LiveSource;
pub use source::{DEFAULT_NEWS_DAYS, StockDataSource, data_source_from_config};
pub use types::*;
pub use watchlist::Watchlist;
