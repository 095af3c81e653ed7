//! Stock data source abstraction
//!
//! Screens talk to a [`StockDataSource`] and never to a concrete client.
//! Which implementation backs it is decided once, at startup, from
//! [`StocksConfig`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use meishi_core::StocksConfig;
use tracing::info;

use crate::demo::DemoSource;
use crate::error::Result;
use crate::live::LiveSource;
use crate::types::*;

/// Look-back window used when a news search gives no `days`
pub const DEFAULT_NEWS_DAYS: u32 = 7;

/// Question asked when an analysis request carries none
pub const DEFAULT_QUESTION: &str = "이 주식에 대해 종합적으로 분석해주세요.";

/// Everything the stock screens can ask of a backend
#[async_trait]
pub trait StockDataSource: Send + Sync {
    /// Whether responses are canned demo data
    fn is_demo(&self) -> bool;

    async fn analyze_stock(&self, ticker: &str, question: Option<&str>) -> Result<AnalysisResult>;

    async fn get_company_diagnosis(&self, ticker: &str) -> Result<Diagnosis>;

    async fn get_stock_price(&self, ticker: &str) -> Result<StockPrice>;

    async fn search_news(&self, query: &str, days: u32) -> Result<NewsReport>;

    async fn get_daily_keyword(&self) -> Result<DailyKeyword>;

    async fn get_watchlist(&self) -> Result<Vec<WatchlistItem>>;

    /// Add a ticker; adding one that is already listed is rejected
    async fn add_to_watchlist(&self, ticker: &str, company_name: &str, memo: Option<&str>) -> Result<WatchlistChange>;

    async fn update_watchlist_item(&self, id: i64, memo: &str) -> Result<WatchlistChange>;

    async fn delete_from_watchlist(&self, id: i64) -> Result<Acknowledgement>;
}

/// Pick the data source for this process.
///
/// Demo mode applies when `api_url` is unset, blank or `demo`.
pub fn data_source_from_config(config: &StocksConfig) -> Result<Arc<dyn StockDataSource>> {
    match config.api_url.as_deref() {
        Some(url) if !config.is_demo() => {
            info!("Using stock API at {}", url);
            let source = LiveSource::new(url, Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(source))
        }
        _ => {
            info!("Stock API not configured, running in demo mode");
            Ok(Arc::new(DemoSource::new(Duration::from_millis(config.demo_latency_ms))))
        }
    }
}
