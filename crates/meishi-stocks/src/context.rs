//! Stock screen state
//!
//! `StockContext` holds what the stock screens share: the selected
//! ticker, a cached copy of the watchlist and a loading flag. Watchlist
//! edits go to the data source first and are applied to the cache only
//! when the source accepts them.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{Result, StockError};
use crate::source::StockDataSource;
use crate::types::WatchlistItem;
use crate::watchlist::Watchlist;

pub struct StockContext {
    source: Arc<dyn StockDataSource>,
    selected_ticker: Option<String>,
    watchlist: Watchlist,
    is_loading: bool,
}

impl StockContext {
    pub fn new(source: Arc<dyn StockDataSource>) -> Self {
        Self {
            source,
            selected_ticker: None,
            watchlist: Watchlist::new(),
            is_loading: false,
        }
    }

    pub fn source(&self) -> &Arc<dyn StockDataSource> {
        &self.source
    }

    pub fn is_demo(&self) -> bool {
        self.source.is_demo()
    }

    pub fn selected_ticker(&self) -> Option<&str> {
        self.selected_ticker.as_deref()
    }

    /// Select a ticker, normalized to upper case
    pub fn select_ticker(&mut self, ticker: &str) -> Result<()> {
        self.selected_ticker = Some(normalize_ticker(ticker)?);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_ticker = None;
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Reload the cached watchlist from the source
    pub async fn refresh_watchlist(&mut self) -> Result<&Watchlist> {
        self.is_loading = true;
        let result = self.source.get_watchlist().await;
        self.is_loading = false;

        let items = result.inspect_err(|e| warn!("Failed to load watchlist: {}", e))?;
        self.watchlist.replace_all(items);
        debug!("Watchlist refreshed with {} items", self.watchlist.len());
        Ok(&self.watchlist)
    }

    pub async fn add(&mut self, ticker: &str, company_name: &str, memo: Option<&str>) -> Result<WatchlistItem> {
        let ticker = normalize_ticker(ticker)?;
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Err(StockError::Rejected("company name is required".to_string()));
        }

        self.is_loading = true;
        let result = self.source.add_to_watchlist(&ticker, company_name, memo).await;
        self.is_loading = false;

        let change = result?;
        info!("Added {} to watchlist", change.item.ticker);
        self.watchlist.add(change.item.clone());
        Ok(change.item)
    }

    pub async fn update_memo(&mut self, id: i64, memo: &str) -> Result<WatchlistItem> {
        self.is_loading = true;
        let result = self.source.update_watchlist_item(id, memo).await;
        self.is_loading = false;

        let change = result?;
        if self.watchlist.replace(change.item.clone()).is_err() {
            // cache was stale; keep the source's copy
            self.watchlist.add(change.item.clone());
        }
        Ok(change.item)
    }

    pub async fn remove(&mut self, id: i64) -> Result<()> {
        self.is_loading = true;
        let result = self.source.delete_from_watchlist(id).await;
        self.is_loading = false;

        result?;
        if self.watchlist.remove(id).is_err() {
            debug!("Watchlist item {} was not cached", id);
        }
        info!("Removed watchlist item {}", id);
        Ok(())
    }
}

fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(StockError::Rejected("ticker is required".to_string()));
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoSource;
    use std::time::Duration;

    fn context() -> StockContext {
        StockContext::new(Arc::new(DemoSource::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_refresh_fills_cache() {
        let mut ctx = context();
        assert!(ctx.watchlist().is_empty());
        let list = ctx.refresh_watchlist().await.unwrap();
        assert_eq!(list.len(), 3);
        assert!(!ctx.is_loading());
    }

    #[tokio::test]
    async fn test_edits_update_cache() {
        let mut ctx = context();
        ctx.refresh_watchlist().await.unwrap();

        let item = ctx.add(" tsla ", "Tesla", None).await.unwrap();
        assert_eq!(item.ticker, "TSLA");
        assert!(ctx.watchlist().contains_ticker("TSLA"));

        ctx.update_memo(item.id, "watch Q3").await.unwrap();
        assert_eq!(ctx.watchlist().get(item.id).unwrap().memo.as_deref(), Some("watch Q3"));

        ctx.remove(1).await.unwrap();
        let ids: Vec<_> = ctx.watchlist().iter().map(|i| i.id).collect();
        assert_eq!(ids, [2, 3, item.id]);
    }

    #[tokio::test]
    async fn test_rejected_add_leaves_cache() {
        let mut ctx = context();
        ctx.refresh_watchlist().await.unwrap();

        assert!(matches!(ctx.add("AAPL", "Apple", None).await, Err(StockError::Rejected(_))));
        assert!(matches!(ctx.add("  ", "Nobody", None).await, Err(StockError::Rejected(_))));
        assert_eq!(ctx.watchlist().len(), 3);
        assert!(!ctx.is_loading());
    }

    #[test]
    fn test_selection() {
        let mut ctx = context();
        ctx.select_ticker("nvda").unwrap();
        assert_eq!(ctx.selected_ticker(), Some("NVDA"));
        ctx.clear_selection();
        assert_eq!(ctx.selected_ticker(), None);
        assert!(ctx.is_demo());
    }
}
