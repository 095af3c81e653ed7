//! Local watchlist model
//!
//! An ordered, uncapped list of [`WatchlistItem`]s addressed by their
//! backend id. Entries keep the order in which they were added.

use meishi_core::FieldList;

use crate::error::{Result, StockError};
use crate::types::WatchlistItem;

#[derive(Debug, Clone, PartialEq)]
pub struct Watchlist {
    items: FieldList<WatchlistItem>,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchlist {
    pub fn new() -> Self {
        Self {
            items: FieldList::unbounded(),
        }
    }

    pub fn from_items(items: impl IntoIterator<Item = WatchlistItem>) -> Self {
        let mut list = Self::new();
        list.replace_all(items);
        list
    }

    /// Replace the contents with a fresh listing
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = WatchlistItem>) {
        self.items = FieldList::unbounded();
        for item in items {
            self.items.push(item);
        }
    }

    pub fn add(&mut self, item: WatchlistItem) {
        self.items.push(item);
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.items.position(|item| item.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&WatchlistItem> {
        self.position(id).and_then(|index| self.items.get(index))
    }

    /// Case-insensitive lookup by ticker
    pub fn find_ticker(&self, ticker: &str) -> Option<&WatchlistItem> {
        self.items
            .iter()
            .find(|item| item.ticker.eq_ignore_ascii_case(ticker))
    }

    /// Exact ticker match, as the backend's duplicate check compares
    pub fn contains_ticker(&self, ticker: &str) -> bool {
        self.items.iter().any(|item| item.ticker == ticker)
    }

    /// Replace the memo of item `id`
    pub fn update_memo(&mut self, id: i64, memo: impl Into<String>) -> Result<&WatchlistItem> {
        let index = self.position(id).ok_or_else(|| not_found(id))?;
        let memo = memo.into();
        self.items.update(index, |item| item.memo = Some(memo))?;
        self.items.get(index).ok_or_else(|| not_found(id))
    }

    /// Swap in the backend's copy of an item, keeping its position
    pub fn replace(&mut self, item: WatchlistItem) -> Result<WatchlistItem> {
        let index = self.position(item.id).ok_or_else(|| not_found(item.id))?;
        Ok(self.items.set(index, item)?)
    }

    pub fn remove(&mut self, id: i64) -> Result<WatchlistItem> {
        let index = self.position(id).ok_or_else(|| not_found(id))?;
        Ok(self.items.remove(index)?)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchlistItem> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<WatchlistItem> {
        self.items.iter().cloned().collect()
    }
}

fn not_found(id: i64) -> StockError {
    StockError::NotFound(format!("watchlist item {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, ticker: &str) -> WatchlistItem {
        WatchlistItem {
            id,
            ticker: ticker.to_string(),
            company_name: format!("{} Inc.", ticker),
            memo: None,
            current_price: None,
            change_percent: None,
            added_at: "2025-11-17T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_uncapped_and_ordered() {
        let mut list = Watchlist::new();
        for (i, ticker) in ["AAPL", "NVDA", "MSFT", "TSLA", "AMZN"].iter().enumerate() {
            list.add(item(i as i64 + 1, ticker));
        }
        assert_eq!(list.len(), 5);
        let tickers: Vec<_> = list.iter().map(|i| i.ticker.as_str()).collect();
        assert_eq!(tickers, ["AAPL", "NVDA", "MSFT", "TSLA", "AMZN"]);
    }

    #[test]
    fn test_update_memo() {
        let mut list = Watchlist::from_items([item(1, "AAPL"), item(2, "NVDA")]);
        let updated = list.update_memo(2, "AI 붐 수혜주").unwrap();
        assert_eq!(updated.memo.as_deref(), Some("AI 붐 수혜주"));
        assert!(matches!(list.update_memo(9, "x"), Err(StockError::NotFound(_))));
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut list = Watchlist::from_items([item(1, "AAPL"), item(2, "NVDA"), item(3, "MSFT")]);
        let removed = list.remove(2).unwrap();
        assert_eq!(removed.ticker, "NVDA");
        let ids: Vec<_> = list.iter().map(|i| i.id).collect();
        assert_eq!(ids, [1, 3]);
        assert!(list.remove(2).is_err());
    }

    #[test]
    fn test_ticker_lookup() {
        let list = Watchlist::from_items([item(4, "AAPL"), item(2, "NVDA")]);
        assert!(list.contains_ticker("AAPL"));
        assert!(!list.contains_ticker("aapl"));
        assert!(!list.contains_ticker("MSFT"));
        assert_eq!(list.find_ticker("nvda").map(|i| i.id), Some(2));
    }
}
