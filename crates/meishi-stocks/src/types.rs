//! Stock API request and response types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Real-time quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub ticker: String,
    pub current_price: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub timestamp: String,
}

/// Company "health check" report written for beginners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub ticker: String,
    pub diagnosis: String,
    #[serde(default)]
    pub tools_used: Vec<String>,
    pub generated_at: String,
}

/// Keyword of the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyKeyword {
    pub keyword: String,
    pub description: String,
    pub sentiment: String,
    pub generated_at: String,
}

/// Answer from the analysis agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub answer: String,
    #[serde(default)]
    pub tools_used: Vec<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_steps: Option<Vec<JsonValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// News search result with an aggregate sentiment in `-1.0..=1.0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsReport {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    #[serde(default)]
    pub overall_sentiment: f64,
    #[serde(default)]
    pub article_count: usize,
    #[serde(default)]
    pub timestamp: String,
}

/// Watchlist entry as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub id: i64,
    pub ticker: String,
    pub company_name: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    pub added_at: String,
}

/// Response to watchlist add and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistChange {
    pub message: String,
    pub item: WatchlistItem,
}

/// Plain `{message}` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub ticker: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WatchlistAddRequest<'a> {
    pub ticker: &'a str,
    pub company_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WatchlistUpdateRequest<'a> {
    pub memo: &'a str,
}

/// FastAPI-style `{detail}` error body
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: JsonValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_watchlist_item_optional_fields() {
        let item: WatchlistItem = serde_json::from_value(json!({
            "id": 4,
            "ticker": "TSLA",
            "company_name": "Tesla",
            "memo": null,
            "added_at": "2025-11-17T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.memo, None);
        assert_eq!(item.current_price, None);
    }

    #[test]
    fn test_analyze_request_omits_missing_question() {
        let body = serde_json::to_value(AnalyzeRequest {
            ticker: "AAPL",
            question: None,
        })
        .unwrap();
        assert_eq!(body, json!({"ticker": "AAPL"}));
    }
}
