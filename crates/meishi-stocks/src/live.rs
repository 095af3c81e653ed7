//! Stock analysis REST client
//!
//! Talks to the analysis backend under `{base}/api/v1`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::error::{Result, StockError};
use crate::source::StockDataSource;
use crate::types::*;

/// Live stock API client
#[derive(Clone)]
pub struct LiveSource {
    client: Client,
    base_url: Url,
}

impl LiveSource {
    /// Create a new client for the API at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| StockError::Config(format!("invalid stock API url {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StockError::Config(format!("stock API url cannot be a base: {}", base_url)));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/api/v1/{segments...}`; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StockError::Config(format!("stock API url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON body, mapping HTTP failures
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            error!("Stock API request failed: {}", e);
            StockError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(&body);
            warn!("Stock API returned {}: {}", status, message);

            return Err(match status {
                StatusCode::NOT_FOUND => StockError::NotFound(message),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => StockError::Rejected(message),
                _ => StockError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        response
            .json()
            .await
            .map_err(|e| StockError::Parse(e.to_string()))
    }
}

/// Pull the `detail` out of an error body, falling back to the raw text
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "no details".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl StockDataSource for LiveSource {
    fn is_demo(&self) -> bool {
        false
    }

    async fn analyze_stock(&self, ticker: &str, question: Option<&str>) -> Result<AnalysisResult> {
        debug!("Analyzing {}", ticker);
        let url = self.endpoint(&["stock", "analyze"])?;
        self.send(self.client.post(url).json(&AnalyzeRequest { ticker, question }))
            .await
    }

    async fn get_company_diagnosis(&self, ticker: &str) -> Result<Diagnosis> {
        debug!("Fetching diagnosis for {}", ticker);
        let url = self.endpoint(&["stock", "diagnosis", ticker])?;
        self.send(self.client.get(url)).await
    }

    async fn get_stock_price(&self, ticker: &str) -> Result<StockPrice> {
        debug!("Fetching price for {}", ticker);
        let url = self.endpoint(&["stock", "price", ticker])?;
        self.send(self.client.get(url)).await
    }

    async fn search_news(&self, query: &str, days: u32) -> Result<NewsReport> {
        debug!("Searching news for {:?} over {} days", query, days);
        let url = self.endpoint(&["stock", "news"])?;
        let days = days.to_string();
        self.send(self.client.get(url).query(&[("query", query), ("days", days.as_str())]))
            .await
    }

    async fn get_daily_keyword(&self) -> Result<DailyKeyword> {
        let url = self.endpoint(&["stock", "daily-keyword"])?;
        self.send(self.client.get(url)).await
    }

    async fn get_watchlist(&self) -> Result<Vec<WatchlistItem>> {
        let url = self.endpoint(&["watchlist", ""])?;
        self.send(self.client.get(url)).await
    }

    async fn add_to_watchlist(&self, ticker: &str, company_name: &str, memo: Option<&str>) -> Result<WatchlistChange> {
        debug!("Adding {} to watchlist", ticker);
        let url = self.endpoint(&["watchlist", ""])?;
        let body = WatchlistAddRequest {
            ticker,
            company_name,
            memo,
        };
        self.send(self.client.post(url).json(&body)).await
    }

    async fn update_watchlist_item(&self, id: i64, memo: &str) -> Result<WatchlistChange> {
        let url = self.endpoint(&["watchlist", &id.to_string()])?;
        self.send(self.client.patch(url).json(&WatchlistUpdateRequest { memo }))
            .await
    }

    async fn delete_from_watchlist(&self, id: i64) -> Result<Acknowledgement> {
        let url = self.endpoint(&["watchlist", &id.to_string()])?;
        self.send(self.client.delete(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> LiveSource {
        LiveSource::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_stock_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/stock/price/AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ticker": "AAPL",
                "current_price": 178.5,
                "change_percent": 1.2,
                "volume": 52000000,
                "timestamp": "2025-11-17T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let price = client(&server).get_stock_price("AAPL").await.unwrap();
        assert_eq!(price.ticker, "AAPL");
        assert_eq!(price.current_price, 178.5);
        assert_eq!(price.volume, 52_000_000);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/stock/price/ZZZZ"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "No data for ZZZZ"})))
            .mount(&server)
            .await;

        let err = client(&server).get_stock_price("ZZZZ").await.unwrap_err();
        match err {
            StockError::NotFound(detail) => assert_eq!(detail, "No data for ZZZZ"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_backend_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/stock/daily-keyword"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = client(&server).get_daily_keyword().await.unwrap_err();
        assert!(matches!(err, StockError::Api { status: 500, .. }));
        assert!(meishi_core::Error::from(err).is_backend());
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let source = LiveSource::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = source.get_watchlist().await.unwrap_err();
        assert!(matches!(err, StockError::Http(_)));
        assert!(meishi_core::Error::from(err).is_backend());
    }

    #[tokio::test]
    async fn test_add_to_watchlist_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/watchlist/"))
            .and(body_json(json!({"ticker": "TSLA", "company_name": "Tesla", "memo": "EV"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "관심 목록에 추가되었습니다.",
                "item": {
                    "id": 1,
                    "ticker": "TSLA",
                    "company_name": "Tesla",
                    "memo": "EV",
                    "current_price": null,
                    "change_percent": null,
                    "added_at": "2025-11-17T10:00:00Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let change = client(&server)
            .add_to_watchlist("TSLA", "Tesla", Some("EV"))
            .await
            .unwrap();
        assert_eq!(change.item.id, 1);
        assert_eq!(change.item.memo.as_deref(), Some("EV"));
    }

    #[tokio::test]
    async fn test_duplicate_add_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/watchlist/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "이미 관심 목록에 있는 종목입니다."})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .add_to_watchlist("AAPL", "Apple Inc.", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StockError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_search_news_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/stock/news"))
            .and(query_param("query", "AI chips"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": "AI chips",
                "articles": [{"title": "Chips surge", "summary": "", "sentiment": "긍정", "source": "Reuters"}],
                "overall_sentiment": 0.5,
                "article_count": 1,
                "timestamp": "2025-11-17T10:00:00"
            })))
            .mount(&server)
            .await;

        let report = client(&server).search_news("AI chips", 7).await.unwrap();
        assert_eq!(report.article_count, 1);
        assert_eq!(report.articles[0].title, "Chips surge");
    }

    #[tokio::test]
    async fn test_update_and_delete_watchlist_item() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/watchlist/3"))
            .and(body_json(json!({"memo": "hold"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "업데이트되었습니다.",
                "item": {"id": 3, "ticker": "MSFT", "company_name": "Microsoft", "memo": "hold", "added_at": "2025-11-17T10:00:00Z"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/watchlist/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "관심 목록에서 제거되었습니다."})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/watchlist/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "항목을 찾을 수 없습니다."})))
            .mount(&server)
            .await;

        let source = client(&server);
        let change = source.update_watchlist_item(3, "hold").await.unwrap();
        assert_eq!(change.item.memo.as_deref(), Some("hold"));
        source.delete_from_watchlist(3).await.unwrap();
        assert!(matches!(
            source.delete_from_watchlist(99).await,
            Err(StockError::NotFound(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_base_path() {
        let source = LiveSource::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        let url = source.endpoint(&["stock", "price", "005930.KS"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/stock/price/005930.KS");

        let url = source.endpoint(&["watchlist", ""]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/watchlist/");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            LiveSource::new("not a url", Duration::from_secs(1)),
            Err(StockError::Config(_))
        ));
    }
}
