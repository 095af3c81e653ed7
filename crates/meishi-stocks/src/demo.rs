//! Demo data source
//!
//! Serves canned data with the same shapes as the live API so the app
//! can run without a backend. Every call waits for the configured
//! latency. The watchlist is seeded with three items and can be edited;
//! edits last for the lifetime of the source.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, StockError};
use crate::source::{DEFAULT_QUESTION, StockDataSource};
use crate::types::*;
use crate::watchlist::Watchlist;

/// Latency applied when none is configured
pub const DEFAULT_DEMO_LATENCY: Duration = Duration::from_millis(500);

const DEMO_TOOLS: &str = "demo_mode";

pub struct DemoSource {
    latency: Duration,
    watchlist: RwLock<Watchlist>,
    /// Never reused, even after the newest item is deleted
    next_id: AtomicI64,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new(DEFAULT_DEMO_LATENCY)
    }
}

impl DemoSource {
    pub fn new(latency: Duration) -> Self {
        let seed = seed_watchlist();
        let next_id = seed.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        Self {
            latency,
            watchlist: RwLock::new(Watchlist::from_items(seed)),
            next_id: AtomicI64::new(next_id),
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn days_ago(days: i64) -> String {
    (Utc::now() - ChronoDuration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn seed_item(id: i64, ticker: &str, company: &str, memo: &str, price: f64, change: f64, age_days: i64) -> WatchlistItem {
    WatchlistItem {
        id,
        ticker: ticker.to_string(),
        company_name: company.to_string(),
        memo: Some(memo.to_string()),
        current_price: Some(price),
        change_percent: Some(change),
        added_at: days_ago(age_days),
    }
}

fn seed_watchlist() -> Vec<WatchlistItem> {
    vec![
        seed_item(1, "AAPL", "Apple Inc.", "M3 칩 출시 후 매수 고려", 178.50, 1.2, 3),
        seed_item(2, "NVDA", "NVIDIA Corporation", "AI 붐 수혜주", 495.20, 3.5, 7),
        seed_item(3, "MSFT", "Microsoft Corporation", "OpenAI 파트너십 주목", 378.90, -0.8, 1),
    ]
}

/// Stable pseudo-quote derived from the ticker text
fn synthetic_quote(ticker: &str) -> (f64, f64, u64) {
    let seed = ticker
        .bytes()
        .fold(17u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
    let price = 178.50 + (seed % 1000) as f64 / 100.0;
    let change = (seed % 500) as f64 / 100.0 - 2.5;
    let volume = 50_000_000 + seed % 10_000_000;
    (round2(price), round2(change), volume)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn demo_diagnosis(ticker: &str) -> String {
    format!(
        "{ticker} 기업 건강진단서 (데모 모드)

✅ 좋은 점
• 현재 주가가 52주 최고가 대비 적정 수준입니다
• 영업이익률이 업계 평균 이상으로 건강합니다
• 전문가들의 평가가 대체로 긍정적입니다
• 재무 안정성이 양호한 편입니다

⚠️ 주의할 점
• 최근 거래량 변동이 있습니다
• 업종 전반의 불확실성이 존재합니다

💡 초보자를 위한 설명
이 기업은 전반적으로 안정적인 재무 상태를 보이고 있습니다.
다만 투자 결정 전 더 많은 정보를 확인하시는 것을 추천드립니다.

⚠️ 면책 조항: 이 정보는 데모 모드입니다. 실제 투자 결정은 본인의 판단과 책임 하에 이루어져야 합니다.

📌 실제 데이터를 보려면 STOCK_API_URL 환경변수에 백엔드 주소를 설정하세요."
    )
}

fn demo_answer(ticker: &str, question: &str) -> String {
    format!(
        "{ticker}에 대한 분석 결과 (데모 모드)

질문: \"{question}\"

현재 이 기능은 데모 모드로 작동 중입니다.
실제 AI 분석 결과를 보려면 STOCK_API_URL 환경변수에 백엔드 주소를 설정하세요.

📌 실제 기능:
- 실시간 주가, 재무제표, 애널리스트 의견, 뉴스 종합
- 초보자가 이해하기 쉬운 언어로 번역"
    )
}

#[async_trait]
impl StockDataSource for DemoSource {
    fn is_demo(&self) -> bool {
        true
    }

    async fn analyze_stock(&self, ticker: &str, question: Option<&str>) -> Result<AnalysisResult> {
        self.delay().await;
        let question = question.unwrap_or(DEFAULT_QUESTION);
        Ok(AnalysisResult {
            answer: demo_answer(ticker, question),
            tools_used: vec![DEMO_TOOLS.to_string()],
            success: true,
            intermediate_steps: None,
        })
    }

    async fn get_company_diagnosis(&self, ticker: &str) -> Result<Diagnosis> {
        self.delay().await;
        Ok(Diagnosis {
            ticker: ticker.to_string(),
            diagnosis: demo_diagnosis(ticker),
            tools_used: vec![DEMO_TOOLS.to_string()],
            generated_at: now(),
        })
    }

    async fn get_stock_price(&self, ticker: &str) -> Result<StockPrice> {
        self.delay().await;

        let listed = {
            let watchlist = self.watchlist.read().await;
            watchlist
                .find_ticker(ticker)
                .and_then(|item| Some((item.current_price?, item.change_percent?)))
        };
        let (synthetic_price, synthetic_change, volume) = synthetic_quote(ticker);
        let (current_price, change_percent) = listed.unwrap_or((synthetic_price, synthetic_change));

        Ok(StockPrice {
            ticker: ticker.to_string(),
            current_price,
            change_percent,
            volume,
            timestamp: now(),
        })
    }

    async fn search_news(&self, query: &str, days: u32) -> Result<NewsReport> {
        self.delay().await;
        debug!("Demo news for {:?} over {} days", query, days);

        let articles = vec![
            NewsArticle {
                title: format!("{} 관련 업종, 수요 증가로 강세", query),
                summary: "데모 모드 기사입니다. 실제 뉴스를 보려면 백엔드를 연결하세요.".to_string(),
                sentiment: "긍정".to_string(),
                published_at: Some(days_ago(1)),
                source: "Demo News".to_string(),
                url: None,
            },
            NewsArticle {
                title: format!("{} 시장, 단기 변동성 확대 전망", query),
                summary: "데모 모드 기사입니다.".to_string(),
                sentiment: "중립".to_string(),
                published_at: Some(days_ago(i64::from(days.min(2)))),
                source: "Demo News".to_string(),
                url: None,
            },
        ];

        Ok(NewsReport {
            query: query.to_string(),
            article_count: articles.len(),
            articles,
            overall_sentiment: 0.5,
            timestamp: now(),
        })
    }

    async fn get_daily_keyword(&self) -> Result<DailyKeyword> {
        self.delay().await;
        Ok(DailyKeyword {
            keyword: "AI 반도체".to_string(),
            description: "인공지능 학습에 필요한 고성능 칩 기술이 급성장하고 있습니다. 특히 생성형 AI의 확산으로 GPU 수요가 폭발적으로 증가하고 있으며, 관련 기업들의 주가도 연일 상승세를 보이고 있습니다.".to_string(),
            sentiment: "긍정".to_string(),
            generated_at: now(),
        })
    }

    async fn get_watchlist(&self) -> Result<Vec<WatchlistItem>> {
        self.delay().await;
        Ok(self.watchlist.read().await.to_vec())
    }

    async fn add_to_watchlist(&self, ticker: &str, company_name: &str, memo: Option<&str>) -> Result<WatchlistChange> {
        self.delay().await;
        let mut watchlist = self.watchlist.write().await;

        if watchlist.contains_ticker(ticker) {
            return Err(StockError::Rejected("이미 관심 목록에 있는 종목입니다.".to_string()));
        }

        let item = WatchlistItem {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            ticker: ticker.to_string(),
            company_name: company_name.to_string(),
            memo: memo.map(str::to_string),
            current_price: None,
            change_percent: None,
            added_at: now(),
        };
        watchlist.add(item.clone());
        debug!("Demo watchlist now holds {} items", watchlist.len());

        Ok(WatchlistChange {
            message: "관심 목록에 추가되었습니다.".to_string(),
            item,
        })
    }

    async fn update_watchlist_item(&self, id: i64, memo: &str) -> Result<WatchlistChange> {
        self.delay().await;
        let mut watchlist = self.watchlist.write().await;
        let item = watchlist.update_memo(id, memo)?.clone();
        Ok(WatchlistChange {
            message: "업데이트되었습니다.".to_string(),
            item,
        })
    }

    async fn delete_from_watchlist(&self, id: i64) -> Result<Acknowledgement> {
        self.delay().await;
        self.watchlist.write().await.remove(id)?;
        Ok(Acknowledgement {
            message: "관심 목록에서 제거되었습니다.".to_string(),
        })
    }
}
