//! In-memory provider for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::data::provider::{HistoricalBar, MarketDataProvider, ProviderResult, RawNewsItem};
use crate::error::ProviderError;

#[derive(Default)]
pub struct StubProvider {
    bars: HashMap<String, Vec<HistoricalBar>>,
    news: HashMap<String, Vec<RawNewsItem>>,
    failing: HashSet<String>,
    history_calls: AtomicUsize,
    news_queries: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn with_bars(mut self, symbol: &str, bars: Vec<HistoricalBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_news(mut self, symbol: &str, items: Vec<RawNewsItem>) -> Self {
        self.news.insert(symbol.to_string(), items);
        self
    }

    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn news_queries(&self) -> Vec<String> {
        self.news_queries.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.history_calls() + self.news_queries().len()
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn history(&self, symbol: &str, _period: &str) -> ProviderResult<Vec<HistoricalBar>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(symbol) {
            return Err(ProviderError::Http {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.bars.get(symbol).cloned().unwrap_or_default())
    }

    async fn news(&self, symbol: &str, _max_items: usize) -> ProviderResult<Vec<RawNewsItem>> {
        self.news_queries.lock().unwrap().push(symbol.to_string());
        if self.failing.contains(symbol) {
            return Err(ProviderError::Http {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.news.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn bar(high: f64, low: f64, close: f64) -> HistoricalBar {
    HistoricalBar {
        timestamp: 1_700_000_000,
        open: close,
        high,
        low,
        close,
    }
}

pub fn raw_news(title: &str, published: Option<i64>) -> RawNewsItem {
    RawNewsItem {
        title: Some(title.to_string()),
        publisher: Some("Reuters".to_string()),
        link: Some(format!("https://news.example/{}", title.len())),
        provider_publish_time: published,
    }
}
