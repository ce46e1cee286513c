use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// One OHLC bar from the provider's history table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// News record as the provider returns it. Every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNewsItem {
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "providerPublishTime")]
    pub provider_publish_time: Option<i64>,
}

/// Finance data source used by the market data service.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// False for the no-op provider selected when market data is disabled.
    fn is_available(&self) -> bool {
        true
    }

    /// Bars for `symbol` over `period` (e.g. "5d"), oldest first.
    async fn history(&self, symbol: &str, period: &str) -> ProviderResult<Vec<HistoricalBar>>;

    /// Recent news for `symbol`, most recent first.
    async fn news(&self, symbol: &str, max_items: usize) -> ProviderResult<Vec<RawNewsItem>>;
}

/// Provider used when market data is disabled; every query is `Unavailable`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProvider;

#[async_trait]
impl MarketDataProvider for NullProvider {
    fn name(&self) -> &'static str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn history(&self, _symbol: &str, _period: &str) -> ProviderResult<Vec<HistoricalBar>> {
        Err(ProviderError::Unavailable)
    }

    async fn news(&self, _symbol: &str, _max_items: usize) -> ProviderResult<Vec<RawNewsItem>> {
        Err(ProviderError::Unavailable)
    }
}
