use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::ForexDataConfig;
use crate::constants::forex::{
    DEFAULT_PIP_SIZE, JPY_PIP_SIZE, NEUTRAL_RANGE_POSITION, STANDARD_LOT_UNITS,
};
use crate::data::cache::TtlCache;
use crate::data::provider::{HistoricalBar, MarketDataProvider, NullProvider, RawNewsItem};
use crate::data::yahoo::YahooFinanceClient;
use crate::error::{PairError, ProviderError};
use crate::fx::pairs::{resolve_pair, Currency, CurrencyInfo, CurrencyPair};
use crate::services::context::render_pair_section;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
}

impl NewsItem {
    pub fn published(&self) -> String {
        self.published_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub pair: CurrencyPair,
    pub current_rate: f64,
    pub prev_close: f64,
    pub change: f64,
    pub change_pct: f64,
    pub high: f64,
    pub low: f64,
    /// Lowest low over the window
    pub support: f64,
    /// Highest high over the window
    pub resistance: f64,
    /// Mean (high - low) over the window
    pub volatility: f64,
    /// 0 at support, 100 at resistance
    pub position_in_range: f64,
    pub base_info: CurrencyInfo,
    pub quote_info: CurrencyInfo,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipInfo {
    pub pip_size: f64,
    /// Value of one pip in USD
    pub pip_value: f64,
    pub lot_size: f64,
    pub units: f64,
}

/// Everything gathered for one pair in a cycle, plus its rendered prompt section
#[derive(Clone, Debug, Serialize)]
pub struct PairAnalysis {
    pub pair: CurrencyPair,
    pub llm_context: String,
    pub news: Vec<NewsItem>,
    pub market: Option<MarketSnapshot>,
    pub pip: Option<PipInfo>,
    pub source: &'static str,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PairOverview {
    pub pair: CurrencyPair,
    pub rate: f64,
    pub change_pct: f64,
    pub volatility: f64,
    pub position_in_range: f64,
}

/// Derive a snapshot from a bar window (oldest first). None when the window is empty.
pub fn compute_snapshot(pair: CurrencyPair, bars: &[HistoricalBar]) -> Option<MarketSnapshot> {
    let last = bars.last()?;

    let current_rate = last.close;
    let prev_close = if bars.len() > 1 {
        bars[bars.len() - 2].close
    } else {
        current_rate
    };
    let change = current_rate - prev_close;
    let change_pct = if prev_close != 0.0 {
        change / prev_close * 100.0
    } else {
        0.0
    };

    let volatility = bars.iter().map(|b| b.high - b.low).sum::<f64>() / bars.len() as f64;
    let support = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let resistance = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);

    let range_size = resistance - support;
    let position_in_range = if range_size != 0.0 {
        (current_rate - support) / range_size * 100.0
    } else {
        NEUTRAL_RANGE_POSITION
    };

    Some(MarketSnapshot {
        pair,
        current_rate,
        prev_close,
        change,
        change_pct,
        high: resistance,
        low: support,
        support,
        resistance,
        volatility,
        position_in_range,
        base_info: pair.base.info(),
        quote_info: pair.quote.info(),
    })
}

pub fn pip_size_for(quote: Currency) -> f64 {
    if quote == Currency::Jpy {
        JPY_PIP_SIZE
    } else {
        DEFAULT_PIP_SIZE
    }
}

/// Pip economics for `lot_size` standard lots at `current_rate`. Value is in USD.
pub fn compute_pip_info(pair: CurrencyPair, current_rate: f64, lot_size: f64) -> Option<PipInfo> {
    let pip_size = pip_size_for(pair.quote);
    let units = STANDARD_LOT_UNITS * lot_size;

    let pip_value = if pair.quote.is_reference() {
        pip_size * units
    } else {
        if current_rate <= 0.0 || !current_rate.is_finite() {
            return None;
        }
        (pip_size / current_rate) * units
    };

    Some(PipInfo {
        pip_size,
        pip_value,
        lot_size,
        units,
    })
}

/// Render a provider news record. None when its publish time is out of range.
fn format_news_item(raw: &RawNewsItem) -> Option<NewsItem> {
    let published_at = match raw.provider_publish_time {
        Some(ts) => DateTime::from_timestamp(ts, 0)?,
        None => Utc::now(),
    };

    Some(NewsItem {
        title: raw.title.clone().unwrap_or_else(|| "N/A".to_string()),
        publisher: raw.publisher.clone().unwrap_or_else(|| "Unknown".to_string()),
        link: raw.link.clone().unwrap_or_default(),
        published_at,
    })
}

/// Market data and news for the supported majors, cached per query shape.
///
/// Every public operation degrades to an empty result on provider failure.
pub struct ForexDataService {
    provider: Arc<dyn MarketDataProvider>,
    news_cache: TtlCache<(CurrencyPair, usize), Vec<NewsItem>>,
    market_cache: TtlCache<(CurrencyPair, String), MarketSnapshot>,
    history_period: String,
}

impl ForexDataService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache_ttl: Duration,
        cache_max_entries: usize,
        history_period: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            news_cache: TtlCache::new(cache_ttl, cache_max_entries),
            market_cache: TtlCache::new(cache_ttl, cache_max_entries),
            history_period: history_period.into(),
        }
    }

    /// Yahoo Finance when enabled, the null provider otherwise.
    pub fn from_config(config: &ForexDataConfig) -> Result<Self, ProviderError> {
        let provider: Arc<dyn MarketDataProvider> = if config.enabled {
            Arc::new(YahooFinanceClient::new(
                config.chart_url.clone(),
                config.search_url.clone(),
            )?)
        } else {
            Arc::new(NullProvider)
        };

        info!(
            "📊 [FX] Market data provider: {} (cache TTL {}s, max {} entries)",
            provider.name(),
            config.cache_ttl_secs,
            config.cache_max_entries
        );

        Ok(Self::new(
            provider,
            Duration::from_secs(config.cache_ttl_secs),
            config.cache_max_entries,
            config.history_period.clone(),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_available()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn history_period(&self) -> &str {
        &self.history_period
    }

    pub async fn fetch_news(&self, pair: &str, limit: usize) -> Vec<NewsItem> {
        let pair = match resolve_pair(pair) {
            Ok(p) => p,
            Err(e) => {
                warn!("⚠️ [FX] Skipping news: {}", e);
                return Vec::new();
            }
        };

        if !self.provider.is_available() {
            warn!("⚠️ [FX] Provider {} unavailable, returning empty news list", self.provider.name());
            return Vec::new();
        }

        let key = (pair, limit);
        if let Some(cached) = self.news_cache.get(&key) {
            debug!("💾 [CACHE] News hit for {} (limit {})", pair, limit);
            return cached;
        }

        let raw = match self.provider.news(&pair.provider_symbol(), limit).await {
            Ok(items) => items,
            Err(e) => {
                error!("❌ [FX] Error fetching news for {}: {}", pair, e);
                return Vec::new();
            }
        };

        let raw = if raw.is_empty() {
            self.fallback_news(pair, limit).await
        } else {
            raw
        };

        let news: Vec<NewsItem> = raw
            .iter()
            .filter_map(|item| {
                let formatted = format_news_item(item);
                if formatted.is_none() {
                    warn!("⚠️ [FX] Skipping news item with invalid publish time: {:?}", item.title);
                }
                formatted
            })
            .take(limit)
            .collect();

        self.news_cache.insert(key, news.clone());
        news
    }

    /// News for the pair's own instruments when the pair symbol has none.
    async fn fallback_news(&self, pair: CurrencyPair, limit: usize) -> Vec<RawNewsItem> {
        let mut legs = vec![pair.base];
        // USD news is abundant on the pair symbol itself
        if !pair.quote.is_reference() {
            legs.push(pair.quote);
        }

        let mut items = Vec::new();
        for currency in legs {
            match self.provider.news(&currency.instrument_symbol(), limit).await {
                Ok(mut found) => items.append(&mut found),
                Err(e) => warn!("⚠️ [FX] Could not fetch news for {}: {}", currency, e),
            }
        }
        items
    }

    pub async fn fetch_market_data(&self, pair: &str, period: &str) -> Option<MarketSnapshot> {
        let pair = match resolve_pair(pair) {
            Ok(p) => p,
            Err(e) => {
                warn!("⚠️ [FX] Skipping market data: {}", e);
                return None;
            }
        };

        if !self.provider.is_available() {
            warn!("⚠️ [FX] Provider {} unavailable, returning empty market data", self.provider.name());
            return None;
        }

        let key = (pair, period.to_string());
        if let Some(cached) = self.market_cache.get(&key) {
            debug!("💾 [CACHE] Market data hit for {} ({})", pair, period);
            return Some(cached);
        }

        let bars = match self.provider.history(&pair.provider_symbol(), period).await {
            Ok(bars) => bars,
            Err(e) => {
                error!("❌ [FX] Error fetching market data for {}: {}", pair, e);
                return None;
            }
        };

        let Some(snapshot) = compute_snapshot(pair, &bars) else {
            warn!("⚠️ [FX] No historical data available for {}", pair);
            return None;
        };

        self.market_cache.insert(key, snapshot.clone());
        Some(snapshot)
    }

    pub async fn calculate_pip_value(&self, pair: &str, lot_size: f64) -> Option<PipInfo> {
        let snapshot = self.fetch_market_data(pair, &self.history_period).await?;

        let pip = compute_pip_info(snapshot.pair, snapshot.current_rate, lot_size);
        if pip.is_none() {
            error!(
                "❌ [FX] Cannot convert pip value for {} at rate {}",
                snapshot.pair, snapshot.current_rate
            );
        }
        pip
    }

    /// Gather news, snapshot and pip economics for one pair and render its prompt section.
    pub async fn analyze(
        &self,
        pair: &str,
        news_limit: usize,
        include_technicals: bool,
    ) -> Result<PairAnalysis, PairError> {
        let resolved = resolve_pair(pair)?;

        let news = self.fetch_news(pair, news_limit).await;
        let market = self.fetch_market_data(pair, &self.history_period).await;
        let pip = self.calculate_pip_value(pair, 1.0).await;

        let llm_context = render_pair_section(
            &resolved,
            market.as_ref(),
            pip.as_ref(),
            &news,
            include_technicals,
        );

        Ok(PairAnalysis {
            pair: resolved,
            llm_context,
            news,
            market,
            pip,
            source: self.provider.name(),
            fetched_at: Utc::now(),
        })
    }

    /// Headline numbers for every supported major; pairs without data are skipped.
    pub async fn majors_overview(&self) -> Vec<PairOverview> {
        let mut overview = Vec::new();

        for pair in CurrencyPair::majors() {
            match self.fetch_market_data(&pair.code(), &self.history_period).await {
                Some(snapshot) => overview.push(PairOverview {
                    pair,
                    rate: snapshot.current_rate,
                    change_pct: snapshot.change_pct,
                    volatility: snapshot.volatility,
                    position_in_range: snapshot.position_in_range,
                }),
                None => warn!("⚠️ [FX] Skipping {} in overview", pair),
            }
        }

        overview
    }
}
