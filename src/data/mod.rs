pub mod cache;
pub mod market;
pub mod provider;
pub mod yahoo;

pub use cache::TtlCache;
pub use market::{ForexDataService, MarketSnapshot, NewsItem, PairAnalysis, PipInfo};
pub use provider::{HistoricalBar, MarketDataProvider, NullProvider, RawNewsItem};
pub use yahoo::YahooFinanceClient;

#[cfg(test)]
pub(crate) mod testing;
