//! Application-wide constants and magic numbers
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make the codebase easier to tune.

use std::time::Duration;

/// Forex instrument constants
pub mod forex {
    /// Currency that pip values are expressed in
    pub const REFERENCE_CURRENCY: &str = "USD";

    /// Provider suffix appended to a pair or currency code ("EURUSD=X")
    pub const PROVIDER_SUFFIX: &str = "=X";

    /// Units in one standard lot
    pub const STANDARD_LOT_UNITS: f64 = 100_000.0;

    /// Pip size for yen-quoted pairs
    pub const JPY_PIP_SIZE: f64 = 0.01;

    /// Pip size for every other pair
    pub const DEFAULT_PIP_SIZE: f64 = 0.0001;

    /// Range position used when support == resistance
    pub const NEUTRAL_RANGE_POSITION: f64 = 50.0;

    /// Lookback window for market snapshots
    pub const DEFAULT_HISTORY_PERIOD: &str = "5d";

    /// Bar interval requested from the provider
    pub const HISTORY_INTERVAL: &str = "1d";
}

/// Sentiment thresholds
pub mod sentiment {
    /// Score strictly above this is a BUY
    pub const BUY_THRESHOLD: i32 = 2;

    /// Score strictly below this is a SELL
    pub const SELL_THRESHOLD: i32 = -2;
}

/// Technical context thresholds used when rendering
pub mod technicals {
    /// Range position (%) above which price is near resistance
    pub const OVERBOUGHT_POSITION: f64 = 70.0;

    /// Range position (%) below which price is near support
    pub const OVERSOLD_POSITION: f64 = 30.0;

    /// Mean high-low range considered high volatility
    pub const HIGH_VOLATILITY: f64 = 0.01;

    /// Diary entries included in the LLM context
    pub const DIARY_ENTRIES: usize = 5;
}

/// Caching constants
pub mod cache {
    /// Provider response TTL (seconds)
    pub const DEFAULT_TTL_SECS: u64 = 300;

    /// Upper bound on cached responses per cache
    pub const DEFAULT_MAX_ENTRIES: usize = 256;

    /// Default number of news items per pair
    pub const DEFAULT_NEWS_LIMIT: usize = 10;
}

/// LLM request constants
pub mod llm {
    pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
    pub const DEFAULT_MODEL: &str = "anthropic/claude-3-5-sonnet";
    pub const DEFAULT_REFERER: &str = "https://github.com/nazimboudeffa/openclaw-yahoo-finance-forex";
    pub const DEFAULT_APP_TITLE: &str = "OpenClaw FOREX Bot";
    pub const TEMPERATURE: f32 = 0.7;
    pub const MAX_TOKENS: u32 = 2000;
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

/// Finance provider endpoints and client settings
pub mod provider {
    use super::*;

    pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
    pub const YAHOO_SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

    /// Yahoo rejects requests without a browser-like agent
    pub const USER_AGENT: &str = "Mozilla/5.0";

    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
}

/// Trading loop cadence
pub mod schedule {
    /// Seconds between cycles
    pub const CYCLE_INTERVAL_SECS: u64 = 300;

    /// Seconds to wait after a failed cycle
    pub const ERROR_RETRY_SECS: u64 = 60;
}
