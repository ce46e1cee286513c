use serde::Deserialize;
use std::path::Path;
use std::{env, fs};
use tracing::{info, warn};

use crate::constants::{cache, forex, llm, provider, schedule};
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ForexDataConfig {
    pub enabled: bool,
    pub news_limit: usize,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub history_period: String,
    pub pairs: Vec<String>,
    pub chart_url: String,
    pub search_url: String,
}

impl Default for ForexDataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            news_limit: cache::DEFAULT_NEWS_LIMIT,
            cache_ttl_secs: cache::DEFAULT_TTL_SECS,
            cache_max_entries: cache::DEFAULT_MAX_ENTRIES,
            history_period: forex::DEFAULT_HISTORY_PERIOD.to_string(),
            pairs: ["EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCAD", "NZDUSD", "USDCHF"]
                .into_iter()
                .map(String::from)
                .collect(),
            chart_url: provider::YAHOO_CHART_URL.to_string(),
            search_url: provider::YAHOO_SEARCH_URL.to_string(),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub referer: String,
    pub app_title: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: llm::DEFAULT_BASE_URL.to_string(),
            model: llm::DEFAULT_MODEL.to_string(),
            referer: llm::DEFAULT_REFERER.to_string(),
            app_title: llm::DEFAULT_APP_TITLE.to_string(),
            temperature: llm::TEMPERATURE,
            max_tokens: llm::MAX_TOKENS,
            timeout_secs: llm::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

// Keep the key out of startup logs
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    pub cycle_interval_secs: u64,
    pub error_retry_secs: u64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: schedule::CYCLE_INTERVAL_SECS,
            error_retry_secs: schedule::ERROR_RETRY_SECS,
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub forex: ForexDataConfig,
    pub llm: LlmConfig,
    pub trading: TradingConfig,

    /// Reserved for a technical-indicator API; not read anywhere yet.
    pub taapi_api_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("forex", &self.forex)
            .field("llm", &self.llm)
            .field("trading", &self.trading)
            .field("taapi_api_key", &self.taapi_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

pub fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn override_number<T: std::str::FromStr>(target: &mut T, key: &str, value: Option<String>) {
    if let Some(raw) = value {
        match raw.trim().parse() {
            Ok(v) => *target = v,
            Err(_) => warn!("⚠️ [CONFIG] Ignoring {}={:?}: not a number", key, raw),
        }
    }
}

impl AppConfig {
    /// Defaults, then `CONFIG_PATH` (or ./config.yaml) if present, then environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = if Path::new(&path).exists() {
            info!("📄 [CONFIG] Reading {}", path);
            Self::from_yaml_file(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply environment-style overrides. `lookup` returns the raw value for a key.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("YAHOO_FOREX_ENABLED") {
            self.forex.enabled = parse_bool(&v);
        }
        override_number(&mut self.forex.news_limit, "YAHOO_NEWS_LIMIT", lookup("YAHOO_NEWS_LIMIT"));
        override_number(&mut self.forex.cache_ttl_secs, "YAHOO_CACHE_DURATION", lookup("YAHOO_CACHE_DURATION"));
        override_number(
            &mut self.forex.cache_max_entries,
            "YAHOO_CACHE_MAX_ENTRIES",
            lookup("YAHOO_CACHE_MAX_ENTRIES"),
        );
        if let Some(v) = lookup("YAHOO_HISTORY_PERIOD").and_then(non_empty) {
            self.forex.history_period = v.trim().to_string();
        }
        if let Some(v) = lookup("FOREX_PAIRS") {
            let pairs = parse_list(&v);
            if !pairs.is_empty() {
                self.forex.pairs = pairs;
            }
        }

        if let Some(v) = lookup("OPENROUTER_API_KEY") {
            self.llm.api_key = non_empty(v);
        }
        if let Some(v) = lookup("OPENROUTER_BASE_URL").and_then(non_empty) {
            self.llm.base_url = v;
        }
        if let Some(v) = lookup("OPENROUTER_REFERER").and_then(non_empty) {
            self.llm.referer = v;
        }
        if let Some(v) = lookup("OPENROUTER_APP_TITLE").and_then(non_empty) {
            self.llm.app_title = v;
        }
        if let Some(v) = lookup("LLM_MODEL").and_then(non_empty) {
            self.llm.model = v;
        }

        override_number(
            &mut self.trading.cycle_interval_secs,
            "CYCLE_INTERVAL_SECS",
            lookup("CYCLE_INTERVAL_SECS"),
        );
        override_number(&mut self.trading.error_retry_secs, "ERROR_RETRY_SECS", lookup("ERROR_RETRY_SECS"));

        if let Some(v) = lookup("TAAPI_API_KEY") {
            self.taapi_api_key = non_empty(v);
        }
    }
}
