//! FX advisor - LLM-driven trading recommendations for the major currency pairs
//!
//! This library resolves currency pairs, gathers market data and news through
//! a cached provider, scores headline sentiment, and asks a chat-completions
//! model for BUY/SELL/HOLD decisions on a fixed cadence. Nothing is executed.

pub mod agents;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod fx;
pub mod llm;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use agents::DecisionAgent;
pub use config::AppConfig;
pub use data::ForexDataService;
pub use fx::{resolve_pair, CurrencyPair};
pub use models::{DecisionResult, TradeAction, TradeDecision};
pub use services::TradingLoop;
