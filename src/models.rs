use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    #[serde(alias = "buy", alias = "Buy")]
    Buy,
    #[serde(alias = "sell", alias = "Sell")]
    Sell,
    #[serde(alias = "hold", alias = "Hold")]
    Hold,
}

impl TradeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Hold => "HOLD",
        }
    }

    /// Log marker used by the trading loop
    pub fn marker(self) -> &'static str {
        match self {
            TradeAction::Buy => "🟢",
            TradeAction::Sell => "🔴",
            TradeAction::Hold => "🟡",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeDecision {
    pub asset: String,
    pub action: TradeAction,

    /// Notional in USD; zero for HOLD
    pub allocation_usd: f64,

    #[serde(default)]
    pub tp_price: Option<f64>,
    #[serde(default)]
    pub sl_price: Option<f64>,

    #[serde(default)]
    pub exit_plan: String,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub reasoning: String,
    pub trade_decisions: Vec<TradeDecision>,
}

// ---------------------------------------------------------------------------
// Caller-supplied inputs. In this codebase both are placeholders.
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(default)]
    pub intraday: Map<String, Value>,
    #[serde(default)]
    pub long_term: Map<String, Value>,
}

/// Technical indicators for one asset, passed through to the prompt as-is
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSection {
    pub asset: String,
    pub current_price: Option<f64>,
    #[serde(default)]
    pub indicators: IndicatorSet,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub asset: String,
    pub size: f64,
    pub entry_price: f64,
    pub pnl: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub timestamp: String,
    pub action: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountDashboard {
    pub balance: f64,
    pub account_value: f64,
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    #[serde(default)]
    pub positions: Vec<OpenPosition>,
    #[serde(default)]
    pub recent_diary: Vec<DiaryEntry>,
}
