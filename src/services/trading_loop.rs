use serde_json::{json, Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::agents::DecisionAgent;
use crate::config::AppConfig;
use crate::models::{AccountDashboard, DecisionResult, IndicatorSet, TechnicalSection, TradeDecision};
use crate::services::context::{format_money, rule};

const BANNER_WIDTH: usize = 70;

fn indicator_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Stand-in indicators until a real indicator feed is wired in.
pub fn placeholder_technicals(pairs: &[String]) -> Vec<TechnicalSection> {
    pairs
        .iter()
        .map(|pair| TechnicalSection {
            asset: pair.clone(),
            current_price: Some(1.1),
            indicators: IndicatorSet {
                intraday: indicator_map(json!({
                    "ema20": 1.098,
                    "rsi14": 55,
                    "macd": 0.0015,
                    "signal": 0.0012
                })),
                long_term: indicator_map(json!({
                    "ema20": 1.095,
                    "ema50": 1.09,
                    "ema200": 1.085,
                    "trend": "bullish"
                })),
            },
        })
        .collect()
}

/// Stand-in account until a broker account is wired in.
pub fn placeholder_dashboard() -> AccountDashboard {
    AccountDashboard {
        balance: 10_000.0,
        account_value: 10_500.0,
        total_return_pct: 5.0,
        sharpe_ratio: 1.2,
        positions: Vec::new(),
        recent_diary: Vec::new(),
    }
}

fn optional_price(price: Option<f64>) -> String {
    price.map(|p| p.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn or_na(text: &str) -> &str {
    if text.is_empty() {
        "N/A"
    } else {
        text
    }
}

/// Log lines for one trade decision.
pub fn describe_trade(trade: &TradeDecision) -> Vec<String> {
    vec![
        format!("  {} {}:", trade.action.marker(), trade.asset),
        format!("    Action: {}", trade.action),
        format!("    Allocation: ${}", format_money(trade.allocation_usd)),
        format!("    TP: {}", optional_price(trade.tp_price)),
        format!("    SL: {}", optional_price(trade.sl_price)),
        format!("    Exit Plan: {}", or_na(&trade.exit_plan)),
        format!("    Rationale: {}", or_na(&trade.rationale)),
    ]
}

pub fn log_decision(decision: &DecisionResult) {
    info!("{}", rule(BANNER_WIDTH));
    info!("💭 REASONING:");
    info!("{}", or_na(&decision.reasoning));

    info!("{}", rule(BANNER_WIDTH));
    info!("🎯 TRADE DECISIONS:");
    for trade in &decision.trade_decisions {
        for line in describe_trade(trade) {
            info!("{}", line);
        }
    }
    info!("{}", rule(BANNER_WIDTH));
}

/// Runs one decision cycle per interval until shut down.
pub struct TradingLoop {
    agent: Arc<DecisionAgent>,
    pairs: Vec<String>,
    interval: Duration,
    retry_delay: Duration,
}

impl TradingLoop {
    pub fn new(agent: Arc<DecisionAgent>, pairs: Vec<String>, interval: Duration, retry_delay: Duration) -> Self {
        Self {
            agent,
            pairs,
            interval,
            retry_delay,
        }
    }

    pub fn from_config(agent: Arc<DecisionAgent>, config: &AppConfig) -> Self {
        Self::new(
            agent,
            config.forex.pairs.clone(),
            Duration::from_secs(config.trading.cycle_interval_secs),
            Duration::from_secs(config.trading.error_retry_secs),
        )
    }

    pub fn pairs(&self) -> &[String] {
        &self.pairs
    }

    /// One cycle in its own task. None when the cycle body panicked.
    pub async fn run_cycle(&self, cycle: u64) -> Option<DecisionResult> {
        let span = info_span!("cycle", n = cycle, id = %Uuid::new_v4());

        let agent = self.agent.clone();
        let pairs = self.pairs.clone();
        let handle = tokio::spawn(
            async move {
                info!("🔄 Starting trading cycle #{}", cycle);
                let technicals = placeholder_technicals(&pairs);
                let dashboard = placeholder_dashboard();

                info!("🤔 Analyzing markets and making decision...");
                let decision = agent.make_decision(&pairs, &technicals, &dashboard).await;
                log_decision(&decision);
                decision
            }
            .instrument(span),
        );

        match handle.await {
            Ok(decision) => Some(decision),
            Err(e) => {
                error!("❌ [LOOP] Error in trading cycle #{}: {}", cycle, e);
                None
            }
        }
    }

    /// Cycle until `shutdown` resolves; returns the number of cycles started.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!("{}", rule(BANNER_WIDTH));
        info!("🚀 Starting FOREX advisor");
        info!("📊 Trading pairs: {}", self.pairs.join(", "));
        info!(
            "🔧 Market data: {}",
            if self.agent.forex().is_enabled() { "✅ Enabled" } else { "❌ Disabled" }
        );
        info!("{}", rule(BANNER_WIDTH));

        let mut cycle = 0u64;
        loop {
            cycle += 1;

            let delay = tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.run_cycle(cycle) => match outcome {
                    Some(_) => {
                        info!("⏰ [LOOP] Sleeping {}s until next cycle...", self.interval.as_secs());
                        self.interval
                    }
                    None => {
                        info!("⏰ [LOOP] Sleeping {}s before retry...", self.retry_delay.as_secs());
                        self.retry_delay
                    }
                },
            };

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("🛑 Bot stopped after {} cycle(s)", cycle);
        cycle
    }

    /// Cycle until Ctrl-C.
    pub async fn run(&self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("❌ [LOOP] Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;
    }
}
