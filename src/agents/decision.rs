use serde_json::Value;
use tracing::{error, info, warn};

use crate::agents::Agent;
use crate::config::AppConfig;
use crate::data::market::ForexDataService;
use crate::error::LlmError;
use crate::fx::pairs::normalize_pair;
use crate::llm::LLMClient;
use crate::models::{AccountDashboard, DecisionResult, TechnicalSection, TradeAction, TradeDecision};
use crate::services::context::{
    render_account, render_diary, render_sentiment, render_technicals, rule, SECTION_WIDTH,
};
use crate::services::sentiment::analyze_sentiment;

pub const FALLBACK_REASONING: &str =
    "Unable to make informed decision due to API error. Holding all positions for safety.";
const FALLBACK_EXIT_PLAN: &str = "Wait for stable market conditions";
const FALLBACK_RATIONALE: &str = "API error - defaulting to HOLD for capital preservation";

/// Builds the per-cycle prompt and turns the model's reply into trade decisions.
pub struct DecisionAgent {
    forex: ForexDataService,
    llm: Option<LLMClient>,
    news_limit: usize,
}

impl Agent for DecisionAgent {
    fn name(&self) -> &str {
        "FX-Decision-Agent"
    }

    fn system_prompt(&self) -> &str {
        r#"You are an expert FOREX trading agent. Analyze the market data below and make disciplined trading decisions for each currency pair.

DATA SOURCES:
- Market data: recent rates, support/resistance, volatility and news for major FOREX pairs
- News sentiment: keyword-based bullish/bearish counts per currency
- Technical indicators: EMA, RSI, MACD and trend, as supplied
- Account: balance, open positions and recent trading diary

FUNDAMENTAL ANALYSIS:
1. Central bank policy: rate decisions, statements and forward guidance
2. Economic data: GDP, inflation, employment and trade balance
3. News sentiment: bullish/bearish signals in headlines
4. Geopolitics: elections, stability and global events

TECHNICAL ANALYSIS:
1. Trend: EMA 20/50/200 alignment
2. Momentum: RSI(14) above 70 is overbought, below 30 is oversold
3. Levels: support and resistance from recent highs and lows
4. Volatility: size positions down when the ATR is elevated

RISK RULES:
1. Never risk more than 2% of the account balance on one trade
2. Always place the stop loss at a key support/resistance level
3. Target at least a 2:1 reward-to-risk ratio
4. Keep exposure to any single currency under 30%
5. Hold at most 3-4 positions at once

DECISION LOGIC:
- BUY: uptrend, bullish sentiment, price near support with confirmation
- SELL: downtrend, bearish sentiment, price near resistance with confirmation
- HOLD: mixed signals, excessive volatility or no clear setup

OUTPUT FORMAT:
Reply with a single JSON object and nothing else:
{
  "reasoning": "Market conditions, sentiment and technical setup for each pair",
  "trade_decisions": [
    {
      "asset": "EURUSD",
      "action": "BUY" | "SELL" | "HOLD",
      "allocation_usd": 1000,
      "tp_price": 1.1200,
      "sl_price": 1.0900,
      "exit_plan": "Take profit at resistance or if sentiment shifts",
      "rationale": "Specific reason for this decision"
    }
  ]
}

Use null for tp_price and sl_price on HOLD. Capital preservation comes before profit.
"#
    }
}

impl DecisionAgent {
    pub fn new(forex: ForexDataService, llm: Option<LLMClient>, news_limit: usize) -> Self {
        Self {
            forex,
            llm,
            news_limit,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let forex = ForexDataService::from_config(&config.forex)?;

        let llm = match LLMClient::new(&config.llm) {
            Ok(client) => {
                info!("🤖 [AGENT] Using LLM {} at {}", client.model, config.llm.base_url);
                Some(client)
            }
            Err(LlmError::MissingCredential) => {
                warn!("⚠️ [AGENT] OPENROUTER_API_KEY not set - every cycle will HOLD");
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self::new(forex, llm, config.forex.news_limit))
    }

    pub fn forex(&self) -> &ForexDataService {
        &self.forex
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Account, positions, per-pair analysis and diary as one prompt.
    pub async fn build_context(
        &self,
        pairs: &[String],
        technicals: &[TechnicalSection],
        dashboard: &AccountDashboard,
    ) -> String {
        let mut parts = vec![
            rule(SECTION_WIDTH),
            "🤖 FOREX TRADING ANALYSIS".to_string(),
            rule(SECTION_WIDTH),
            String::new(),
            render_account(dashboard),
        ];

        for pair in pairs {
            parts.push(rule(SECTION_WIDTH));
            parts.push(format!("📈 ANALYSIS: {}", pair));
            parts.push(rule(SECTION_WIDTH));
            parts.push(String::new());

            if self.forex.is_enabled() {
                info!("📊 [AGENT] Fetching market data for {}...", pair);
                match self.forex.analyze(pair, self.news_limit, true).await {
                    Ok(analysis) => {
                        parts.push(analysis.llm_context);
                        parts.push(String::new());

                        if !analysis.news.is_empty() {
                            let sentiment = analyze_sentiment(
                                &analysis.news,
                                analysis.pair.base_code(),
                                analysis.pair.quote_code(),
                            );
                            parts.push(render_sentiment(&sentiment));
                        }
                    }
                    Err(e) => {
                        warn!("⚠️ [AGENT] Market data unavailable for {}: {}", pair, e);
                        parts.push(format!("⚠️ Market data unavailable: {}", e));
                        parts.push(String::new());
                    }
                }
            }

            let wanted = normalize_pair(pair);
            if let Some(section) = technicals.iter().find(|s| normalize_pair(&s.asset) == wanted) {
                parts.push(render_technicals(section));
            }
        }

        let diary = render_diary(&dashboard.recent_diary);
        if !diary.is_empty() {
            parts.push(diary);
        }

        parts.join("\n")
    }

    /// One decision per cycle. Never fails: every error becomes the all-HOLD fallback.
    pub async fn make_decision(
        &self,
        pairs: &[String],
        technicals: &[TechnicalSection],
        dashboard: &AccountDashboard,
    ) -> DecisionResult {
        let Some(llm) = &self.llm else {
            error!("❌ [AGENT] LLM API key not configured - holding all pairs");
            return fallback_decision(pairs);
        };

        match self.request_decision(llm, pairs, technicals, dashboard).await {
            Ok(decision) => {
                info!(
                    "✅ [AGENT] Decision received from LLM ({} trade decisions)",
                    decision.trade_decisions.len()
                );
                decision
            }
            Err(e) => {
                error!("❌ [AGENT] {} error: {}", e.kind(), e);
                fallback_decision(pairs)
            }
        }
    }

    async fn request_decision(
        &self,
        llm: &LLMClient,
        pairs: &[String],
        technicals: &[TechnicalSection],
        dashboard: &AccountDashboard,
    ) -> Result<DecisionResult, LlmError> {
        let context = self.build_context(pairs, technicals, dashboard).await;
        let content = self.run(&context, llm).await?;

        parse_decision(&content).inspect_err(|e| {
            if matches!(e, LlmError::MalformedJson(_) | LlmError::Schema(_)) {
                let preview: String = content.chars().take(500).collect();
                warn!("⚠️ [AGENT] Raw content: {}", preview);
            }
        })
    }
}

/// Remove a surrounding ```json / ``` fence if present.
pub fn strip_code_fence(content: &str) -> &str {
    let mut body = content.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

fn validate_decision(decision: &TradeDecision, index: usize) -> Result<(), LlmError> {
    if decision.asset.trim().is_empty() {
        return Err(LlmError::Schema(format!("trade_decisions[{}]: empty asset", index)));
    }
    if !decision.allocation_usd.is_finite() || decision.allocation_usd < 0.0 {
        return Err(LlmError::Schema(format!(
            "trade_decisions[{}]: allocation_usd must be a non-negative number, got {}",
            index, decision.allocation_usd
        )));
    }
    for (field, price) in [("tp_price", decision.tp_price), ("sl_price", decision.sl_price)] {
        if let Some(p) = price {
            if !p.is_finite() || p <= 0.0 {
                return Err(LlmError::Schema(format!(
                    "trade_decisions[{}]: {} must be positive, got {}",
                    index, field, p
                )));
            }
        }
    }
    Ok(())
}

/// Parse the model's reply: JSON well-formedness first, then the decision schema.
pub fn parse_decision(content: &str) -> Result<DecisionResult, LlmError> {
    let value: Value = serde_json::from_str(strip_code_fence(content))?;
    let decision: DecisionResult =
        serde_json::from_value(value).map_err(|e| LlmError::Schema(e.to_string()))?;

    for (i, trade) in decision.trade_decisions.iter().enumerate() {
        validate_decision(trade, i)?;
    }
    Ok(decision)
}

/// HOLD everything with zero allocation.
pub fn fallback_decision(pairs: &[String]) -> DecisionResult {
    DecisionResult {
        reasoning: FALLBACK_REASONING.to_string(),
        trade_decisions: pairs
            .iter()
            .map(|pair| TradeDecision {
                asset: pair.clone(),
                action: TradeAction::Hold,
                allocation_usd: 0.0,
                tp_price: None,
                sl_price: None,
                exit_plan: FALLBACK_EXIT_PLAN.to_string(),
                rationale: FALLBACK_RATIONALE.to_string(),
            })
            .collect(),
    }
}
