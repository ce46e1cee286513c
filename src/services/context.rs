//! Text rendering for the LLM prompt.

use serde_json::{Map, Value};

use crate::constants::technicals::{
    DIARY_ENTRIES, HIGH_VOLATILITY, OVERBOUGHT_POSITION, OVERSOLD_POSITION,
};
use crate::data::market::{MarketSnapshot, NewsItem, PipInfo};
use crate::fx::pairs::CurrencyPair;
use crate::models::{AccountDashboard, DiaryEntry, TechnicalSection};
use crate::services::sentiment::SentimentResult;

pub const SECTION_WIDTH: usize = 80;
const PAIR_WIDTH: usize = 70;

pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// "12345.6" -> "12,345.60"
pub fn format_money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let Some((int_part, frac)) = formatted.split_once('.') else {
        return formatted;
    };
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_thousands(int_part), frac)
}

/// Like [`format_money`] but always signed: "+1,250.00"
pub fn format_signed_money(value: f64) -> String {
    let body = format_money(value);
    if body.starts_with('-') {
        body
    } else {
        format!("+{}", body)
    }
}

fn format_units(value: f64) -> String {
    let formatted = format!("{:.0}", value.abs());
    let sign = if value < 0.0 && formatted != "0" { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&formatted))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-pair block: market data, currency info, pip value, news and range context.
pub fn render_pair_section(
    pair: &CurrencyPair,
    market: Option<&MarketSnapshot>,
    pip: Option<&PipInfo>,
    news: &[NewsItem],
    include_technicals: bool,
) -> String {
    let Some(market) = market else {
        return format!("❌ Unable to fetch data for {}", pair);
    };

    let base = &market.base_info;
    let quote = &market.quote_info;
    let mut out = Vec::new();

    out.push(rule(PAIR_WIDTH));
    out.push(format!("📊 {} {} {} - Market Data", base.flag, pair, quote.flag));
    out.push(rule(PAIR_WIDTH));
    out.push(String::new());

    out.push("💹 MARKET DATA:".to_string());
    out.push(format!("  Current Rate: {:.5}", market.current_rate));
    out.push(format!("  Change: {:+.5} ({:+.2}%)", market.change, market.change_pct));
    out.push(format!("  High: {:.5}", market.high));
    out.push(format!("  Low: {:.5}", market.low));
    out.push(format!("  Support: {:.5}", market.support));
    out.push(format!("  Resistance: {:.5}", market.resistance));
    out.push(format!("  Volatility (ATR): {:.5}", market.volatility));
    out.push(String::new());

    out.push("🏛️ CURRENCY INFO:".to_string());
    out.push(format!("  Base: {} - {}", base.name, base.central_bank));
    out.push(format!("  Quote: {} - {}", quote.name, quote.central_bank));
    out.push(String::new());

    if let Some(pip) = pip {
        out.push("📐 PIP VALUE:".to_string());
        out.push(format!("  Pip Size: {}", pip.pip_size));
        out.push(format!("  Pip Value (USD): ${:.2}", pip.pip_value));
        out.push(format!("  Lot Size: {} (Units: {})", pip.lot_size, format_units(pip.units)));
        out.push(String::new());
    }

    if news.is_empty() {
        out.push("📰 LATEST NEWS: No recent news available".to_string());
    } else {
        out.push(format!("📰 LATEST NEWS ({} articles):", news.len()));
        for (i, article) in news.iter().enumerate() {
            out.push(format!("  {}. [{}] {}", i + 1, article.published(), article.title));
            out.push(format!("     Source: {}", article.publisher));
        }
    }
    out.push(String::new());

    if include_technicals {
        out.push("📈 TECHNICAL CONTEXT:".to_string());
        out.push(format!("  Position in Range: {:.1}%", market.position_in_range));
        if market.position_in_range > OVERBOUGHT_POSITION {
            out.push("  → Near resistance (overbought territory)".to_string());
        } else if market.position_in_range < OVERSOLD_POSITION {
            out.push("  → Near support (oversold territory)".to_string());
        } else {
            out.push("  → Mid-range (neutral territory)".to_string());
        }

        if market.volatility > HIGH_VOLATILITY {
            out.push("  Volatility: HIGH - Caution advised".to_string());
        } else {
            out.push("  Volatility: NORMAL".to_string());
        }
        out.push(String::new());
    }

    out.join("\n")
}

pub fn render_sentiment(sentiment: &SentimentResult) -> String {
    [
        "🎯 SENTIMENT ANALYSIS:".to_string(),
        format!(
            "  Base ({}) Bullish: {} | Bearish: {}",
            sentiment.base, sentiment.base_bullish, sentiment.base_bearish
        ),
        format!(
            "  Quote ({}) Bullish: {} | Bearish: {}",
            sentiment.quote, sentiment.quote_bullish, sentiment.quote_bearish
        ),
        format!("  Pair Sentiment Score: {:+}", sentiment.pair_sentiment),
        format!("  Recommendation: {}", sentiment.recommendation),
        String::new(),
    ]
    .join("\n")
}

/// Account overview followed by open positions.
pub fn render_account(dashboard: &AccountDashboard) -> String {
    let mut out = vec![
        "💰 ACCOUNT OVERVIEW:".to_string(),
        format!("  Balance: ${}", format_money(dashboard.balance)),
        format!("  Account Value: ${}", format_money(dashboard.account_value)),
        format!("  Total Return: {:+.2}%", dashboard.total_return_pct),
        format!("  Sharpe Ratio: {:.2}", dashboard.sharpe_ratio),
        String::new(),
    ];

    if dashboard.positions.is_empty() {
        out.push("📊 CURRENT POSITIONS: None".to_string());
    } else {
        out.push("📊 CURRENT POSITIONS:".to_string());
        for pos in &dashboard.positions {
            out.push(format!("  {}: {} units @ {:.5}", pos.asset, pos.size, pos.entry_price));
            let marker = if pos.pnl > 0.0 {
                "📈"
            } else if pos.pnl < 0.0 {
                "📉"
            } else {
                "➖"
            };
            out.push(format!("    {} P&L: ${}", marker, format_signed_money(pos.pnl)));
        }
    }
    out.push(String::new());

    out.join("\n")
}

fn push_indicator_map(out: &mut Vec<String>, label: &str, map: &Map<String, Value>) {
    if map.is_empty() {
        return;
    }
    out.push(format!("  {}:", label));
    for (key, value) in map {
        out.push(format!("    {}: {}", key, display_value(value)));
    }
}

pub fn render_technicals(section: &TechnicalSection) -> String {
    let price = section
        .current_price
        .map(|p| p.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let mut out = vec![
        "📊 TECHNICAL INDICATORS:".to_string(),
        format!("  Current Price: {}", price),
    ];
    push_indicator_map(&mut out, "Intraday", &section.indicators.intraday);
    push_indicator_map(&mut out, "Long-term", &section.indicators.long_term);
    out.push(String::new());

    out.join("\n")
}

/// Most recent diary entries; empty string when there are none.
pub fn render_diary(entries: &[DiaryEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let start = entries.len().saturating_sub(DIARY_ENTRIES);
    let mut out = vec![
        rule(SECTION_WIDTH),
        "📝 RECENT TRADING DIARY:".to_string(),
        rule(SECTION_WIDTH),
    ];
    for entry in &entries[start..] {
        out.push(format!("  [{}] {}", entry.timestamp, entry.action));
        out.push(format!("    {}", entry.notes));
    }
    out.push(String::new());

    out.join("\n")
}
