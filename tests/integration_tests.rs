//! Integration tests for the advisory pipeline.
//! These tests drive the public API against in-process fakes and mock HTTP servers.

use async_trait::async_trait;
use forex_advisor::agents::decision::{fallback_decision, parse_decision};
use forex_advisor::config::{AppConfig, LlmConfig};
use forex_advisor::data::provider::{HistoricalBar, MarketDataProvider, ProviderResult, RawNewsItem};
use forex_advisor::data::ForexDataService;
use forex_advisor::fx::pairs::{parse_pair, provider_symbol};
use forex_advisor::llm::LLMClient;
use forex_advisor::models::TradeAction;
use forex_advisor::services::sentiment::{analyze_sentiment, score_headlines, Recommendation};
use forex_advisor::services::trading_loop::{placeholder_dashboard, placeholder_technicals};
use forex_advisor::{DecisionAgent, TradingLoop};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fixed bars and headlines for every symbol, counting each query.
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for CountingProvider {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn history(&self, _symbol: &str, _period: &str) -> ProviderResult<Vec<HistoricalBar>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..5)
            .map(|i| HistoricalBar {
                timestamp: 1_700_000_000 + i * 86_400,
                open: 1.08,
                high: 1.09 + i as f64 * 0.001,
                low: 1.07,
                close: 1.08 + i as f64 * 0.001,
            })
            .collect())
    }

    async fn news(&self, _symbol: &str, _max_items: usize) -> ProviderResult<Vec<RawNewsItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            RawNewsItem {
                title: Some("EUR strengthens as ECB turns hawkish".to_string()),
                publisher: Some("Reuters".to_string()),
                link: Some("https://news.example/1".to_string()),
                provider_publish_time: Some(1_700_000_000),
            },
            RawNewsItem {
                title: Some("USD weakens on dovish Fed signals".to_string()),
                publisher: Some("Bloomberg".to_string()),
                link: Some("https://news.example/2".to_string()),
                provider_publish_time: Some(1_700_000_100),
            },
        ])
    }
}

fn pairs(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

fn service(provider: Arc<CountingProvider>) -> ForexDataService {
    ForexDataService::new(provider, Duration::from_secs(300), 64, "5d")
}

#[test]
fn test_pair_surface_forms_resolve_identically() {
    for form in ["EURUSD", "eur/usd", "EURUSD=X", "Eur-Usd", "eurusd=x"] {
        assert_eq!(parse_pair(form).unwrap(), ("EUR".to_string(), "USD".to_string()), "{}", form);
        assert_eq!(provider_symbol(form).unwrap(), "EURUSD=X");
    }

    for bad in ["EURUS", "EURUSDX", "EURGBP"] {
        let err = parse_pair(bad).unwrap_err();
        assert!(err.to_string().contains(bad), "{}", err);
    }
}

#[test]
fn test_headline_scenario_is_bullish_for_eurusd() {
    let result = score_headlines(
        ["EUR strengthens as ECB turns hawkish", "USD weakens on dovish Fed signals"],
        "EUR",
        "USD",
    );

    assert!(result.base_bullish >= 1);
    assert!(result.quote_bearish >= 1);
    assert!(result.pair_sentiment >= 3);
    assert_eq!(result.recommendation, Recommendation::Buy);
}

#[tokio::test]
async fn test_market_data_is_cached_within_ttl() {
    let provider = Arc::new(CountingProvider::default());
    let svc = service(provider.clone());

    let first = svc.fetch_market_data("EURUSD", "5d").await.unwrap();
    let second = svc.fetch_market_data("EUR/USD", "5d").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert!(first.support <= first.current_rate && first.current_rate <= first.resistance);
}

#[tokio::test]
async fn test_news_feeds_sentiment() {
    let svc = service(Arc::new(CountingProvider::default()));

    let news = svc.fetch_news("EURUSD", 10).await;
    assert_eq!(news.len(), 2);

    let sentiment = analyze_sentiment(&news, "EUR", "USD");
    assert_eq!(sentiment.recommendation, Recommendation::Buy);
}

#[tokio::test]
async fn test_no_credential_holds_without_network() {
    let provider = Arc::new(CountingProvider::default());
    let agent = DecisionAgent::new(service(provider.clone()), None, 10);
    let pairs = pairs(&["EURUSD", "GBPUSD"]);

    let result = agent
        .make_decision(&pairs, &placeholder_technicals(&pairs), &placeholder_dashboard())
        .await;

    assert_eq!(result.trade_decisions.len(), 2);
    for decision in &result.trade_decisions {
        assert_eq!(decision.action, TradeAction::Hold);
        assert_eq!(decision.allocation_usd, 0.0);
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_from_config_without_key_runs_offline() {
    let mut config = AppConfig::default();
    config.forex.enabled = false;
    config.forex.pairs = pairs(&["USDJPY"]);

    let agent = Arc::new(DecisionAgent::from_config(&config).unwrap());
    assert!(!agent.has_llm());
    assert!(!agent.forex().is_enabled());

    let trading = TradingLoop::from_config(agent, &config);
    let decision = trading.run_cycle(1).await.unwrap();
    assert_eq!(decision, fallback_decision(&pairs(&["USDJPY"])));
}

#[tokio::test]
async fn test_full_cycle_against_mock_llm() {
    let mut server = mockito::Server::new_async().await;
    let content = "```json\n{\"reasoning\": \"EUR bid on hawkish ECB\", \"trade_decisions\": [{\"asset\": \"EURUSD\", \"action\": \"BUY\", \"allocation_usd\": 500, \"tp_price\": 1.1, \"sl_price\": 1.07, \"exit_plan\": \"Exit at resistance\", \"rationale\": \"Sentiment and trend agree\"}]}\n```";
    let body = serde_json::json!({
        "id": "gen-42",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    });
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::Regex("ANALYSIS: EURUSD".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let llm = LLMClient::new(&LlmConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.url(),
        model: "test-model".to_string(),
        ..LlmConfig::default()
    })
    .unwrap();
    let provider = Arc::new(CountingProvider::default());
    let agent = Arc::new(DecisionAgent::new(service(provider.clone()), Some(llm), 10));

    let trading = TradingLoop::new(
        agent,
        pairs(&["EURUSD"]),
        Duration::from_secs(300),
        Duration::from_secs(60),
    );
    let decision = trading.run_cycle(1).await.unwrap();

    mock.assert_async().await;
    assert!(provider.calls.load(Ordering::SeqCst) > 0);

    let expected = parse_decision(content).unwrap();
    assert_eq!(decision, expected);
    assert_eq!(decision.trade_decisions[0].action, TradeAction::Buy);
    assert_eq!(decision.trade_decisions[0].allocation_usd, 500.0);
}
