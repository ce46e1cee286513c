use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::constants::forex::HISTORY_INTERVAL;
use crate::constants::provider::{REQUEST_TIMEOUT, USER_AGENT};
use crate::data::provider::{HistoricalBar, MarketDataProvider, ProviderResult, RawNewsItem};
use crate::error::ProviderError;

#[derive(Deserialize, Debug)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Deserialize, Debug)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Deserialize, Debug)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Deserialize, Debug, Default)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<RawNewsItem>,
}

/// Yahoo Finance chart + search endpoints.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    chart_url: String,
    search_url: String,
}

impl YahooFinanceClient {
    pub fn new(chart_url: impl Into<String>, search_url: impl Into<String>) -> ProviderResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            chart_url: chart_url.into().trim_end_matches('/').to_string(),
            search_url: search_url.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ProviderResult<T> {
        debug!("🌐 [YAHOO] GET {}", url);
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Zip the column arrays into bars, dropping rows with any missing value.
fn bars_from_chart(data: ChartData) -> Vec<HistoricalBar> {
    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            Some(HistoricalBar {
                timestamp: *ts,
                open: (*quote.open.get(i)?)?,
                high: (*quote.high.get(i)?)?,
                low: (*quote.low.get(i)?)?,
                close: (*quote.close.get(i)?)?,
            })
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    fn name(&self) -> &'static str {
        "yahoo_finance"
    }

    async fn history(&self, symbol: &str, period: &str) -> ProviderResult<Vec<HistoricalBar>> {
        let url = Url::parse_with_params(
            &format!("{}/{}", self.chart_url, symbol),
            &[("range", period), ("interval", HISTORY_INTERVAL)],
        )?;

        let response: ChartResponse = self.get_json(url).await?;

        if let Some(error) = response.chart.error {
            return Err(ProviderError::Upstream {
                code: error.code,
                description: error.description,
            });
        }

        Ok(response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(bars_from_chart)
            .unwrap_or_default())
    }

    async fn news(&self, symbol: &str, max_items: usize) -> ProviderResult<Vec<RawNewsItem>> {
        let news_count = max_items.to_string();
        let url = Url::parse_with_params(
            &self.search_url,
            &[("q", symbol), ("quotesCount", "0"), ("newsCount", news_count.as_str())],
        )?;

        let response: SearchResponse = self.get_json(url).await?;
        Ok(response.news)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> YahooFinanceClient {
        YahooFinanceClient::new(
            format!("{}/v8/finance/chart", server.url()),
            format!("{}/v1/finance/search", server.url()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_history_parses_bars_and_skips_gaps() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "EURUSD=X"},
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {"quote": [{
                        "open":  [1.08, null, 1.09],
                        "high":  [1.09, 1.10, 1.095],
                        "low":   [1.07, 1.08, 1.085],
                        "close": [1.085, 1.09, 1.092]
                    }]}
                }],
                "error": null
            }
        }"#;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/v8/finance/chart/EURUSD=X".to_string()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("range".into(), "5d".into()),
                Matcher::UrlEncoded("interval".into(), "1d".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let bars = client_for(&server).history("EURUSD=X", "5d").await.unwrap();

        mock.assert_async().await;
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1700000000);
        assert_eq!(bars[1].close, 1.092);
    }

    #[tokio::test]
    async fn test_history_reports_chart_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/v8/finance/chart/".to_string()))
            .with_status(200)
            .with_body(r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}}"#)
            .create_async()
            .await;

        let err = client_for(&server).history("EURUSD=X", "5d").await.unwrap_err();
        assert!(matches!(err, ProviderError::Upstream { ref code, .. } if code == "Not Found"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/v1/finance/search".to_string()))
            .with_status(429)
            .with_body("Too Many Requests")
            .create_async()
            .await;

        let err = client_for(&server).news("EURUSD=X", 5).await.unwrap_err();
        match err {
            ProviderError::Http { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "Too Many Requests");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_news_parses_search_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/v1/finance/search".to_string()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "EURUSD=X".into()),
                Matcher::UrlEncoded("newsCount".into(), "3".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"count": 2, "quotes": [], "news": [
                    {"uuid": "a", "title": "EUR rallies", "publisher": "Reuters", "link": "https://x/a", "providerPublishTime": 1700000000, "type": "STORY"},
                    {"uuid": "b", "title": "Dollar steady"}
                ]}"#,
            )
            .create_async()
            .await;

        let news = client_for(&server).news("EURUSD=X", 3).await.unwrap();

        mock.assert_async().await;
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].title.as_deref(), Some("EUR rallies"));
        assert_eq!(news[0].provider_publish_time, Some(1700000000));
        assert_eq!(news[1].publisher, None);
    }
}
