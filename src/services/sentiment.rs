//! Keyword sentiment over news headlines for a currency pair.
//!
//! Matching is plain substring containment on the lowercased title, so
//! "weak" also fires inside "weakens". Each keyword counts at most once
//! per headline.

use serde::Serialize;
use std::fmt;

use crate::constants::sentiment::{BUY_THRESHOLD, SELL_THRESHOLD};
use crate::data::market::NewsItem;

pub const BULLISH_KEYWORDS: [&str; 16] = [
    "strengthens",
    "rallies",
    "gains",
    "rises",
    "surges",
    "climbs",
    "rate hike",
    "hawkish",
    "strong",
    "growth",
    "positive",
    "bullish",
    "optimistic",
    "improve",
    "recovery",
    "expansion",
];

pub const BEARISH_KEYWORDS: [&str; 16] = [
    "weakens",
    "falls",
    "declines",
    "drops",
    "plunges",
    "slides",
    "rate cut",
    "dovish",
    "weak",
    "recession",
    "negative",
    "bearish",
    "pessimistic",
    "worsen",
    "slowdown",
    "contraction",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Neutral,
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        if score > BUY_THRESHOLD {
            Recommendation::Buy
        } else if score < SELL_THRESHOLD {
            Recommendation::Sell
        } else {
            Recommendation::Neutral
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::Buy => "BUY",
            Recommendation::Sell => "SELL",
            Recommendation::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SentimentResult {
    pub base: String,
    pub quote: String,
    pub base_bullish: u32,
    pub base_bearish: u32,
    pub quote_bullish: u32,
    pub quote_bearish: u32,
    /// (base bullish + quote bearish) - (base bearish + quote bullish)
    pub pair_sentiment: i32,
    pub recommendation: Recommendation,
}

fn keyword_hits(title: &str, keywords: &[&str]) -> u32 {
    keywords.iter().filter(|k| title.contains(*k)).count() as u32
}

/// Score headline titles for a pair.
pub fn score_headlines<'a, I>(titles: I, base: &str, quote: &str) -> SentimentResult
where
    I: IntoIterator<Item = &'a str>,
{
    let base_lower = base.to_lowercase();
    let quote_lower = quote.to_lowercase();

    let (mut base_bullish, mut base_bearish) = (0u32, 0u32);
    let (mut quote_bullish, mut quote_bearish) = (0u32, 0u32);

    for title in titles {
        let title = title.to_lowercase();
        let bullish = keyword_hits(&title, &BULLISH_KEYWORDS);
        let bearish = keyword_hits(&title, &BEARISH_KEYWORDS);

        if title.contains(&base_lower) {
            base_bullish += bullish;
            base_bearish += bearish;
        }
        if title.contains(&quote_lower) {
            quote_bullish += bullish;
            quote_bearish += bearish;
        }
    }

    let pair_sentiment =
        (base_bullish + quote_bearish) as i32 - (base_bearish + quote_bullish) as i32;

    SentimentResult {
        base: base.to_uppercase(),
        quote: quote.to_uppercase(),
        base_bullish,
        base_bearish,
        quote_bullish,
        quote_bearish,
        pair_sentiment,
        recommendation: Recommendation::from_score(pair_sentiment),
    }
}

/// Score a news list for a pair given its base and quote codes.
pub fn analyze_sentiment(news: &[NewsItem], base: &str, quote: &str) -> SentimentResult {
    score_headlines(news.iter().map(|n| n.title.as_str()), base, quote)
}
