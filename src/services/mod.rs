pub mod context;
pub mod sentiment;
pub mod trading_loop;

pub use sentiment::{analyze_sentiment, Recommendation, SentimentResult};
pub use trading_loop::TradingLoop;
