use forex_advisor::{AppConfig, DecisionAgent, TradingLoop};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Setup Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting FOREX advisor...");

    // Load Configuration
    let config = AppConfig::load()?;
    info!("Loaded Configuration: {:?}", config);

    info!("Using LLM Model: {}", config.llm.model);
    let agent = Arc::new(DecisionAgent::from_config(&config)?);

    TradingLoop::from_config(agent, &config).run().await;

    info!("👋 Goodbye!");
    Ok(())
}
