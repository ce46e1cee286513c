pub mod decision;

use crate::error::LlmError;
use crate::llm::LLMClient;

use tracing::{debug, info};

pub use decision::DecisionAgent;

pub trait Agent {
    fn name(&self) -> &str;
    fn system_prompt(&self) -> &str;

    /// Send `query` as the user turn under this agent's system prompt
    async fn run(&self, query: &str, llm: &LLMClient) -> Result<String, LlmError> {
        info!("🤖 [AGENT] Sending request to {}...", self.name());
        let response = llm.chat(self.system_prompt(), query).await?;
        debug!("🤖 [AGENT] Response from {}: {}", self.name(), response);
        Ok(response)
    }
}
