use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use backoff::ExponentialBackoffBuilder;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::info;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// Chat-completions client for an OpenAI-compatible endpoint (OpenRouter by default).
#[derive(Clone)]
pub struct LLMClient {
    pub client: Client<OpenAIConfig>,
    pub model: String,
    temperature: f32,
    max_tokens: u32,
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, LlmError> {
    HeaderValue::from_str(value).map_err(|e| LlmError::Client(format!("invalid {} header: {}", name, e)))
}

impl LLMClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        if !config.has_credential() {
            return Err(LlmError::MissingCredential);
        }
        let api_key = config.api_key.clone().unwrap_or_default();

        // OpenRouter uses these to attribute traffic to the calling app
        let mut headers = HeaderMap::new();
        headers.insert("HTTP-Referer", header_value("HTTP-Referer", &config.referer)?);
        headers.insert("X-Title", header_value("X-Title", &config.app_title)?);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(config.base_url.trim_end_matches('/'));
        // One request per cycle: a failed call falls back to HOLD instead of retrying
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(no_retry);

        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub async fn chat(&self, system_prompt: &str, user_input: &str) -> Result<String, LlmError> {
        info!("🤖 [LLM] Sending request (Model: {})...", self.model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(system_prompt)
                        .build()?,
                ),
                ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(user_input)
                        .build()?,
                ),
            ])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;

        info!("🤖 [LLM] Response received.");

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}
