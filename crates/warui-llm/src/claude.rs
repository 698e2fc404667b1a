use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use warui_types::{HistoryMessage, Role};

use crate::{ChatModel, LlmError, ModelMetadata};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API chat model
#[derive(Clone)]
pub struct ClaudeChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ClaudeChat {
    pub fn new(
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.0,
        })
    }

    /// Use a different endpoint (proxies, local gateways)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn request_body(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[HistoryMessage],
        role: Role,
    ) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = history
            .iter()
            .map(|m| json!({ "role": api_role(m.role), "content": m.content }))
            .collect();
        messages.push(json!({ "role": api_role(role), "content": message }));

        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system_prompt,
            "messages": messages,
        })
    }
}

fn api_role(role: Role) -> &'static str {
    match role {
        Role::Human => "user",
        Role::Ai => "assistant",
    }
}

/// Text of the first content block
fn extract_text(json: &serde_json::Value) -> Result<String, LlmError> {
    json["content"]
        .get(0)
        .and_then(|block| block["text"].as_str())
        .map(str::to_string)
        .ok_or_else(|| LlmError::InvalidResponse("No text content in response".to_string()))
}

#[async_trait]
impl ChatModel for ClaudeChat {
    async fn invoke(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[HistoryMessage],
        role: Role,
    ) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::AuthenticationError);
        }

        let body = self.request_body(message, system_prompt, history, role);
        tracing::debug!(
            model = %self.model,
            history_len = history.len(),
            "Sending chat request"
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            return Err(LlmError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(LlmError::AuthenticationError);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        extract_text(&json)
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: "anthropic".to_string(),
            model: self.model.clone(),
        }
    }
}
