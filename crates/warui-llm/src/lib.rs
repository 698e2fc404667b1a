mod claude;

pub use claude::ClaudeChat;

use warui_types::{HistoryMessage, Role};

/// Conversational language model interface
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce a reply to `message`, given a system prompt and the prior
    /// alternating history (oldest first). `role` is the speaker of `message`.
    async fn invoke(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[HistoryMessage],
        role: Role,
    ) -> Result<String, LlmError>;

    /// Provider metadata
    fn metadata(&self) -> ModelMetadata;
}

#[derive(Debug, Clone)]
pub struct ModelMetadata {
    pub provider: String,
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}
