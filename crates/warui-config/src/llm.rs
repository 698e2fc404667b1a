use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_chat_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_summary_model() -> String {
    "claude-3-5-sonnet-20240620".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_seconds() -> u64 {
    120
}

/// Language model settings. Chat replies and chat-log summaries use separate models.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_summary_model")]
    pub summary_model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            chat_model: default_chat_model(),
            summary_model: default_summary_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl LlmConfig {
    pub fn new() -> Self {
        let api_key = env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        let api_url = env::var("ANTHROPIC_API_URL").unwrap_or_else(|_| default_api_url());
        let chat_model = env::var("WARUI_CHAT_MODEL").unwrap_or_else(|_| default_chat_model());
        let summary_model =
            env::var("WARUI_SUMMARY_MODEL").unwrap_or_else(|_| default_summary_model());

        Self {
            api_key,
            api_url,
            chat_model,
            summary_model,
            ..Self::default()
        }
    }
}
