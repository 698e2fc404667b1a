use std::env;

use serde::{Deserialize, Serialize};
use warui_types::Level;

fn default_threshold() -> usize {
    20
}

fn default_trim_to() -> usize {
    10
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ChatConfig {
    /// Fixed conversation level. Estimated from the study profile when unset.
    pub level: Option<Level>,
    /// Log length that triggers summarization
    #[serde(default = "default_threshold")]
    pub chat_log_threshold: usize,
    /// Entries kept after summarization, the summary included
    #[serde(default = "default_trim_to")]
    pub chat_log_trim_to: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            level: None,
            chat_log_threshold: default_threshold(),
            chat_log_trim_to: default_trim_to(),
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        let level = env::var("WARUI_LEVEL").ok().and_then(|v| v.parse().ok());

        let chat_log_threshold = env::var("CHAT_LOG_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_threshold());

        let chat_log_trim_to = env::var("CHAT_LOG_TRIM_TO")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_trim_to());

        Self {
            level,
            chat_log_threshold,
            chat_log_trim_to,
        }
    }
}
