use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::chat::ChatConfig;
use self::focus::FocusConfig;
use self::llm::LlmConfig;
use self::renshuu::RenshuuConfig;

pub mod chat;
pub mod focus;
pub mod llm;
pub mod renshuu;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub renshuu: RenshuuConfig,
    pub llm: LlmConfig,
    pub chat: ChatConfig,
    pub focus: FocusConfig,
}

impl Config {
    /// Build from environment variables, falling back to defaults
    pub fn new() -> Self {
        Config {
            renshuu: RenshuuConfig::new(),
            llm: LlmConfig::new(),
            chat: ChatConfig::new(),
            focus: FocusConfig::new(),
        }
    }

    /// Load a JSON config file. Missing sections and fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)?;

        // secrets stay out of config files
        if config.renshuu.api_key.is_empty() {
            config.renshuu.api_key = std::env::var("RENSHUU_API_KEY").unwrap_or_default();
        }
        if config.llm.api_key.is_empty() {
            config.llm.api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
