use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.renshuu.org/v1".to_string()
}

fn default_proficiency_threshold() -> f64 {
    0.5
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RenshuuConfig {
    /// Bearer token for the Renshuu API
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Minimum progress (0-1) a level needs to count as reached
    #[serde(default = "default_proficiency_threshold")]
    pub proficiency_threshold: f64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RenshuuConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            proficiency_threshold: default_proficiency_threshold(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl RenshuuConfig {
    pub fn new() -> Self {
        let api_key = env::var("RENSHUU_API_KEY").unwrap_or_default();
        let api_url = env::var("RENSHUU_API_URL").unwrap_or_else(|_| default_api_url());
        let proficiency_threshold = env::var("PROFICIENCY_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_proficiency_threshold);

        Self {
            api_key,
            api_url,
            proficiency_threshold,
            ..Self::default()
        }
    }
}
