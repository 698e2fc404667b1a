use std::env;

use serde::{Deserialize, Serialize};
use warui_types::TermType;

fn default_n_terms() -> usize {
    5
}

fn default_min_raw_weight() -> u32 {
    30
}

fn default_types() -> Vec<TermType> {
    TermType::ALL.to_vec()
}

/// Focus-term selection settings
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct FocusConfig {
    #[serde(default = "default_n_terms")]
    pub n_terms: usize,
    /// Fixed seed for reproducible draws
    pub seed: Option<u64>,
    /// Floor added to every raw weight so mastered terms still get picked
    #[serde(default = "default_min_raw_weight")]
    pub min_raw_weight: u32,
    #[serde(default = "default_types")]
    pub types: Vec<TermType>,
    /// Also draw from terms the student has never answered
    #[serde(default)]
    pub include_unstudied: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            n_terms: default_n_terms(),
            seed: None,
            min_raw_weight: default_min_raw_weight(),
            types: default_types(),
            include_unstudied: false,
        }
    }
}

impl FocusConfig {
    pub fn new() -> Self {
        let n_terms = env::var("FOCUS_TERMS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_n_terms());

        let seed = env::var("FOCUS_SEED").ok().and_then(|v| v.parse().ok());

        let types = env::var("FOCUS_TYPES")
            .ok()
            .and_then(|v| parse_types(&v))
            .unwrap_or_else(default_types);

        Self {
            n_terms,
            seed,
            types,
            ..Self::default()
        }
    }
}

/// Comma separated list such as `vocab,grammar`. Any unknown name rejects the whole list.
fn parse_types(value: &str) -> Option<Vec<TermType>> {
    let types = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<TermType>().ok())
        .collect::<Option<Vec<_>>>()?;

    if types.is_empty() { None } else { Some(types) }
}
