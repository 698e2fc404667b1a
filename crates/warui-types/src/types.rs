use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// JLPT-style proficiency tier, ordered from beginner to advanced
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    N5, // Beginner
    N4, // Pre-intermediate
    N3, // Intermediate
    N2, // Pre-advanced
    N1, // Advanced
}

impl Level {
    /// All levels, lowest first
    pub const ALL: [Level; 5] = [Level::N5, Level::N4, Level::N3, Level::N2, Level::N1];

    /// Lowercase identifier as used by the study service ("n3")
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::N5 => "n5",
            Level::N4 => "n4",
            Level::N3 => "n3",
            Level::N2 => "n2",
            Level::N1 => "n1",
        }
    }

    /// Uppercase label for prompts ("N3")
    pub fn label(&self) -> &'static str {
        match self {
            Level::N5 => "N5",
            Level::N4 => "N4",
            Level::N3 => "N3",
            Level::N2 => "N2",
            Level::N1 => "N1",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "n5" => Ok(Level::N5),
            "n4" => Ok(Level::N4),
            "n3" => Ok(Level::N3),
            "n2" => Ok(Level::N2),
            "n1" => Ok(Level::N1),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// Kind of study content. Not reported by the service, derived from field shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermType {
    Kanji,
    Vocab,
    Grammar,
}

impl TermType {
    pub const ALL: [TermType; 3] = [TermType::Vocab, TermType::Kanji, TermType::Grammar];

    pub fn as_str(&self) -> &'static str {
        match self {
            TermType::Kanji => "kanji",
            TermType::Vocab => "vocab",
            TermType::Grammar => "grammar",
        }
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kanji" => Ok(TermType::Kanji),
            "vocab" => Ok(TermType::Vocab),
            "grammar" => Ok(TermType::Grammar),
            other => Err(format!("unknown term type: {other}")),
        }
    }
}

/// Correct/missed answer counts recorded by the study service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyCounters {
    pub correct: i64,
    pub missed: i64,
}

impl StudyCounters {
    pub fn total(&self) -> i64 {
        self.correct + self.missed
    }
}

/// A classified, level-tagged unit of study content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub term_type: TermType,
    /// Inherited from the schedule the term was fetched from
    pub level: Level,
    /// Mastery percentage, 0-100
    pub mastery: u8,
    pub counters: Option<StudyCounters>,
    /// Payload exactly as the service returned it
    pub data: serde_json::Value,
}

impl Term {
    /// Whether the student has answered this term at least once
    pub fn is_studied(&self) -> bool {
        self.counters.is_some_and(|c| c.total() > 0)
    }

    /// Payload shown to the language model: service fields without the
    /// per-user statistics, plus the derived type and level.
    pub fn prompt_view(&self) -> serde_json::Value {
        let mut view = match &self.data {
            serde_json::Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        view.remove("user_data");
        view.insert("type".to_string(), self.term_type.as_str().into());
        view.insert("level".to_string(), self.level.as_str().into());
        serde_json::Value::Object(view)
    }
}

/// Named, paginated collection of terms in the study service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub name: String,
    /// Estimated from the schedule name
    pub level: Level,
    /// Estimated from the schedule name, if it hints at one
    pub term_type: Option<TermType>,
}
