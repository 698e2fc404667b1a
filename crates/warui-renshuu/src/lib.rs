mod classify;
mod client;

pub use classify::{classify_term, estimate_level_by_keywords, estimate_type_by_keywords};
pub use client::RenshuuClient;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use warui_types::{Level, Schedule, StudyCounters, Term, TermType};

/// Raw responses of the study-tracking service
#[async_trait]
pub trait TermSource: Send + Sync {
    /// Profile with per-level progress percentages
    async fn profile(&self) -> Result<Value, RenshuuError>;

    /// All schedules of the user
    async fn schedules(&self) -> Result<Value, RenshuuError>;

    /// One page of a schedule's term list. `None` requests the first page.
    async fn schedule_list(
        &self,
        schedule_id: &str,
        page: Option<u32>,
    ) -> Result<Value, RenshuuError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenshuuError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: HTTP {status}")]
    Api { status: u16 },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Missing field in response: {0}")]
    MissingField(String),

    #[error("Invalid field {path}: expected {expected}")]
    InvalidField { path: String, expected: String },
}

impl RenshuuError {
    /// Response did not have the expected shape
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            RenshuuError::MissingField(_) | RenshuuError::InvalidField { .. }
        )
    }
}

/// Per-level progress of the student
#[derive(Debug, Clone, PartialEq)]
pub struct Proficiency {
    /// Average of vocab, kanji, grammar and sentence progress, 0-1
    pub level_proficiencies: BTreeMap<Level, f64>,
    /// Highest level reaching the threshold, n5 if none does
    pub estimated_level: Level,
}

/// Which terms to collect from the schedules
#[derive(Debug, Clone)]
pub struct TermQuery {
    pub levels: Vec<Level>,
    pub types: Vec<TermType>,
    pub include_unstudied: bool,
}

impl Default for TermQuery {
    fn default() -> Self {
        Self {
            levels: vec![Level::N5],
            types: TermType::ALL.to_vec(),
            include_unstudied: false,
        }
    }
}

const PROGRESS_CATEGORIES: [&str; 4] = ["vocab", "kanji", "grammar", "sent"];

/// Estimate the student's level from their profile progress
pub async fn fetch_proficiency<S: TermSource + ?Sized>(
    source: &S,
    threshold: f64,
) -> Result<Proficiency, RenshuuError> {
    let profile = source.profile().await?;
    proficiency_from_profile(&profile, threshold)
}

pub fn proficiency_from_profile(
    profile: &Value,
    threshold: f64,
) -> Result<Proficiency, RenshuuError> {
    let mut level_proficiencies = BTreeMap::new();

    for level in Level::ALL {
        let mut total = 0.0;
        for category in PROGRESS_CATEGORIES {
            total += number_at(
                profile,
                &["level_progress_percs", category, level.as_str()],
            )?;
        }
        // equal importance of the four categories, each 0-100
        level_proficiencies.insert(level, total / 400.0);
    }

    let estimated_level = Level::ALL[1..]
        .iter()
        .rev()
        .find(|level| level_proficiencies[*level] >= threshold)
        .copied()
        .unwrap_or_default();

    tracing::debug!("Estimated level {} from profile", estimated_level);

    Ok(Proficiency {
        level_proficiencies,
        estimated_level,
    })
}

/// List schedules and estimate their level and type from the name
pub async fn fetch_schedules<S: TermSource + ?Sized>(
    source: &S,
) -> Result<Vec<Schedule>, RenshuuError> {
    let response = source.schedules().await?;
    let schedules = array_at(&response, &["schedules"])?;

    schedules
        .iter()
        .map(|schedule| {
            let id = id_of(schedule, "schedules[].id")?;
            let name = schedule
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| RenshuuError::MissingField("schedules[].name".to_string()))?;

            Ok(Schedule {
                id,
                name: name.to_string(),
                level: estimate_level_by_keywords(name),
                term_type: estimate_type_by_keywords(name),
            })
        })
        .collect()
}

/// Collect every page of a schedule's term list.
///
/// The first response already carries page 1 and the page count, the
/// remaining pages are fetched one after another.
pub async fn fetch_schedule_terms<S: TermSource + ?Sized>(
    source: &S,
    schedule_id: &str,
) -> Result<Vec<Value>, RenshuuError> {
    let first = source.schedule_list(schedule_id, None).await?;
    let total_pages = number_at(&first, &["contents", "total_pg"])? as u32;
    let mut terms = array_at(&first, &["contents", "terms"])?.clone();

    for page in 2..=total_pages {
        tracing::debug!("Fetching schedule {} page {}/{}", schedule_id, page, total_pages);
        let contents = source.schedule_list(schedule_id, Some(page)).await?;
        terms.extend(array_at(&contents, &["contents", "terms"])?.iter().cloned());
    }

    Ok(terms)
}

/// Gather classified terms from the schedules matching the query levels.
///
/// Type and study-state filters run before mastery is read, so a malformed
/// mastery value only matters on terms that are kept.
pub async fn fetch_terms_for_levels<S: TermSource + ?Sized>(
    source: &S,
    query: &TermQuery,
) -> Result<Vec<Term>, RenshuuError> {
    let schedules = fetch_schedules(source).await?;
    let mut terms = Vec::new();

    for schedule in schedules
        .iter()
        .filter(|s| query.levels.contains(&s.level))
    {
        let raw_terms = fetch_schedule_terms(source, &schedule.id).await?;
        tracing::debug!(
            "Schedule '{}' ({}, {}): {} terms",
            schedule.name,
            schedule.level,
            schedule.term_type.map_or("mixed", |t| t.as_str()),
            raw_terms.len()
        );

        for raw in raw_terms {
            let Some(term_type) = classify(&raw) else {
                continue;
            };
            if !query.types.contains(&term_type) {
                continue;
            }
            let counters = parse_counters(&raw)?;
            if !query.include_unstudied && !counters.is_some_and(|c| c.total() > 0) {
                continue;
            }
            terms.push(build_term(raw, term_type, schedule.level, counters)?);
        }
    }

    tracing::info!("Collected {} terms for levels {:?}", terms.len(), query.levels);
    Ok(terms)
}

/// Build a [`Term`] from a raw list entry. Unclassifiable entries yield `None`.
pub fn parse_term(raw: Value, level: Level) -> Result<Option<Term>, RenshuuError> {
    let Some(term_type) = classify(&raw) else {
        return Ok(None);
    };
    let counters = parse_counters(&raw)?;

    build_term(raw, term_type, level, counters).map(Some)
}

fn classify(raw: &Value) -> Option<TermType> {
    let term_type = classify_term(raw);
    if term_type.is_none() {
        tracing::trace!("Dropping unclassifiable term: {}", raw);
    }
    term_type
}

fn build_term(
    raw: Value,
    term_type: TermType,
    level: Level,
    counters: Option<StudyCounters>,
) -> Result<Term, RenshuuError> {
    let id = id_of(&raw, "terms[].id")?;
    let mastery = parse_mastery(&raw)?;

    Ok(Term {
        id,
        term_type,
        level,
        mastery,
        counters,
        data: raw,
    })
}

fn parse_mastery(raw: &Value) -> Result<u8, RenshuuError> {
    match raw.get("user_data").and_then(|u| u.get("mastery_avg_perc")) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => Ok(parse_number(value, "user_data.mastery_avg_perc")?
            .unwrap_or(0.0)
            .clamp(0.0, 100.0) as u8),
    }
}

/// Present only when both counts are
fn parse_counters(raw: &Value) -> Result<Option<StudyCounters>, RenshuuError> {
    let Some(user_data) = raw.get("user_data") else {
        return Ok(None);
    };

    let count = |key: &str, path: &str| {
        user_data
            .get(key)
            .map(|v| parse_number(v, path))
            .transpose()
            .map(Option::flatten)
    };
    let correct = count("correct_count", "user_data.correct_count")?;
    let missed = count("missed_count", "user_data.missed_count")?;

    Ok(match (correct, missed) {
        (Some(correct), Some(missed)) => Some(StudyCounters {
            correct: correct as i64,
            missed: missed as i64,
        }),
        _ => None,
    })
}

fn value_at<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value, RenshuuError> {
    path.iter().try_fold(value, |current, key| {
        current
            .get(key)
            .ok_or_else(|| RenshuuError::MissingField(path.join(".")))
    })
}

fn array_at<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Vec<Value>, RenshuuError> {
    value_at(value, path)?
        .as_array()
        .ok_or_else(|| RenshuuError::InvalidField {
            path: path.join("."),
            expected: "array".to_string(),
        })
}

fn number_at(value: &Value, path: &[&str]) -> Result<f64, RenshuuError> {
    let joined = path.join(".");
    parse_number(value_at(value, path)?, &joined)?
        .ok_or(RenshuuError::InvalidField {
            path: joined,
            expected: "number".to_string(),
        })
}

/// Numbers sometimes arrive as strings, and an empty string means "none"
fn parse_number(value: &Value, path: &str) -> Result<Option<f64>, RenshuuError> {
    let invalid = || RenshuuError::InvalidField {
        path: path.to_string(),
        expected: "number".to_string(),
    };

    match value {
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(invalid),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Value::Null => Ok(None),
        _ => Err(invalid()),
    }
}

fn id_of(value: &Value, path: &str) -> Result<String, RenshuuError> {
    match value.get("id") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(RenshuuError::InvalidField {
            path: path.to_string(),
            expected: "string or number".to_string(),
        }),
        None => Err(RenshuuError::MissingField(path.to_string())),
    }
}
