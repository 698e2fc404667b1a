//! Chat log compaction.
//!
//! Once a log reaches the policy threshold, everything except the newest
//! `trim_to - 1` entries is folded into a single running summary at the head.
//! An existing summary is part of the folded prefix, so a log never holds
//! more than one.

use warui_llm::{ChatModel, LlmError};
use warui_types::{ChatTurn, HistoryMessage, Role};

pub const SUMMARY_SYSTEM_PROMPT: &str = "\
A CHAT LOG will be provided between a HUMAN and an AI.

Provide a SUMMARY of the CHAT LOG.
Keep the SUMMARY within 4 sentences while retaining relevant details.

Respond only with the SUMMARY.
Do not add any explanation or extra text in your response.";

/// When to compact a chat log and how much to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimPolicy {
    /// Log length at which compaction kicks in
    pub threshold: usize,
    /// Length after compaction, the summary included
    pub trim_to: usize,
}

impl TrimPolicy {
    pub fn new(threshold: usize, trim_to: usize) -> Self {
        Self { threshold, trim_to }
    }

    /// Entries kept verbatim after compaction
    pub fn retained(&self) -> usize {
        self.trim_to.saturating_sub(1)
    }
}

impl Default for TrimPolicy {
    fn default() -> Self {
        Self::new(30, 15)
    }
}

/// Speaker labels used when rendering a log as text
#[derive(Debug, Clone, Copy)]
pub struct RenderAliases<'a> {
    pub human: &'a str,
    pub ai: &'a str,
}

impl RenderAliases<'static> {
    /// Labels of the transcript handed to the summarizer
    pub const TRANSCRIPT: RenderAliases<'static> = RenderAliases {
        human: "HUMAN",
        ai: "AI",
    };
}

impl Default for RenderAliases<'static> {
    fn default() -> Self {
        Self {
            human: "human",
            ai: "ai",
        }
    }
}

/// Render a log as one line per entry
pub fn render(log: &[ChatTurn], aliases: RenderAliases<'_>) -> String {
    let mut out = String::new();

    for turn in log {
        let line = match turn {
            ChatTurn::Human(content) => format!("{}: {}", aliases.human, content.trim()),
            ChatTurn::Ai(content) => format!("{}: {}", aliases.ai, content.trim()),
            ChatTurn::SystemLog(text) => text.clone(),
            ChatTurn::RunningSummary(text) => format!("Running Summary: {}", text),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out.trim().to_string()
}

/// Conversational entries as model history. Log notes and summaries have no
/// speaker and are left out.
pub fn to_history(turns: &[ChatTurn]) -> Vec<HistoryMessage> {
    turns
        .iter()
        .filter_map(|turn| {
            turn.role().map(|role| HistoryMessage {
                role,
                content: turn.text().to_string(),
            })
        })
        .collect()
}

/// Compact `log` in place if it reached the policy threshold.
///
/// Returns whether a summary was created. On summarizer failure the log is
/// left untouched.
pub async fn trim(
    log: &mut Vec<ChatTurn>,
    policy: TrimPolicy,
    summarizer: &dyn ChatModel,
) -> Result<bool, LlmError> {
    if log.len() < policy.threshold {
        return Ok(false);
    }

    let split = log.len() - policy.retained().min(log.len());
    if split == 0 {
        return Ok(false);
    }

    let transcript = render(&log[..split], RenderAliases::TRANSCRIPT);
    tracing::debug!(
        "Summarizing {} of {} chat log entries",
        split,
        log.len()
    );

    let summary = summarizer
        .invoke(
            &format!("CHAT LOG:\n{}", transcript),
            SUMMARY_SYSTEM_PROMPT,
            &[],
            Role::Human,
        )
        .await?;

    log.drain(..split);
    log.insert(0, ChatTurn::RunningSummary(summary));

    Ok(true)
}
