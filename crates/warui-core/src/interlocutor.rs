use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use warui_llm::ChatModel;
use warui_types::{ChatTurn, HistoryMessage, Level, Role, Term};

use crate::chat_log::{self, TrimPolicy};
use crate::error::CoreError;

/// Stand-in first message when history would otherwise open with the AI
pub const PLACEHOLDER_MESSAGE: &str = "...";

const BASE_PROMPT: &str = "
You are a conversation partner for a Japanese learner STUDENT.
ALWAYS respond only in Japanese, regardless of what language the STUDENT uses.
If the STUDENT responds in a different language, encourage them to respond in Japanese.

The student is currently at the {level} level.
Use grammar, vocabulary and kanji appropriate to this level.

Be engaging in conversation.
Encourage the STUDENT to go into different topics.
Ask questions to keep the conversation going when necessary.
";

const STUDY_TERMS_PROMPT: &str = "
Furthermore, specific STUDY TERMS will be provided in a json-list format.
These are either vocabulary, grammar or kanji STUDY TERMS.
These have been identified as focus points for the STUDENT's learning.
Attempt to use these study points as you converse with the STUDENT, to improve their recall of these.

STUDY TERMS:
{focus_terms}
";

const SUMMARY_PROMPT: &str = "
Additionally, the following is a summary of the conversation so far:
\"{summary}\"
";

/// Where a conversation is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// Nothing said yet
    Idle,
    /// Turns logged, no summary
    Active,
    /// Older turns folded into a running summary
    Summarized,
}

impl ConversationState {
    pub fn of(log: &[ChatTurn]) -> Self {
        match log.first() {
            None => ConversationState::Idle,
            Some(ChatTurn::RunningSummary(_)) => ConversationState::Summarized,
            Some(_) => ConversationState::Active,
        }
    }
}

/// A conversation partner holding one chat log
#[async_trait]
pub trait Interlocutor: Send {
    /// Reply to a student message and record the exchange
    async fn invoke(&mut self, message: &str) -> Result<String, CoreError>;

    /// Forget the conversation
    fn clear(&mut self);

    fn chat_log(&self) -> &[ChatTurn];

    fn state(&self) -> ConversationState {
        ConversationState::of(self.chat_log())
    }
}

#[derive(Debug, Clone)]
pub struct InterlocutorSettings {
    pub level: Level,
    pub focus_terms: Vec<Term>,
    pub trim_policy: TrimPolicy,
}

impl Default for InterlocutorSettings {
    fn default() -> Self {
        Self {
            level: Level::N5,
            focus_terms: Vec::new(),
            trim_policy: TrimPolicy::new(20, 10),
        }
    }
}

/// Interlocutor adapted to the student's level and current study terms
pub struct AdaptiveInterlocutor {
    id: Uuid,
    chat_model: Arc<dyn ChatModel>,
    summarizer: Arc<dyn ChatModel>,
    level: Level,
    focus_terms: Vec<Term>,
    trim_policy: TrimPolicy,
    system_prompt: String,
    chat_log: Vec<ChatTurn>,
}

impl AdaptiveInterlocutor {
    /// `summarizer` compacts the chat log, it may be the same model as `chat_model`
    pub fn new(
        settings: InterlocutorSettings,
        chat_model: Arc<dyn ChatModel>,
        summarizer: Arc<dyn ChatModel>,
    ) -> Self {
        let system_prompt = build_system_prompt(settings.level, &settings.focus_terms);

        Self {
            id: Uuid::new_v4(),
            chat_model,
            summarizer,
            level: settings.level,
            focus_terms: settings.focus_terms,
            trim_policy: settings.trim_policy,
            system_prompt,
            chat_log: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn focus_terms(&self) -> &[Term] {
        &self.focus_terms
    }

    /// Prompt without any running summary
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// System prompt and history for the next model call.
    ///
    /// A running summary moves from the log into the system prompt, and the
    /// history always opens with the student.
    fn compose(&self) -> (String, Vec<HistoryMessage>) {
        let (system_prompt, turns) = match self.chat_log.split_first() {
            Some((ChatTurn::RunningSummary(summary), rest)) => (
                format!(
                    "{}{}",
                    self.system_prompt,
                    SUMMARY_PROMPT.replace("{summary}", summary)
                ),
                rest,
            ),
            _ => (self.system_prompt.clone(), self.chat_log.as_slice()),
        };

        let mut history = chat_log::to_history(turns);
        if history.first().is_some_and(|m| m.role != Role::Human) {
            history.insert(0, HistoryMessage::human(PLACEHOLDER_MESSAGE));
        }

        (system_prompt, history)
    }
}

#[async_trait]
impl Interlocutor for AdaptiveInterlocutor {
    async fn invoke(&mut self, message: &str) -> Result<String, CoreError> {
        let summarized = chat_log::trim(
            &mut self.chat_log,
            self.trim_policy,
            self.summarizer.as_ref(),
        )
        .await?;
        if summarized {
            tracing::info!(conversation = %self.id, "Chat log compacted into running summary");
        }

        let (system_prompt, history) = self.compose();
        tracing::debug!(
            conversation = %self.id,
            model = %self.chat_model.metadata().model,
            history_len = history.len(),
            "Invoking chat model"
        );

        let reply = self
            .chat_model
            .invoke(message, &system_prompt, &history, Role::Human)
            .await?;

        self.chat_log.push(ChatTurn::human(message));
        self.chat_log.push(ChatTurn::ai(reply.clone()));

        Ok(reply)
    }

    fn clear(&mut self) {
        // system prompt is not part of the log
        self.chat_log.clear();
    }

    fn chat_log(&self) -> &[ChatTurn] {
        &self.chat_log
    }
}

/// Base prompt for a level, with the study terms block when there are any
pub fn build_system_prompt(level: Level, focus_terms: &[Term]) -> String {
    let mut prompt = BASE_PROMPT.replace("{level}", level.label());

    if !focus_terms.is_empty() {
        let views: Vec<serde_json::Value> = focus_terms.iter().map(Term::prompt_view).collect();
        let listing = serde_json::to_string_pretty(&views).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize focus terms: {}", e);
            String::from("[]")
        });
        prompt.push_str(&STUDY_TERMS_PROMPT.replace("{focus_terms}", &listing));
    }

    prompt
}
