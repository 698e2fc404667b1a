//! Test doubles shared by the core tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use warui_llm::{ChatModel, LlmError, ModelMetadata};
use warui_types::{HistoryMessage, Level, Role, Term, TermType};

mod chat_log;
mod weighting;

/// What a [`ScriptedModel`] was called with
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub message: String,
    pub system_prompt: String,
    pub history: Vec<HistoryMessage>,
    pub role: Role,
}

/// Chat model answering from a script, then with a fixed fallback reply
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    fallback: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new(fallback: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: fallback.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn then(self, reply: Result<String, LlmError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn invoke(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[HistoryMessage],
        role: Role,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            message: message.to_string(),
            system_prompt: system_prompt.to_string(),
            history: history.to_vec(),
            role,
        });

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: "scripted".to_string(),
            model: "test".to_string(),
        }
    }
}

pub fn term(id: &str, term_type: TermType, mastery: u8) -> Term {
    Term {
        id: id.to_string(),
        term_type,
        level: Level::N5,
        mastery,
        counters: None,
        data: json!({ "id": id, "user_data": { "mastery_avg_perc": mastery } }),
    }
}
