use warui_llm::LlmError;
use warui_types::{ChatTurn, HistoryMessage, Role};

use super::ScriptedModel;
use crate::chat_log::{RenderAliases, SUMMARY_SYSTEM_PROMPT, TrimPolicy, render, to_history, trim};

fn conversation(len: usize) -> Vec<ChatTurn> {
    (0..len)
        .map(|i| {
            if i % 2 == 0 {
                ChatTurn::human(format!("question {i}"))
            } else {
                ChatTurn::ai(format!("answer {i}"))
            }
        })
        .collect()
}

#[tokio::test]
async fn test_short_log_untouched() {
    let model = ScriptedModel::new("summary");
    let mut log = conversation(29);
    let original = log.clone();

    let summarized = trim(&mut log, TrimPolicy::default(), &model).await.unwrap();

    assert!(!summarized);
    assert_eq!(log, original);
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn test_long_log_folds_into_summary() {
    let model = ScriptedModel::new("They talked about the weather.");
    let mut log = conversation(40);
    let original = log.clone();

    let summarized = trim(&mut log, TrimPolicy::default(), &model).await.unwrap();

    assert!(summarized);
    assert_eq!(log.len(), 15);
    assert_eq!(
        log[0],
        ChatTurn::RunningSummary("They talked about the weather.".to_string())
    );
    assert_eq!(&log[1..], &original[26..]);

    let calls = model.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].system_prompt, SUMMARY_SYSTEM_PROMPT);
    assert!(calls[0].history.is_empty());
    assert!(calls[0].message.starts_with("CHAT LOG:\nHUMAN: question 0\nAI: answer 1"));
    assert!(calls[0].message.ends_with("AI: answer 25"));
}

#[tokio::test]
async fn test_trim_at_exact_threshold() {
    let model = ScriptedModel::new("s");
    let mut log = conversation(30);

    assert!(trim(&mut log, TrimPolicy::default(), &model).await.unwrap());
    assert_eq!(log.len(), 15);
}

#[tokio::test]
async fn test_existing_summary_folded_into_new_one() {
    let model = ScriptedModel::new("second summary");
    let mut log = vec![ChatTurn::RunningSummary("first summary".to_string())];
    log.extend(conversation(34));

    trim(&mut log, TrimPolicy::default(), &model).await.unwrap();

    assert_eq!(log.iter().filter(|t| t.is_summary()).count(), 1);
    assert_eq!(log[0].text(), "second summary");
    assert!(model.calls()[0]
        .message
        .starts_with("CHAT LOG:\nRunning Summary: first summary\nHUMAN: question 0"));
}

#[tokio::test]
async fn test_repeated_trims_keep_single_summary() {
    let model = ScriptedModel::new("summary");
    let policy = TrimPolicy::new(6, 3);
    let mut log = Vec::new();

    for round in 0..10 {
        log.push(ChatTurn::human(format!("q{round}")));
        log.push(ChatTurn::ai(format!("a{round}")));
        trim(&mut log, policy, &model).await.unwrap();

        assert!(log.len() < 6);
        assert!(log.iter().skip(1).all(|t| !t.is_summary()));
    }
    assert!(log[0].is_summary());
}

#[tokio::test]
async fn test_summarizer_failure_leaves_log() {
    let model = ScriptedModel::new("unused").then(Err(LlmError::RateLimitExceeded));
    let mut log = conversation(40);
    let original = log.clone();

    let err = trim(&mut log, TrimPolicy::default(), &model).await.unwrap_err();

    assert!(matches!(err, LlmError::RateLimitExceeded));
    assert_eq!(log, original);
}

#[tokio::test]
async fn test_threshold_below_trim_to_is_noop() {
    let model = ScriptedModel::new("s");
    let mut log = conversation(4);

    let summarized = trim(&mut log, TrimPolicy::new(2, 10), &model).await.unwrap();

    assert!(!summarized);
    assert_eq!(log.len(), 4);
}

#[test]
fn test_render_labels_and_trimming() {
    let log = vec![
        ChatTurn::RunningSummary("earlier chat".to_string()),
        ChatTurn::human("  こんにちは \n"),
        ChatTurn::SystemLog("looked up 天気".to_string()),
        ChatTurn::ai("こんにちは！"),
    ];

    assert_eq!(
        render(&log, RenderAliases::default()),
        "Running Summary: earlier chat\nhuman: こんにちは\nlooked up 天気\nai: こんにちは！"
    );
    assert_eq!(
        render(&log[1..2], RenderAliases::TRANSCRIPT),
        "HUMAN: こんにちは"
    );
    assert_eq!(render(&[], RenderAliases::default()), "");
}

#[test]
fn test_history_skips_roleless_entries() {
    let log = vec![
        ChatTurn::RunningSummary("s".to_string()),
        ChatTurn::human("a"),
        ChatTurn::SystemLog("note".to_string()),
        ChatTurn::ai("b"),
    ];

    assert_eq!(
        to_history(&log),
        vec![HistoryMessage::human("a"), HistoryMessage::ai("b")]
    );
    assert_eq!(to_history(&log)[1].role, Role::Ai);
}
