use domain::{Message, MessageRole, QuestionType};
use providers::DecisionClient;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::rules;

fn build_context_summary(recent_messages: &[Message]) -> String {
    if recent_messages.is_empty() {
        return "No recent context".to_string();
    }
    let lines: Vec<String> = recent_messages
        .iter()
        .rev()
        .take(5)
        .rev()
        .filter(|message| !message.content.trim().is_empty())
        .map(|message| {
            let role = match message.role {
                MessageRole::User => "USER",
                MessageRole::Assistant => "ASSISTANT",
                MessageRole::Tool => "TOOL",
            };
            let content = if message.content.chars().count() > 100 {
                format!("{}...", message.content.chars().take(100).collect::<String>())
            } else {
                message.content.clone()
            };
            format!("{role}: {content}")
        })
        .collect();
    if lines.is_empty() { "No meaningful context".to_string() } else { lines.join("\n") }
}

#[derive(Deserialize)]
struct ContextReply {
    needs_full_context: bool,
    #[serde(default = "default_confidence")]
    confidence: f32,
    #[serde(default = "default_reasoning")]
    reasoning: String,
}

fn default_confidence() -> f32 {
    0.5
}

fn default_reasoning() -> String {
    "LLM context analysis".to_string()
}

pub struct StandaloneClassification {
    pub needs_full_context: bool,
    pub confidence: f32,
    pub reasoning: String,
    pub method: QuestionType,
}

/// Step 2 of §4.4: classifies the current question as standalone or
/// context-dependent, with the LLM as primary and the regex scorer as
/// fallback on any failure.
pub async fn classify_standalone(
    decision_client: Option<&DecisionClient>,
    timeout: Duration,
    question: &str,
    history: &[Message],
) -> StandaloneClassification {
    if let Some(client) = decision_client {
        let recent = if history.len() > 10 { &history[history.len() - 10..] } else { history };
        let summary = build_context_summary(recent);
        let prompt = format!(
            "You are a context relevance analyzer. Analyze if the current user question \
             requires the full chat history to answer correctly.\n\n\
             CURRENT QUESTION: \"{question}\"\n\n\
             RECENT CHAT CONTEXT:\n{summary}\n\n\
             Respond with a JSON object: needs_full_context (bool), confidence (0.0-1.0), \
             reasoning (string), question_type (\"standalone\" or \"context_dependent\")."
        );

        if let Ok(Ok(value)) = tokio::time::timeout(timeout, client.decide_json(&prompt)).await
            && let Ok(reply) = serde_json::from_value::<ContextReply>(value)
        {
            return StandaloneClassification {
                needs_full_context: reply.needs_full_context,
                confidence: reply.confidence.clamp(0.0, 1.0),
                reasoning: reply.reasoning,
                method: QuestionType::Llm,
            };
        }
    }

    let classification = rules::classify(question);
    StandaloneClassification {
        needs_full_context: classification.needs_full_context,
        confidence: classification.confidence,
        reasoning: classification.reasoning,
        method: QuestionType::Pattern,
    }
}

#[derive(Deserialize)]
struct TopicReply {
    topic_established: bool,
    #[serde(default)]
    main_topic: Option<String>,
}

/// Step 3 of §4.4: heuristic is "history length >= 6" unless the LLM call
/// succeeds with a clear answer.
pub async fn detect_topic_establishment(decision_client: Option<&DecisionClient>, timeout: Duration, history: &[Message]) -> (bool, Option<String>) {
    if let Some(client) = decision_client {
        let summary = build_context_summary(history);
        let prompt = format!(
            "Given this conversation, has a clear main topic been established?\n\n{summary}\n\n\
             Respond with a JSON object: topic_established (bool), main_topic (string or null), confidence (0.0-1.0)."
        );
        if let Ok(Ok(value)) = tokio::time::timeout(timeout, client.decide_json(&prompt)).await
            && let Ok(reply) = serde_json::from_value::<TopicReply>(value)
        {
            return (reply.topic_established, reply.main_topic);
        }
    }

    (history.len() >= 6, None)
}

/// Step 4 of §4.4. Fallback: 0.2 if the question reads as standalone by
/// vocabulary, else 0.8 (an established topic is assumed relevant absent
/// contrary signal).
pub async fn relevance_to_topic(decision_client: Option<&DecisionClient>, timeout: Duration, question: &str, topic: &str) -> f32 {
    if let Some(client) = decision_client {
        let prompt = format!(
            "On a scale of 0.0 to 1.0, how relevant is the question \"{question}\" to the \
             established topic \"{topic}\"? Respond with a JSON object: {{\"relevance\": <number>}}."
        );
        if let Ok(Ok(value)) = tokio::time::timeout(timeout, client.decide_json(&prompt)).await
            && let Some(score) = relevance_from_value(&value)
        {
            return score;
        }
    }

    if rules::is_standalone_pattern(question) { 0.2 } else { 0.8 }
}

fn relevance_from_value(value: &Value) -> Option<f32> {
    value["relevance"].as_f64().map(|score| score.clamp(0.0, 1.0) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn context_summary_truncates_long_messages() {
        let long = "x".repeat(150);
        let messages = vec![Message::user(long, Utc::now())];
        let summary = build_context_summary(&messages);
        assert!(summary.contains("..."));
    }

    #[test]
    fn context_summary_of_empty_history_is_explicit() {
        assert_eq!(build_context_summary(&[]), "No recent context");
    }

    #[tokio::test]
    async fn classify_standalone_without_client_uses_pattern_fallback() {
        let classification = classify_standalone(None, Duration::from_millis(10), "what's the weather?", &[]).await;
        assert_eq!(classification.method, QuestionType::Pattern);
        assert!(!classification.needs_full_context);
    }

    #[tokio::test]
    async fn topic_establishment_without_client_uses_length_heuristic() {
        let history: Vec<Message> = (0..6).map(|i| Message::user(format!("msg {i}"), Utc::now())).collect();
        let (established, _) = detect_topic_establishment(None, Duration::from_millis(10), &history).await;
        assert!(established);

        let short_history: Vec<Message> = (0..3).map(|i| Message::user(format!("msg {i}"), Utc::now())).collect();
        let (established, _) = detect_topic_establishment(None, Duration::from_millis(10), &short_history).await;
        assert!(!established);
    }

    #[tokio::test]
    async fn relevance_without_client_falls_back_to_pattern_heuristic() {
        let standalone_score = relevance_to_topic(None, Duration::from_millis(10), "what's today's date?", "debugging rust").await;
        assert_eq!(standalone_score, 0.2);

        let dependent_score = relevance_to_topic(None, Duration::from_millis(10), "can you expand on that?", "debugging rust").await;
        assert_eq!(dependent_score, 0.8);
    }
}
