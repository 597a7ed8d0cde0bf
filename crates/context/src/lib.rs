//! Context Analyzer (§4.4): decides what slice of prior Messages accompanies
//! each Provider call, and whether to suggest starting a new conversation.

mod llm;
mod rules;

use std::time::Duration;

use domain::{ContextAnalysis, Message, QuestionType};
use providers::DecisionClient;

const NEW_CHAT_MIN_HISTORY: usize = 4;
const NEW_CHAT_INTERRUPTION_MIN_HISTORY: usize = 8;
const TOPIC_ESTABLISHED_HISTORY_FLOOR: usize = 4;
const HIGH_CONFIDENCE_WINDOW: usize = 8;
const MEDIUM_CONFIDENCE_WINDOW: usize = 12;
const INTERRUPTION_RELEVANCE_FLOOR: f32 = 0.3;

pub struct ContextAnalyzer {
    decision_client: Option<DecisionClient>,
    llm_timeout: Duration,
}

impl ContextAnalyzer {
    pub fn new(decision_client: Option<DecisionClient>, llm_timeout: Duration) -> Self {
        Self { decision_client, llm_timeout }
    }

    /// Runs the full algorithm of §4.4 and returns both the analysis and the
    /// selected message window to hand to the Provider.
    pub async fn analyze<'a>(&self, question: &str, history: &'a [Message], router_marks_standalone: bool) -> (ContextAnalysis, Vec<&'a Message>) {
        // Step 1: too little history to have an established topic.
        if history.len() < TOPIC_ESTABLISHED_HISTORY_FLOOR {
            let window = if router_marks_standalone { vec![] } else { history.iter().collect() };
            return (
                ContextAnalysis {
                    needs_full_context: !router_marks_standalone,
                    confidence: 0.5,
                    reasoning: "history too short for topic establishment".to_string(),
                    method: QuestionType::Fallback,
                    topic_established: false,
                    main_topic: None,
                    suggest_new_chat: false,
                    new_chat_rationale: None,
                },
                window,
            );
        }

        // Step 2: standalone vs context-dependent.
        let standalone = llm::classify_standalone(self.decision_client.as_ref(), self.llm_timeout, question, history).await;

        // Step 3: topic establishment.
        let (topic_established, main_topic) = llm::detect_topic_establishment(self.decision_client.as_ref(), self.llm_timeout, history).await;

        // Step 4: relevance to the established topic.
        let relevance = if topic_established {
            let topic = main_topic.clone().unwrap_or_else(|| "the current conversation".to_string());
            llm::relevance_to_topic(self.decision_client.as_ref(), self.llm_timeout, question, &topic).await
        } else {
            0.0
        };

        // Step 5: select the window.
        let window: Vec<&Message> = if !topic_established {
            if !standalone.needs_full_context {
                history.iter().last().into_iter().collect()
            } else {
                history.iter().collect()
            }
        } else if relevance < INTERRUPTION_RELEVANCE_FLOOR {
            history.iter().last().into_iter().collect()
        } else if standalone.confidence > 0.8 {
            tail_window(history, HIGH_CONFIDENCE_WINDOW)
        } else if standalone.confidence > 0.6 {
            tail_window(history, MEDIUM_CONFIDENCE_WINDOW)
        } else {
            history.iter().collect()
        };

        // Step 6: new-chat suggestion.
        let (suggest_new_chat, new_chat_rationale) = new_chat_suggestion(question, history, &standalone);

        (
            ContextAnalysis {
                needs_full_context: standalone.needs_full_context,
                confidence: standalone.confidence,
                reasoning: standalone.reasoning,
                method: standalone.method,
                topic_established,
                main_topic,
                suggest_new_chat,
                new_chat_rationale,
            },
            window,
        )
    }
}

fn tail_window(history: &[Message], n: usize) -> Vec<&Message> {
    let start = history.len().saturating_sub(n);
    history[start..].iter().collect()
}

const CONVERSATION_INDICATORS: &[&str] = &[
    "that", "this", "it", "they", "also", "furthermore", "however", "what about", "tell me more", "expand on", "continue", "additionally",
];

fn new_chat_suggestion(question: &str, history: &[Message], standalone: &llm::StandaloneClassification) -> (bool, Option<String>) {
    if history.len() < NEW_CHAT_MIN_HISTORY || standalone.needs_full_context {
        return (false, None);
    }

    let recent: Vec<&Message> = if history.len() > 6 { history[history.len() - 6..].iter().collect() } else { history.iter().collect() };
    let mut ongoing_conversation = false;
    let mut topic_keywords: Vec<String> = Vec::new();

    for message in recent.iter().rev().skip(1).rev() {
        let content = message.content.to_lowercase();
        if CONVERSATION_INDICATORS.iter().any(|indicator| content.contains(indicator)) {
            ongoing_conversation = true;
        }
        topic_keywords.extend(content.split_whitespace().filter(|word| word.len() > 4 && word.chars().all(char::is_alphabetic)).map(str::to_string));
    }

    if ongoing_conversation && standalone.confidence > 0.6 {
        let question_lower = question.to_lowercase();
        let current_words: Vec<&str> = question_lower.split_whitespace().collect();
        let recent_topics: Vec<&String> = topic_keywords.iter().rev().take(10).collect();
        let overlap = recent_topics.iter().any(|topic| current_words.contains(&topic.as_str()));
        if !overlap {
            let named = topic_keywords.iter().rev().take(3).cloned().collect::<Vec<_>>().join(", ");
            let topic_text = if named.is_empty() { "previous topics".to_string() } else { named };
            return (
                true,
                Some(format!("this standalone question seems unrelated to the ongoing conversation about {topic_text}")),
            );
        }
    }

    if rules::is_standalone_interruption(question) && history.len() > NEW_CHAT_INTERRUPTION_MIN_HISTORY && standalone.confidence > 0.7 {
        return (true, Some("this appears to be a standalone question that doesn't relate to your current conversation".to_string()));
    }

    (false, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn history_of(n: usize, content: impl Fn(usize) -> String) -> Vec<Message> {
        (0..n).map(|i| Message::user(content(i), Utc::now())).collect()
    }

    #[tokio::test]
    async fn short_history_returns_current_only_when_router_marks_standalone() {
        let analyzer = ContextAnalyzer::new(None, Duration::from_millis(10));
        let history = history_of(2, |i| format!("msg {i}"));
        let (analysis, window) = analyzer.analyze("what's the weather?", &history, true).await;
        assert!(!analysis.topic_established);
        assert!(window.is_empty());
    }

    #[tokio::test]
    async fn short_history_returns_full_history_when_not_marked_standalone() {
        let analyzer = ContextAnalyzer::new(None, Duration::from_millis(10));
        let history = history_of(2, |i| format!("msg {i}"));
        let (_, window) = analyzer.analyze("what about that?", &history, false).await;
        assert_eq!(window.len(), 2);
    }

    #[tokio::test]
    async fn standalone_interruption_in_long_history_suggests_new_chat() {
        let analyzer = ContextAnalyzer::new(None, Duration::from_millis(10));
        let history = history_of(10, |i| format!("discussing rust lifetimes and borrow checker details number {i}"));
        let (analysis, window) = analyzer.analyze("what is today's temperature forecast?", &history, false).await;
        assert!(analysis.suggest_new_chat);
        assert_eq!(window.len(), 1);
    }

    #[tokio::test]
    async fn context_dependent_question_never_suggests_new_chat() {
        let analyzer = ContextAnalyzer::new(None, Duration::from_millis(10));
        let history = history_of(10, |i| format!("discussing rust lifetimes number {i}"));
        let (analysis, _) = analyzer.analyze("can you expand on that?", &history, false).await;
        assert!(!analysis.suggest_new_chat);
    }

    #[test]
    fn tail_window_never_exceeds_requested_length() {
        let history = history_of(3, |i| format!("msg {i}"));
        assert_eq!(tail_window(&history, 8).len(), 3);
    }
}
