use std::collections::VecDeque;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Which analysis path produced a [`ContextAnalysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Llm,
    Pattern,
    Fallback,
}

/// Output of the Context Analyzer (§4.4), ephemeral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextAnalysis {
    pub needs_full_context: bool,
    pub confidence: f32,
    pub reasoning: String,
    pub method: QuestionType,
    pub topic_established: bool,
    pub main_topic: Option<String>,
    pub suggest_new_chat: bool,
    pub new_chat_rationale: Option<String>,
}

/// Output of the Search Manager (§4.2), ephemeral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub passage: String,
    pub score: f32,
    pub engine: String,
    pub attempts: u32,
}

impl SearchOutcome {
    pub fn empty() -> Self {
        Self {
            passage: String::new(),
            score: 0.0,
            engine: String::new(),
            attempts: 0,
        }
    }
}

/// Per-turn token/time accounting attached to an assistant message (§3).
///
/// Fields flagged as estimates must originate from heuristic estimation,
/// never from provider-reported counts (I5).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResponseMetrics {
    pub elapsed_secs: f64,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub input_tokens_estimated: bool,
    pub output_tokens_estimated: bool,
}

impl ResponseMetrics {
    pub fn tokens_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            0.0
        } else {
            self.output_tokens as f64 / self.elapsed_secs
        }
    }

    /// Whether tokens/sec should itself be reported as an estimate: either
    /// input is estimated or elapsed time rounded to zero.
    pub fn tokens_per_sec_is_estimated(&self) -> bool {
        self.input_tokens_estimated || self.output_tokens_estimated || self.elapsed_secs <= 0.0
    }

    /// `max(1, round(chars/4))`, the fallback estimator used whenever a
    /// provider does not report real token counts.
    pub fn estimate_tokens(text: &str) -> u32 {
        ((text.chars().count() as f64 / 4.0).round() as u32).max(1)
    }
}

const FALLBACK_RING_SIZE: usize = 5;

/// Process-wide routing usage telemetry (§3, §4.3). Resets at process
/// restart; not persisted.
#[derive(Debug, Default)]
pub struct UsageCounter {
    pub llm_successes: u64,
    pub fallback_uses: u64,
    pub last_fallback_at: Option<SystemTime>,
    recent_fallback_reasons: VecDeque<String>,
}

impl UsageCounter {
    pub fn record_llm_success(&mut self) {
        self.llm_successes += 1;
    }

    pub fn record_fallback(&mut self, reason: impl Into<String>) {
        self.fallback_uses += 1;
        self.last_fallback_at = Some(SystemTime::now());
        if self.recent_fallback_reasons.len() == FALLBACK_RING_SIZE {
            self.recent_fallback_reasons.pop_front();
        }
        self.recent_fallback_reasons.push_back(reason.into());
    }

    pub fn recent_fallback_reasons(&self) -> impl Iterator<Item = &str> {
        self.recent_fallback_reasons.iter().map(String::as_str)
    }

    /// Fraction of decisions that used the fallback path, in `[0, 1]`.
    pub fn fallback_rate(&self) -> f64 {
        let total = self.llm_successes + self.fallback_uses;
        if total == 0 {
            0.0
        } else {
            self.fallback_uses as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_ring_stays_bounded() {
        let mut counter = UsageCounter::default();
        for i in 0..10 {
            counter.record_fallback(format!("reason-{i}"));
        }
        assert_eq!(counter.recent_fallback_reasons().count(), FALLBACK_RING_SIZE);
        assert_eq!(counter.recent_fallback_reasons().next(), Some("reason-5"));
    }

    #[test]
    fn estimate_tokens_is_never_zero() {
        assert_eq!(ResponseMetrics::estimate_tokens(""), 1);
    }
}
