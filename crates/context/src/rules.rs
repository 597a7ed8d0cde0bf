use regex::Regex;

const STANDALONE_PATTERNS: &[&str] = &[
    r"\b(weather|temperature|temp|forecast|rain|snow|humidity|wind)\b",
    r"\b(time|date|today|tomorrow|yesterday|now|current)\b",
    r"\b(calculate|compute|solve|math|equation|\+|-|\*|/|=)\b",
    r"\b(what is|who is|define|explain|meaning|definition)\b",
    r"\b(how to|how do|tell me|show me|find|search)\b",
    r"\b(convert|translate|summarize|list|create|generate)\b",
];

const CONTEXT_DEPENDENT_PATTERNS: &[&str] = &[
    r"\b(that|this|it|they|them|earlier|before|previous|above|mentioned)\b",
    r"\b(also|additionally|furthermore|moreover|and|but|however|though)\b",
    r"\b(compared to|versus|vs|different from|similar to|like that)\b",
    r"\b(more about|details about|expand on|continue|follow up)\b",
];

fn count_matches(text: &str, patterns: &[&str]) -> u32 {
    patterns.iter().filter(|pattern| Regex::new(pattern).expect("fixed literal").is_match(text)).count() as u32
}

/// Whether `question` reads as standalone by vocabulary alone, used both by
/// the fallback classifier and the new-chat-interruption check (§4.4).
pub fn is_standalone_pattern(question: &str) -> bool {
    let question_lower = question.to_lowercase();
    let standalone = count_matches(&question_lower, STANDALONE_PATTERNS);
    let context_dependent = count_matches(&question_lower, CONTEXT_DEPENDENT_PATTERNS);
    standalone > context_dependent
}

pub struct PatternClassification {
    pub needs_full_context: bool,
    pub confidence: f32,
    pub reasoning: String,
}

/// Fallback regex scorer used when the LLM classifier is unavailable or its
/// reply fails to parse (§4.4 step 2). Ties default to context-dependent.
pub fn classify(question: &str) -> PatternClassification {
    let question_lower = question.to_lowercase();
    let standalone = count_matches(&question_lower, STANDALONE_PATTERNS);
    let context_dependent = count_matches(&question_lower, CONTEXT_DEPENDENT_PATTERNS);

    if standalone > context_dependent {
        PatternClassification {
            needs_full_context: false,
            confidence: (standalone as f32 / (standalone + context_dependent + 1) as f32).min(0.8),
            reasoning: format!("standalone patterns: {standalone}, context patterns: {context_dependent}"),
        }
    } else if context_dependent > standalone {
        PatternClassification {
            needs_full_context: true,
            confidence: (context_dependent as f32 / (standalone + context_dependent + 1) as f32).min(0.8),
            reasoning: format!("context-dependent patterns: {context_dependent}, standalone patterns: {standalone}"),
        }
    } else {
        PatternClassification {
            needs_full_context: true,
            confidence: 0.5,
            reasoning: "no clear patterns detected, using context for safety".to_string(),
        }
    }
}

const STANDALONE_INTERRUPTION_PATTERNS: &[&str] = &[
    r"\b(weather|temperature|time|date|calculate|math|convert|translate)\b",
    r"\b(what is|who is|define|explain|meaning)\b",
    r"\b(how to|how do|show me|tell me how)\b",
];

/// Whether `question` is a clear standalone interruption pattern, used by the
/// new-chat suggestion heuristic (§4.4 step 6).
pub fn is_standalone_interruption(question: &str) -> bool {
    let question_lower = question.to_lowercase();
    STANDALONE_INTERRUPTION_PATTERNS
        .iter()
        .any(|pattern| Regex::new(pattern).expect("fixed literal").is_match(&question_lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_question_is_standalone() {
        assert!(is_standalone_pattern("what's the weather today?"));
        let classification = classify("what's the weather today?");
        assert!(!classification.needs_full_context);
    }

    #[test]
    fn pronoun_reference_is_context_dependent() {
        assert!(!is_standalone_pattern("tell me more about that"));
        let classification = classify("what about that one, though?");
        assert!(classification.needs_full_context);
    }

    #[test]
    fn tie_defaults_to_context_dependent() {
        let classification = classify("hello");
        assert!(classification.needs_full_context);
        assert_eq!(classification.confidence, 0.5);
    }

    #[test]
    fn weather_is_a_standalone_interruption_pattern() {
        assert!(is_standalone_interruption("what's the temperature outside?"));
        assert!(!is_standalone_interruption("tell me more about that"));
    }
}
