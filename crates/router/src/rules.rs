use domain::{RouteKind, RoutingDecision};
use regex::Regex;

const HIGH_CONFIDENCE: f32 = 0.8;
const MEDIUM_CONFIDENCE: f32 = 0.4;
const LOW_CONFIDENCE: f32 = 0.2;

struct ToolPattern {
    name: &'static str,
    patterns: &'static [&'static str],
    keywords: &'static [&'static str],
    location_indicators: &'static [&'static str],
    confidence_boost: f32,
}

/// Hand-tuned confidence rules mirroring the LLM router's heuristics, used
/// when the decision model is unavailable or returns something unparsable.
fn tool_patterns() -> Vec<ToolPattern> {
    vec![
        ToolPattern {
            name: "get_weather_forecast",
            patterns: &[
                r"\bweather\b.*\bin\b",
                r"\bforecast\b.*\bfor\b",
                r"\btemperature\b.*\bin\b",
                r"\b(rain|snow|sun)\b.*\bin\b",
                r"\bhow.*hot.*in\b",
                r"\bclimate\b.*\bin\b",
            ],
            keywords: &["weather", "forecast", "temperature", "rain", "snow", "climate"],
            location_indicators: &["in", "at", "for"],
            confidence_boost: 0.3,
        },
        ToolPattern {
            name: "get_pws_current_conditions",
            patterns: &[
                r"\b(home|my|personal)\b.*\b(weather|temperature|station)\b",
                r"\bPWS\b",
                r"\bweather station\b.*\b(my|home|personal)\b",
                r"\bcurrent.*\b(home|my)\b.*\b(weather|temp)\b",
                r"\bPWS\b.*\b(current|conditions|temperature|weather)\b",
            ],
            keywords: &["home", "my", "personal", "PWS", "station", "conditions"],
            location_indicators: &[],
            confidence_boost: 0.5,
        },
        ToolPattern {
            name: "get_home_weather",
            patterns: &[
                r"\b(home|my|personal)\b.*\bweather\b",
                r"\bweather.*\b(home|house)\b",
                r"\b(my|our)\b.*\b(station|tempest)\b",
            ],
            keywords: &["home", "my", "personal", "house", "tempest"],
            location_indicators: &[],
            confidence_boost: 0.4,
        },
        ToolPattern {
            name: "brave_search",
            patterns: &[
                r"\b(latest|recent|current|new)\b.*\b(news|events)\b",
                r"\bwhat.*happened\b",
                r"\bstock price\b",
                r"\bcompany.*\b(revenue|earnings)\b",
            ],
            keywords: &["latest", "recent", "current", "news", "stock", "company"],
            location_indicators: &[],
            confidence_boost: 0.2,
        },
        ToolPattern {
            name: "serper_search",
            patterns: &[r"\bwhere.*\bopen\b", r"\bstore hours\b", r"\bphone number\b", r"\baddress.*\bof\b"],
            keywords: &["hours", "address", "phone", "location", "store"],
            location_indicators: &[],
            confidence_boost: 0.2,
        },
    ]
}

struct ToolConfidence {
    tool_name: &'static str,
    confidence: f32,
    reason: String,
    can_handle: bool,
}

fn assess_tool_confidence(query_lower: &str, tool: &ToolPattern) -> ToolConfidence {
    let mut confidence = 0.0f32;
    let mut reasons = Vec::new();

    let mut pattern_matches = 0;
    for pattern in tool.patterns {
        if Regex::new(pattern).expect("pattern is a fixed literal").is_match(query_lower) {
            pattern_matches += 1;
            confidence += 0.3;
            reasons.push(format!("pattern match: {pattern}"));
        }
    }

    let mut keyword_matches = 0;
    for keyword in tool.keywords {
        if query_lower.contains(keyword) {
            keyword_matches += 1;
            confidence += 0.2;
            reasons.push(format!("keyword: {keyword}"));
        }
    }

    for indicator in tool.location_indicators {
        if query_lower.contains(&format!(" {indicator} ")) {
            confidence += tool.confidence_boost;
            reasons.push(format!("location indicator: {indicator}"));
            break;
        }
    }

    if pattern_matches > 0 || keyword_matches > 0 {
        confidence += tool.confidence_boost;
    }

    confidence = confidence.min(1.0);
    let can_handle = confidence >= LOW_CONFIDENCE;
    let reason = format!(
        "patterns: {pattern_matches}, keywords: {keyword_matches}. {}",
        reasons.iter().take(3).cloned().collect::<Vec<_>>().join("; ")
    );

    ToolConfidence {
        tool_name: tool.name,
        confidence,
        reason,
        can_handle,
    }
}

fn best_tool(query: &str) -> Option<ToolConfidence> {
    let query_lower = query.to_lowercase();
    tool_patterns()
        .into_iter()
        .map(|tool| assess_tool_confidence(&query_lower, &tool))
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

const CURRENT_INFO_PATTERNS: &[&str] = &[
    r"\b(latest|recent|current|today|now|this week|this month)\b",
    r"\b(stock price|market|news|events)\b",
    r"\b(what.*happened|breaking|update)\b",
    r"\b(store hours|phone number|address)\b",
    r"\b(open|closed|available)\b.*\b(now|today)\b",
];

const FUTURE_INFO_PATTERNS: &[&str] = &[r"\b(when.*will|upcoming|scheduled|next)\b", r"\b(forecast|prediction|estimate)\b.*\b(next|future)\b"];

fn needs_external_search(query_lower: &str) -> bool {
    CURRENT_INFO_PATTERNS
        .iter()
        .chain(FUTURE_INFO_PATTERNS)
        .any(|pattern| Regex::new(pattern).expect("pattern is a fixed literal").is_match(query_lower))
}

/// Deterministic rule-based fallback (§4.3 fallback path).
pub fn make_fallback_routing_decision(query: &str) -> RoutingDecision {
    if query.trim().is_empty() {
        return RoutingDecision {
            route: RouteKind::ModelKnowledge,
            primary_tool: None,
            search_engine: None,
            confidence: 0.3,
            reasoning: "empty utterance, no routing signal".to_string(),
            fallback_options: vec![],
        };
    }

    let query_lower = query.to_lowercase();
    let best = best_tool(query);
    let needs_search = needs_external_search(&query_lower);
    let search_engine = |tool: &str| if tool == "serper_search" { "serper" } else { "brave" };

    match &best {
        Some(tool) if tool.confidence >= HIGH_CONFIDENCE => RoutingDecision {
            route: RouteKind::ToolDirect,
            primary_tool: Some(tool.tool_name.to_string()),
            search_engine: None,
            confidence: tool.confidence,
            reasoning: format!("high tool confidence ({:.2}): {}", tool.confidence, tool.reason),
            fallback_options: if needs_search { vec!["search".to_string()] } else { vec![] },
        },
        Some(tool) if tool.confidence >= MEDIUM_CONFIDENCE && needs_search => RoutingDecision {
            route: RouteKind::ToolWithSearch,
            primary_tool: Some(tool.tool_name.to_string()),
            search_engine: Some(search_engine(tool.tool_name).to_string()),
            confidence: tool.confidence,
            reasoning: format!("medium tool confidence + search needed: {}", tool.reason),
            fallback_options: vec!["search_verification".to_string()],
        },
        Some(tool) if tool.confidence >= MEDIUM_CONFIDENCE => RoutingDecision {
            route: RouteKind::ToolDirect,
            primary_tool: Some(tool.tool_name.to_string()),
            search_engine: None,
            confidence: tool.confidence,
            reasoning: format!("medium tool confidence, no search needed: {}", tool.reason),
            fallback_options: vec![],
        },
        _ if needs_search => RoutingDecision {
            route: RouteKind::SearchOnly,
            primary_tool: None,
            search_engine: Some("brave".to_string()),
            confidence: 0.7,
            reasoning: "search needed for current info".to_string(),
            fallback_options: best.as_ref().filter(|tool| tool.can_handle).map(|tool| vec![tool.tool_name.to_string()]).unwrap_or_default(),
        },
        Some(tool) if tool.confidence >= LOW_CONFIDENCE => RoutingDecision {
            route: RouteKind::ToolDirect,
            primary_tool: Some(tool.tool_name.to_string()),
            search_engine: None,
            confidence: tool.confidence,
            reasoning: format!("low-medium tool confidence: {}", tool.reason),
            fallback_options: vec!["search".to_string()],
        },
        _ => RoutingDecision {
            route: RouteKind::ModelKnowledge,
            primary_tool: None,
            search_engine: None,
            confidence: 0.6,
            reasoning: "no suitable tools found, using model knowledge".to_string(),
            fallback_options: if query.split_whitespace().count() > 3 { vec!["search".to_string()] } else { vec![] },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_routes_to_model_knowledge_with_low_confidence() {
        let decision = make_fallback_routing_decision("");
        assert_eq!(decision.route, RouteKind::ModelKnowledge);
        assert!(decision.confidence <= 0.5);
    }

    #[test]
    fn weather_in_location_routes_tool_direct() {
        let decision = make_fallback_routing_decision("what's the weather in London?");
        assert_eq!(decision.route, RouteKind::ToolDirect);
        assert_eq!(decision.primary_tool.as_deref(), Some("get_weather_forecast"));
        assert!(decision.confidence >= HIGH_CONFIDENCE);
    }

    #[test]
    fn personal_station_routes_to_pws() {
        let decision = make_fallback_routing_decision("what's my PWS showing?");
        assert_eq!(decision.primary_tool.as_deref(), Some("get_pws_current_conditions"));
    }

    #[test]
    fn current_events_query_needs_search_and_names_an_engine() {
        // "brave_search" itself scores as the best-matching tool here, and the
        // recency wording also trips the needs-external-search detector, so
        // the combination table lands on tool_with_search rather than a bare
        // tool_direct.
        let decision = make_fallback_routing_decision("what happened at the latest Apple event?");
        assert_eq!(decision.route, RouteKind::ToolWithSearch);
        assert!(decision.satisfies_search_invariant());
    }

    #[test]
    fn pure_current_events_query_with_no_tool_match_routes_search_only() {
        let decision = make_fallback_routing_decision("what is scheduled for next year's election?");
        assert_eq!(decision.route, RouteKind::SearchOnly);
        assert!(decision.satisfies_search_invariant());
    }

    #[test]
    fn general_knowledge_routes_to_model_knowledge() {
        let decision = make_fallback_routing_decision("what is the capital of France?");
        assert_eq!(decision.route, RouteKind::ModelKnowledge);
    }

    #[test]
    fn every_decision_satisfies_search_invariant() {
        for query in ["weather in Tokyo", "my PWS", "latest news on markets", "capital of France", ""] {
            let decision = make_fallback_routing_decision(query);
            assert!(decision.satisfies_search_invariant(), "violated for {query:?}");
        }
    }
}
