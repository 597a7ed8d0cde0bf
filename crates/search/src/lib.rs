//! Search Manager (§4.2): rotates between registered search engines, rates
//! each result with the decision model, and returns the best passage seen.

use std::time::Duration;

use domain::SearchOutcome;
use providers::DecisionClient;
use serde_json::{Value, json};
use tools::ToolRegistry;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Score at or above which a result is good enough to stop rotating (§4.2, §9c).
const QUALITY_STOP_THRESHOLD: f32 = 7.0;
const ENGINE_ROTATION: &[&str] = &["brave_search", "serper_search"];

fn rating_prompt(query: &str, result: &str) -> String {
    format!(
        "Rate the quality of this search result (0-10) for the query: \"{query}\"\n\n\
         Consider:\n\
         1. Relevance to the query (0-4 points)\n\
         2. Completeness of information (0-3 points)\n\
         3. Source credibility (0-3 points)\n\n\
         Search Result:\n{result}\n\n\
         Respond ONLY with a JSON object: {{\"score\": <number between 0 and 10>}}."
    )
}

/// Asks the decision model to rate `result` against `query`; falls back to a
/// neutral 5.0 on any failure, mirroring the source's behavior of never
/// letting a rating failure abort the search loop.
async fn assess_result_quality(decision_client: Option<&DecisionClient>, timeout: Duration, query: &str, result: &str) -> f32 {
    if result.is_empty() || result.to_lowercase().contains("no results") {
        return 0.0;
    }

    let Some(client) = decision_client else {
        return 5.0;
    };

    let prompt = rating_prompt(query, result);
    let rated = tokio::time::timeout(timeout, client.decide_json(&prompt)).await;
    match rated {
        Ok(Ok(value)) => score_from_value(&value).unwrap_or(5.0),
        _ => {
            log::error!("quality assessment failed or timed out for query {query:?}");
            5.0
        }
    }
}

fn score_from_value(value: &Value) -> Option<f32> {
    value["score"].as_f64().map(|score| score.clamp(0.0, 10.0) as f32)
}

/// Performs search with quality assessment and engine fallback (§4.2).
pub struct SearchManager {
    max_attempts: u32,
    quality_threshold: f32,
    rating_timeout: Duration,
    engine_delay: Duration,
}

impl SearchManager {
    pub fn new(rating_timeout: Duration) -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            quality_threshold: QUALITY_STOP_THRESHOLD,
            rating_timeout,
            engine_delay: Duration::from_secs(1),
        }
    }

    pub async fn search_with_fallback(&self, query: &str, registry: &ToolRegistry, decision_client: Option<&DecisionClient>) -> SearchOutcome {
        let mut best = SearchOutcome::empty();

        for attempt in 0..self.max_attempts {
            let engine = ENGINE_ROTATION[attempt as usize % ENGINE_ROTATION.len()];

            if registry.lookup(engine).is_none() {
                log::error!("search engine not registered: {engine}");
                continue;
            }

            if attempt > 0 {
                tokio::time::sleep(self.engine_delay).await;
            }

            log::info!("trying {engine} (attempt {})", attempt + 1);
            let args = json!({"query": query, "num_results": 3});
            let result = registry.invoke(engine, args).await;
            let score = assess_result_quality(decision_client, self.rating_timeout, query, &result).await;
            log::info!("search quality score: {score:.1}/10");

            if score > best.score {
                best = SearchOutcome {
                    passage: result,
                    score,
                    engine: engine.to_string(),
                    attempts: attempt + 1,
                };
            } else {
                best.attempts = attempt + 1;
            }

            if score >= self.quality_threshold {
                break;
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_from_value_clamps_out_of_range_scores() {
        assert_eq!(score_from_value(&json!({"score": 15.0})), Some(10.0));
        assert_eq!(score_from_value(&json!({"score": -3.0})), Some(0.0));
        assert_eq!(score_from_value(&json!({})), None);
    }

    #[tokio::test]
    async fn no_results_text_scores_zero_without_calling_the_decision_model() {
        let score = assess_result_quality(None, Duration::from_millis(10), "query", "No results found.").await;
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn missing_decision_client_rates_neutral() {
        let score = assess_result_quality(None, Duration::from_millis(10), "query", "Some real search text").await;
        assert_eq!(score, 5.0);
    }

    #[tokio::test]
    async fn rotation_skips_unregistered_engines_and_returns_empty_outcome() {
        let registry = ToolRegistry::new();
        let manager = SearchManager::new(Duration::from_millis(10));
        let outcome = manager.search_with_fallback("test query", &registry, None).await;
        assert_eq!(outcome.passage, "");
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.engine, "");
    }
}
