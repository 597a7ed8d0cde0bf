//! Search query optimization (§10): a small LLM rewrite of the user's query
//! for better search-engine recall, with a hard fall-through to the original
//! query on any failure — grounded on `query_optimizer.py` in the source.

use std::time::Duration;

use providers::DecisionClient;

const OPTIMIZE_TEMPERATURE: f32 = 0.3;
const OPTIMIZE_MAX_OUTPUT_TOKENS: u32 = 100;
const MIN_OPTIMIZED_LEN: usize = 5;

fn build_prompt(query: &str) -> String {
    format!(
        "You are an expert search query optimizer. Transform the user's search \
         query into the most effective version for web search engines.\n\n\
         Instructions:\n\
         1. Clarify intent with added context.\n\
         2. Add time context for time-sensitive queries if not already present.\n\
         3. Add qualifiers that help find authoritative sources.\n\
         4. Disambiguate terms with multiple meanings.\n\
         5. Keep the result between 5 and 12 words.\n\
         6. Never change the core intent of the query.\n\n\
         Input Query:\n{query}\n\n\
         Optimized Query:"
    )
}

/// Rewrites `query` for search recall, falling back to the original on any
/// failure (missing client, timeout, empty or too-short reply).
pub async fn optimize_search_query(decision_client: Option<&DecisionClient>, timeout: Duration, query: &str) -> String {
    let Some(client) = decision_client else {
        return query.to_string();
    };

    let prompt = build_prompt(query);
    let attempt = tokio::time::timeout(timeout, client.decide_text(&prompt, OPTIMIZE_TEMPERATURE, OPTIMIZE_MAX_OUTPUT_TOKENS)).await;
    match attempt {
        Ok(Ok(optimized)) => {
            let optimized = optimized.trim();
            if optimized.len() > MIN_OPTIMIZED_LEN {
                optimized.to_string()
            } else {
                query.to_string()
            }
        }
        Ok(Err(error)) => {
            log::error!("query optimization failed: {error}");
            query.to_string()
        }
        Err(_) => {
            log::error!("query optimization timed out");
            query.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_a_client_the_original_query_passes_through() {
        let optimized = optimize_search_query(None, Duration::from_millis(10), "python tutorial").await;
        assert_eq!(optimized, "python tutorial");
    }
}
