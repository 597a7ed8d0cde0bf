pub mod anthropic;
pub mod gemini;
pub mod local;
pub mod openai_compatible;

use std::time::{Duration, Instant};

use domain::ResponseMetrics;

use crate::normalized::GenerateResponse;

/// Elapsed wall time is always measured locally, regardless of what a
/// provider reports (§4.5 Metrics).
pub(crate) fn elapsed_secs(start: Instant) -> f64 {
    start.elapsed().as_secs_f64()
}

pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("reqwest client configuration is always valid")
}

/// Canned reply every adapter returns for an empty message history, with no
/// network call and no estimated metrics (§8 boundary behaviors).
pub(crate) fn ready_to_chat() -> GenerateResponse {
    GenerateResponse {
        text: "I'm ready to chat! What would you like to talk about?".to_string(),
        metrics: ResponseMetrics {
            elapsed_secs: 0.0,
            input_tokens: 0,
            output_tokens: 0,
            input_tokens_estimated: false,
            output_tokens_estimated: false,
        },
    }
}
