use std::time::Duration;

use crate::env::parse_or;

/// Per-call timeouts and the outbound concurrency cap from §5.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// Router LLM decision call, default 10s.
    pub router_llm: Duration,
    /// A single search engine tool invocation, default 30s.
    pub search_engine: Duration,
    /// Search result quality rating call, default 10s.
    pub quality_rating: Duration,
    /// A remote provider call, default 60s.
    pub provider: Duration,
    /// The local inference provider call, default 120s.
    pub local_provider: Duration,
    /// Geocoding lookups used by weather/W3W tools, default 10s.
    pub geocoding: Duration,
    /// Max concurrent outbound model/search calls across all turns, default 5.
    pub outbound_semaphore: usize,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            router_llm: Duration::from_secs(10),
            search_engine: Duration::from_secs(30),
            quality_rating: Duration::from_secs(10),
            provider: Duration::from_secs(60),
            local_provider: Duration::from_secs(120),
            geocoding: Duration::from_secs(10),
            outbound_semaphore: 5,
        }
    }
}

impl Timeouts {
    pub(crate) fn from_env() -> Self {
        let default = Self::default();
        Self {
            router_llm: Duration::from_secs(parse_or("ROUTER_LLM_TIMEOUT_SECS", default.router_llm.as_secs())),
            search_engine: Duration::from_secs(parse_or(
                "SEARCH_ENGINE_TIMEOUT_SECS",
                default.search_engine.as_secs(),
            )),
            quality_rating: Duration::from_secs(parse_or(
                "QUALITY_RATING_TIMEOUT_SECS",
                default.quality_rating.as_secs(),
            )),
            provider: Duration::from_secs(parse_or("PROVIDER_TIMEOUT_SECS", default.provider.as_secs())),
            local_provider: Duration::from_secs(parse_or(
                "LOCAL_PROVIDER_TIMEOUT_SECS",
                default.local_provider.as_secs(),
            )),
            geocoding: Duration::from_secs(parse_or("GEOCODING_TIMEOUT_SECS", default.geocoding.as_secs())),
            outbound_semaphore: parse_or("OUTBOUND_SEMAPHORE_SIZE", default.outbound_semaphore),
        }
    }
}
