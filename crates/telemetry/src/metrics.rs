//! Process-wide counters. No external metrics backend: these back the
//! `UsageCounter` surfaced by the Router (§4.3) and a per-provider call
//! tally used for the warning-signal check in §9 ("fallback rate above a
//! configurable threshold").

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use domain::UsageCounter;

/// Routing telemetry, guarded because [`UsageCounter`] mutates a bounded
/// ring buffer rather than only atomics.
#[derive(Default)]
pub struct RoutingMetrics {
    inner: Mutex<UsageCounter>,
}

impl RoutingMetrics {
    pub fn record_llm_success(&self) {
        self.inner.lock().unwrap().record_llm_success();
    }

    pub fn record_fallback(&self, reason: impl Into<String>) {
        self.inner.lock().unwrap().record_fallback(reason);
    }

    /// Fraction of decisions that used the deterministic fallback path.
    pub fn fallback_rate(&self) -> f64 {
        self.inner.lock().unwrap().fallback_rate()
    }

    pub fn recent_fallback_reasons(&self) -> Vec<String> {
        self.inner.lock().unwrap().recent_fallback_reasons().map(str::to_string).collect()
    }
}

/// Per-provider outbound call counters, incremented by the Provider
/// Abstraction and read by nothing inside the core itself today — they
/// exist so an operator can `log::info!` a summary at shutdown.
#[derive(Default)]
pub struct ProviderCallCounters {
    calls: AtomicU64,
    errors: AtomicU64,
    tool_invocations: AtomicU64,
}

impl ProviderCallCounters {
    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tool_invocation(&self) {
        self.tool_invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn tool_invocations(&self) -> u64 {
        self.tool_invocations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_rate_reflects_recorded_outcomes() {
        let metrics = RoutingMetrics::default();
        metrics.record_llm_success();
        metrics.record_fallback("llm_timeout");
        assert_eq!(metrics.fallback_rate(), 0.5);
        assert_eq!(metrics.recent_fallback_reasons(), vec!["llm_timeout".to_string()]);
    }

    #[test]
    fn provider_counters_are_independent() {
        let counters = ProviderCallCounters::default();
        counters.record_call();
        counters.record_call();
        counters.record_error();
        assert_eq!(counters.calls(), 2);
        assert_eq!(counters.errors(), 1);
        assert_eq!(counters.tool_invocations(), 0);
    }
}
