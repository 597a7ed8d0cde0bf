use std::collections::VecDeque;
use std::sync::Mutex;

const BACKUP_REASON_RING_SIZE: usize = 5;

/// Tracks how often routing fell back to rules versus the decision model,
/// so a high fallback rate can be surfaced as an operational warning (§4.3).
pub struct RoutingUsageTracker {
    inner: Mutex<Inner>,
}

struct Inner {
    llm_success_count: u64,
    backup_usage_count: u64,
    recent_backup_reasons: VecDeque<String>,
}

impl Default for RoutingUsageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingUsageTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                llm_success_count: 0,
                backup_usage_count: 0,
                recent_backup_reasons: VecDeque::with_capacity(BACKUP_REASON_RING_SIZE),
            }),
        }
    }

    pub fn record_llm_success(&self) {
        let mut inner = self.inner.lock().expect("usage tracker mutex poisoned");
        inner.llm_success_count += 1;
    }

    pub fn record_backup_usage(&self, reason: impl Into<String>) {
        let mut inner = self.inner.lock().expect("usage tracker mutex poisoned");
        inner.backup_usage_count += 1;
        if inner.recent_backup_reasons.len() == BACKUP_REASON_RING_SIZE {
            inner.recent_backup_reasons.pop_front();
        }
        inner.recent_backup_reasons.push_back(reason.into());
        log::warn!("backup routing used: {}", inner.recent_backup_reasons.back().expect("just pushed"));
    }

    pub fn backup_usage_rate(&self) -> f64 {
        let inner = self.inner.lock().expect("usage tracker mutex poisoned");
        let total = inner.llm_success_count + inner.backup_usage_count;
        if total == 0 {
            0.0
        } else {
            inner.backup_usage_count as f64 / total as f64
        }
    }

    pub fn recent_backup_reasons(&self) -> Vec<String> {
        let inner = self.inner.lock().expect("usage tracker mutex poisoned");
        inner.recent_backup_reasons.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_reason_ring_is_bounded() {
        let tracker = RoutingUsageTracker::new();
        for i in 0..8 {
            tracker.record_backup_usage(format!("reason {i}"));
        }
        assert_eq!(tracker.recent_backup_reasons().len(), BACKUP_REASON_RING_SIZE);
        assert_eq!(tracker.recent_backup_reasons().first().unwrap(), "reason 3");
    }

    #[test]
    fn backup_usage_rate_reflects_mixed_outcomes() {
        let tracker = RoutingUsageTracker::new();
        tracker.record_llm_success();
        tracker.record_llm_success();
        tracker.record_llm_success();
        tracker.record_backup_usage("llm routing failed");
        assert!((tracker.backup_usage_rate() - 0.25).abs() < 1e-9);
    }
}
