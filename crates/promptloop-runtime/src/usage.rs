//! Run-wide accounting of provider calls and token usage.

use parking_lot::Mutex;

use crate::providers::TokenUsage;

/// Aggregated usage across one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunUsage {
    /// Completed provider calls (generation and judging alike).
    pub llm_calls: u64,

    /// Provider calls that failed.
    pub failed_calls: u64,

    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl RunUsage {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Thread-safe usage tracker shared by every agent in a run.
///
/// Tracking only; nothing here enforces a budget.
#[derive(Debug, Default)]
pub struct UsageTracker {
    usage: Mutex<RunUsage>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful provider call.
    pub fn record(&self, usage: TokenUsage) {
        let mut inner = self.usage.lock();
        inner.llm_calls += 1;
        inner.prompt_tokens += u64::from(usage.prompt_tokens);
        inner.completion_tokens += u64::from(usage.completion_tokens);
    }

    /// Record a failed provider call.
    pub fn record_failure(&self) {
        let mut inner = self.usage.lock();
        inner.llm_calls += 1;
        inner.failed_calls += 1;
    }

    /// Snapshot of the accumulated usage.
    pub fn snapshot(&self) -> RunUsage {
        *self.usage.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let tracker = UsageTracker::new();
        tracker.record(TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 40,
        });
        tracker.record(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
        });
        tracker.record_failure();

        let usage = tracker.snapshot();
        assert_eq!(usage.llm_calls, 3);
        assert_eq!(usage.failed_calls, 1);
        assert_eq!(usage.total_tokens(), 155);
    }
}
