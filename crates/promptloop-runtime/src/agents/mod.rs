//! The four loop agents.
//!
//! Each agent consumes the shared [`OrchestrationState`] read-only and
//! returns a [`StateUpdate`] carrying only what it produced this step.
//! Failures inside an agent are absorbed locally; `run` never fails and
//! never halts the loop.
//!
//! [`OrchestrationState`]: promptloop_core::OrchestrationState
//! [`StateUpdate`]: promptloop_core::StateUpdate

mod evaluator;
mod feedback;
mod runner;
mod suggester;

pub use evaluator::Evaluator;
pub use feedback::FeedbackSimulator;
pub use runner::Runner;
pub use suggester::{IdAllocator, Suggester};

/// Section banner emitted at the top of each agent's log delta.
pub(crate) fn banner(title: &str, iteration: u32) -> Vec<String> {
    vec![
        String::new(),
        "=".repeat(60),
        format!("{title}  |  Iteration {}", iteration + 1),
        "=".repeat(60),
    ]
}

/// Truncate a log excerpt without splitting a multi-byte character.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_uses_one_based_iteration() {
        let lines = banner("EVALUATOR", 0);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("Iteration 1"));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo wörld", 5), "héllo");
        assert_eq!(excerpt("short", 300), "short");
    }
}
