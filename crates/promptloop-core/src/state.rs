//! Shared loop state and the reducer that merges node output into it.
//!
//! Each node returns a [`StateUpdate`] containing only what it produced:
//! replacement fields overwrite, `history` and `logs` are append-only
//! deltas concatenated onto the accumulators. A node must never resend
//! entries it did not create this step, or the accumulation would
//! duplicate.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::prompt::PromptVariant;
use crate::record::{EvaluationRecord, FeedbackRecord, IterationHistoryEntry};

/// Free-form status tags set by each node.
pub mod status {
    pub const IDLE: &str = "idle";
    pub const EVALUATION_COMPLETE: &str = "evaluation_complete";
    pub const FEEDBACK_COMPLETE: &str = "feedback_complete";
    pub const SUGGESTIONS_READY: &str = "suggestions_ready";
    pub const READY_FOR_NEXT_ITERATION: &str = "ready_for_next_iteration";
}

/// The mutable carrier threaded through the loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationState {
    /// Fixed product set under evaluation.
    pub products: Vec<Product>,

    /// Working prompt set; replaced wholesale each iteration.
    pub current_prompts: Vec<PromptVariant>,

    /// Selected generation model identifier.
    pub model: String,

    /// Fixed iteration bound; reaching it terminates the loop.
    pub max_iterations: u32,

    /// Latest evaluator output; reset by the runner each iteration.
    pub evaluation_results: Vec<EvaluationRecord>,

    /// Latest suggester output.
    pub suggestions: Vec<PromptVariant>,

    /// Latest feedback-simulator output; empty when disabled.
    pub feedback_results: Vec<FeedbackRecord>,

    /// Completed iterations. Invariant: equals `history.len()`.
    pub iteration: u32,

    /// One entry per completed iteration, append-only.
    pub history: Vec<IterationHistoryEntry>,

    /// Human-readable run log, append-only.
    pub logs: Vec<String>,

    /// Free-form tag describing the last completed step.
    pub status: String,
}

impl OrchestrationState {
    /// Seed a fresh run.
    pub fn new(
        products: Vec<Product>,
        seed_prompts: Vec<PromptVariant>,
        model: impl Into<String>,
        max_iterations: u32,
    ) -> Self {
        Self {
            products,
            current_prompts: seed_prompts,
            model: model.into(),
            max_iterations,
            evaluation_results: Vec::new(),
            suggestions: Vec::new(),
            feedback_results: Vec::new(),
            iteration: 0,
            history: Vec::new(),
            logs: Vec::new(),
            status: status::IDLE.to_string(),
        }
    }

    /// Merge a node's delta into the accumulated state.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(results) = update.evaluation_results {
            self.evaluation_results = results;
        }
        if let Some(suggestions) = update.suggestions {
            self.suggestions = suggestions;
        }
        if let Some(feedback) = update.feedback_results {
            self.feedback_results = feedback;
        }
        if let Some(prompts) = update.current_prompts {
            self.current_prompts = prompts;
        }
        if let Some(iteration) = update.iteration {
            self.iteration = iteration;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.history.extend(update.history);
        self.logs.extend(update.logs);
    }

    /// The accumulated history as an exportable JSON document.
    pub fn export_history(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.history)
    }

    /// Whether the termination condition has been reached.
    pub fn is_done(&self) -> bool {
        self.iteration >= self.max_iterations
    }
}

/// The partial-state delta one node produces.
///
/// Replacement fields are `None` when the node did not touch them;
/// `history` and `logs` carry only this step's new entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateUpdate {
    pub evaluation_results: Option<Vec<EvaluationRecord>>,
    pub suggestions: Option<Vec<PromptVariant>>,
    pub feedback_results: Option<Vec<FeedbackRecord>>,
    pub current_prompts: Option<Vec<PromptVariant>>,
    pub iteration: Option<u32>,
    pub status: Option<String>,

    #[serde(default)]
    pub history: Vec<IterationHistoryEntry>,

    #[serde(default)]
    pub logs: Vec<String>,
}

impl StateUpdate {
    /// A delta carrying only log lines.
    pub fn logs_only(logs: Vec<String>) -> Self {
        Self {
            logs,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn seeded() -> OrchestrationState {
        OrchestrationState::new(
            catalog::sample_products(),
            catalog::seed_prompts(),
            "gpt-4o-mini",
            2,
        )
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = seeded();
        assert_eq!(state.iteration, 0);
        assert_eq!(state.status, status::IDLE);
        assert!(state.history.is_empty());
        assert!(!state.is_done());
    }

    #[test]
    fn test_apply_replaces_and_appends() {
        let mut state = seeded();

        state.apply(StateUpdate {
            status: Some(status::EVALUATION_COMPLETE.to_string()),
            logs: vec!["line 1".to_string()],
            ..Default::default()
        });
        state.apply(StateUpdate {
            iteration: Some(1),
            logs: vec!["line 2".to_string()],
            ..Default::default()
        });

        assert_eq!(state.status, status::EVALUATION_COMPLETE);
        assert_eq!(state.iteration, 1);
        assert_eq!(state.logs, vec!["line 1", "line 2"]);
    }

    #[test]
    fn test_apply_none_leaves_fields_untouched() {
        let mut state = seeded();
        let prompts_before = state.current_prompts.clone();

        state.apply(StateUpdate::logs_only(vec!["only logs".to_string()]));

        assert_eq!(state.current_prompts, prompts_before);
        assert_eq!(state.status, status::IDLE);
    }

    #[test]
    fn test_history_concatenates_without_duplication() {
        let mut state = seeded();
        let entry = IterationHistoryEntry {
            iteration: 1,
            prompts_used: state.current_prompts.clone(),
            evaluations: Vec::new(),
            feedback: Vec::new(),
            suggestions: Vec::new(),
        };

        state.apply(StateUpdate {
            history: vec![entry.clone()],
            ..Default::default()
        });
        state.apply(StateUpdate::default());

        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_is_done_at_inclusive_bound() {
        let mut state = seeded();
        state.iteration = 2;
        assert!(state.is_done());
    }

    #[test]
    fn test_export_history_is_json_array() {
        let state = seeded();
        let json = state.export_history().unwrap();
        let parsed: Vec<IterationHistoryEntry> = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_empty());
    }
}
