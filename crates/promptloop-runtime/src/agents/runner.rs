//! Runner agent: closes an iteration.
//!
//! The only deterministic agent. It snapshots the completed pass into the
//! history, installs the suggestions as the next working prompt set, and
//! advances the iteration counter.

use promptloop_core::state::status;
use promptloop_core::{IterationHistoryEntry, OrchestrationState, StateUpdate};

use crate::agents::banner;

pub struct Runner;

impl Runner {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, state: &OrchestrationState) -> StateUpdate {
        let mut logs = banner("AGENT 3 - RUNNER", state.iteration);

        let completed = state.iteration + 1;
        let entry = IterationHistoryEntry {
            iteration: completed,
            prompts_used: state.current_prompts.clone(),
            evaluations: state.evaluation_results.clone(),
            feedback: state.feedback_results.clone(),
            suggestions: state.suggestions.clone(),
        };

        logs.push(format!("Iteration {completed} saved to history"));
        logs.push(format!(
            ">> Preparing {} prompts for the next iteration:",
            state.suggestions.len()
        ));
        for suggestion in &state.suggestions {
            logs.push(format!("   - {}", suggestion.name));
        }
        if completed >= state.max_iterations {
            logs.push(String::new());
            logs.push("Iteration limit reached. Finishing.".to_string());
        }

        StateUpdate {
            current_prompts: Some(state.suggestions.clone()),
            evaluation_results: Some(Vec::new()),
            feedback_results: Some(Vec::new()),
            iteration: Some(completed),
            history: vec![entry],
            status: Some(status::READY_FOR_NEXT_ITERATION.to_string()),
            logs,
            ..Default::default()
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
