//! The optimization loop controller.
//!
//! Drives the four agents through a fixed cyclic schedule:
//! evaluate → (review) → suggest → run, repeating until the configured
//! iteration bound is reached. Each step's [`StateUpdate`] is surfaced to a
//! [`ProgressSink`] before being folded into the state, so callers can
//! stream log deltas as they happen.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use promptloop_core::{OrchestrationState, Product, PromptVariant, StateUpdate};

use crate::agents::{Evaluator, FeedbackSimulator, IdAllocator, Runner, Suggester};
use crate::config::RuntimeConfig;
use crate::providers::LlmProvider;
use crate::scoring::{LlmJudge, ScoringJudge};
use crate::usage::{RunUsage, UsageTracker};

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Evaluating,
    Reviewing,
    Suggesting,
    Running,
    Terminal,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Evaluating => "evaluating",
            Phase::Reviewing => "reviewing",
            Phase::Suggesting => "suggesting",
            Phase::Running => "running",
            Phase::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// Observer for step-by-step progress. Implementations must be cheap;
/// the loop calls them inline.
pub trait ProgressSink: Send + Sync {
    fn on_update(&self, phase: Phase, update: &StateUpdate);
}

/// Sink that discards everything.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_update(&self, _phase: Phase, _update: &StateUpdate) {}
}

/// Summary of one completed run.
#[derive(Debug, Clone)]
pub struct LoopReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub iterations_completed: u32,
    pub usage: RunUsage,
}

/// Owns the agents and the schedule.
pub struct LoopOrchestrator {
    provider: Arc<dyn LlmProvider>,
    config: RuntimeConfig,
    usage: Arc<UsageTracker>,
    judge: Option<Arc<dyn ScoringJudge>>,
}

impl LoopOrchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: RuntimeConfig) -> Self {
        Self {
            provider,
            config,
            usage: Arc::new(UsageTracker::new()),
            judge: None,
        }
    }

    /// Replace the LLM judge with a custom scoring implementation.
    pub fn with_judge(mut self, judge: Arc<dyn ScoringJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn usage(&self) -> RunUsage {
        self.usage.snapshot()
    }

    fn next_phase(&self, phase: Phase, state: &OrchestrationState) -> Phase {
        match phase {
            Phase::Evaluating if self.config.enable_feedback => Phase::Reviewing,
            Phase::Evaluating => Phase::Suggesting,
            Phase::Reviewing => Phase::Suggesting,
            Phase::Suggesting => Phase::Running,
            Phase::Running if state.is_done() => Phase::Terminal,
            Phase::Running => Phase::Evaluating,
            Phase::Terminal => Phase::Terminal,
        }
    }

    /// Run the full loop to termination.
    pub async fn run(
        &self,
        products: Vec<Product>,
        seed_prompts: Vec<PromptVariant>,
        sink: &dyn ProgressSink,
    ) -> (OrchestrationState, LoopReport) {
        let started_at = Utc::now();

        let mut state = OrchestrationState::new(
            products,
            seed_prompts,
            self.config.model.to_string(),
            self.config.max_iterations,
        );

        let judge: Arc<dyn ScoringJudge> = match &self.judge {
            Some(judge) => Arc::clone(judge),
            None => Arc::new(LlmJudge::new(
                Arc::clone(&self.provider),
                self.config.completion(self.config.judge_temperature),
                Arc::clone(&self.usage),
            )),
        };

        let ids = Arc::new(IdAllocator::seeded_from(&state.current_prompts));
        let evaluator = Evaluator::new(
            Arc::clone(&self.provider),
            judge,
            self.config.clone(),
            Arc::clone(&self.usage),
        );
        let reviewer = FeedbackSimulator::new(
            Arc::clone(&self.provider),
            self.config.clone(),
            Arc::clone(&self.usage),
        );
        let suggester = Suggester::new(
            Arc::clone(&self.provider),
            self.config.clone(),
            Arc::clone(&self.usage),
            ids,
        );
        let runner = Runner::new();

        tracing::info!(
            model = %state.model,
            max_iterations = state.max_iterations,
            products = state.products.len(),
            prompts = state.current_prompts.len(),
            feedback = self.config.enable_feedback,
            "Starting optimization loop"
        );

        let mut phase = Phase::Evaluating;
        while phase != Phase::Terminal {
            let update = match phase {
                Phase::Evaluating => evaluator.run(&state).await,
                Phase::Reviewing => reviewer.run(&state).await,
                Phase::Suggesting => suggester.run(&state).await,
                Phase::Running => runner.run(&state),
                Phase::Terminal => unreachable!("loop exits before reaching terminal"),
            };
            sink.on_update(phase, &update);
            state.apply(update);
            phase = self.next_phase(phase, &state);
        }

        let report = LoopReport {
            started_at,
            finished_at: Utc::now(),
            iterations_completed: state.iteration,
            usage: self.usage.snapshot(),
        };
        tracing::info!(
            iterations = report.iterations_completed,
            llm_calls = report.usage.llm_calls,
            failed_calls = report.usage.failed_calls,
            total_tokens = report.usage.total_tokens(),
            "Optimization loop finished"
        );

        (state, report)
    }
}
