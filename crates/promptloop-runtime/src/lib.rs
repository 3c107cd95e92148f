//! LLM-bound half of the prompt-optimization loop.
//!
//! Everything that talks to a model lives here: the provider boundary and
//! its OpenAI implementation, the scoring judge, the four loop agents, and
//! the [`LoopOrchestrator`] that schedules them. The deterministic data
//! model they operate on lives in `promptloop-core`.
//!
//! ```no_run
//! # async fn run() {
//! use std::sync::Arc;
//! use promptloop_core::catalog;
//! use promptloop_runtime::config::RuntimeConfig;
//! use promptloop_runtime::orchestrator::{LoopOrchestrator, NullSink};
//! use promptloop_runtime::providers::LlmProvider;
//!
//! // With the `openai` feature: OpenAiProvider::from_env().
//! let provider: Arc<dyn LlmProvider> = todo!();
//! let config = RuntimeConfig::default().with_max_iterations(3);
//! let orchestrator = LoopOrchestrator::new(provider, config);
//! let (state, report) = orchestrator
//!     .run(catalog::sample_products(), catalog::seed_prompts(), &NullSink)
//!     .await;
//! println!("{} iterations, {} LLM calls", state.iteration, report.usage.llm_calls);
//! # }
//! ```

pub mod agents;
pub mod config;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod scoring;
pub mod usage;

pub use config::{ModelId, RuntimeConfig};
pub use orchestrator::{LoopOrchestrator, LoopReport, NullSink, Phase, ProgressSink};
pub use providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};
pub use scoring::{JudgeError, LlmJudge, ScoringInput, ScoringJudge};
pub use usage::{RunUsage, UsageTracker};
