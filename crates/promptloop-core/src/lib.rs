//! # promptloop-core
//!
//! Deterministic data model and state machinery for the promptloop
//! prompt-optimization loop.
//!
//! This crate holds everything the loop manipulates that does not touch a
//! network: products, prompt variants and their slot contract, evaluation
//! and feedback records, the shared orchestration state with its
//! append-only reducers, and the extract-then-parse combinator for model
//! output.
//!
//! ## Key Guarantees
//!
//! 1. **No LLM calls**: all I/O lives in `promptloop-runtime`
//! 2. **Deterministic**: BTreeMap-backed records, stable serialization
//! 3. **Append-only accumulation**: history and logs only grow; nodes emit
//!    deltas, never resends
//!
//! ## Example
//!
//! ```rust
//! use promptloop_core::{catalog, OrchestrationState};
//!
//! let state = OrchestrationState::new(
//!     catalog::sample_products(),
//!     catalog::seed_prompts(),
//!     "gpt-4o-mini",
//!     2,
//! );
//! assert_eq!(state.iteration, 0);
//! ```

pub mod catalog;
pub mod criteria;
pub mod extract;
pub mod product;
pub mod prompt;
pub mod record;
pub mod state;

// Re-export main types at crate root
pub use criteria::{default_criteria, Criterion};
pub use extract::Extracted;
pub use product::{load_catalog, CatalogError, Product};
pub use prompt::{PromptVariant, TemplateError, REQUIRED_SLOTS};
pub use record::{
    average_score, AttributeVerdict, CriterionScore, EvaluationRecord, FeedbackRecord,
    IterationHistoryEntry, Verdict,
};
pub use state::{OrchestrationState, StateUpdate};
