//! Criterion scoring via an LLM judge.
//!
//! The judge is an opaque collaborator from the loop's point of view: it
//! takes a test case plus a named criterion and returns a score in `[0, 1]`
//! with a rationale. Failures surface as [`JudgeError`]; the evaluator maps
//! them to a zero score and keeps going.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use promptloop_core::{extract, Criterion, CriterionScore, Extracted};

use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};
use crate::prompts::{JUDGE_SYSTEM, JUDGE_TEMPLATE};
use crate::usage::UsageTracker;

/// Errors from scoring judges.
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("Judge call failed: {0}")]
    LlmError(String),

    #[error("Judge response was not a score object: {0}")]
    Unparseable(String),
}

/// One test case handed to the judge.
#[derive(Debug, Clone)]
pub struct ScoringInput {
    /// The rendered enrichment prompt.
    pub input: String,

    /// What the generation model produced.
    pub actual_output: String,

    /// Ground-truth attributes as JSON.
    pub expected_output: String,

    /// Additional context (the product description).
    pub context: Vec<String>,
}

/// Scoring collaborator boundary.
#[async_trait]
pub trait ScoringJudge: Send + Sync {
    /// Score one test case against one criterion.
    async fn score(
        &self,
        case: &ScoringInput,
        criterion: &Criterion,
    ) -> Result<CriterionScore, JudgeError>;
}

/// What the judge model is asked to return.
#[derive(Debug, Deserialize)]
struct JudgeVerdict {
    score: f64,
    #[serde(default)]
    reason: String,
}

/// LLM-backed judge.
pub struct LlmJudge {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
    usage: Arc<UsageTracker>,
}

impl LlmJudge {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        completion: CompletionConfig,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            provider,
            completion,
            usage,
        }
    }

    fn build_prompt(case: &ScoringInput, criterion: &Criterion) -> String {
        let expected_block = if criterion.uses_expected {
            format!("\n## Expected output\n{}\n", case.expected_output)
        } else {
            String::new()
        };

        let context_block = if case.context.is_empty() {
            String::new()
        } else {
            format!("\n## Context\n{}\n", case.context.join("\n"))
        };

        JUDGE_TEMPLATE
            .replace("{criterion_name}", &criterion.name)
            .replace("{criterion_instructions}", &criterion.instructions)
            .replace("{input}", &case.input)
            .replace("{actual_output}", &case.actual_output)
            .replace("{expected_block}", &expected_block)
            .replace("{context_block}", &context_block)
    }
}

#[async_trait]
impl ScoringJudge for LlmJudge {
    async fn score(
        &self,
        case: &ScoringInput,
        criterion: &Criterion,
    ) -> Result<CriterionScore, JudgeError> {
        let messages = vec![
            ChatMessage::system(JUDGE_SYSTEM),
            ChatMessage::user(Self::build_prompt(case, criterion)),
        ];

        let response = self
            .provider
            .complete(messages, &self.completion)
            .await
            .map_err(|e| {
                self.usage.record_failure();
                JudgeError::LlmError(e.to_string())
            })?;
        self.usage.record(response.usage);

        match extract::json_object::<JudgeVerdict>(&response.content) {
            Extracted::Parsed(verdict) => Ok(CriterionScore {
                score: verdict.score.clamp(0.0, 1.0),
                reason: verdict.reason,
            }),
            Extracted::Unparsed { error, .. } => Err(JudgeError::Unparseable(error)),
        }
    }
}
