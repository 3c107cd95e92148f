//! Records produced by the loop: evaluations, feedback, and history entries.
//!
//! All record types serialize to JSON; the accumulated history is the
//! export format consumed outside the core.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::prompt::PromptVariant;

/// A single criterion's verdict on one generated output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriterionScore {
    /// Score in `[0.0, 1.0]`. Failed scoring calls are recorded as 0.0.
    pub score: f64,

    /// The judge's rationale, or the error text when scoring failed.
    pub reason: String,
}

impl CriterionScore {
    /// A zero score carrying an error explanation.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            reason: reason.into(),
        }
    }
}

/// Outcome of evaluating one (prompt, product) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRecord {
    pub prompt_id: String,
    pub prompt_name: String,
    pub product_name: String,

    /// The model's enriched output. Empty string when template rendering
    /// failed; `"{}"` when the generation call failed.
    pub enriched_output: String,

    /// Per-criterion scores, keyed by criterion name.
    pub scores: BTreeMap<String, CriterionScore>,

    /// Arithmetic mean of the recorded scores; 0.0 when no criterion scored.
    pub avg_score: f64,
}

impl EvaluationRecord {
    /// Build a record, deriving the average from the score map.
    pub fn new(
        prompt_id: impl Into<String>,
        prompt_name: impl Into<String>,
        product_name: impl Into<String>,
        enriched_output: impl Into<String>,
        scores: BTreeMap<String, CriterionScore>,
    ) -> Self {
        let avg_score = average_score(&scores);
        Self {
            prompt_id: prompt_id.into(),
            prompt_name: prompt_name.into(),
            product_name: product_name.into(),
            enriched_output: enriched_output.into(),
            scores,
            avg_score,
        }
    }
}

/// Mean of the criterion scores, 0.0 for an empty map.
pub fn average_score(scores: &BTreeMap<String, CriterionScore>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.values().map(|s| s.score).sum::<f64>() / scores.len() as f64
}

/// A simulated reviewer's verdict on one generated attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Positive,
    Negative,
}

/// Per-attribute feedback from the simulated reviewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeVerdict {
    pub attribute: String,
    pub generated_value: String,
    pub verdict: Verdict,
    pub reason: String,
}

/// Simulated-user review of one evaluation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub prompt_id: String,
    pub prompt_name: String,
    pub product_name: String,

    pub positives: u32,
    pub negatives: u32,
    pub total_attributes: u32,

    pub verdicts: Vec<AttributeVerdict>,

    /// One-to-two sentence overall assessment, or the error text when the
    /// review could not be parsed.
    pub overall_comment: String,
}

impl FeedbackRecord {
    /// A zero-count record used when the review failed; carries the error
    /// as the overall comment.
    pub fn failed(
        record: &EvaluationRecord,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            prompt_id: record.prompt_id.clone(),
            prompt_name: record.prompt_name.clone(),
            product_name: record.product_name.clone(),
            positives: 0,
            negatives: 0,
            total_attributes: 0,
            verdicts: Vec::new(),
            overall_comment: reason.into(),
        }
    }
}

/// Immutable snapshot of one completed loop pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IterationHistoryEntry {
    /// 1-based iteration number.
    pub iteration: u32,

    /// The working prompt set this iteration evaluated.
    pub prompts_used: Vec<PromptVariant>,

    /// One record per (prompt, product) pair.
    pub evaluations: Vec<EvaluationRecord>,

    /// Simulated-user feedback; empty when the simulator is disabled.
    #[serde(default)]
    pub feedback: Vec<FeedbackRecord>,

    /// The suggester's proposals, installed as the next working set.
    pub suggestions: Vec<PromptVariant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> BTreeMap<String, CriterionScore> {
        pairs
            .iter()
            .map(|(name, score)| {
                (
                    name.to_string(),
                    CriterionScore {
                        score: *score,
                        reason: "ok".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_average_of_empty_scores_is_zero() {
        assert_eq!(average_score(&BTreeMap::new()), 0.0);
    }

    #[test]
    fn test_average_is_arithmetic_mean() {
        let avg = average_score(&scores(&[("a", 0.5), ("b", 1.0), ("c", 0.0)]));
        assert!((avg - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_derives_average() {
        let record = EvaluationRecord::new(
            "prompt_v1",
            "Simple",
            "Widget",
            "{}",
            scores(&[("completeness", 0.8), ("accuracy", 0.4)]),
        );
        assert!((record.avg_score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_failed_score_counts_toward_average() {
        let mut map = scores(&[("completeness", 1.0)]);
        map.insert(
            "accuracy".to_string(),
            CriterionScore::failed("judge timed out"),
        );
        assert!((average_score(&map) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_history_entry_roundtrip() {
        let entry = IterationHistoryEntry {
            iteration: 1,
            prompts_used: vec![PromptVariant::new("prompt_v1", "Simple", "t", "r")],
            evaluations: vec![EvaluationRecord::new(
                "prompt_v1",
                "Simple",
                "Widget",
                "{\"color\": \"red\"}",
                scores(&[("completeness", 0.75)]),
            )],
            feedback: vec![FeedbackRecord {
                prompt_id: "prompt_v1".to_string(),
                prompt_name: "Simple".to_string(),
                product_name: "Widget".to_string(),
                positives: 3,
                negatives: 1,
                total_attributes: 4,
                verdicts: vec![AttributeVerdict {
                    attribute: "color".to_string(),
                    generated_value: "red".to_string(),
                    verdict: Verdict::Positive,
                    reason: "matches".to_string(),
                }],
                overall_comment: "mostly right".to_string(),
            }],
            suggestions: vec![PromptVariant::new("prompt_v3", "Improved", "t", "r")],
        };

        let json = serde_json::to_string(&entry).unwrap();
        let back: IterationHistoryEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(entry, back);
        assert_eq!(back.suggestions[0].id, "prompt_v3");
        assert_eq!(back.feedback[0].positives, 3);
        assert_eq!(back.evaluations[0].scores["completeness"].score, 0.75);
    }

    #[test]
    fn test_verdict_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Verdict::Positive).unwrap(),
            "\"positive\""
        );
    }
}
