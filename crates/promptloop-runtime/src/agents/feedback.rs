//! Feedback-simulator agent: reviews each enriched output against the
//! ground truth the way a human catalog reviewer would.

use std::sync::Arc;

use serde::Deserialize;

use promptloop_core::state::status;
use promptloop_core::{
    extract, AttributeVerdict, Extracted, FeedbackRecord, OrchestrationState, Product, StateUpdate,
};

use crate::agents::{banner, excerpt};
use crate::config::RuntimeConfig;
use crate::providers::{ChatMessage, LlmProvider};
use crate::prompts::{FEEDBACK_SYSTEM, FEEDBACK_TEMPLATE};
use crate::usage::UsageTracker;

/// What the reviewer model is asked to return.
#[derive(Debug, Deserialize)]
struct FeedbackDraft {
    #[serde(default)]
    total_attributes: Option<u32>,
    #[serde(default)]
    positives: u32,
    #[serde(default)]
    negatives: u32,
    #[serde(default)]
    verdicts: Vec<AttributeVerdict>,
    #[serde(default)]
    overall_comment: String,
}

/// Simulates a user reviewing every evaluation record.
///
/// A review that fails (provider error or unparseable response) fails open
/// as a zero-count record; the batch always completes.
pub struct FeedbackSimulator {
    provider: Arc<dyn LlmProvider>,
    config: RuntimeConfig,
    usage: Arc<UsageTracker>,
}

impl FeedbackSimulator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: RuntimeConfig,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            provider,
            config,
            usage,
        }
    }

    fn review_prompt(product: &Product, enriched_output: &str, prompt_name: &str) -> String {
        FEEDBACK_TEMPLATE
            .replace("{product_name}", &product.name)
            .replace("{category}", &product.category)
            .replace("{description}", &product.description)
            .replace("{original_attributes}", &product.attributes_json())
            .replace("{expected_attributes}", &product.expected_json())
            .replace("{enriched_output}", enriched_output)
            .replace("{prompt_name}", prompt_name)
    }

    pub async fn run(&self, state: &OrchestrationState) -> StateUpdate {
        let mut logs = banner("AGENT 4 - SIMULATED FEEDBACK", state.iteration);
        let mut feedback_results: Vec<FeedbackRecord> = Vec::new();

        let completion = self.config.completion(self.config.feedback_temperature);

        for result in &state.evaluation_results {
            logs.push(format!(
                ">> Reviewing: {}  x  {}",
                result.prompt_name, result.product_name
            ));

            let Some(product) = state
                .products
                .iter()
                .find(|p| p.name == result.product_name)
            else {
                // Evaluation records always come from the product set; a miss
                // means the state was assembled by hand.
                logs.push(format!("   Unknown product: {}", result.product_name));
                feedback_results.push(FeedbackRecord::failed(result, "Unknown product"));
                continue;
            };

            let messages = vec![
                ChatMessage::system(FEEDBACK_SYSTEM),
                ChatMessage::user(Self::review_prompt(
                    product,
                    &result.enriched_output,
                    &result.prompt_name,
                )),
            ];

            let record = match self.provider.complete(messages, &completion).await {
                Ok(response) => {
                    self.usage.record(response.usage);
                    match extract::json_object::<FeedbackDraft>(&response.content) {
                        Extracted::Parsed(draft) => {
                            let total = draft
                                .total_attributes
                                .unwrap_or(draft.positives + draft.negatives);
                            logs.push(format!(
                                "   Positives: {}  |  Negatives: {}  |  Total: {total}",
                                draft.positives, draft.negatives
                            ));
                            logs.push(format!(
                                "   Comment: {}",
                                excerpt(&draft.overall_comment, 150)
                            ));
                            FeedbackRecord {
                                prompt_id: result.prompt_id.clone(),
                                prompt_name: result.prompt_name.clone(),
                                product_name: result.product_name.clone(),
                                positives: draft.positives,
                                negatives: draft.negatives,
                                total_attributes: total,
                                verdicts: draft.verdicts,
                                overall_comment: draft.overall_comment,
                            }
                        }
                        Extracted::Unparsed { error, .. } => {
                            tracing::warn!(error = %error, "Feedback response was not a JSON object");
                            logs.push(format!("   FEEDBACK ERROR: {error}"));
                            FeedbackRecord::failed(result, format!("Error: {error}"))
                        }
                    }
                }
                Err(e) => {
                    self.usage.record_failure();
                    tracing::warn!(error = %e, "Feedback call failed");
                    logs.push(format!("   FEEDBACK ERROR: {e}"));
                    FeedbackRecord::failed(result, format!("Error: {e}"))
                }
            };

            feedback_results.push(record);
        }

        // Per-prompt tally summary, in first-seen order.
        let mut seen: Vec<&str> = Vec::new();
        for fb in &feedback_results {
            if !seen.contains(&fb.prompt_id.as_str()) {
                seen.push(&fb.prompt_id);
            }
        }
        for prompt_id in seen {
            let group: Vec<_> = feedback_results
                .iter()
                .filter(|fb| fb.prompt_id == prompt_id)
                .collect();
            let positives: u32 = group.iter().map(|fb| fb.positives).sum();
            let negatives: u32 = group.iter().map(|fb| fb.negatives).sum();
            let name = group.first().map(|fb| fb.prompt_name.as_str()).unwrap_or(prompt_id);
            logs.push(String::new());
            logs.push(format!(
                "Feedback summary {name}: +{positives} positive / -{negatives} negative"
            ));
        }

        StateUpdate {
            feedback_results: Some(feedback_results),
            status: Some(status::FEEDBACK_COMPLETE.to_string()),
            logs,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    use promptloop_core::{catalog, EvaluationRecord};

    use crate::providers::{CompletionConfig, CompletionResponse, ProviderError, TokenUsage};

    struct MockProvider {
        reply: Result<String, ()>,
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    usage: TokenUsage::default(),
                    model: "mock".to_string(),
                    finish_reason: Some("stop".to_string()),
                }),
                Err(()) => Err(ProviderError::HttpError("boom".to_string())),
            }
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn reviewed_state() -> OrchestrationState {
        let mut state = OrchestrationState::new(
            catalog::sample_products(),
            catalog::seed_prompts(),
            "gpt-4o-mini",
            1,
        );
        state.evaluation_results = state
            .current_prompts
            .iter()
            .flat_map(|prompt| {
                state.products.iter().map(|product| {
                    EvaluationRecord::new(
                        &prompt.id,
                        &prompt.name,
                        &product.name,
                        "{\"color\": \"Black\"}",
                        BTreeMap::new(),
                    )
                })
            })
            .collect();
        state
    }

    fn simulator(reply: Result<String, ()>) -> FeedbackSimulator {
        FeedbackSimulator::new(
            Arc::new(MockProvider { reply }),
            RuntimeConfig::default().with_feedback(true),
            Arc::new(UsageTracker::new()),
        )
    }

    fn valid_reply() -> String {
        serde_json::json!({
            "total_attributes": 3,
            "positives": 2,
            "negatives": 1,
            "verdicts": [
                {"attribute": "color", "generated_value": "Black",
                 "verdict": "positive", "reason": "matches"},
            ],
            "overall_comment": "Mostly accurate, one invented value."
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_one_feedback_record_per_evaluation() {
        let state = reviewed_state();
        let update = simulator(Ok(valid_reply())).run(&state).await;

        let feedback = update.feedback_results.unwrap();
        assert_eq!(feedback.len(), state.evaluation_results.len());
        assert_eq!(feedback[0].positives, 2);
        assert_eq!(feedback[0].verdicts.len(), 1);
        assert_eq!(update.status.as_deref(), Some(status::FEEDBACK_COMPLETE));
    }

    #[tokio::test]
    async fn test_missing_total_derived_from_tallies() {
        let reply = serde_json::json!({
            "positives": 4, "negatives": 1,
            "verdicts": [], "overall_comment": "ok"
        })
        .to_string();
        let update = simulator(Ok(reply)).run(&reviewed_state()).await;
        assert_eq!(update.feedback_results.unwrap()[0].total_attributes, 5);
    }

    #[tokio::test]
    async fn test_unparseable_review_fails_open() {
        let state = reviewed_state();
        let update = simulator(Ok("not json, sorry".to_string())).run(&state).await;

        let feedback = update.feedback_results.unwrap();
        assert_eq!(feedback.len(), state.evaluation_results.len());
        for record in &feedback {
            assert_eq!(record.positives, 0);
            assert_eq!(record.total_attributes, 0);
            assert!(record.verdicts.is_empty());
            assert!(record.overall_comment.starts_with("Error:"));
        }
    }

    #[tokio::test]
    async fn test_provider_failure_fails_open() {
        let state = reviewed_state();
        let update = simulator(Err(())).run(&state).await;
        assert_eq!(
            update.feedback_results.unwrap().len(),
            state.evaluation_results.len()
        );
        assert!(update.logs.iter().any(|l| l.contains("FEEDBACK ERROR")));
    }

    #[tokio::test]
    async fn test_per_prompt_tally_summary() {
        let update = simulator(Ok(valid_reply())).run(&reviewed_state()).await;
        let summaries: Vec<_> = update
            .logs
            .iter()
            .filter(|l| l.starts_with("Feedback summary"))
            .collect();
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].contains("+6 positive"));
    }
}
