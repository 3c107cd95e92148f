//! Evaluator agent: enriches every (prompt, product) pair and scores the
//! output against the configured criteria.

use std::collections::BTreeMap;
use std::sync::Arc;

use promptloop_core::state::status;
use promptloop_core::{CriterionScore, EvaluationRecord, OrchestrationState, StateUpdate};

use crate::agents::banner;
use crate::config::RuntimeConfig;
use crate::providers::{ChatMessage, LlmProvider};
use crate::scoring::{ScoringInput, ScoringJudge};
use crate::usage::UsageTracker;

/// Enrichment + scoring over the full product × prompt cartesian product.
///
/// Pairs are processed strictly sequentially; a failure in any one pair is
/// logged and degraded, and never reduces the record count.
pub struct Evaluator {
    provider: Arc<dyn LlmProvider>,
    judge: Arc<dyn ScoringJudge>,
    config: RuntimeConfig,
    usage: Arc<UsageTracker>,
}

impl Evaluator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        judge: Arc<dyn ScoringJudge>,
        config: RuntimeConfig,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            provider,
            judge,
            config,
            usage,
        }
    }

    pub async fn run(&self, state: &OrchestrationState) -> StateUpdate {
        let mut logs = banner("AGENT 1 - EVALUATOR", state.iteration);
        let mut results: Vec<EvaluationRecord> = Vec::new();

        let completion = self.config.completion(self.config.evaluator_temperature);

        for prompt in &state.current_prompts {
            for product in &state.products {
                logs.push(String::new());
                logs.push(format!(">> {}  x  {}", prompt.name, product.name));

                // 1. Fill the enrichment template.
                let (enrichment_prompt, mut enriched_output) = match prompt.render(product) {
                    Ok(text) => (text, None),
                    Err(e) => {
                        tracing::warn!(prompt = %prompt.id, error = %e, "Template rendering failed");
                        logs.push(format!("   TEMPLATE ERROR: {e}"));
                        (String::new(), Some(String::new()))
                    }
                };

                // 2. Call the generation model, unless rendering already failed.
                if enriched_output.is_none() {
                    let messages = vec![ChatMessage::user(enrichment_prompt.clone())];
                    enriched_output = match self.provider.complete(messages, &completion).await {
                        Ok(response) => {
                            self.usage.record(response.usage);
                            Some(response.content)
                        }
                        Err(e) => {
                            self.usage.record_failure();
                            tracing::warn!(prompt = %prompt.id, product = %product.name, error = %e,
                                "Generation failed");
                            logs.push(format!("   GENERATION ERROR: {e}"));
                            Some("{}".to_string())
                        }
                    };
                }
                let enriched_output = enriched_output.unwrap_or_default();

                // 3. Score against every criterion.
                let case = ScoringInput {
                    input: enrichment_prompt,
                    actual_output: enriched_output.clone(),
                    expected_output: product.expected_json(),
                    context: vec![product.description.clone()],
                };

                let mut scores: BTreeMap<String, CriterionScore> = BTreeMap::new();
                for criterion in &self.config.criteria {
                    match self.judge.score(&case, criterion).await {
                        Ok(score) => {
                            logs.push(format!("   {}: {:.2}", criterion.name, score.score));
                            scores.insert(criterion.name.clone(), score);
                        }
                        Err(e) => {
                            tracing::warn!(criterion = %criterion.name, error = %e, "Scoring failed");
                            logs.push(format!("   {}: error - {e}", criterion.name));
                            scores.insert(
                                criterion.name.clone(),
                                CriterionScore::failed(format!("Error: {e}")),
                            );
                        }
                    }
                }

                let record = EvaluationRecord::new(
                    &prompt.id,
                    &prompt.name,
                    &product.name,
                    enriched_output,
                    scores,
                );
                logs.push(format!("   Average score: {:.2}", record.avg_score));
                results.push(record);
            }
        }

        // Per-prompt summary.
        for prompt in &state.current_prompts {
            let prompt_results: Vec<_> = results
                .iter()
                .filter(|r| r.prompt_id == prompt.id)
                .collect();
            if !prompt_results.is_empty() {
                let avg = prompt_results.iter().map(|r| r.avg_score).sum::<f64>()
                    / prompt_results.len() as f64;
                logs.push(String::new());
                logs.push(format!("Summary {}: average score = {avg:.2}", prompt.name));
            }
        }

        StateUpdate {
            evaluation_results: Some(results),
            status: Some(status::EVALUATION_COMPLETE.to_string()),
            logs,
            ..Default::default()
        }
    }
}
