//! Suggester agent: analyzes evaluation results and proposes improved
//! prompt variants.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Deserialize;

use promptloop_core::state::status;
use promptloop_core::{extract, Extracted, OrchestrationState, PromptVariant, StateUpdate};

use crate::agents::{banner, excerpt};
use crate::config::RuntimeConfig;
use crate::providers::{ChatMessage, LlmProvider};
use crate::prompts::{SUGGESTER_SYSTEM, SUGGESTER_TEMPLATE};
use crate::usage::UsageTracker;

/// Run-wide monotonic id source for suggested variants.
///
/// Ids never collide across iterations no matter how many suggestions an
/// iteration requests.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Start numbering after the seed prompt set.
    ///
    /// Seed ids carrying a numeric suffix ("prompt_v2") push the counter
    /// past them; anything else counts as one slot.
    pub fn seeded_from(prompts: &[PromptVariant]) -> Self {
        let mut next = prompts.len() as u64 + 1;
        for prompt in prompts {
            let digits: String = prompt
                .id
                .chars()
                .rev()
                .take_while(char::is_ascii_digit)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            if let Ok(n) = digits.parse::<u64>() {
                next = next.max(n + 1);
            }
        }
        Self {
            next: AtomicU64::new(next),
        }
    }

    /// Hand out the next unique variant id.
    pub fn next_id(&self) -> String {
        format!("prompt_v{}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// What the suggester model is asked to return, per suggestion. The id the
/// model proposes is ignored; the allocator assigns the real one.
#[derive(Debug, Deserialize)]
struct SuggestionDraft {
    #[serde(default)]
    #[allow(dead_code)]
    id: String,
    name: String,
    template: String,
    #[serde(default)]
    rationale: String,
}

/// Proposes N improved prompt variants from the current iteration's scores.
///
/// On any failure — provider error, unparseable response, or every
/// suggested template breaking the slot contract — the current prompt set
/// is returned unchanged and the loop continues on the same prompts.
pub struct Suggester {
    provider: Arc<dyn LlmProvider>,
    config: RuntimeConfig,
    usage: Arc<UsageTracker>,
    ids: Arc<IdAllocator>,
}

impl Suggester {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: RuntimeConfig,
        usage: Arc<UsageTracker>,
        ids: Arc<IdAllocator>,
    ) -> Self {
        Self {
            provider,
            config,
            usage,
            ids,
        }
    }

    fn evaluation_summary(state: &OrchestrationState) -> String {
        state
            .evaluation_results
            .iter()
            .map(|result| {
                let metrics = result
                    .scores
                    .iter()
                    .map(|(name, s)| format!("{name}: {:.2}", s.score))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "- {} x {}: average={:.2} | {metrics}",
                    result.prompt_name, result.product_name, result.avg_score
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn prompts_summary(state: &OrchestrationState) -> String {
        state
            .current_prompts
            .iter()
            .map(|p| {
                format!(
                    "### {} (ID: {})\nRationale: {}\nTemplate:\n```\n{}\n```",
                    p.name, p.id, p.rationale, p.template
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub async fn run(&self, state: &OrchestrationState) -> StateUpdate {
        let mut logs = banner("AGENT 2 - PROMPT SUGGESTER", state.iteration);

        let user_prompt = SUGGESTER_TEMPLATE
            .replace("{evaluation_summary}", &Self::evaluation_summary(state))
            .replace("{current_prompts}", &Self::prompts_summary(state))
            .replace("{num_suggestions}", &self.config.num_suggestions.to_string());

        logs.push(">> Analyzing results and generating suggestions...".to_string());

        let messages = vec![
            ChatMessage::system(SUGGESTER_SYSTEM),
            ChatMessage::user(user_prompt),
        ];
        let completion = self.config.completion(self.config.suggester_temperature);

        let suggestions = match self.provider.complete(messages, &completion).await {
            Ok(response) => {
                self.usage.record(response.usage);
                match extract::json_array::<Vec<SuggestionDraft>>(&response.content) {
                    Extracted::Parsed(drafts) => self.accept_drafts(drafts, state, &mut logs),
                    Extracted::Unparsed { error, .. } => {
                        tracing::warn!(error = %error, "Suggestion response was not a JSON array");
                        logs.push(format!("ERROR generating suggestions: {error}"));
                        state.current_prompts.clone()
                    }
                }
            }
            Err(e) => {
                self.usage.record_failure();
                tracing::warn!(error = %e, "Suggestion call failed");
                logs.push(format!("ERROR generating suggestions: {e}"));
                state.current_prompts.clone()
            }
        };

        StateUpdate {
            suggestions: Some(suggestions),
            status: Some(status::SUGGESTIONS_READY.to_string()),
            logs,
            ..Default::default()
        }
    }

    /// Assign fresh ids and enforce the slot contract; fall back to the
    /// current set when nothing survives.
    fn accept_drafts(
        &self,
        drafts: Vec<SuggestionDraft>,
        state: &OrchestrationState,
        logs: &mut Vec<String>,
    ) -> Vec<PromptVariant> {
        let mut accepted = Vec::new();

        for draft in drafts {
            let id = self.ids.next_id();
            match PromptVariant::accept(id, &draft.name, &draft.template, &draft.rationale) {
                Ok(variant) => {
                    logs.push(String::new());
                    logs.push(format!("Suggestion: {}", variant.name));
                    logs.push(format!("   Rationale: {}", excerpt(&variant.rationale, 300)));
                    accepted.push(variant);
                }
                Err(e) => {
                    tracing::warn!(name = %draft.name, error = %e, "Rejected suggested template");
                    logs.push(format!("   Rejected suggestion '{}': {e}", draft.name));
                }
            }
        }

        if accepted.is_empty() {
            logs.push("No usable suggestions; keeping current prompts.".to_string());
            return state.current_prompts.clone();
        }
        accepted
    }
}
