//! Runtime configuration threaded explicitly through the controller to
//! every agent.
//!
//! Nothing here is read from ambient process state at call time; the CLI
//! (or embedding application) builds one `RuntimeConfig` up front and the
//! controller hands it to each node.

use std::str::FromStr;
use std::time::Duration;

use promptloop_core::{default_criteria, Criterion};
use serde::{Deserialize, Serialize};

use crate::providers::CompletionConfig;

/// Inclusive upper bound on configured iterations.
pub const MAX_ITERATIONS_BOUND: u32 = 10;

/// The small fixed set of supported generation models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ModelId {
    #[default]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4.1-mini")]
    Gpt41Mini,
    #[serde(rename = "gpt-4.1-nano")]
    Gpt41Nano,
}

impl ModelId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gpt4oMini => "gpt-4o-mini",
            ModelId::Gpt4o => "gpt-4o",
            ModelId::Gpt41Mini => "gpt-4.1-mini",
            ModelId::Gpt41Nano => "gpt-4.1-nano",
        }
    }

    /// All supported model identifiers.
    pub fn all() -> [ModelId; 4] {
        [
            ModelId::Gpt4oMini,
            ModelId::Gpt4o,
            ModelId::Gpt41Mini,
            ModelId::Gpt41Nano,
        ]
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::all()
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let supported: Vec<_> = ModelId::all().iter().map(|m| m.as_str()).collect();
                format!("unknown model '{s}', supported: {}", supported.join(", "))
            })
    }
}

/// Configuration for one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Generation model used by every agent and the judge.
    pub model: ModelId,

    /// How many evaluate→suggest→run passes to execute (1..=10).
    pub max_iterations: u32,

    /// How many prompt variants the suggester asks for.
    pub num_suggestions: usize,

    /// Whether the feedback-simulator phase runs.
    pub enable_feedback: bool,

    /// Per-call timeout, e.g. "60s" in config files.
    #[serde(with = "humantime_duration")]
    pub call_timeout: Duration,

    /// Maximum tokens per completion.
    pub max_tokens: u32,

    /// Sampling temperatures, one per call site.
    pub evaluator_temperature: f32,
    pub feedback_temperature: f32,
    pub suggester_temperature: f32,
    pub judge_temperature: f32,

    /// Scoring criteria run against every generated output.
    pub criteria: Vec<Criterion>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model: ModelId::default(),
            max_iterations: 2,
            num_suggestions: 2,
            enable_feedback: false,
            call_timeout: Duration::from_secs(60),
            max_tokens: 2048,
            evaluator_temperature: 0.1,
            feedback_temperature: 0.3,
            suggester_temperature: 0.7,
            judge_temperature: 0.0,
            criteria: default_criteria(),
        }
    }
}

impl RuntimeConfig {
    /// Set the iteration bound, clamped into `1..=10`.
    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n.clamp(1, MAX_ITERATIONS_BOUND);
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: ModelId) -> Self {
        self.model = model;
        self
    }

    /// Enable or disable the feedback-simulator phase.
    pub fn with_feedback(mut self, enabled: bool) -> Self {
        self.enable_feedback = enabled;
        self
    }

    /// Completion config for a given sampling temperature.
    pub fn completion(&self, temperature: f32) -> CompletionConfig {
        CompletionConfig {
            model: self.model.to_string(),
            max_tokens: self.max_tokens,
            temperature,
            timeout: self.call_timeout,
        }
    }
}

/// Serialize `Duration` as a humantime string ("60s", "2m").
mod humantime_duration {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(d)?;
        humantime::parse_duration(&text).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in ModelId::all() {
            assert_eq!(model.as_str().parse::<ModelId>().unwrap(), model);
        }
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = "gpt-99".parse::<ModelId>().unwrap_err();
        assert!(err.contains("gpt-4o-mini"));
    }

    #[test]
    fn test_iteration_bound_clamped() {
        assert_eq!(RuntimeConfig::default().with_max_iterations(0).max_iterations, 1);
        assert_eq!(
            RuntimeConfig::default().with_max_iterations(99).max_iterations,
            MAX_ITERATIONS_BOUND
        );
        assert_eq!(RuntimeConfig::default().with_max_iterations(3).max_iterations, 3);
    }

    #[test]
    fn test_completion_inherits_model_and_timeout() {
        let config = RuntimeConfig::default().with_model(ModelId::Gpt4o);
        let completion = config.completion(0.7);
        assert_eq!(completion.model, "gpt-4o");
        assert_eq!(completion.temperature, 0.7);
        assert_eq!(completion.timeout, config.call_timeout);
    }

    #[test]
    fn test_config_deserializes_humantime_timeout() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"model": "gpt-4o", "call_timeout": "90s"}"#).unwrap();
        assert_eq!(config.model, ModelId::Gpt4o);
        assert_eq!(config.call_timeout, Duration::from_secs(90));
        // Untouched fields fall back to defaults.
        assert_eq!(config.num_suggestions, 2);
    }

    #[test]
    fn test_default_criteria_present() {
        assert_eq!(RuntimeConfig::default().criteria.len(), 3);
    }
}
