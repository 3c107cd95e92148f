//! Scoring criteria for attribute enrichment.

use serde::{Deserialize, Serialize};

/// A named evaluation dimension scored by the judge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Criterion {
    /// Short name used as the key in evaluation records.
    pub name: String,

    /// Instructions handed verbatim to the scoring judge.
    pub instructions: String,

    /// Whether the ground-truth attributes participate in scoring.
    pub uses_expected: bool,
}

impl Criterion {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        uses_expected: bool,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            uses_expected,
        }
    }
}

/// The built-in criteria for product attribute enrichment.
pub fn default_criteria() -> Vec<Criterion> {
    vec![
        Criterion::new(
            "completeness",
            "Assess the completeness of the product attribute enrichment. \
             Compare the generated attributes (actual output) against the \
             expected attributes (expected output). Consider: \
             1) How many of the expected attributes were included? \
             2) Are any additional attributes relevant to the category? \
             3) Are important attributes missing?",
            true,
        ),
        Criterion::new(
            "accuracy",
            "Assess the accuracy of the enriched product attributes. \
             Compare the generated values against the expected values. Consider: \
             1) Are the attribute values correct? \
             2) Are units of measurement correct? \
             3) Are the values realistic for this product? \
             4) Is any information invented or hallucinated?",
            true,
        ),
        Criterion::new(
            "format",
            "Assess the format quality of the enriched attributes. Consider: \
             1) Is the output valid, well-structured JSON? \
             2) Do the keys follow a consistent snake_case convention? \
             3) Are values formatted uniformly? \
             4) Would the format slot cleanly into an e-commerce system?",
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria_names() {
        let names: Vec<_> = default_criteria().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["completeness", "accuracy", "format"]);
    }

    #[test]
    fn test_format_criterion_ignores_expected() {
        let criteria = default_criteria();
        let format = criteria.iter().find(|c| c.name == "format").unwrap();
        assert!(!format.uses_expected);
    }
}
