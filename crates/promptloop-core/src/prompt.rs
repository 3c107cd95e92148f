//! Prompt variants and the template slot contract.
//!
//! Every enrichment template must carry the same five named slots so that
//! variants proposed at runtime stay interchangeable with the seed prompts.
//! Templates are validated when they are accepted, not lazily at render
//! time.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;

/// The slot names every enrichment template must contain.
pub const REQUIRED_SLOTS: [&str; 5] = [
    "product_name",
    "category",
    "description",
    "brand",
    "attributes",
];

lazy_static! {
    static ref SLOT_RE: Regex = Regex::new(r"\{([a-z_]+)\}").expect("Invalid slot regex");
}

/// Errors from template validation and rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template for '{variant}' is missing required slot {{{slot}}}")]
    MissingSlot { variant: String, slot: String },

    #[error("Template for '{variant}' uses unknown slot {{{slot}}}")]
    UnknownSlot { variant: String, slot: String },

    #[error("Template for '{variant}' is empty")]
    Empty { variant: String },
}

/// A named, templated instruction set for the generation model.
///
/// Variants are never mutated. Each iteration's working set is replaced
/// wholesale by the suggester's output; superseded variants survive only in
/// the run history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptVariant {
    /// Unique identifier, stable across the whole run (e.g. "prompt_v3").
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Template text containing the five required slots.
    pub template: String,

    /// Why this variant was designed the way it is.
    pub rationale: String,
}

impl PromptVariant {
    /// Create a variant without validating the template.
    ///
    /// Use [`PromptVariant::accept`] for templates coming from an untrusted
    /// source such as model output.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        template: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template: template.into(),
            rationale: rationale.into(),
        }
    }

    /// Create a variant, rejecting templates that break the slot contract.
    pub fn accept(
        id: impl Into<String>,
        name: impl Into<String>,
        template: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let variant = Self::new(id, name, template, rationale);
        variant.validate_slots()?;
        Ok(variant)
    }

    /// Check that the template contains every required slot and nothing
    /// outside the contract.
    pub fn validate_slots(&self) -> Result<(), TemplateError> {
        if self.template.trim().is_empty() {
            return Err(TemplateError::Empty {
                variant: self.id.clone(),
            });
        }

        for slot in REQUIRED_SLOTS {
            if !self.template.contains(&format!("{{{slot}}}")) {
                return Err(TemplateError::MissingSlot {
                    variant: self.id.clone(),
                    slot: slot.to_string(),
                });
            }
        }

        for caps in SLOT_RE.captures_iter(&self.template) {
            let slot = &caps[1];
            if !REQUIRED_SLOTS.contains(&slot) {
                return Err(TemplateError::UnknownSlot {
                    variant: self.id.clone(),
                    slot: slot.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Fill the template with a product's fields.
    ///
    /// The attribute map is serialized as pretty JSON, matching what the
    /// scoring side sees as expected output.
    pub fn render(&self, product: &Product) -> Result<String, TemplateError> {
        self.validate_slots()?;

        let attributes = serde_json::to_string_pretty(&product.attributes)
            .unwrap_or_else(|_| "{}".to_string());

        Ok(self
            .template
            .replace("{product_name}", &product.name)
            .replace("{category}", &product.category)
            .replace("{description}", &product.description)
            .replace("{brand}", &product.brand)
            .replace("{attributes}", &attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn full_template() -> String {
        "Product: {product_name}\nCategory: {category}\n\
         Description: {description}\nBrand: {brand}\nKnown: {attributes}"
            .to_string()
    }

    #[test]
    fn test_accept_valid_template() {
        let variant = PromptVariant::accept("prompt_v9", "Test", full_template(), "r");
        assert!(variant.is_ok());
    }

    #[test]
    fn test_missing_slot_rejected() {
        let template = full_template().replace("{brand}", "no brand here");
        let result = PromptVariant::accept("prompt_v9", "Test", template, "r");
        assert!(matches!(
            result,
            Err(TemplateError::MissingSlot { ref slot, .. }) if slot == "brand"
        ));
    }

    #[test]
    fn test_unknown_slot_rejected() {
        let template = format!("{} extra {{made_up_slot}}", full_template());
        let result = PromptVariant::accept("prompt_v9", "Test", template, "r");
        assert!(matches!(result, Err(TemplateError::UnknownSlot { .. })));
    }

    #[test]
    fn test_empty_template_rejected() {
        let result = PromptVariant::accept("prompt_v9", "Test", "  ", "r");
        assert!(matches!(result, Err(TemplateError::Empty { .. })));
    }

    #[test]
    fn test_render_substitutes_all_slots() {
        let variant = PromptVariant::new("prompt_v1", "Test", full_template(), "r");
        let product = &catalog::sample_products()[0];

        let rendered = variant.render(product).unwrap();
        assert!(rendered.contains(&product.name));
        assert!(rendered.contains(&product.brand));
        assert!(!rendered.contains("{product_name}"));
        assert!(!rendered.contains("{attributes}"));
    }

    #[test]
    fn test_render_embeds_attribute_json() {
        let variant = PromptVariant::new("prompt_v1", "Test", full_template(), "r");
        let product = &catalog::sample_products()[0];

        let rendered = variant.render(product).unwrap();
        for key in product.attributes.keys() {
            assert!(rendered.contains(key));
        }
    }

    #[test]
    fn test_seed_prompts_honor_slot_contract() {
        for prompt in catalog::seed_prompts() {
            assert!(
                prompt.validate_slots().is_ok(),
                "seed prompt {} breaks the slot contract",
                prompt.id
            );
        }
    }
}
