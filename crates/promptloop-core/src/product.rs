//! Product records and catalog loading.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from catalog loading.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog contains no products")]
    Empty,
}

/// A product whose attribute sheet is being enriched.
///
/// Immutable once loaded; read-only input to every iteration. Attribute maps
/// use `BTreeMap` so serialized output and prompt text are deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Display name, also the lookup key in evaluation records.
    pub name: String,

    /// Category path (e.g. "Electronics > Smartphones").
    pub category: String,

    /// Free-text marketing description.
    pub description: String,

    /// Brand name.
    pub brand: String,

    /// Attributes already known before enrichment.
    pub attributes: BTreeMap<String, String>,

    /// Ground-truth attributes the enrichment should recover.
    #[serde(default)]
    pub expected_attributes: BTreeMap<String, String>,
}

impl Product {
    /// Expected attributes as pretty JSON, the reference text handed to the
    /// scoring judge.
    pub fn expected_json(&self) -> String {
        serde_json::to_string_pretty(&self.expected_attributes)
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Known attributes as pretty JSON.
    pub fn attributes_json(&self) -> String {
        serde_json::to_string_pretty(&self.attributes).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Load a product catalog from a YAML or JSON file.
///
/// The extension decides the format; anything that is not `.json` is parsed
/// as YAML (which also accepts JSON).
pub fn load_catalog(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let text = std::fs::read_to_string(path)?;

    let products: Vec<Product> = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };

    if products.is_empty() {
        return Err(CatalogError::Empty);
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            name: "Widget".to_string(),
            category: "Tools".to_string(),
            description: "A widget".to_string(),
            brand: "Acme".to_string(),
            attributes: BTreeMap::from([("color".to_string(), "red".to_string())]),
            expected_attributes: BTreeMap::from([
                ("color".to_string(), "red".to_string()),
                ("weight".to_string(), "1kg".to_string()),
            ]),
        }
    }

    #[test]
    fn test_expected_json_is_deterministic() {
        let product = sample();
        assert_eq!(product.expected_json(), product.expected_json());
        assert!(product.expected_json().contains("weight"));
    }

    #[test]
    fn test_product_roundtrip() {
        let product = sample();
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, back);
    }

    #[test]
    fn test_expected_attributes_default_to_empty() {
        let json = r#"{
            "name": "Widget",
            "category": "Tools",
            "description": "A widget",
            "brand": "Acme",
            "attributes": {}
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.expected_attributes.is_empty());
    }
}
