//! Built-in sample products and seed prompt variants.

use std::collections::BTreeMap;

use crate::product::Product;
use crate::prompt::PromptVariant;

fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Three sample products spanning distinct categories, each with a sparse
/// known-attribute map and a full ground-truth map.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            name: "Samsung Galaxy S24 Smartphone".to_string(),
            category: "Electronics > Cell Phones & Smartphones".to_string(),
            description: "Samsung Galaxy S24 smartphone, 256GB, Black, 5G, \
                          octa-core, 8GB RAM, 6.2\" display, triple rear camera \
                          plus 12MP selfie camera"
                .to_string(),
            brand: "Samsung".to_string(),
            attributes: attrs(&[("color", "Black"), ("internal_storage", "256GB")]),
            expected_attributes: attrs(&[
                ("color", "Black"),
                ("internal_storage", "256GB"),
                ("ram", "8GB"),
                ("screen_size", "6.2 inches"),
                ("screen_type", "Dynamic AMOLED 2X"),
                ("screen_resolution", "2340 x 1080 (FHD+)"),
                ("processor", "Snapdragon 8 Gen 3"),
                ("rear_camera", "50MP + 12MP + 10MP"),
                ("front_camera", "12MP"),
                ("battery", "4000mAh"),
                ("operating_system", "Android 14"),
                ("connectivity", "5G"),
                ("weight", "167g"),
                ("water_resistance", "IP68"),
                ("dual_sim", "Yes (Nano SIM + eSIM)"),
            ]),
        },
        Product {
            name: "Nespresso Vertuo Next Coffee Machine".to_string(),
            category: "Home Appliances > Coffee Machines".to_string(),
            description: "Nespresso Vertuo Next capsule coffee machine, Black, 1260W"
                .to_string(),
            brand: "Nespresso".to_string(),
            attributes: attrs(&[("color", "Black"), ("type", "Capsule")]),
            expected_attributes: attrs(&[
                ("color", "Black"),
                ("type", "Capsule"),
                ("power", "1260W"),
                ("voltage", "110V/220V"),
                ("pressure", "19 bar"),
                ("water_tank_capacity", "1.1L"),
                ("capsule_type", "Vertuo"),
                ("material", "Recycled plastic"),
                ("dimensions", "14.2 x 42.9 x 31.4 cm"),
                ("weight", "4kg"),
                ("heat_up_time", "30 seconds"),
                ("auto_shutoff", "Yes, after 9 minutes"),
                (
                    "cup_sizes",
                    "Espresso (40ml), Double Espresso (80ml), Gran Lungo (150ml), \
                     Mug (230ml), Alto (414ml)",
                ),
            ]),
        },
        Product {
            name: "Nike Air Max 90 Sneakers".to_string(),
            category: "Fashion > Shoes > Sneakers".to_string(),
            description: "Nike Air Max 90 men's sneakers, white and black".to_string(),
            brand: "Nike".to_string(),
            attributes: attrs(&[("color", "White and Black"), ("gender", "Men's")]),
            expected_attributes: attrs(&[
                ("color", "White and Black"),
                ("gender", "Men's"),
                ("upper_material", "Leather and mesh"),
                ("sole_material", "Rubber"),
                ("cushioning_technology", "Air Max (visible air unit)"),
                ("gait_type", "Neutral"),
                ("closure", "Laces"),
                ("shaft_height", "Low-top"),
                ("recommended_use", "Casual / lifestyle"),
                ("approximate_weight", "340g (size 9)"),
                ("origin", "Imported"),
            ]),
        },
    ]
}

/// The two seed prompt variants the first iteration evaluates.
pub fn seed_prompts() -> Vec<PromptVariant> {
    vec![
        PromptVariant::new(
            "prompt_v1",
            "Simple Prompt (v1)",
            "You are a product catalog specialist. Given the product below, \
             enrich its attribute sheet with every relevant attribute.\n\n\
             Product: {product_name}\n\
             Category: {category}\n\
             Description: {description}\n\
             Brand: {brand}\n\
             Existing attributes: {attributes}\n\n\
             Return ONLY a JSON object with all enriched attributes \
             (including the existing ones).",
            "Direct, minimal prompt with no examples or output-format rules.",
        ),
        PromptVariant::new(
            "prompt_v2",
            "Structured Prompt (v2)",
            "You are a specialist in enriching product attribute sheets for \
             e-commerce.\n\n\
             ## Task\n\
             Analyze the product below and enrich its attribute sheet with as \
             many attributes as are relevant for the category.\n\n\
             ## Product\n\
             - Name: {product_name}\n\
             - Category: {category}\n\
             - Description: {description}\n\
             - Brand: {brand}\n\
             - Current attributes: {attributes}\n\n\
             ## Instructions\n\
             1. Keep every existing attribute\n\
             2. Add technical attributes relevant to the category\n\
             3. Use specific, precise values (avoid \"N/A\" or generic values)\n\
             4. Include units of measurement where applicable\n\
             5. Cover the attributes a shopper would compare products on\n\n\
             ## Output format\n\
             Return ONLY a valid JSON object with the attributes as key-value \
             pairs. Use snake_case keys.",
            "Detailed instructions, explicit rules, and a well-defined output format.",
        ),
    ]
}
