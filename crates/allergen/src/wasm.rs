//! WASM bindings for allergen detection.

use crate::{AllergenProfile, Detector, Ingredients};
use wasm_bindgen::prelude::*;

/// Normalize ingredient text into terms.
///
/// # Returns
/// JSON array of normalized terms
#[wasm_bindgen]
pub fn normalize_ingredients_json(text: &str) -> String {
    let terms = crate::normalize_ingredients(Some(text));
    serde_json::to_string(&terms).unwrap_or_else(|_| "[]".to_string())
}

/// Detect allergens in a product.
///
/// # Arguments
/// * `text` - Raw ingredient text (may be empty)
/// * `profile_json` - `{"Milk": {"selected": true}, ...}`
/// * `tags_json` - JSON array of allergen tags such as `["en:milk"]`
///
/// # Returns
/// JSON detection report, or `null` if the profile or tags could not be parsed
#[wasm_bindgen]
pub fn detect_allergens_json(text: &str, profile_json: &str, tags_json: &str) -> String {
    let Ok(profile) = AllergenProfile::from_json(profile_json) else {
        return "null".to_string();
    };
    let tags: Vec<String> = if tags_json.trim().is_empty() {
        Vec::new()
    } else {
        match serde_json::from_str(tags_json) {
            Ok(tags) => tags,
            Err(_) => return "null".to_string(),
        }
    };

    let ingredients = if text.trim().is_empty() {
        Ingredients::Absent
    } else {
        Ingredients::Text(text)
    };

    let report = Detector::new().report(ingredients, &profile, tags.as_slice());
    serde_json::to_string(&report).unwrap_or_else(|_| "null".to_string())
}

/// Similarity score between two words (0 = identical, 1 = unrelated).
#[wasm_bindgen]
pub fn similarity_score(a: &str, b: &str) -> f64 {
    Detector::new().matcher().score(&a.to_lowercase(), &b.to_lowercase())
}
