//! Product documents from food databases.
//!
//! Accepts the OpenFoodFacts product response and the flatter alternate
//! source shape (`name`, `barcode`, `ingredients_text`). Only the fields
//! relevant to allergen detection are kept.

use crate::error::{AllergenError, Result};
use crate::tags::split_tag_list;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Product lookup response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Barcode the lookup was made for
    #[serde(default)]
    pub code: Option<String>,
    /// Product payload, missing when the lookup found nothing
    #[serde(default)]
    pub product: Option<ProductDetails>,
    /// `1` when found
    #[serde(default)]
    pub status: Option<i64>,
    /// Human readable status
    #[serde(default)]
    pub status_verbose: Option<String>,
}

/// Product fields used for allergen detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDetails {
    #[serde(default, alias = "name")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brands: Option<String>,
    #[serde(default, alias = "barcode")]
    pub code: Option<String>,
    #[serde(default)]
    pub ingredients_text_en: Option<String>,
    #[serde(default)]
    pub ingredients_text: Option<String>,
    #[serde(default)]
    pub allergens_tags: Vec<String>,
    /// Comma separated, e.g. `"en:milk, en:soybeans"`
    #[serde(default)]
    pub allergens_from_ingredients: Option<String>,
    #[serde(default)]
    pub allergens_hierarchy: Vec<String>,
}

impl ProductInfo {
    /// Parse a product lookup response.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The product payload.
    pub fn details(&self) -> Result<&ProductDetails> {
        self.product.as_ref().ok_or_else(|| {
            AllergenError::InvalidProduct(
                self.status_verbose
                    .clone()
                    .unwrap_or_else(|| "response has no product".to_string()),
            )
        })
    }
}

impl ProductDetails {
    /// Display name, falling back to the barcode.
    pub fn display_name(&self) -> &str {
        non_blank(self.product_name.as_deref())
            .or_else(|| non_blank(self.code.as_deref()))
            .unwrap_or("unnamed product")
    }

    /// English ingredient text if present, otherwise the default-language text.
    pub fn ingredients_text(&self) -> Option<&str> {
        non_blank(self.ingredients_text_en.as_deref())
            .or_else(|| non_blank(self.ingredients_text.as_deref()))
    }

    /// Raw allergen tags from every tag field, deduplicated in first-seen order.
    pub fn allergen_tags(&self) -> Vec<String> {
        let from_ingredients = self
            .allergens_from_ingredients
            .as_deref()
            .map(split_tag_list)
            .unwrap_or_default();

        let mut seen = HashSet::new();
        self.allergens_tags
            .iter()
            .chain(from_ingredients.iter())
            .chain(self.allergens_hierarchy.iter())
            .filter(|tag| seen.insert(tag.trim().to_lowercase()))
            .cloned()
            .collect()
    }

    /// True if there is something to run detection on.
    pub fn has_allergen_data(&self) -> bool {
        self.ingredients_text().is_some() || !self.allergen_tags().is_empty()
    }

    /// Fill in missing ingredient text from another source.
    ///
    /// Tags are kept from `self`; only the text is borrowed.
    #[must_use]
    pub fn with_ingredients_fallback(mut self, other: &ProductDetails) -> Self {
        if self.ingredients_text().is_none() {
            if let Some(text) = other.ingredients_text() {
                tracing::debug!(product = self.display_name(), "Using fallback ingredient text");
                self.ingredients_text = Some(text.to_string());
            }
        }
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
