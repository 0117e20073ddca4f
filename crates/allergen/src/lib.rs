//! Allergen detection for FoodShare product scans.
//!
//! This crate provides:
//! - Ingredient text normalization, phrase splitting, and term extraction
//! - Rule-based singularization of ingredient terms
//! - Locale-prefix stripping for product allergen tags
//! - Exact, substring, word-boundary, and fuzzy matching against a profile
//! - Product document adapters and batch detection
//!
//! # Example
//!
//! ```
//! use foodshare_allergen::{detect_allergens, normalize_ingredients, AllergenProfile};
//!
//! let profile: AllergenProfile = [("Almond", true), ("Milk", false)].into_iter().collect();
//!
//! assert_eq!(normalize_ingredients(Some("Almonds, sugar")), vec!["almond", "sugar"]);
//!
//! let found = detect_allergens("Almonds, sugar, milk", &profile, &["en:milk"]);
//! assert!(found.contains("almond"));
//! assert!(!found.contains("milk"));
//! ```

mod detector;
mod error;
mod lemma;
mod matcher;
mod profile;
mod product;
mod similarity;
mod tags;
mod text;
pub mod batch;

#[cfg(feature = "wasm")]
mod wasm;

pub use detector::{
    detect_allergens, normalize_ingredients, Detection, DetectionReport, Detector, Ingredients,
    ParsedIngredients, Safety,
};
pub use error::{AllergenError, AllergenErrorCode, Result};
pub use lemma::{EnglishSingularizer, Lemmatizer};
pub use matcher::{MatchKind, Matcher, DEFAULT_THRESHOLD};
pub use profile::{AllergenProfile, AllergenSelection, DEFAULT_ALLERGENS};
pub use product::{ProductDetails, ProductInfo};
pub use similarity::{
    levenshtein_distance, IndexCache, IndexedAllergen, JaroWinkler, NormalizedLevenshtein,
    SimilarityIndex, SimilarityScorer,
};
pub use tags::{normalize_tag, normalize_tags, split_tag_list};
pub use text::{extract_terms, normalize_text, segment};

pub use foodshare_core::config::{ScorerKind, Strictness};
