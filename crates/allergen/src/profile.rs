//! User allergen profiles.
//!
//! A profile maps allergen display names to a selection flag. Detection only
//! ever looks at selected allergens, compared case-insensitively.

use crate::error::{AllergenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Allergens offered to every new profile.
pub const DEFAULT_ALLERGENS: [&str; 8] = [
    "Peanuts",
    "Tree Nuts",
    "Milk",
    "Eggs",
    "Fish",
    "Shellfish",
    "Soy",
    "Wheat",
];

/// Selection state of one allergen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllergenSelection {
    /// Whether the user wants this allergen flagged
    #[serde(default)]
    pub selected: bool,
}

/// Mapping from allergen name to selection, as stored by the profile service.
///
/// Serializes as `{"Milk": {"selected": true}, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllergenProfile {
    allergens: BTreeMap<String, AllergenSelection>,
}

impl AllergenProfile {
    /// Create an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile with [`DEFAULT_ALLERGENS`], none selected.
    pub fn with_defaults() -> Self {
        DEFAULT_ALLERGENS
            .iter()
            .map(|name| (*name, false))
            .collect()
    }

    /// Parse the JSON document served by the profile store.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of allergens in the profile, selected or not
    pub fn len(&self) -> usize {
        self.allergens.len()
    }

    /// True if the profile lists no allergens
    pub fn is_empty(&self) -> bool {
        self.allergens.is_empty()
    }

    /// Iterate over display names and their selection
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.allergens.iter().map(|(name, sel)| (name.as_str(), sel.selected))
    }

    /// Find the stored display name matching `name` case-insensitively.
    fn find_key(&self, name: &str) -> Option<&String> {
        let folded = fold(name);
        self.allergens.keys().find(|key| fold(key) == folded)
    }

    /// True if the allergen is present and selected
    pub fn is_selected(&self, name: &str) -> bool {
        let folded = fold(name);
        self.allergens
            .iter()
            .any(|(key, sel)| sel.selected && fold(key) == folded)
    }

    /// Set the selection of an existing allergen, or insert it.
    pub fn set_selected(&mut self, name: &str, selected: bool) {
        let key = self
            .find_key(name)
            .cloned()
            .unwrap_or_else(|| name.trim().to_string());
        if key.is_empty() {
            return;
        }
        self.allergens.insert(key, AllergenSelection { selected });
    }

    /// Flip the selection of an existing allergen.
    ///
    /// # Returns
    /// The new selection state
    pub fn toggle(&mut self, name: &str) -> Result<bool> {
        let key = self
            .find_key(name)
            .cloned()
            .ok_or_else(|| AllergenError::UnknownAllergen(name.to_string()))?;
        let entry = self.allergens.entry(key).or_default();
        entry.selected = !entry.selected;
        Ok(entry.selected)
    }

    /// Add a user-defined allergen, selected.
    ///
    /// The name is trimmed. Empty names and names already present (ignoring
    /// case) are rejected.
    pub fn add_custom(&mut self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AllergenError::EmptyAllergenName);
        }
        if let Some(existing) = self.find_key(trimmed) {
            return Err(AllergenError::DuplicateAllergen(existing.clone()));
        }
        self.allergens
            .insert(trimmed.to_string(), AllergenSelection { selected: true });
        Ok(())
    }

    /// Remove an allergen, returning its previous selection.
    pub fn remove(&mut self, name: &str) -> Option<AllergenSelection> {
        let key = self.find_key(name)?.clone();
        self.allergens.remove(&key)
    }

    /// Lowercase names of every selected allergen, sorted and deduplicated.
    ///
    /// If two keys differ only in case, the allergen counts as selected when
    /// either of them is. Names that are empty after trimming are skipped.
    pub fn selected_names(&self) -> Vec<String> {
        self.allergens
            .iter()
            .filter(|(_, sel)| sel.selected)
            .map(|(name, _)| fold(name))
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for AllergenProfile {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self {
            allergens: iter
                .into_iter()
                .map(|(name, selected)| (name.into(), AllergenSelection { selected }))
                .collect(),
        }
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
