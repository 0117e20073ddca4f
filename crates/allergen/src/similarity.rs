//! String similarity scoring and the per-profile similarity index.
//!
//! Scores are normalized so that `0.0` means identical and `1.0` means
//! unrelated; a candidate matches when its score is at or below the
//! configured threshold.

use crate::lemma::Lemmatizer;
use regex::Regex;
use std::sync::{Arc, PoisonError, RwLock};

/// Levenshtein edit distance between two strings, counted in characters.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Scores how different two strings are.
pub trait SimilarityScorer: Send + Sync {
    /// Score in `[0.0, 1.0]`; `0.0` for identical strings.
    fn score(&self, a: &str, b: &str) -> f64;

    /// Smallest score attainable for strings of these character lengths.
    ///
    /// Lets callers skip pairs that cannot reach a threshold. The default
    /// makes no promise.
    fn lower_bound(&self, _a_len: usize, _b_len: usize) -> f64 {
        0.0
    }
}

/// Edit distance divided by the length of the longer string.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl SimilarityScorer for NormalizedLevenshtein {
    fn score(&self, a: &str, b: &str) -> f64 {
        (1.0 - strsim::normalized_levenshtein(a, b)).clamp(0.0, 1.0)
    }

    #[allow(clippy::cast_precision_loss)]
    fn lower_bound(&self, a_len: usize, b_len: usize) -> f64 {
        let longest = a_len.max(b_len);
        if longest == 0 {
            0.0
        } else {
            a_len.abs_diff(b_len) as f64 / longest as f64
        }
    }
}

/// `1 - jaro_winkler(a, b)`, favouring shared prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl SimilarityScorer for JaroWinkler {
    fn score(&self, a: &str, b: &str) -> f64 {
        (1.0 - strsim::jaro_winkler(a, b)).clamp(0.0, 1.0)
    }
}

/// A selected allergen with everything the matcher needs precomputed.
#[derive(Debug, Clone)]
pub struct IndexedAllergen {
    /// Lowercase allergen name
    pub name: String,
    /// Name with every word lemmatized, e.g. `tree nut` for `tree nuts`
    pub lemma: String,
    /// Whole-word patterns for the name and its lemma
    boundaries: Vec<Regex>,
}

impl IndexedAllergen {
    /// Index one lowercase allergen name.
    pub fn new(name: &str, lemmatizer: &dyn Lemmatizer) -> Self {
        let lemma = name
            .split_whitespace()
            .map(|word| lemmatizer.lemmatize(word))
            .collect::<Vec<_>>()
            .join(" ");

        let forms = if lemma == name || lemma.is_empty() {
            vec![name]
        } else {
            vec![name, lemma.as_str()]
        };
        let boundaries = forms
            .iter()
            .filter_map(|form| match Regex::new(&boundary_pattern(form)) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(allergen = name, error = %e, "Word boundary pattern rejected");
                    None
                }
            })
            .collect();

        Self {
            name: name.to_string(),
            lemma,
            boundaries,
        }
    }

    /// The name and, if different, its lemmatized form.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain((self.lemma != self.name && !self.lemma.is_empty()).then_some(self.lemma.as_str()))
    }

    /// True if the name spans more than one word.
    pub fn is_multi_word(&self) -> bool {
        self.name.contains(char::is_whitespace)
    }

    /// True if the name or its lemma occurs in `text` as whole words.
    pub fn occurs_as_word_in(&self, text: &str) -> bool {
        if self.boundaries.is_empty() {
            return self
                .forms()
                .any(|form| text.split_whitespace().any(|word| word == form));
        }
        self.boundaries.iter().any(|pattern| pattern.is_match(text))
    }
}

fn boundary_pattern(form: &str) -> String {
    format!(r"\b{}\b", regex::escape(form))
}

/// Precomputed data for one exact selected-allergen list.
///
/// Built once and never mutated afterwards.
#[derive(Debug)]
pub struct SimilarityIndex {
    key: Vec<String>,
    entries: Vec<IndexedAllergen>,
}

impl SimilarityIndex {
    /// Build an index over the given selected allergens.
    pub fn build(selected: &[String], lemmatizer: &dyn Lemmatizer) -> Self {
        Self {
            key: selected.to_vec(),
            entries: selected
                .iter()
                .map(|name| IndexedAllergen::new(name, lemmatizer))
                .collect(),
        }
    }

    /// The allergen list this index was built for.
    pub fn key(&self) -> &[String] {
        &self.key
    }

    /// Indexed allergens in key order.
    pub fn entries(&self) -> &[IndexedAllergen] {
        &self.entries
    }
}

/// Holds the index for the most recently used selected-allergen list.
///
/// A lookup with a different list replaces the cached index; lookups with the
/// same list share the frozen index under a read lock.
#[derive(Debug, Default)]
pub struct IndexCache {
    slot: RwLock<Option<Arc<SimilarityIndex>>>,
}

impl IndexCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `selected`, building it if the cached one is for another list.
    pub fn get_or_build(&self, selected: &[String], lemmatizer: &dyn Lemmatizer) -> Arc<SimilarityIndex> {
        {
            let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(index) = guard.as_ref().filter(|index| index.key() == selected) {
                return Arc::clone(index);
            }
        }

        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have built it while we waited for the write lock
        if let Some(index) = guard.as_ref().filter(|index| index.key() == selected) {
            return Arc::clone(index);
        }

        tracing::debug!(allergens = selected.len(), "Rebuilding similarity index");
        let index = Arc::new(SimilarityIndex::build(selected, lemmatizer));
        *guard = Some(Arc::clone(&index));
        index
    }

    /// Drop the cached index.
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// True if an index is currently cached.
    pub fn is_populated(&self) -> bool {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}
