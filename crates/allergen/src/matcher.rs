//! Per-comparison match decisions between a candidate and a selected allergen.

use crate::similarity::{IndexedAllergen, NormalizedLevenshtein, SimilarityScorer};
use foodshare_core::config::Strictness;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Similarity score within the threshold
    Fuzzy = 10,
    /// Allergen contained in an ingredient term
    Substring = 20,
    /// Allergen present as whole words in an ingredient phrase
    WordBoundary = 30,
    /// Ingredient term equal to the allergen
    Exact = 40,
    /// Product allergen tag equal to the allergen
    Tag = 50,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fuzzy => "fuzzy",
            Self::Substring => "substring",
            Self::WordBoundary => "word boundary",
            Self::Exact => "exact",
            Self::Tag => "tag",
        })
    }
}

/// Default similarity threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Decides whether one candidate matches one allergen.
pub struct Matcher {
    strictness: Strictness,
    threshold: f64,
    scorer: Box<dyn SimilarityScorer>,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("strictness", &self.strictness)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(Strictness::default(), DEFAULT_THRESHOLD, Box::new(NormalizedLevenshtein))
    }
}

impl Matcher {
    /// Create a matcher
    pub fn new(strictness: Strictness, threshold: f64, scorer: Box<dyn SimilarityScorer>) -> Self {
        Self {
            strictness,
            threshold,
            scorer,
        }
    }

    /// Matching strictness
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Highest score accepted by the fuzzy tier
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub(crate) fn set_strictness(&mut self, strictness: Strictness) {
        self.strictness = strictness;
    }

    pub(crate) fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub(crate) fn set_scorer(&mut self, scorer: Box<dyn SimilarityScorer>) {
        self.scorer = scorer;
    }

    /// Similarity score between two strings under the configured scorer.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        self.scorer.score(a, b)
    }

    /// Tag path: a normalized tag only matches by equality.
    pub fn match_tag(tag: &str, allergen: &str) -> Option<MatchKind> {
        (tag == allergen).then_some(MatchKind::Tag)
    }

    /// Ingredient path for a single lemmatized term.
    ///
    /// Tries equality, then containment, then (in fuzzy mode) similarity,
    /// each against the allergen name and its lemmatized form. In
    /// word-boundary mode only equality counts at the term level; phrases go
    /// through [`Matcher::match_phrase`].
    pub fn match_term(&self, term: &str, allergen: &IndexedAllergen) -> Option<MatchKind> {
        if allergen.forms().any(|form| term == form) {
            return Some(MatchKind::Exact);
        }

        let contains = || allergen.forms().any(|form| term.contains(form));
        match self.strictness {
            Strictness::WordBoundary => None,
            Strictness::Substring => contains().then_some(MatchKind::Substring),
            Strictness::Fuzzy => {
                if contains() {
                    Some(MatchKind::Substring)
                } else if self.within_threshold(term, allergen) {
                    Some(MatchKind::Fuzzy)
                } else {
                    None
                }
            }
        }
    }

    /// Ingredient path for a whole lemmatized phrase.
    pub fn match_phrase(&self, phrase: &str, allergen: &IndexedAllergen) -> Option<MatchKind> {
        if allergen.forms().any(|form| phrase == form) {
            Some(MatchKind::Exact)
        } else if allergen.occurs_as_word_in(phrase) {
            Some(MatchKind::WordBoundary)
        } else {
            None
        }
    }

    fn within_threshold(&self, term: &str, allergen: &IndexedAllergen) -> bool {
        let term_len = term.chars().count();
        allergen.forms().any(|form| {
            let form_len = form.chars().count();
            self.scorer.lower_bound(term_len, form_len) <= self.threshold
                && self.scorer.score(term, form) <= self.threshold
        })
    }
}
