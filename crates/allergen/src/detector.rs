//! Detection orchestration: tags and ingredient text in, detected allergens out.

use crate::lemma::{EnglishSingularizer, Lemmatizer};
use crate::matcher::{MatchKind, Matcher};
use crate::product::ProductDetails;
use crate::profile::AllergenProfile;
use crate::similarity::{IndexCache, JaroWinkler, NormalizedLevenshtein, SimilarityScorer};
use crate::tags::normalize_tags;
use crate::text::{extract_terms, normalize_text, segment};
use foodshare_core::config::{DetectionConfig, ScorerKind, Strictness};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// Ingredient input accepted by the detector.
#[derive(Debug, Clone, Copy, Default)]
pub enum Ingredients<'a> {
    /// No ingredient information
    #[default]
    Absent,
    /// Raw ingredient text as printed on the package
    Text(&'a str),
    /// Terms previously produced by [`Detector::normalize_ingredients`]
    Terms(&'a [String]),
}

impl<'a> From<&'a str> for Ingredients<'a> {
    fn from(text: &'a str) -> Self {
        Ingredients::Text(text)
    }
}

impl<'a> From<Option<&'a str>> for Ingredients<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(Ingredients::Absent, Ingredients::Text)
    }
}

impl<'a> From<&'a [String]> for Ingredients<'a> {
    fn from(terms: &'a [String]) -> Self {
        Ingredients::Terms(terms)
    }
}

impl<'a> From<&'a Vec<String>> for Ingredients<'a> {
    fn from(terms: &'a Vec<String>) -> Self {
        Ingredients::Terms(terms.as_slice())
    }
}

/// Ingredient text after the full normalization pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIngredients {
    /// Each phrase with its terms lemmatized, joined by single spaces
    pub phrases: Vec<String>,
    /// Distinct lemmatized terms in first-seen order
    pub terms: Vec<String>,
}

/// How one allergen was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Lowercase allergen name from the profile
    pub allergen: String,
    /// Tier that matched first
    pub kind: MatchKind,
    /// Tag, term, or phrase that triggered the match
    pub matched: String,
}

/// Overall verdict for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Safety {
    /// No selected allergen found in the available data
    Safe,
    /// At least one selected allergen found
    NotSafe,
    /// Neither ingredient text nor allergen tags were available
    Unknown,
}

impl fmt::Display for Safety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Safe => "safe to consume",
            Self::NotSafe => "not safe",
            Self::Unknown => "allergen information unavailable",
        })
    }
}

/// Detection result with the context needed to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Detected allergen names
    pub detected: BTreeSet<String>,
    /// First match for every detected allergen, sorted by allergen
    pub matches: Vec<Detection>,
    /// Normalized ingredient terms
    pub ingredients: Vec<String>,
    /// Verdict
    pub safety: Safety,
}

/// Matches ingredient text and allergen tags against an allergen profile.
///
/// Holds the similarity index for the last selected-allergen list it saw;
/// everything else is recomputed per call. Safe to share between threads.
///
/// # Example
///
/// ```
/// use foodshare_allergen::{AllergenProfile, Detector, Ingredients};
///
/// let profile: AllergenProfile = [("Milk", true), ("Peanuts", false)].into_iter().collect();
/// let detector = Detector::new();
///
/// let found = detector.detect(
///     Ingredients::Text("Milk, Wheat flour, Soy lecithin (emulsifier)"),
///     &profile,
///     &["en:gluten"],
/// );
/// assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["milk"]);
/// ```
pub struct Detector {
    lemmatizer: Box<dyn Lemmatizer>,
    matcher: Matcher,
    cache: IndexCache,
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("matcher", &self.matcher)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    /// Detector with fuzzy matching, a 0.3 threshold, and the English singularizer.
    pub fn new() -> Self {
        Self {
            lemmatizer: Box::new(EnglishSingularizer::new()),
            matcher: Matcher::default(),
            cache: IndexCache::new(),
        }
    }

    /// Detector configured from the `[detection]` section.
    pub fn from_config(config: &DetectionConfig) -> Self {
        let scorer: Box<dyn SimilarityScorer> = match config.scorer {
            ScorerKind::Levenshtein => Box::new(NormalizedLevenshtein),
            ScorerKind::JaroWinkler => Box::new(JaroWinkler),
        };
        Self::new()
            .with_strictness(config.strictness)
            .with_threshold(config.fuzzy_threshold)
            .with_scorer(scorer)
    }

    /// Set matching strictness
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.matcher.set_strictness(strictness);
        self
    }

    /// Set the fuzzy threshold, clamped to `[0.0, 1.0]`
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.matcher.set_threshold(threshold.clamp(0.0, 1.0));
        self
    }

    /// Replace the similarity scorer
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.matcher.set_scorer(scorer);
        self
    }

    /// Replace the lemmatizer
    #[must_use]
    pub fn with_lemmatizer(mut self, lemmatizer: Box<dyn Lemmatizer>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    /// The matcher in use
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Drop the cached similarity index.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
    }

    /// Run the full ingredient pipeline over raw text.
    pub fn parse(&self, raw: Option<&str>) -> ParsedIngredients {
        let normalized = normalize_text(raw);
        let mut parsed = ParsedIngredients::default();
        let mut seen = HashSet::new();

        for phrase in segment(&normalized) {
            let lemmas: Vec<String> = extract_terms(phrase)
                .into_iter()
                .map(|term| self.lemmatizer.lemmatize(term))
                .filter(|lemma| !lemma.is_empty())
                .collect();
            if lemmas.is_empty() {
                continue;
            }

            parsed.phrases.push(lemmas.join(" "));
            for lemma in lemmas {
                if seen.insert(lemma.clone()) {
                    parsed.terms.push(lemma);
                }
            }
        }

        tracing::trace!(phrases = ?parsed.phrases, terms = ?parsed.terms, "Parsed ingredients");
        parsed
    }

    /// Normalized, deduplicated ingredient terms for display and later detection.
    pub fn normalize_ingredients(&self, raw: Option<&str>) -> Vec<String> {
        self.parse(raw).terms
    }

    /// Detected allergen names.
    pub fn detect<'a, S: AsRef<str>>(
        &self,
        ingredients: impl Into<Ingredients<'a>>,
        profile: &AllergenProfile,
        raw_tags: &[S],
    ) -> BTreeSet<String> {
        let selected = profile.selected_names();
        if selected.is_empty() {
            return BTreeSet::new();
        }

        let parsed = self.parse_input(ingredients.into());
        self.run(&selected, parsed.as_ref(), raw_tags)
            .into_keys()
            .collect()
    }

    /// Detected allergens with provenance, normalized ingredients, and verdict.
    pub fn report<'a, S: AsRef<str>>(
        &self,
        ingredients: impl Into<Ingredients<'a>>,
        profile: &AllergenProfile,
        raw_tags: &[S],
    ) -> DetectionReport {
        let parsed = self.parse_input(ingredients.into());
        let selected = profile.selected_names();
        let matches = if selected.is_empty() {
            BTreeMap::new()
        } else {
            self.run(&selected, parsed.as_ref(), raw_tags)
        };

        let ingredients = parsed.map(|p| p.terms).unwrap_or_default();

        // Tags alone cannot clear a product; only ingredient text can.
        let safety = if !matches.is_empty() {
            Safety::NotSafe
        } else if ingredients.is_empty() {
            Safety::Unknown
        } else {
            Safety::Safe
        };

        DetectionReport {
            detected: matches.keys().cloned().collect(),
            matches: matches.into_values().collect(),
            ingredients,
            safety,
        }
    }

    /// Report for a product document.
    pub fn detect_product(&self, product: &ProductDetails, profile: &AllergenProfile) -> DetectionReport {
        let tags = product.allergen_tags();
        let report = self.report(product.ingredients_text(), profile, tags.as_slice());
        tracing::debug!(
            product = product.display_name(),
            detected = report.detected.len(),
            safety = ?report.safety,
            "Product checked"
        );
        report
    }

    fn parse_input(&self, ingredients: Ingredients<'_>) -> Option<ParsedIngredients> {
        match ingredients {
            Ingredients::Absent => None,
            Ingredients::Text(text) => Some(self.parse(Some(text))),
            Ingredients::Terms(terms) => Some(self.parse(Some(&terms.join(", ")))),
        }
    }

    /// Match tags and parsed ingredients against a non-empty selected list.
    fn run<S: AsRef<str>>(
        &self,
        selected: &[String],
        parsed: Option<&ParsedIngredients>,
        raw_tags: &[S],
    ) -> BTreeMap<String, Detection> {
        let mut found: BTreeMap<String, Detection> = BTreeMap::new();

        for tag in normalize_tags(raw_tags) {
            for allergen in selected {
                if let Some(kind) = Matcher::match_tag(&tag, allergen) {
                    record(&mut found, allergen, kind, &tag);
                }
            }
        }

        let Some(parsed) = parsed else {
            return found;
        };

        let index = self.cache.get_or_build(selected, self.lemmatizer.as_ref());
        for entry in index.entries() {
            if found.contains_key(&entry.name) {
                continue;
            }

            let hit = parsed
                .terms
                .iter()
                .find_map(|term| self.matcher.match_term(term, entry).map(|kind| (kind, term)))
                .or_else(|| {
                    if self.matcher.strictness() != Strictness::WordBoundary && !entry.is_multi_word() {
                        return None;
                    }
                    parsed
                        .phrases
                        .iter()
                        .find_map(|phrase| self.matcher.match_phrase(phrase, entry).map(|kind| (kind, phrase)))
                });

            if let Some((kind, candidate)) = hit {
                record(&mut found, &entry.name, kind, candidate);
            }
        }

        found
    }
}

fn record(found: &mut BTreeMap<String, Detection>, allergen: &str, kind: MatchKind, matched: &str) {
    if found.contains_key(allergen) {
        return;
    }
    tracing::debug!(allergen, %kind, matched, "Allergen detected");
    found.insert(
        allergen.to_string(),
        Detection {
            allergen: allergen.to_string(),
            kind,
            matched: matched.to_string(),
        },
    );
}

/// Normalize raw ingredient text with the default detector.
pub fn normalize_ingredients(raw: Option<&str>) -> Vec<String> {
    Detector::new().normalize_ingredients(raw)
}

/// Detect allergens with the default detector.
pub fn detect_allergens<'a, S: AsRef<str>>(
    ingredients: impl Into<Ingredients<'a>>,
    profile: &AllergenProfile,
    raw_tags: &[S],
) -> BTreeSet<String> {
    Detector::new().detect(ingredients, profile, raw_tags)
}
