//! Ingredient text normalization, phrase segmentation, and term extraction.

/// Accented Latin letters that survive normalization.
const EXTENDED_LETTERS: &str = "æøåäöüßœçñáéíóúàèìòùâêîôû";

/// Punctuation kept so phrases can be split afterwards.
const PHRASE_DELIMITERS: [char; 3] = [',', ';', '.'];

/// Lowercase raw ingredient text and drop every character outside the allowed set.
///
/// Kept: ASCII lowercase letters, the accented letters in [`EXTENDED_LETTERS`],
/// `-`, `,`, `;`, `.`, and whitespace. Brackets, digits, and all other symbols
/// are removed without replacement, so `"Soy (emulsifier)"` becomes
/// `"soy emulsifier"`.
///
/// # Arguments
/// * `raw` - Ingredient text as printed on the product, if any
///
/// # Returns
/// The normalized text; empty when the input is absent or empty
pub fn normalize_text(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    raw.to_lowercase().chars().filter(|&c| is_allowed(c)).collect()
}

#[inline]
fn is_allowed(c: char) -> bool {
    c.is_ascii_lowercase()
        || c == '-'
        || PHRASE_DELIMITERS.contains(&c)
        || c.is_whitespace()
        || EXTENDED_LETTERS.contains(c)
}

/// Split normalized text into trimmed, non-empty ingredient phrases.
pub fn segment(normalized: &str) -> Vec<&str> {
    normalized
        .split(PHRASE_DELIMITERS)
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect()
}

/// Split a phrase into word terms, breaking hyphenated compounds apart.
///
/// `"gluten-free oats"` yields `["gluten", "free", "oats"]`. Compound
/// qualifiers are not kept together, so a "peanut-free" claim still produces
/// the candidate term `"peanut"`.
pub fn extract_terms(phrase: &str) -> Vec<&str> {
    phrase
        .split_whitespace()
        .flat_map(|token| token.split('-'))
        .filter(|term| !term.is_empty())
        .collect()
}
