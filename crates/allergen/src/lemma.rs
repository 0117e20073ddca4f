//! Reduction of ingredient terms to a singular base form.

/// Reduces a single term to its canonical base form.
///
/// Implementations must be idempotent: lemmatizing an already lemmatized term
/// returns it unchanged.
pub trait Lemmatizer: Send + Sync {
    /// Return the base form of `term`.
    fn lemmatize(&self, term: &str) -> String;
}

/// Plural forms that the suffix rules would get wrong.
const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("women", "woman"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("people", "person"),
    ("leaves", "leaf"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("calves", "calf"),
    ("knives", "knife"),
    ("wolves", "wolf"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("mangoes", "mango"),
    ("cookies", "cookie"),
    ("brownies", "brownie"),
    ("calories", "calorie"),
    ("smoothies", "smoothie"),
    ("does", "do"),
];

/// Words that end in `s` without being plurals.
const UNINFLECTED: &[&str] = &[
    "species", "series", "news", "molasses", "swiss", "always", "perhaps", "sometimes",
];

/// Suffixes that are never a plural marker.
const NON_PLURAL_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Suffixes after which the plural adds `es` rather than `s`.
const SIBILANT_PLURALS: &[&str] = &["sses", "ches", "shes", "xes", "zes"];

/// Rule-based English singularizer.
///
/// Handles an irregular table, `-ies → -y`, sibilant `-es` plurals, and plain
/// `-s` plurals. Terms of three characters or fewer are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishSingularizer;

impl EnglishSingularizer {
    /// Create a singularizer
    pub fn new() -> Self {
        Self
    }

    fn step(term: &str) -> Option<String> {
        if term.chars().count() <= 3 || UNINFLECTED.contains(&term) {
            return None;
        }

        if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == term) {
            return Some((*singular).to_string());
        }

        if NON_PLURAL_ENDINGS.iter().any(|end| term.ends_with(end)) {
            return None;
        }

        if let Some(stem) = term.strip_suffix("ies") {
            if stem.chars().count() >= 2 {
                return Some(format!("{stem}y"));
            }
        }

        if SIBILANT_PLURALS.iter().any(|end| term.ends_with(end)) {
            return term.strip_suffix("es").map(str::to_string);
        }

        term.strip_suffix('s').map(str::to_string)
    }
}

impl Lemmatizer for EnglishSingularizer {
    fn lemmatize(&self, term: &str) -> String {
        let mut current = term.to_string();
        // Each rule shortens the word or maps it to a fixed point, so this settles fast.
        for _ in 0..4 {
            match Self::step(&current) {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singular(term: &str) -> String {
        EnglishSingularizer::new().lemmatize(term)
    }

    #[test]
    fn test_plain_plurals() {
        assert_eq!(singular("almonds"), "almond");
        assert_eq!(singular("eggs"), "egg");
        assert_eq!(singular("peanuts"), "peanut");
        assert_eq!(singular("cheeses"), "cheese");
    }

    #[test]
    fn test_ies_plurals() {
        assert_eq!(singular("berries"), "berry");
        assert_eq!(singular("anchovies"), "anchovy");
        assert_eq!(singular("ties"), "tie");
    }

    #[test]
    fn test_sibilant_plurals() {
        assert_eq!(singular("peaches"), "peach");
        assert_eq!(singular("radishes"), "radish");
        assert_eq!(singular("boxes"), "box");
        assert_eq!(singular("glasses"), "glass");
    }

    #[test]
    fn test_irregular_plurals() {
        assert_eq!(singular("leaves"), "leaf");
        assert_eq!(singular("tomatoes"), "tomato");
        assert_eq!(singular("cookies"), "cookie");
    }

    #[test]
    fn test_non_plurals_pass_through() {
        assert_eq!(singular("milk"), "milk");
        assert_eq!(singular("hummus"), "hummus");
        assert_eq!(singular("asparagus"), "asparagus");
        assert_eq!(singular("watercress"), "watercress");
        assert_eq!(singular("molasses"), "molasses");
        assert_eq!(singular("soy"), "soy");
        assert_eq!(singular("gas"), "gas");
    }

    #[test]
    fn test_repeated_reduction_reaches_fixed_point() {
        assert_eq!(singular("childrens"), "child");
        assert_eq!(singular(&singular("berries")), "berry");
    }

    #[test]
    fn test_extended_letters() {
        assert_eq!(singular("crèmes"), "crème");
        assert_eq!(singular("nüsse"), "nüsse");
    }
}
