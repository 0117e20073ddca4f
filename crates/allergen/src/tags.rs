//! Normalization of structured allergen tags from product databases.
//!
//! Tags arrive as `"en:milk"`, `"fr:lait"`, `" Gluten "` and similar. The
//! locale prefix carries no allergen information and is dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Two ASCII letters followed by a colon at the start of a tag.
static LOCALE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}:").expect("locale prefix pattern is valid"));

/// Normalize a single raw tag.
///
/// # Returns
/// The lowercase tag without its locale prefix, or `None` if nothing is left
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let tag = LOCALE_PREFIX.replace(trimmed, "").trim().to_lowercase();

    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Normalize a collection of raw tags, dropping empties and duplicates.
///
/// Output keeps the order in which each tag was first seen.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|tag| normalize_tag(tag.as_ref()))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Split a comma separated allergen list such as `"en:milk, en:soybeans"`.
pub fn split_tag_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_locale_prefix() {
        assert_eq!(normalize_tag("en:milk").as_deref(), Some("milk"));
        assert_eq!(normalize_tag("FR:Lait").as_deref(), Some("lait"));
        assert_eq!(normalize_tag("  de:nüsse ").as_deref(), Some("nüsse"));
    }

    #[test]
    fn test_unprefixed_tags_pass_through() {
        assert_eq!(normalize_tag("Gluten").as_deref(), Some("gluten"));
        assert_eq!(normalize_tag("tree nuts").as_deref(), Some("tree nuts"));
    }

    #[test]
    fn test_only_two_letter_prefixes_are_stripped() {
        assert_eq!(normalize_tag("eng:milk").as_deref(), Some("eng:milk"));
        assert_eq!(normalize_tag("e1:milk").as_deref(), Some("e1:milk"));
        assert_eq!(normalize_tag("x:milk").as_deref(), Some("x:milk"));
    }

    #[test]
    fn test_empty_tags_discarded() {
        assert_eq!(normalize_tag(""), None);
        assert_eq!(normalize_tag("   "), None);
        assert_eq!(normalize_tag("en:"), None);
        assert_eq!(normalize_tag("en:  "), None);
    }

    #[test]
    fn test_normalize_tags_dedups_in_order() {
        let tags = normalize_tags(["en:milk", "EN:MILK", "milk", "en:gluten", ""]);
        assert_eq!(tags, vec!["milk", "gluten"]);
    }

    #[test]
    fn test_split_tag_list() {
        assert_eq!(
            split_tag_list("en:Milk, en:soybeans,, "),
            vec!["en:milk", "en:soybeans"]
        );
        assert!(split_tag_list("").is_empty());
    }
}
