//! End-to-end detection behaviour through the public API.

use foodshare_allergen::{
    detect_allergens, normalize_ingredients, AllergenProfile, Detector, Ingredients, MatchKind,
    ProductInfo, Safety, Strictness,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

const NO_TAGS: &[&str] = &[];

fn profile(entries: &[(&str, bool)]) -> AllergenProfile {
    entries.iter().copied().collect()
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn milk_found_in_ingredient_list() {
    let found = detect_allergens(
        "Milk, Wheat flour, Soy lecithin (emulsifier)",
        &profile(&[("milk", true), ("peanuts", false)]),
        NO_TAGS,
    );
    assert_eq!(found, set(&["milk"]));
}

#[test]
fn tags_alone_are_enough() {
    let found = detect_allergens(
        Ingredients::Absent,
        &profile(&[("gluten", true), ("milk", true)]),
        &["en:gluten", "en:milk"],
    );
    assert_eq!(found, set(&["gluten", "milk"]));
}

#[test]
fn plural_ingredient_matches_singular_allergen() {
    let found = detect_allergens("almonds, sugar", &profile(&[("almond", true)]), NO_TAGS);
    assert_eq!(found, set(&["almond"]));
}

#[test]
fn empty_everything_is_empty() {
    assert!(detect_allergens(Ingredients::Absent, &AllergenProfile::new(), NO_TAGS).is_empty());
}

#[test]
fn prefixed_and_bare_tags_behave_the_same() {
    let p = profile(&[("milk", true)]);
    assert_eq!(
        detect_allergens(Ingredients::Absent, &p, &["en:milk"]),
        detect_allergens(Ingredients::Absent, &p, &["milk"])
    );
}

#[test]
fn profile_tag_and_term_casing_cross_match() {
    let p = profile(&[("Milk", true)]);
    let found = detect_allergens("milk", &p, &["EN:MILK"]);
    assert_eq!(found, set(&["milk"]));
}

#[test]
fn peanut_free_claim_still_flags_peanut() {
    let terms = normalize_ingredients(Some("peanut-free"));
    assert_eq!(terms, vec!["peanut", "free"]);

    let found = detect_allergens("peanut-free", &profile(&[("peanut", true)]), NO_TAGS);
    assert_eq!(found, set(&["peanut"]));
}

#[test]
fn allergen_from_tag_and_text_reported_once() {
    let report = Detector::new().report(
        "Whole milk, cream",
        &profile(&[("milk", true)]),
        &["en:milk", "fr:milk"],
    );
    assert_eq!(report.detected, set(&["milk"]));
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].kind, MatchKind::Tag);
}

#[test]
fn openfoodfacts_product_end_to_end() {
    let info = ProductInfo::from_json(
        r#"{
            "code": "5000159484695",
            "product": {
                "product_name": "Chocolate bar",
                "ingredients_text": "Sugar, cocoa butter, skimmed MILK powder, hazelnuts, emulsifier (soya lecithin)",
                "allergens_tags": ["en:milk", "en:nuts", "en:soybeans"],
                "allergens_from_ingredients": "en:milk, hazelnuts"
            },
            "status": 1
        }"#,
    )
    .unwrap();
    let mut p = AllergenProfile::with_defaults();
    p.set_selected("Milk", true);
    p.set_selected("Tree Nuts", true);
    p.add_custom("Hazelnut").unwrap();

    let report = Detector::new().detect_product(info.details().unwrap(), &p);

    assert_eq!(report.detected, set(&["hazelnut", "milk"]));
    assert_eq!(report.safety, Safety::NotSafe);
    assert!(report.ingredients.contains(&"hazelnut".to_string()));
}

#[test]
fn missing_data_is_unknown_not_safe() {
    let info = ProductInfo::from_json(r#"{"product": {"product_name": "Mystery"}}"#).unwrap();
    let p = profile(&[("milk", true)]);

    let report = Detector::new().detect_product(info.details().unwrap(), &p);
    assert_eq!(report.safety, Safety::Unknown);
    assert!(report.detected.is_empty());
}

#[test]
fn default_profile_catches_plural_and_multi_word_names() {
    let mut p = AllergenProfile::with_defaults();
    for name in ["Peanuts", "Tree Nuts", "Eggs"] {
        p.set_selected(name, true);
    }

    for strictness in [Strictness::Fuzzy, Strictness::Substring, Strictness::WordBoundary] {
        let detector = Detector::new().with_strictness(strictness);
        assert_eq!(
            detector.detect("Sugar, roasted peanuts, tree nuts, eggs, salt", &p, NO_TAGS),
            set(&["eggs", "peanuts", "tree nuts"]),
            "{strictness}"
        );
    }
}

#[test]
fn tags_without_ingredient_text_stay_unknown() {
    let info = ProductInfo::from_json(
        r#"{"product": {"product_name": "Crackers", "allergens_tags": ["en:soybeans"]}}"#,
    )
    .unwrap();
    let p = profile(&[("Milk", true)]);

    let report = Detector::new().detect_product(info.details().unwrap(), &p);
    assert!(report.detected.is_empty());
    assert_eq!(report.safety, Safety::Unknown);
}

#[test]
fn strictness_levels_differ_on_typos() {
    let p = profile(&[("sesame", true)]);
    let text = "sesam seeds, salt";

    let fuzzy = Detector::new().with_strictness(Strictness::Fuzzy);
    let substring = Detector::new().with_strictness(Strictness::Substring);
    let strict = Detector::new().with_strictness(Strictness::WordBoundary);

    assert_eq!(fuzzy.detect(text, &p, NO_TAGS), set(&["sesame"]));
    assert!(substring.detect(text, &p, NO_TAGS).is_empty());
    assert!(strict.detect(text, &p, NO_TAGS).is_empty());
}

#[test]
fn detector_is_shareable_across_threads() {
    let detector = std::sync::Arc::new(Detector::new());
    let p = std::sync::Arc::new(profile(&[("egg", true)]));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let detector = std::sync::Arc::clone(&detector);
            let p = std::sync::Arc::clone(&p);
            std::thread::spawn(move || detector.detect("whole eggs", &p, NO_TAGS))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), set(&["egg"]));
    }
}

fn ingredient_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex(r"[A-Za-zäöüßé ,;.()\-\[\]0-9]{0,80}").unwrap()
}

fn allergen_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex(r"[a-z]{2,8}( [a-z]{2,6})?").unwrap()
}

proptest! {
    #[test]
    fn normalization_is_idempotent(text in ingredient_text()) {
        let once = normalize_ingredients(Some(&text));
        let twice = normalize_ingredients(Some(&once.join(", ")));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unselected_allergens_never_reported(
        text in ingredient_text(),
        names in proptest::collection::vec(allergen_name(), 0..6),
    ) {
        let p: AllergenProfile = names.iter().map(|n| (n.clone(), false)).collect();
        let tags: Vec<String> = names.iter().map(|n| format!("en:{n}")).collect();
        let combined = format!("{text}, {}", names.join(", "));

        let found = detect_allergens(combined.as_str(), &p, tags.as_slice());
        prop_assert!(found.is_empty());
    }

    #[test]
    fn results_are_drawn_from_selected_names(
        text in ingredient_text(),
        selected in proptest::collection::vec(allergen_name(), 1..5),
        unselected in proptest::collection::vec(allergen_name(), 0..5),
    ) {
        let p: AllergenProfile = unselected
            .iter()
            .map(|n| (n.to_uppercase(), false))
            .chain(selected.iter().map(|n| (n.clone(), true)))
            .collect();
        let allowed: BTreeSet<String> = p.selected_names().into_iter().collect();

        let found = detect_allergens(text.as_str(), &p, NO_TAGS);
        prop_assert!(found.is_subset(&allowed));
    }
}
