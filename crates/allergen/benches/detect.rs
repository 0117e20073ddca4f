//! Benchmarks for ingredient normalization and allergen detection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use foodshare_allergen::{
    batch::{detect_batch, BatchItem},
    AllergenProfile, Detector, ProductDetails, Strictness,
};

const INGREDIENTS: &str = "Sugar, palm oil, hazelnuts (13%), skimmed MILK powder (8.7%), \
    fat-reduced cocoa (7.4%), emulsifier: lecithins (soya); vanillin. Wheat flour, whole eggs, \
    almonds, cashews, sesame seeds, anchovies, shrimps, potatoes, tomatoes.";

fn profile() -> AllergenProfile {
    let mut profile = AllergenProfile::with_defaults();
    for name in ["Peanuts", "Milk", "Eggs", "Soy", "Wheat"] {
        profile.set_selected(name, true);
    }
    profile
}

fn create_test_items(count: usize) -> Vec<BatchItem> {
    (0..count)
        .map(|i| BatchItem {
            id: i.to_string(),
            product: ProductDetails {
                ingredients_text: Some(INGREDIENTS.to_string()),
                allergens_tags: if i % 2 == 0 { vec!["en:milk".into()] } else { Vec::new() },
                ..Default::default()
            },
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let detector = Detector::new();
    c.bench_function("normalize_ingredients", |b| {
        b.iter(|| detector.normalize_ingredients(black_box(Some(INGREDIENTS))))
    });
}

fn bench_detect(c: &mut Criterion) {
    let profile = profile();
    let tags = ["en:milk", "en:soybeans", "en:gluten"];

    let mut group = c.benchmark_group("detect");
    for strictness in [Strictness::WordBoundary, Strictness::Substring, Strictness::Fuzzy] {
        let detector = Detector::new().with_strictness(strictness);
        group.bench_with_input(
            BenchmarkId::new("strictness", strictness),
            &strictness,
            |b, _| b.iter(|| detector.detect(black_box(INGREDIENTS), &profile, &tags)),
        );
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let profile = profile();
    let detector = Detector::new();

    let mut group = c.benchmark_group("batch_detect");
    for size in [10, 100, 1000].iter() {
        let items = create_test_items(*size);
        group.bench_with_input(BenchmarkId::new("products", size), size, |b, _| {
            b.iter(|| detect_batch(&detector, &profile, black_box(&items)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_detect, bench_batch);
criterion_main!(benches);
