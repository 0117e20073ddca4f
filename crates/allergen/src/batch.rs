//! Batch detection over many products with optional parallelism.
//!
//! Every product is checked independently against the same profile, so the
//! work splits cleanly across threads. The detector's similarity index is
//! built once by whichever product gets there first and shared afterwards.

use crate::detector::{DetectionReport, Detector, Safety};
use crate::product::ProductDetails;
use crate::profile::AllergenProfile;
use serde::{Deserialize, Serialize};

/// Input item for batch detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// Caller-chosen identifier, e.g. a barcode or file name
    pub id: String,
    /// Product data
    pub product: ProductDetails,
}

/// Result of detection for a single item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// The item ID
    pub id: String,
    /// Product display name
    pub name: String,
    /// Detection outcome
    pub report: DetectionReport,
}

/// Check every item against `profile`.
///
/// # Returns
/// One result per input item, in input order.
///
/// # Example
/// ```
/// use foodshare_allergen::batch::{detect_batch, BatchItem};
/// use foodshare_allergen::{AllergenProfile, Detector, ProductDetails};
///
/// let items = vec![BatchItem {
///     id: "1".into(),
///     product: ProductDetails { ingredients_text: Some("Eggs, sugar".into()), ..Default::default() },
/// }];
/// let profile: AllergenProfile = [("Eggs", true)].into_iter().collect();
///
/// let results = detect_batch(&Detector::new(), &profile, &items);
/// assert!(results[0].report.detected.contains("eggs"));
/// ```
pub fn detect_batch(detector: &Detector, profile: &AllergenProfile, items: &[BatchItem]) -> Vec<BatchResult> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .map(|item| detect_single(detector, profile, item))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .map(|item| detect_single(detector, profile, item))
            .collect()
    }
}

fn detect_single(detector: &Detector, profile: &AllergenProfile, item: &BatchItem) -> BatchResult {
    BatchResult {
        id: item.id.clone(),
        name: item.product.display_name().to_string(),
        report: detector.detect_product(&item.product, profile),
    }
}

/// Counts of each verdict across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Products without selected allergens
    pub safe: usize,
    /// Products containing selected allergens
    pub not_safe: usize,
    /// Products without allergen information
    pub unknown: usize,
}

impl BatchSummary {
    /// Tally the verdicts of `results`.
    pub fn from_results(results: &[BatchResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            match r.report.safety {
                Safety::Safe => acc.safe += 1,
                Safety::NotSafe => acc.not_safe += 1,
                Safety::Unknown => acc.unknown += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, text: Option<&str>, tags: &[&str]) -> BatchItem {
        BatchItem {
            id: id.to_string(),
            product: ProductDetails {
                ingredients_text: text.map(String::from),
                allergens_tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let items = vec![
            item("a", Some("milk chocolate"), &[]),
            item("b", Some("apple, water"), &[]),
            item("c", None, &[]),
            item("d", None, &["en:peanuts"]),
        ];
        let profile: AllergenProfile = [("Milk", true), ("Peanuts", true)].into_iter().collect();

        let results = detect_batch(&Detector::new(), &profile, &items);
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);

        assert_eq!(results[0].report.safety, Safety::NotSafe);
        assert_eq!(results[1].report.safety, Safety::Safe);
        assert_eq!(results[2].report.safety, Safety::Unknown);
        assert!(results[3].report.detected.contains("peanuts"));

        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary, BatchSummary { safe: 1, not_safe: 2, unknown: 1 });
    }

    #[test]
    fn test_empty_batch() {
        let results = detect_batch(&Detector::new(), &AllergenProfile::new(), &[]);
        assert!(results.is_empty());
    }
}
