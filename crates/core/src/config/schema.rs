//! Configuration schema definitions
//!
//! Every section is optional in the TOML file; missing keys fall back to the
//! defaults below.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Ingredient matching settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Allergen profile seeding
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.detection.validate()
    }
}

/// How aggressively ingredient terms are matched against allergen names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Allergen must appear as whole words inside an ingredient phrase
    WordBoundary,
    /// Allergen must be a substring of an ingredient term
    Substring,
    /// Substring first, then approximate similarity as a fallback
    #[default]
    Fuzzy,
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WordBoundary => "word_boundary",
            Self::Substring => "substring",
            Self::Fuzzy => "fuzzy",
        })
    }
}

/// Similarity metric used by the fuzzy tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Edit distance divided by the longer length
    #[default]
    Levenshtein,
    /// Inverted Jaro-Winkler similarity
    JaroWinkler,
}

/// Detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Matching strictness for the ingredient path
    #[serde(default)]
    pub strictness: Strictness,

    /// Highest similarity score (0 = identical, 1 = unrelated) that still counts as a match
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,

    /// Similarity metric
    #[serde(default)]
    pub scorer: ScorerKind,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            fuzzy_threshold: default_fuzzy_threshold(),
            scorer: ScorerKind::default(),
        }
    }
}

impl DetectionConfig {
    /// Reject thresholds outside the score range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(Error::invalid_config_value(
                "detection.fuzzy_threshold",
                format!("{} is outside 0.0..=1.0", self.fuzzy_threshold),
            ));
        }
        Ok(())
    }
}

fn default_fuzzy_threshold() -> f64 {
    0.3
}

/// Profile seeding used when no profile document is supplied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Start from the built-in allergen list
    #[serde(default = "default_true")]
    pub use_defaults: bool,

    /// Allergen names to mark as selected
    #[serde(default)]
    pub selected: Vec<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            selected: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.detection.strictness, Strictness::Fuzzy);
        assert!((schema.detection.fuzzy_threshold - 0.3).abs() < f64::EPSILON);
        assert!(schema.profile.use_defaults);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [detection]
            strictness = "word_boundary"

            [profile]
            selected = ["Milk", "Peanuts"]
            "#,
        )
        .unwrap();

        assert_eq!(schema.detection.strictness, Strictness::WordBoundary);
        assert_eq!(schema.detection.scorer, ScorerKind::Levenshtein);
        assert_eq!(schema.profile.selected, vec!["Milk", "Peanuts"]);
        assert!(schema.profile.use_defaults);
        assert_eq!(schema.logging.level, "warn");
    }

    #[test]
    fn test_threshold_out_of_range() {
        let schema: ConfigSchema = toml::from_str("[detection]\nfuzzy_threshold = 1.5").unwrap();
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_unknown_strictness_rejected() {
        let parsed: std::result::Result<ConfigSchema, _> =
            toml::from_str("[detection]\nstrictness = \"loose\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_strictness_display_matches_serde() {
        for strictness in [Strictness::WordBoundary, Strictness::Substring, Strictness::Fuzzy] {
            let json = serde_json::to_string(&strictness).unwrap();
            assert_eq!(json.trim_matches('"'), strictness.to_string());
        }
    }
}
