//! Core utilities for Foodshare allergen tools
//!
//! This crate provides shared functionality used by the allergen detection
//! library and its command-line front end:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use foodshare_core::config::{Config, Strictness};
//!
//! let config = Config::load(None).expect("invalid configuration");
//! if config.schema.detection.strictness == Strictness::Fuzzy {
//!     println!("fuzzy threshold: {}", config.schema.detection.fuzzy_threshold);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, DetectionConfig, ScorerKind, Strictness};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
