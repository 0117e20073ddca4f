//! Error types for the allergen crate.
//!
//! Detection itself never fails; these cover profile editing and parsing of
//! documents handed in by the surrounding application.

use thiserror::Error;

/// Result type alias for allergen operations.
pub type Result<T> = std::result::Result<T, AllergenError>;

/// Errors that can occur outside the detection pipeline.
#[derive(Debug, Error)]
pub enum AllergenError {
    /// Custom allergen name was blank
    #[error("Allergen name must not be empty")]
    EmptyAllergenName,

    /// Allergen already present in the profile
    #[error("Allergen already exists in profile: {0}")]
    DuplicateAllergen(String),

    /// Allergen not present in the profile
    #[error("Allergen not found in profile: {0}")]
    UnknownAllergen(String),

    /// Product document had no usable payload
    #[error("Invalid product document: {0}")]
    InvalidProduct(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error code for integration with foodshare-core error handling.
/// Range: 11xxx for allergen errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllergenErrorCode {
    /// Custom allergen name was blank
    EmptyAllergenName = 11001,
    /// Allergen already present
    DuplicateAllergen = 11002,
    /// Allergen not present
    UnknownAllergen = 11003,
    /// Product document had no usable payload
    InvalidProduct = 11004,
    /// JSON parsing error
    JsonParsing = 11005,
}

impl AllergenError {
    /// Returns the error code for this error.
    pub fn code(&self) -> AllergenErrorCode {
        match self {
            AllergenError::EmptyAllergenName => AllergenErrorCode::EmptyAllergenName,
            AllergenError::DuplicateAllergen(_) => AllergenErrorCode::DuplicateAllergen,
            AllergenError::UnknownAllergen(_) => AllergenErrorCode::UnknownAllergen,
            AllergenError::InvalidProduct(_) => AllergenErrorCode::InvalidProduct,
            AllergenError::Json(_) => AllergenErrorCode::JsonParsing,
        }
    }
}

impl From<AllergenError> for foodshare_core::Error {
    fn from(err: AllergenError) -> Self {
        use foodshare_core::ErrorCode;

        let code = match err.code() {
            AllergenErrorCode::EmptyAllergenName | AllergenErrorCode::DuplicateAllergen => {
                ErrorCode::InvalidInput
            }
            AllergenErrorCode::UnknownAllergen => ErrorCode::ValidationError,
            AllergenErrorCode::InvalidProduct => ErrorCode::ProductParseError,
            AllergenErrorCode::JsonParsing => ErrorCode::InputError,
        };
        let message = format!("{} (code {})", err, err.code() as u32);
        foodshare_core::Error::new(code, message).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AllergenError::EmptyAllergenName.code() as u32, 11001);
        assert_eq!(
            AllergenError::InvalidProduct("no product".into()).code(),
            AllergenErrorCode::InvalidProduct
        );
    }

    #[test]
    fn test_into_core_error() {
        let core: foodshare_core::Error = AllergenError::DuplicateAllergen("Milk".into()).into();
        assert_eq!(core.code, foodshare_core::ErrorCode::InvalidInput);
        assert!(core.message.contains("Milk"));
        assert!(core.message.contains("11002"));
    }
}
