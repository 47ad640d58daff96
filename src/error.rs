//! Error handling module for printquote
//!
//! The resolver itself never fails; these errors belong to the layers around
//! it: parsing and validating catalog documents, tracking product loads, and gating price
//! requests.

use thiserror::Error;

/// Main error type for printquote
#[derive(Error, Debug)]
pub enum QuoteError {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A delivered catalog does not fit the load it answers
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Requested product code is not in the catalog
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// A catalog arrived for a load that has since been superseded
    #[error("Stale catalog for '{product}' (load #{ticket}, current #{current})")]
    StaleCatalog {
        product: String,
        ticket: u64,
        current: u64,
    },

    /// A price request was attempted for a selection without a price
    #[error("No price for the selected combination: {0}")]
    NotPriceable(String),

    /// Catalog document failed validation
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for printquote operations
pub type Result<T> = std::result::Result<T, QuoteError>;

// Convenient error constructors
impl QuoteError {
    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create an unknown-product error
    pub fn unknown_product(code: impl Into<String>) -> Self {
        Self::UnknownProduct(code.into())
    }

    /// Create a not-priceable error
    pub fn not_priceable(selection: impl Into<String>) -> Self {
        Self::NotPriceable(selection.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuoteError::unknown_product("poster");
        assert_eq!(err.to_string(), "Unknown product: poster");

        let err = QuoteError::validation("duplicate product code");
        assert_eq!(err.to_string(), "Validation error: duplicate product code");

        let err = QuoteError::StaleCatalog {
            product: "flyer".to_string(),
            ticket: 1,
            current: 2,
        };
        assert_eq!(err.to_string(), "Stale catalog for 'flyer' (load #1, current #2)");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: QuoteError = json_err.into();
        assert!(matches!(err, QuoteError::Json(_)));
    }
}
