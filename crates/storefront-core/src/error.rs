//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                     │
//! │  ├── CoreError        - Catalog failures                                │
//! │  └── ValidationError  - One failed form constraint                      │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                  │
//! │  └── DbError          - Storage operation failures                      │
//! │                                                                         │
//! │  ValidationError never leaves the form engine: it is rendered into     │
//! │  the field-keyed `errors` map and a boolean result.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, product ID)
//! 3. Errors are enum variants, never String
//! 4. Each validation variant renders as a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Catalog and domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The embedded catalog data could not be decoded.
    ///
    /// ## When This Occurs
    /// - `data/products.json` was edited into an invalid shape
    #[error("Invalid catalog data: {0}")]
    InvalidCatalog(#[from] serde_json::Error),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single failed form constraint.
///
/// The `Display` output is the default human-readable message shown next to
/// the field when the schema does not supply its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing, null, or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value has the wrong JSON type.
    #[error("{field} must be {expected}, received {received}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        received: &'static str,
    },

    /// String is too short (counted in characters).
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// String is too long (counted in characters).
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Array has too few elements.
    #[error("{field} must contain at least {min} items")]
    TooFewItems { field: String, min: usize },

    /// Array has too many elements.
    #[error("{field} must contain at most {max} items")]
    TooManyItems { field: String, max: usize },

    /// Number is below the allowed minimum.
    #[error("{field} must be at least {min}")]
    TooSmall { field: String, min: f64 },

    /// Number is above the allowed maximum.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: f64 },

    /// Invalid format (e.g., invalid email, invalid UUID, pattern mismatch).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Returns the name of the field this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::TooFewItems { field, .. }
            | ValidationError::TooManyItems { field, .. }
            | ValidationError::TooSmall { field, .. }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("prod-999".to_string());
        assert_eq!(err.to_string(), "Product not found: prod-999");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "name".to_string(),
            min: 3,
        };
        assert_eq!(err.to_string(), "name must be at least 3 characters");

        let err = ValidationError::TypeMismatch {
            field: "age".to_string(),
            expected: "a number",
            received: "string",
        };
        assert_eq!(err.to_string(), "age must be a number, received string");
    }

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::TooLarge {
            field: "quantity".to_string(),
            max: 10.0,
        };
        assert_eq!(err.field(), "quantity");
        assert_eq!(err.to_string(), "quantity must be at most 10");
    }

    #[test]
    fn test_catalog_error_from_json() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::InvalidCatalog(_)));
    }
}
