//! # Form Validation
//!
//! Schema-driven validation for checkout and account forms.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  schema.rs  Schema trait, ObjectSchema / FieldSchema builders,          │
//! │             Issue + ValidationFailure (structured result)               │
//! │                                                                         │
//! │  form.rs    FormState: values, field errors, submitted flag,            │
//! │             Manual / Auto validation modes, event subscriptions         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ValidationFailure` never leaves this module as an error value: the form
//! folds it into its field-keyed error map and a boolean.

mod form;
mod schema;

pub use form::{FormConfig, FormEvent, FormState, SubscriptionId, ValidationMode};
pub use schema::{
    FieldErrors, FieldSchema, FieldType, FormValues, Issue, ObjectSchema, PathSegment, Schema,
    ValidationFailure,
};

use serde_json::Value;

/// Builds form values from a JSON object. Any other JSON value yields an
/// empty map.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use storefront_core::validation::form_values;
///
/// let values = form_values(json!({"email": "ada@example.com"}));
/// assert_eq!(values["email"], "ada@example.com");
/// ```
pub fn form_values(value: Value) -> FormValues {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => FormValues::new(),
    }
}
