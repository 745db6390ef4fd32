//! # Form State
//!
//! Per-form container of values, field errors and the submitted flag, bound
//! to one immutable [`Schema`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   new / with_config ──► values = initial, errors = {}                   │
//! │          │                   (Auto: validate() once)                    │
//! │          ▼                                                              │
//! │   set_value / set_values / update_values                                │
//! │          │   changed? ──► ValueChanged ──► (Auto: validate())           │
//! │          ▼                                                              │
//! │   validate()        ──► errors rebuilt from scratch ──► Validated       │
//! │   validate_field(f) ──► only errors[f] touched                          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   mark_as_submitted ──► Submitted                                       │
//! │   reset             ──► values = initial copy, errors = {} ──► Reset    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use std::fmt;

use super::schema::{FieldErrors, FormValues, Schema};

/// Fallback when a failure carries no issue at all.
const GENERIC_FIELD_MESSAGE: &str = "Invalid value";

// =============================================================================
// Configuration & Events
// =============================================================================

/// When validation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Only when the caller asks.
    #[default]
    Manual,
    /// After every detected value change, at construction and after reset.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormConfig {
    pub mode: ValidationMode,
}

impl FormConfig {
    pub fn auto() -> Self {
        FormConfig {
            mode: ValidationMode::Auto,
        }
    }
}

/// Notifications delivered to subscribers, synchronously and in order.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    ValueChanged { field: String },
    Validated { valid: bool },
    ErrorsChanged { errors: FieldErrors },
    Submitted,
    Reset,
}

/// Handle returned by [`FormState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&FormEvent)>;

// =============================================================================
// Form State
// =============================================================================

/// Values and errors of one form instance.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use storefront_core::validation::{form_values, FieldSchema, FormState, ObjectSchema};
///
/// let schema = ObjectSchema::new().field(FieldSchema::string("email").required().email());
/// let mut form = FormState::new(schema, form_values(json!({"email": ""})));
///
/// assert!(!form.validate());
/// assert_eq!(form.field_error("email"), Some("email is required"));
///
/// form.set_value("email", "ada@example.com");
/// assert!(form.validate_field("email"));
/// assert!(form.is_valid());
/// ```
pub struct FormState<S: Schema> {
    schema: S,
    initial: FormValues,
    values: FormValues,
    errors: FieldErrors,
    submitted: bool,
    mode: ValidationMode,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: Schema> FormState<S> {
    /// Creates a form in `Manual` mode. Nothing is validated yet.
    pub fn new(schema: S, initial: FormValues) -> Self {
        Self::with_config(schema, initial, FormConfig::default())
    }

    pub fn with_config(schema: S, initial: FormValues, config: FormConfig) -> Self {
        let mut form = FormState {
            schema,
            values: initial.clone(),
            initial,
            errors: FieldErrors::new(),
            submitted: false,
            mode: config.mode,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        if form.mode == ValidationMode::Auto {
            form.validate();
        }
        form
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    // =========================================================================
    // Value Edits
    // =========================================================================

    /// Sets one value. Returns whether anything changed.
    pub fn set_value(&mut self, field: impl Into<String>, value: impl Into<Value>) -> bool {
        self.set_values([(field.into(), value.into())])
    }

    /// Sets several values with a single revalidation. Returns whether
    /// anything changed.
    pub fn set_values<I, K, V>(&mut self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.update_values(|values| {
            for (field, value) in pairs {
                values.insert(field.into(), value.into());
            }
        })
    }

    /// Applies an arbitrary edit to the value map.
    ///
    /// A change is detected by comparing the map before and after; each field
    /// whose value differs (including added and removed ones) gets a
    /// `ValueChanged` event. No-op edits emit nothing.
    pub fn update_values(&mut self, edit: impl FnOnce(&mut FormValues)) -> bool {
        let before = self.values.clone();
        edit(&mut self.values);

        let mut changed: Vec<String> = self
            .values
            .iter()
            .filter(|(field, value)| before.get(*field) != Some(*value))
            .map(|(field, _)| field.clone())
            .collect();
        changed.extend(
            before
                .keys()
                .filter(|field| !self.values.contains_key(*field))
                .cloned(),
        );

        if changed.is_empty() {
            return false;
        }

        for field in changed {
            self.emit(FormEvent::ValueChanged { field });
        }
        if self.mode == ValidationMode::Auto {
            self.validate();
        }
        true
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validates every field and rebuilds the error map from scratch.
    pub fn validate(&mut self) -> bool {
        let result = self.schema.validate(&self.values);
        let errors = match &result {
            Ok(()) => FieldErrors::new(),
            Err(failure) => failure.field_errors(),
        };
        self.replace_errors(errors);

        let valid = result.is_ok();
        self.emit(FormEvent::Validated { valid });
        valid
    }

    /// Validates one field, touching only its own error entry.
    ///
    /// Returns `false` without side effects for a field the schema does not
    /// declare.
    pub fn validate_field(&mut self, field: &str) -> bool {
        let Some(result) = self.schema.validate_field(field, self.values.get(field)) else {
            return false;
        };

        match result {
            Ok(()) => {
                if self.errors.shift_remove(field).is_some() {
                    self.emit_errors();
                }
                true
            }
            Err(failure) => {
                let message = failure
                    .first_message()
                    .unwrap_or(GENERIC_FIELD_MESSAGE)
                    .to_string();
                if self.errors.get(field) != Some(&message) {
                    self.errors.insert(field.to_string(), message);
                    self.emit_errors();
                }
                false
            }
        }
    }

    /// No recorded errors and the current values pass the schema.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.schema.validate(&self.values).is_ok()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has_field_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Drops every error entry without validating.
    pub fn clear_errors(&mut self) {
        self.replace_errors(FieldErrors::new());
    }

    /// Drops one error entry without validating. Returns whether it existed.
    pub fn clear_field_error(&mut self, field: &str) -> bool {
        let removed = self.errors.shift_remove(field).is_some();
        if removed {
            self.emit_errors();
        }
        removed
    }

    // =========================================================================
    // Submission & Reset
    // =========================================================================

    pub fn mark_as_submitted(&mut self) {
        self.submitted = true;
        self.emit(FormEvent::Submitted);
    }

    pub fn has_been_submitted(&self) -> bool {
        self.submitted
    }

    /// Restores a fresh copy of the initial values and clears errors and the
    /// submitted flag.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.submitted = false;
        self.replace_errors(FieldErrors::new());
        self.emit(FormEvent::Reset);

        if self.mode == ValidationMode::Auto {
            self.validate();
        }
    }

    // =========================================================================
    // Observers
    // =========================================================================

    pub fn subscribe(&mut self, listener: impl FnMut(&FormEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn replace_errors(&mut self, errors: FieldErrors) {
        if self.errors != errors {
            self.errors = errors;
            self.emit_errors();
        }
    }

    fn emit_errors(&mut self) {
        let errors = self.errors.clone();
        self.emit(FormEvent::ErrorsChanged { errors });
    }

    fn emit(&mut self, event: FormEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl<S: Schema + fmt::Debug> fmt::Debug for FormState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("schema", &self.schema)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("submitted", &self.submitted)
            .field("mode", &self.mode)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{form_values, FieldSchema, ObjectSchema};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn contact_schema() -> ObjectSchema {
        ObjectSchema::new()
            .field(FieldSchema::string("name").required().min_length(2))
            .field(
                FieldSchema::string("email")
                    .required()
                    .email()
                    .message("Enter a valid email address"),
            )
            .field(
                FieldSchema::object(
                    "address",
                    ObjectSchema::new().field(FieldSchema::string("city").required()),
                )
                .required(),
            )
    }

    fn valid_initial() -> FormValues {
        form_values(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "address": {"city": "London"}
        }))
    }

    fn invalid_initial() -> FormValues {
        form_values(json!({
            "name": "",
            "email": "nope",
            "address": {"city": ""}
        }))
    }

    fn record(form: &mut FormState<ObjectSchema>) -> Rc<RefCell<Vec<FormEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        form.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_valid_values_pass() {
        let mut form = FormState::new(contact_schema(), valid_initial());
        assert!(form.validate());
        assert!(form.errors().is_empty());
        assert!(form.is_valid());
    }

    #[test]
    fn test_one_error_per_offending_field() {
        let mut form = FormState::new(contact_schema(), invalid_initial());
        assert!(!form.validate());

        let keys: Vec<&str> = form.errors().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "email", "address"]);
        assert_eq!(form.field_error("name"), Some("name is required"));
        assert_eq!(form.field_error("email"), Some("Enter a valid email address"));
        assert_eq!(form.field_error("address"), Some("city is required"));
        assert!(!form.is_valid());
    }

    #[test]
    fn test_validate_replaces_errors() {
        let mut form = FormState::new(contact_schema(), valid_initial());
        form.set_value("email", "broken");
        assert!(!form.validate());
        assert!(form.has_field_error("email"));

        form.set_values([("email", json!("ada@example.com")), ("name", json!("A"))]);
        assert!(!form.validate());
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.field_error("name"), Some("name must be at least 2 characters"));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut form = FormState::new(contact_schema(), invalid_initial());
        form.validate();
        let first = form.errors().clone();
        form.validate();
        assert_eq!(form.errors(), &first);
    }

    #[test]
    fn test_validate_field_touches_only_that_field() {
        let mut form = FormState::new(contact_schema(), invalid_initial());
        form.validate();

        form.set_value("email", "ada@example.com");
        assert!(form.validate_field("email"));
        assert!(!form.has_field_error("email"));
        assert!(form.has_field_error("name"));
        assert!(form.has_field_error("address"));

        form.set_value("email", "still broken");
        form.clear_errors();
        assert!(!form.validate_field("email"));
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.field_error("email"), Some("Enter a valid email address"));
    }

    #[test]
    fn test_validate_unknown_field() {
        let mut form = FormState::new(contact_schema(), invalid_initial());
        let events = record(&mut form);

        assert!(!form.validate_field("coupon"));
        assert!(form.errors().is_empty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_is_valid_checks_values_even_without_errors() {
        let form = FormState::new(contact_schema(), invalid_initial());
        assert!(form.errors().is_empty());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let mut form = FormState::new(contact_schema(), invalid_initial());
        form.validate();
        let initial_errors = form.errors().clone();

        form.update_values(|values| {
            values.insert("name".to_string(), json!("Grace"));
            if let Some(Value::Object(address)) = values.get_mut("address") {
                address.insert("city".to_string(), json!("Paris"));
            }
        });
        form.mark_as_submitted();

        form.reset();
        assert_eq!(form.values(), &invalid_initial());
        assert!(form.errors().is_empty());
        assert!(!form.has_been_submitted());

        form.validate();
        assert_eq!(form.errors(), &initial_errors);
    }

    #[test]
    fn test_clear_field_error() {
        let mut form = FormState::new(contact_schema(), invalid_initial());
        form.validate();

        assert!(form.clear_field_error("email"));
        assert!(!form.clear_field_error("email"));
        assert_eq!(form.errors().len(), 2);

        form.clear_errors();
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_submitted_flag() {
        let mut form = FormState::new(contact_schema(), valid_initial());
        assert!(!form.has_been_submitted());
        form.mark_as_submitted();
        assert!(form.has_been_submitted());
        form.validate();
        assert!(form.has_been_submitted());
    }

    #[test]
    fn test_noop_edits_are_not_changes() {
        let mut form = FormState::new(contact_schema(), valid_initial());
        let events = record(&mut form);

        assert!(!form.set_value("name", "Ada"));
        assert!(!form.update_values(|_| {}));
        assert!(events.borrow().is_empty());

        assert!(form.set_value("name", "Grace"));
        assert_eq!(
            *events.borrow(),
            vec![FormEvent::ValueChanged {
                field: "name".to_string()
            }]
        );
    }

    #[test]
    fn test_removed_field_counts_as_change() {
        let mut form = FormState::new(contact_schema(), valid_initial());
        let events = record(&mut form);

        assert!(form.update_values(|values| {
            values.shift_remove("email");
        }));
        assert_eq!(
            *events.borrow(),
            vec![FormEvent::ValueChanged {
                field: "email".to_string()
            }]
        );
    }

    #[test]
    fn test_auto_mode_revalidates() {
        let mut form =
            FormState::with_config(contact_schema(), invalid_initial(), FormConfig::auto());
        assert_eq!(form.mode(), ValidationMode::Auto);
        assert_eq!(form.errors().len(), 3);

        form.set_values([
            ("name", json!("Ada")),
            ("email", json!("ada@example.com")),
            ("address", json!({"city": "London"})),
        ]);
        assert!(form.errors().is_empty());
        assert!(form.is_valid());

        form.reset();
        assert_eq!(form.errors().len(), 3);
    }

    #[test]
    fn test_manual_mode_does_not_validate_on_change() {
        let mut form = FormState::new(contact_schema(), valid_initial());
        form.set_value("email", "broken");
        assert!(form.errors().is_empty());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_event_sequence() {
        let mut form = FormState::new(contact_schema(), valid_initial());
        let events = record(&mut form);

        form.set_value("name", "");
        form.validate();
        form.mark_as_submitted();
        form.reset();

        let errors = FieldErrors::from([("name".to_string(), "name is required".to_string())]);
        assert_eq!(
            *events.borrow(),
            vec![
                FormEvent::ValueChanged {
                    field: "name".to_string()
                },
                FormEvent::ErrorsChanged { errors },
                FormEvent::Validated { valid: false },
                FormEvent::Submitted,
                FormEvent::ErrorsChanged {
                    errors: FieldErrors::new()
                },
                FormEvent::Reset,
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut form = FormState::new(contact_schema(), valid_initial());
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = form.subscribe(move |_| *sink.borrow_mut() += 1);

        form.mark_as_submitted();
        assert!(form.unsubscribe(id));
        assert!(!form.unsubscribe(id));
        form.mark_as_submitted();

        assert_eq!(*count.borrow(), 1);
    }
}
