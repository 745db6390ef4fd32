//! # Declarative Schemas
//!
//! Field-constraint descriptions checked against [`FormValues`].
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each declared field, in declaration order:                         │
//! │                                                                         │
//! │   missing / null ──► required? ──► Required issue, stop                 │
//! │        │                  └──────► skip field                           │
//! │        ▼                                                                │
//! │   blank string + required ──► Required issue, stop                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   JSON type check ──► TypeMismatch issue, stop                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   constraints, in the order they were declared                          │
//! │   (arrays and objects recurse with an extended path)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keys present in the values but not declared in the schema are ignored.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;

use crate::error::ValidationError;

/// Form values keyed by field name, in insertion order.
pub type FormValues = IndexMap<String, Value>;

/// One human-readable message per top-level field.
pub type FieldErrors = IndexMap<String, String>;

// =============================================================================
// Schema Trait
// =============================================================================

/// Anything able to validate a whole form and a single named field.
pub trait Schema {
    /// Validates every declared field.
    fn validate(&self, values: &FormValues) -> Result<(), ValidationFailure>;

    /// Validates a single field. `None` when the schema has no such field.
    fn validate_field(
        &self,
        name: &str,
        value: Option<&Value>,
    ) -> Option<Result<(), ValidationFailure>>;
}

// =============================================================================
// Failure Types
// =============================================================================

/// One step in the path to an offending value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Location of the value, starting at the top-level field.
    pub path: Vec<PathSegment>,

    pub error: ValidationError,

    /// Message to show: the schema's custom one, or the error's `Display`.
    pub message: String,
}

impl Issue {
    /// The top-level field this issue belongs to.
    pub fn field(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Dotted rendering of the path, e.g. `address.zip` or `tags[1]`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            if let PathSegment::Key(_) = segment {
                if !out.is_empty() {
                    out.push('.');
                }
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

/// Structured result of a failed validation: every issue found, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationFailure {
    issues: Vec<Issue>,
}

impl ValidationFailure {
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Message of the first issue found.
    pub fn first_message(&self) -> Option<&str> {
        self.issues.first().map(|issue| issue.message.as_str())
    }

    /// Collapses the issues into one message per top-level field.
    ///
    /// Nested paths collapse to their first segment and the first issue seen
    /// for a field wins.
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for issue in &self.issues {
            if let Some(field) = issue.field() {
                if !errors.contains_key(field) {
                    errors.insert(field.to_string(), issue.message.clone());
                }
            }
        }
        errors
    }

    fn push(&mut self, path: &[PathSegment], error: ValidationError, message: Option<&str>) {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        self.issues.push(Issue {
            path: path.to_vec(),
            error,
            message,
        });
    }

    fn into_result(self) -> Result<(), ValidationFailure> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

// =============================================================================
// Field Types And Constraints
// =============================================================================

/// The JSON shape a field must have.
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Number,
    /// A number without a fractional part.
    Integer,
    Boolean,
    /// An array whose elements all satisfy the item schema.
    Array(Box<FieldSchema>),
    /// A nested object with its own fields.
    Object(ObjectSchema),
    /// Any JSON value; constraints apply where they fit the value's type.
    Any,
}

impl FieldType {
    fn expected(&self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Number => "a number",
            FieldType::Integer => "an integer",
            FieldType::Boolean => "a boolean",
            FieldType::Array(_) => "an array",
            FieldType::Object(_) => "an object",
            FieldType::Any => "any value",
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone)]
enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Email,
    Uuid,
    Pattern(Regex),
    OneOf(Vec<String>),
}

/// Builder step that `.message()` applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Required,
    Rule(usize),
}

#[derive(Debug, Clone)]
struct Rule {
    constraint: Constraint,
    message: Option<String>,
}

// =============================================================================
// Field Schema
// =============================================================================

/// Type and constraints of one named field.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::FieldSchema;
///
/// let email = FieldSchema::string("email")
///     .required()
///     .message("Email is required")
///     .email()
///     .message("Enter a valid email address");
/// assert_eq!(email.name(), "email");
/// ```
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: String,
    field_type: FieldType,
    required: bool,
    required_message: Option<String>,
    rules: Vec<Rule>,
    last_step: Option<Step>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldSchema {
            name: name.into(),
            field_type,
            required: false,
            required_message: None,
            rules: Vec::new(),
            last_step: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn array(name: impl Into<String>, item: FieldSchema) -> Self {
        Self::new(name, FieldType::Array(Box::new(item)))
    }

    pub fn object(name: impl Into<String>, schema: ObjectSchema) -> Self {
        Self::new(name, FieldType::Object(schema))
    }

    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Any)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Rejects missing, null and blank values.
    pub fn required(mut self) -> Self {
        self.required = true;
        self.last_step = Some(Step::Required);
        self
    }

    /// Minimum character count for strings, element count for arrays.
    pub fn min_length(self, min: usize) -> Self {
        self.rule(Constraint::MinLength(min))
    }

    /// Maximum character count for strings, element count for arrays.
    pub fn max_length(self, max: usize) -> Self {
        self.rule(Constraint::MaxLength(max))
    }

    pub fn min(self, min: f64) -> Self {
        self.rule(Constraint::Min(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.rule(Constraint::Max(max))
    }

    pub fn email(self) -> Self {
        self.rule(Constraint::Email)
    }

    pub fn uuid(self) -> Self {
        self.rule(Constraint::Uuid)
    }

    /// `pattern` must match somewhere in the string; anchor it with `^...$`
    /// for full-string matches.
    pub fn pattern(self, pattern: Regex) -> Self {
        self.rule(Constraint::Pattern(pattern))
    }

    pub fn one_of<I, S>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(Constraint::OneOf(
            allowed.into_iter().map(Into::into).collect(),
        ))
    }

    /// Overrides the message of the step declared just before it: the last
    /// rule, or `required()` if that came last. With no step declared yet it
    /// applies to the required check.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        let message = Some(message.into());
        match self.last_step {
            Some(Step::Rule(index)) => self.rules[index].message = message,
            Some(Step::Required) | None => self.required_message = message,
        }
        self
    }

    fn rule(mut self, constraint: Constraint) -> Self {
        self.last_step = Some(Step::Rule(self.rules.len()));
        self.rules.push(Rule {
            constraint,
            message: None,
        });
        self
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    fn check(&self, value: Option<&Value>, path: &mut Vec<PathSegment>, out: &mut ValidationFailure) {
        let value = match value {
            None | Some(Value::Null) => {
                if self.required {
                    self.push_required(path, out);
                }
                return;
            }
            Some(value) => value,
        };

        if self.required && is_blank(value) {
            self.push_required(path, out);
            return;
        }

        match (&self.field_type, value) {
            (FieldType::String, Value::String(s)) => self.check_string(s, path, out),
            (FieldType::Number, Value::Number(n)) => {
                self.check_number(n.as_f64().unwrap_or_default(), path, out)
            }
            (FieldType::Integer, Value::Number(n)) if is_integral(n) => {
                self.check_number(n.as_f64().unwrap_or_default(), path, out)
            }
            (FieldType::Boolean, Value::Bool(_)) => {}
            (FieldType::Array(item), Value::Array(items)) => {
                self.check_array(item, items, path, out)
            }
            (FieldType::Object(schema), Value::Object(map)) => {
                schema.check_map(map, path, out)
            }
            (FieldType::Any, value) => match value {
                Value::String(s) => self.check_string(s, path, out),
                Value::Number(n) => self.check_number(n.as_f64().unwrap_or_default(), path, out),
                _ => {}
            },
            (expected, value) => out.push(
                path,
                ValidationError::TypeMismatch {
                    field: self.name.clone(),
                    expected: expected.expected(),
                    received: json_type_name(value),
                },
                None,
            ),
        }
    }

    fn push_required(&self, path: &[PathSegment], out: &mut ValidationFailure) {
        out.push(
            path,
            ValidationError::Required {
                field: self.name.clone(),
            },
            self.required_message.as_deref(),
        );
    }

    fn check_string(&self, s: &str, path: &[PathSegment], out: &mut ValidationFailure) {
        let field = || self.name.clone();
        for rule in &self.rules {
            let error = match &rule.constraint {
                Constraint::MinLength(min) if s.chars().count() < *min => {
                    ValidationError::TooShort { field: field(), min: *min }
                }
                Constraint::MaxLength(max) if s.chars().count() > *max => {
                    ValidationError::TooLong { field: field(), max: *max }
                }
                Constraint::Email if !is_email(s) => ValidationError::InvalidFormat {
                    field: field(),
                    reason: "invalid email address".to_string(),
                },
                Constraint::Uuid if uuid::Uuid::parse_str(s).is_err() => {
                    ValidationError::InvalidFormat {
                        field: field(),
                        reason: "invalid UUID".to_string(),
                    }
                }
                Constraint::Pattern(re) if !re.is_match(s) => ValidationError::InvalidFormat {
                    field: field(),
                    reason: format!("does not match {}", re.as_str()),
                },
                Constraint::OneOf(allowed) if !allowed.iter().any(|a| a == s) => {
                    ValidationError::NotAllowed {
                        field: field(),
                        allowed: allowed.clone(),
                    }
                }
                _ => continue,
            };
            out.push(path, error, rule.message.as_deref());
        }
    }

    fn check_number(&self, n: f64, path: &[PathSegment], out: &mut ValidationFailure) {
        for rule in &self.rules {
            let error = match &rule.constraint {
                Constraint::Min(min) if n < *min => ValidationError::TooSmall {
                    field: self.name.clone(),
                    min: *min,
                },
                Constraint::Max(max) if n > *max => ValidationError::TooLarge {
                    field: self.name.clone(),
                    max: *max,
                },
                _ => continue,
            };
            out.push(path, error, rule.message.as_deref());
        }
    }

    fn check_array(
        &self,
        item: &FieldSchema,
        items: &[Value],
        path: &mut Vec<PathSegment>,
        out: &mut ValidationFailure,
    ) {
        for rule in &self.rules {
            let error = match &rule.constraint {
                Constraint::MinLength(min) if items.len() < *min => ValidationError::TooFewItems {
                    field: self.name.clone(),
                    min: *min,
                },
                Constraint::MaxLength(max) if items.len() > *max => {
                    ValidationError::TooManyItems {
                        field: self.name.clone(),
                        max: *max,
                    }
                }
                _ => continue,
            };
            out.push(path, error, rule.message.as_deref());
        }

        for (index, value) in items.iter().enumerate() {
            path.push(PathSegment::Index(index));
            item.check(Some(value), path, out);
            path.pop();
        }
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}

fn is_integral(n: &serde_json::Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

/// Pragmatic address check: `local@domain.tld`, no whitespace.
fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

// =============================================================================
// Object Schema
// =============================================================================

/// An ordered set of named fields. The usual top-level form schema.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use storefront_core::validation::{form_values, FieldSchema, ObjectSchema, Schema};
///
/// let schema = ObjectSchema::new()
///     .field(FieldSchema::string("name").required().min_length(2))
///     .field(FieldSchema::integer("quantity").min(1.0).max(10.0));
///
/// assert!(schema.validate(&form_values(json!({"name": "Ada", "quantity": 3}))).is_ok());
///
/// let failure = schema.validate(&form_values(json!({"name": "A"}))).unwrap_err();
/// assert_eq!(failure.field_errors()["name"], "name must be at least 2 characters");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<FieldSchema>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing an earlier declaration with the same name.
    pub fn field(mut self, field: FieldSchema) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn check_map(&self, map: &Map<String, Value>, path: &mut Vec<PathSegment>, out: &mut ValidationFailure) {
        for field in &self.fields {
            path.push(PathSegment::Key(field.name.clone()));
            field.check(map.get(&field.name), path, out);
            path.pop();
        }
    }
}

impl Schema for ObjectSchema {
    fn validate(&self, values: &FormValues) -> Result<(), ValidationFailure> {
        let mut out = ValidationFailure::default();
        let mut path = Vec::new();
        for field in &self.fields {
            path.push(PathSegment::Key(field.name.clone()));
            field.check(values.get(&field.name), &mut path, &mut out);
            path.pop();
        }
        out.into_result()
    }

    fn validate_field(
        &self,
        name: &str,
        value: Option<&Value>,
    ) -> Option<Result<(), ValidationFailure>> {
        let field = self.get(name)?;
        let mut out = ValidationFailure::default();
        let mut path = vec![PathSegment::Key(field.name.clone())];
        field.check(value, &mut path, &mut out);
        Some(out.into_result())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
