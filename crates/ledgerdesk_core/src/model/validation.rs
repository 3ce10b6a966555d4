//! Field-level validation primitives shared by all record types.
//!
//! # Responsibility
//! - Collect validation failures keyed by field name.
//! - Provide the small set of text checks used by dashboard forms.
//!
//! # Invariants
//! - A field key is present only when it carries at least one message.
//! - Field keys are ordered, so rendered error lists are deterministic.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/?#]+\.[^\s/?#]+(?:[/?#]\S*)?$").expect("valid url regex")
});

/// Validation messages grouped by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an error set holding a single message.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Appends one message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns messages for one field, if any were recorded.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names with at least one message, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Converts into `Err(ValidationError)` when any message was recorded.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self))
        }
    }
}

/// Record-level validation failure carrying per-field messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub FieldErrors);

impl ValidationError {
    pub fn field_errors(&self) -> &FieldErrors {
        &self.0
    }

    pub fn into_field_errors(self) -> FieldErrors {
        self.0
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self.0.fields().collect::<Vec<_>>().join(", ");
        write!(f, "invalid fields: {fields}")
    }
}

impl Error for ValidationError {}

/// Checks a required text field and its length bounds in characters.
///
/// Blank input only reports `missing_message`; length checks run on the
/// trimmed value.
pub fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
    missing_message: &str,
    min_chars: usize,
    max_chars: usize,
) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, missing_message);
        return;
    }
    let count = trimmed.chars().count();
    if count < min_chars {
        errors.add(
            field,
            format!("{label} must contain at least {min_chars} characters."),
        );
    }
    if count > max_chars {
        errors.add(
            field,
            format!("{label} must contain at most {max_chars} characters."),
        );
    }
}

pub fn check_email(errors: &mut FieldErrors, field: &str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "Please enter an email.");
    } else if !is_valid_email(trimmed) {
        errors.add(field, "Invalid email address.");
    }
}

pub fn check_url(errors: &mut FieldErrors, field: &str, value: &str, missing_message: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, missing_message);
    } else if !is_valid_url(trimmed) {
        errors.add(field, "Invalid URL.");
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_url(value: &str) -> bool {
    URL_RE.is_match(value)
}
