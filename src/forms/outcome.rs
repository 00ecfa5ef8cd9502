//! Form outcome types
//!
//! A submitted form never short-circuits: every checked field is processed
//! and its result recorded, so a rejected submission reports everything that
//! was wrong at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome for a single form field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldOutcome {
    /// The processed value (escaped for text fields)
    pub value: String,
    pub rejected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Accumulated result of validating a whole form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormResult {
    pub accepted: bool,
    /// Per-field outcomes, keyed by field name
    pub outcomes: BTreeMap<String, FieldOutcome>,
}

impl FormResult {
    pub fn new() -> Self {
        Self {
            accepted: true,
            outcomes: BTreeMap::new(),
        }
    }

    /// Record a field that passed all checks
    pub fn accept(&mut self, field: &str, value: impl Into<String>) {
        self.outcomes.insert(
            field.to_string(),
            FieldOutcome {
                value: value.into(),
                rejected: false,
                error: None,
            },
        );
    }

    /// Record a rejected field; the whole form becomes rejected
    pub fn reject(&mut self, field: &str, value: impl Into<String>, error: impl Into<String>) {
        self.accepted = false;
        self.outcomes.insert(
            field.to_string(),
            FieldOutcome {
                value: value.into(),
                rejected: true,
                error: Some(error.into()),
            },
        );
    }

    /// Processed value of a field, if it was recorded
    pub fn value(&self, field: &str) -> Option<&str> {
        self.outcomes.get(field).map(|o| o.value.as_str())
    }
}

/// Result of a form orchestrator: either the typed, cleaned payload or the
/// field-by-field rejection report.
#[derive(Debug)]
pub enum Validated<T> {
    Accepted(T),
    Rejected(FormResult),
}

/// Error message for a field rejected by a security check.
/// Underscores in the field name are shown as spaces.
pub fn invalid_field_error(field: &str) -> String {
    format!("Invalid {}", field.replace('_', " "))
}

/// Error message for a missing required field
pub fn required_error() -> String {
    "This field is required.".to_string()
}
