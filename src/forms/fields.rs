//! Shared field-processing helpers for the form orchestrators

use super::outcome::{FormResult, invalid_field_error, required_error};
use super::sanitize::FieldSanitizer;
use crate::utils::validation::too_long_error;

/// Trimmed submitted value; blank and missing are the same thing
pub(super) fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Required free-text field: presence, length, then the sanitizer pipeline.
/// Returns the escaped value when the field passed every check.
pub(super) fn text_field(
    form: &mut FormResult,
    field: &str,
    raw: &Option<String>,
    max_len: usize,
    sanitizer: &FieldSanitizer<'_>,
) -> Option<String> {
    let Some(value) = trimmed(raw) else {
        form.reject(field, "", required_error());
        return None;
    };

    let len = value.chars().count();
    if len > max_len {
        form.reject(field, value, too_long_error(field, len, max_len));
        return None;
    }

    let out = sanitizer.sanitize_field(&value);
    if out.rejected {
        form.reject(field, out.value, invalid_field_error(field));
        return None;
    }

    form.accept(field, out.value.clone());
    Some(out.value)
}

/// Required plain field: presence and length only, no escaping.
/// Used for credentials, which are never rendered back.
pub(super) fn plain_field(
    form: &mut FormResult,
    field: &str,
    raw: &Option<String>,
    max_len: usize,
) -> Option<String> {
    let Some(value) = trimmed(raw) else {
        form.reject(field, "", required_error());
        return None;
    };

    let len = value.chars().count();
    if len > max_len {
        form.reject(field, value, too_long_error(field, len, max_len));
        return None;
    }

    form.accept(field, value.clone());
    Some(value)
}

/// Required choice field
pub(super) fn choice_field<T>(
    form: &mut FormResult,
    field: &str,
    raw: &Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let Some(value) = trimmed(raw) else {
        form.reject(field, "", required_error());
        return None;
    };

    match parse(&value) {
        Some(parsed) => {
            form.accept(field, value);
            Some(parsed)
        }
        None => {
            form.reject(field, value, "Select a valid choice.");
            None
        }
    }
}
