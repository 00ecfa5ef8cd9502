//! On-call assignment form

use super::fields::trimmed;
use super::outcome::{FormResult, Validated, required_error};

/// Raw on-call assignment submission
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OnCallPayload {
    pub engineer_id: Option<String>,
}

/// Presence check only. The id is resolved against the database by the
/// repository, so an unknown engineer surfaces as not-found rather than a
/// form rejection.
pub fn validate_on_call(payload: &OnCallPayload) -> Validated<String> {
    let mut form = FormResult::new();

    match trimmed(&payload.engineer_id) {
        Some(id) => {
            form.accept("engineer_id", id.clone());
            Validated::Accepted(id)
        }
        None => {
            form.reject("engineer_id", "", required_error());
            Validated::Rejected(form)
        }
    }
}
