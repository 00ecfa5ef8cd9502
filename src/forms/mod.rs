//! Form validation
//!
//! Each endpoint that accepts user input has an orchestrator here. An
//! orchestrator runs every checked field through the
//! [`FieldSanitizer`](sanitize::FieldSanitizer) pipeline, accumulates
//! per-field outcomes, and returns either the cleaned, typed payload or the
//! full rejection report. Nothing is persisted from a rejected form.

mod fields;
pub mod on_call;
pub mod outcome;
pub mod register;
pub mod sanitize;
pub mod ticket;

pub use on_call::{OnCallPayload, validate_on_call};
pub use outcome::{FieldOutcome, FormResult, Validated, invalid_field_error, required_error};
pub use register::{
    RegisterPayload, UserEditPayload, ValidRegistration, validate_register, validate_user_edit,
};
pub use sanitize::{FieldSanitizer, SanitizedField, escape_html};
pub use ticket::{
    TicketCreatePayload, TicketEditPayload, ValidTicketCreate, ValidTicketEdit, validate_create,
    validate_edit,
};
