//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - registration, login, logout
//! - [`tickets`] - ticket CRUD
//! - [`engineers`] - engineer listing, admin edits, on-call assignment
//! - [`audit_log`] - stored audit entries (admin only)

pub mod audit_log;
pub mod auth;
pub mod engineers;
pub mod health;
pub mod tickets;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

// Audit logger names, one per functional area
pub const AUTH_LOGGER: &str = "auth";
pub const TICKETS_LOGGER: &str = "tickets";
pub const ONCALL_LOGGER: &str = "oncall";

// Lifecycle notice messages recorded in the audit trail
pub const REGISTRATION_SUCCESSFUL: &str = "Registration was successful.";
pub const REGISTRATION_UNSUCCESSFUL: &str = "Registration was unsuccessful.";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";
pub const INVALID_FORM: &str = "Invalid form.";
pub const LOGGED_IN: &str = "You are now logged in.";
pub const LOGGED_OUT: &str = "You are now logged out.";
pub const TICKET_MISSING: &str = "Ticket does not exist.";
