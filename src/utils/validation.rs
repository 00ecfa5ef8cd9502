//! Input validation limits
//!
//! Centralized text length constants shared by the form orchestrators.
//! Limits mirror the column widths of the persisted models.

/// Ticket title (also the unique key of a ticket)
pub const MAX_TITLE_LEN: usize = 300;

/// Ticket description
pub const MAX_DESCRIPTION_LEN: usize = 300;

/// First / last names
pub const MAX_NAME_LEN: usize = 150;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 150;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Error message for a value exceeding its length limit
pub fn too_long_error(field: &str, len: usize, max_len: usize) -> String {
    format!("{field} is too long ({len} chars, max {max_len})")
}
