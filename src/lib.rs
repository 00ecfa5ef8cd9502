//! Ticket Server - on-call ticket tracking with injection-hardened forms
//!
//! # Overview
//!
//! Engineers register, log in and file tickets. Every free-text field
//! submitted through a form runs through a fixed sanitization pipeline
//! (SQL-keyword check, script-tag check, HTML escaping); suspected attacks
//! are recorded as WARNING entries in a persistent audit trail attributed to
//! the acting user. At most one engineer is on call at a time, enforced
//! transactionally.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/    # configuration, shared state, HTTP server
//! ├── auth/    # JWT authentication, middleware
//! ├── forms/   # field sanitizer and form orchestrators
//! ├── audit/   # audit trail (channel, worker, storage)
//! ├── api/     # HTTP routes and handlers
//! ├── db/      # embedded database, models, repositories
//! └── utils/   # errors, logging, validation limits
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod forms;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
