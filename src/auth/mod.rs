//! Authentication
//!
//! JWT-based authentication: token service, middleware and the
//! [`CurrentUser`] request context.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
