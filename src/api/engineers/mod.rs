//! Engineer API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/engineers | GET | token |
//! | /api/engineers/on-call | GET | token |
//! | /api/engineers/on-call | POST | token |
//! | /api/engineers/{id} | PUT | admin |

pub mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/engineers", routes())
}

fn routes() -> Router<ServerState> {
    let common_routes = Router::new()
        .route("/", get(handler::list))
        .route("/on-call", get(handler::on_call).post(handler::set_on_call));

    let admin_routes = Router::new()
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_admin));

    common_routes.merge(admin_routes)
}
