//! Ticket API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/tickets | GET | token |
//! | /api/tickets/mine | GET | token |
//! | /api/tickets/{id} | GET | token |
//! | /api/tickets | POST | token |
//! | /api/tickets/{id} | PUT | token |
//! | /api/tickets/{id} | DELETE | admin |

pub mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tickets", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/mine", get(handler::mine))
        .route("/{id}", get(handler::get_by_id));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update));

    let admin_routes = Router::new()
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(write_routes).merge(admin_routes)
}
