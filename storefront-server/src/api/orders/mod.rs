//! Order API module
//!
//! Public storefront routes (checkout, lookup, status re-check) plus the
//! admin-only management routes behind the bearer-token guard.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/orders", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/recheck", post(handler::recheck));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/stats", get(handler::stats))
        .route("/export", get(handler::export_csv))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}", delete(handler::delete_order))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    public_routes.merge(admin_routes)
}
