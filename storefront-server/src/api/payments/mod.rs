//! Payment API module
//!
//! The gateway webhook is public; its authenticity comes from the
//! notification signature, not a bearer token.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/payments/notification", post(handler::notification))
        .route("/api/payments/finish", get(handler::finish))
}
