use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/:domain/slots", post(handlers::slots::create_slots))
        .route("/api/:domain/slots/:id", get(handlers::slots::get_slot))
        .route(
            "/api/:domain/slots/:id/claim",
            post(handlers::slots::claim_slot),
        )
        .route(
            "/api/:domain/slots/:id/cancel",
            post(handlers::slots::cancel_slot),
        )
}
