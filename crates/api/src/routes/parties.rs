use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/:domain/owners/:kind/:id/slots",
            get(handlers::parties::owner_slots),
        )
        .route(
            "/api/:domain/owners/:kind/:id/slots/at",
            get(handlers::parties::owner_slot_at),
        )
        .route(
            "/api/:domain/claimants/:kind/:id/slots",
            get(handlers::parties::claimant_slots),
        )
}
