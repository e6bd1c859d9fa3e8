//! # Slotbook API
//!
//! The API crate provides the web server for the slot-booking engine. It
//! exposes slot creation, claim/cancel and the owner/claimant views for each
//! booking domain under `/api/{domain}`.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into `SlotBook` calls
//! - **Middleware**: Error mapping
//! - **Config**: Environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx-backed stores.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use slotbook_core::{
    SlotBook, SystemClock,
    models::slot::SlotDomain,
};
use slotbook_db::repositories::{PgPartyResolver, PgSlotStore};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state: one slot book per booking domain.
pub struct ApiState {
    pub appointments: SlotBook,
    pub reservations: SlotBook,
}

impl ApiState {
    pub fn book(&self, domain: SlotDomain) -> &SlotBook {
        match domain {
            SlotDomain::Appointments => &self.appointments,
            SlotDomain::Reservations => &self.reservations,
        }
    }
}

/// Wires PostgreSQL stores, the party resolver and the system clock together.
pub fn build_state(config: &config::ApiConfig, db_pool: PgPool) -> Arc<ApiState> {
    let resolver = Arc::new(PgPartyResolver::new(db_pool.clone(), config.parties.clone()));
    let clock = Arc::new(SystemClock);
    let book = |domain| {
        SlotBook::new(
            domain,
            Arc::new(PgSlotStore::new(db_pool.clone(), domain)),
            resolver.clone(),
            clock.clone(),
            config.policy,
        )
    };

    Arc::new(ApiState {
        appointments: book(SlotDomain::Appointments),
        reservations: book(SlotDomain::Reservations),
    })
}

/// Builds the application router with all routes attached to `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot creation, lookup, claim and cancel
        .merge(routes::slots::routes())
        // Owner and claimant views
        .merge(routes::parties::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = build_state(&config, db_pool);
    let app = router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<axum::http::HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins);

        app.layer(cors)
    } else {
        app
    };

    // Request tracing and timeout
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(config.request_timeout),
            )),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
