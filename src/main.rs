//! Booking dialog server
//!
//! Collects hospital, specialty, doctor and timeslot over a WebSocket
//! conversation and confirms the appointment.

mod api;
mod config;
mod dialog;
mod options;
mod runtime;
mod shutdown;
mod store;

use api::{create_router, AppState};
use config::ServerConfig;
use dialog::SlotChain;
use options::{HospitalDirectory, LoggingProvider};
use runtime::DialogRuntime;
use std::sync::Arc;
use store::InMemorySessionStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_dialog=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ServerConfig::from_env();

    // Option lookups go through the logging wrapper
    let provider = Arc::new(LoggingProvider::new(Arc::new(HospitalDirectory::new())));
    let chain = SlotChain::appointment(provider)?;
    tracing::info!(slots = ?chain.names().collect::<Vec<_>>(), "Slot chain ready");

    let store = InMemorySessionStore::with_capacity(config.max_sessions);
    let state = AppState::new(DialogRuntime::new(chain, store));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.addr();
    tracing::info!(max_sessions = config.max_sessions, "Booking dialog listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
