//! HTTP and WebSocket API
//!
//! A thin transport over [`DialogRuntime::process_turn`](crate::runtime::DialogRuntime).

mod handlers;
mod types;
mod ws;

pub use handlers::create_router;

use crate::runtime::ProductionRuntime;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ProductionRuntime>,
}

impl AppState {
    pub fn new(runtime: ProductionRuntime) -> Self {
        Self {
            runtime: Arc::new(runtime),
        }
    }
}
