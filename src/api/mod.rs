//! API module for TraitCal
//!
//! This module contains all HTTP API endpoints and server setup: the
//! calendar feeds, the write-then-regenerate update endpoints, the liveness
//! check and the request middleware.

pub mod handlers;
pub mod server;

use std::sync::Arc;

use crate::config::Config;
use crate::generator::GenerationReport;
use crate::store::Store;

pub use server::{create_router, create_server, shutdown_signal};

/// Shared application state behind every handler
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Persistence boundary for input documents and calendar feeds
    pub store: Arc<dyn Store>,

    /// Serializes generation runs: two overlapping update requests would
    /// otherwise read and write the same artifacts
    pub generation_lock: tokio::sync::Mutex<()>,
}

impl AppState {
    /// Create the shared state
    pub fn new(config: Arc<Config>, store: Arc<dyn Store>) -> Self {
        Self {
            config,
            store,
            generation_lock: tokio::sync::Mutex::new(()),
        }
    }
}

/// Response to a successful update request
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UpdateResponse {
    /// Human-readable outcome
    pub message: String,

    /// Counters of the regeneration run the update triggered
    pub report: GenerationReport,
}

/// Health check response
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
