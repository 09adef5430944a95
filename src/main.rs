//! TraitCal - trait-based day schedules resolved into iCalendar feeds
//!
//! This application loads a day-by-day schedule description and reusable
//! trait templates from JSON, resolves every event to absolute instants,
//! publishes the results as two iCalendar feeds and serves them over HTTP
//! alongside write-then-regenerate update endpoints.

use std::sync::Arc;

use traitcal::api::AppState;
use traitcal::error::Result;
use traitcal::store::FsStore;
use traitcal::{api, config, generator, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Arc::new(config::Config::from_env()?);

    // Validate configuration
    config.validate()?;

    // Initialize logging/tracing
    logging::init_tracing(&config.server.log_level, &config.server.environment)?;

    // Log configuration
    config.log_config();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting TraitCal");

    let store = Arc::new(FsStore::new(
        &config.storage.input_dir,
        &config.storage.output_dir,
    ));

    // Generate once at startup; a bad input document is reported but does
    // not prevent the server from accepting a corrected one
    match generator::generate(store.as_ref(), &config.generator).await {
        Ok(report) => tracing::info!(
            main_events = report.main_events,
            other_events = report.other_events,
            "Initial generation complete"
        ),
        Err(e) => tracing::warn!(error = %e, "Initial generation failed"),
    }

    let state = Arc::new(AppState::new(config, store));
    api::server::create_server(state).await?;

    tracing::info!("TraitCal shutdown complete");
    Ok(())
}
