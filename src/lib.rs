//! TraitCal Library
//!
//! This library exposes the core modules of TraitCal for use in integration
//! tests and as a library for other applications.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod ical;
pub mod logging;
pub mod models;
pub mod store;
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{Day, MainEventSpec, ResolvedEvent, SatelliteEventSpec, TraitRef, TraitTemplate};

// Re-export engine types
pub use engine::{Anchor, ResolveError, Resolver, ResolverConfig};

// Re-export API server functions
pub use api::server::{create_router, create_server, shutdown_signal};
