//! Data models for TraitCal
//!
//! This module contains the domain models used throughout the application:
//! the raw schedule input records (days and trait templates, as loaded from
//! JSON) and the resolved events the engine produces from them.

pub mod day;
pub mod resolved;
pub mod traits;

// Re-export commonly used types
pub use day::{Day, TraitRef};
pub use resolved::ResolvedEvent;
pub use traits::{MainEventSpec, SatelliteEventSpec, TraitTemplate};
