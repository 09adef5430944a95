//! Resolved event model
//!
//! A resolved event is the engine's output: a name with absolute,
//! timezone-aware start and end instants. Instances are created fresh per
//! generation run, never mutated, and consumed only by serialization.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// A fully resolved calendar event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedEvent {
    /// Event summary
    pub name: String,

    /// Absolute start instant in the target timezone
    pub start: DateTime<FixedOffset>,

    /// Absolute end instant in the target timezone, strictly after `start`
    pub end: DateTime<FixedOffset>,

    /// Free-text event description
    pub description: Option<String>,

    /// Free/busy transparency
    pub busy: bool,
}

impl ResolvedEvent {
    /// Length of the event
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
