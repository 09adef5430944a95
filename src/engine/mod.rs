//! Temporal resolution engine for TraitCal
//!
//! The engine turns raw day schedules and trait templates into resolved
//! events with absolute, timezone-aware start and end instants. It is pure
//! and synchronous: all inputs are explicit (no system clock access), days
//! and traits are processed strictly in input order, and the first error
//! aborts the whole run.

pub mod duration;
pub mod error;
pub mod fields;
pub mod resolver;

// Re-export commonly used items
pub use duration::{parse_signed_duration, parse_time_of_day};
pub use error::{ResolveError, ResolveResult};
pub use fields::first_present;
pub use resolver::{Anchor, ResolvedSchedule, Resolver, ResolverConfig};
