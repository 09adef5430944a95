//! Error taxonomy of the temporal resolution engine
//!
//! Resolution is a fail-fast batch job: any of these errors aborts the whole
//! generation run, and the message identifies the trait or event at fault so
//! the caller can report it without inspecting the input.

use thiserror::Error;

/// Result type alias for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors raised while resolving a schedule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A day references a trait name absent from the template set
    #[error("Unknown trait '{0}'")]
    UnknownTrait(String),

    /// A mandatory field is absent after the override/template merge
    #[error("Missing required field '{field}' in {context}")]
    MissingField {
        /// Where the field was expected, e.g. `main event of trait 'work'`
        context: String,
        /// Name of the absent field
        field: &'static str,
    },

    /// No start strategy matched for a satellite event
    #[error("Could not determine start time for event '{0}'")]
    MissingStartTime(String),

    /// A delta or duration string is not a valid signed time-of-day
    #[error("Malformed duration '{0}'")]
    MalformedDuration(String),

    /// An absolute time-of-day string failed to parse
    #[error("Malformed time of day '{value}' in field '{field}'")]
    MalformedTime {
        /// Name of the offending field
        field: &'static str,
        /// The value that failed to parse
        value: String,
    },
}

impl ResolveError {
    /// Build a `MissingField` error for a trait's main event
    pub fn missing_main_field(trait_name: &str, field: &'static str) -> Self {
        ResolveError::MissingField {
            context: format!("main event of trait '{trait_name}'"),
            field,
        }
    }
}
