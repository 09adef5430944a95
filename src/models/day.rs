//! Day schedule records for TraitCal
//!
//! A day record names a calendar date and the ordered list of traits that
//! apply to it. These structures mirror the `calendar.json` input document
//! before any temporal resolution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::traits::MainEventSpec;

/// One calendar day of the schedule input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    /// The calendar date this record describes
    pub date: NaiveDate,

    /// Ordered trait references applying to this day
    #[serde(default)]
    pub traits: Vec<TraitRef>,
}

/// A per-day reference to a reusable trait template
///
/// The reference may carry a partial main-event specification; any field
/// present here takes precedence over the template's own value for the
/// same field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitRef {
    /// Name of the referenced trait template
    pub name: String,

    /// Per-day overrides for the template's main event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_event: Option<MainEventSpec>,
}
