//! Trait template records for TraitCal
//!
//! A trait template is a named, reusable definition of a main event plus any
//! number of satellite events scheduled relative to it. These structures
//! mirror the `traits.json` input document: every time-of-day, delta and
//! duration field stays a raw string here and is parsed by the resolution
//! engine, which owns the error taxonomy for malformed values.

use serde::{Deserialize, Serialize};

/// A reusable trait definition looked up by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitTemplate {
    /// Template name, referenced by day records
    pub name: String,

    /// Specification of the trait's main event
    #[serde(default)]
    pub main_event: MainEventSpec,

    /// Satellite events resolved relative to the main event
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SatelliteEventSpec>,
}

/// Raw main-event specification
///
/// Every field is optional: the same structure serves both as the template
/// default and as the per-day override, merged field by field with the
/// override taking precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainEventSpec {
    /// Event summary; mandatory after the override/template merge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Absolute start time of day (`HH:MM:SS`); mandatory after the merge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Signed duration; wins over `end_time` when both are present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Absolute end time of day (`HH:MM:SS`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Free-text event description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free/busy transparency; defaults to free when absent everywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy: Option<bool>,
}

/// Raw satellite-event specification
///
/// Satellite events belong to their template and take no per-day overrides.
/// The start is determined by the first present field of `start_time`,
/// `start_time_delta` (from the main event's start) and
/// `start_time_delta_from_end` (from the main event's end); the end by the
/// first present of `end_time`, `end_time_delta` (from the main end),
/// `end_time_delta_from_start` (from the main start) and `duration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteEventSpec {
    /// Event summary
    pub name: String,

    /// Whole-day shift applied to the anchor date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_delta: Option<i64>,

    /// Absolute start time of day on the shifted date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Signed delta from the main event's start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_delta: Option<String>,

    /// Signed delta from the main event's end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_delta_from_end: Option<String>,

    /// Absolute end time of day on the shifted date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Signed delta from the main event's end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time_delta: Option<String>,

    /// Signed delta from the main event's start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time_delta_from_start: Option<String>,

    /// Signed duration added to the resolved start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Free-text event description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free/busy transparency
    #[serde(default)]
    pub busy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_deserializes_from_input_document() {
        let json = r#"{
            "name": "work",
            "main_event": {"name": "Work", "start_time": "09:00:00", "busy": true},
            "events": [
                {"name": "Standup", "start_time_delta": "00:15:00"},
                {"name": "Prepare", "start_time_delta": "-00:30:00", "duration": "00:20:00"}
            ]
        }"#;

        let template: TraitTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.name, "work");
        assert_eq!(template.main_event.name.as_deref(), Some("Work"));
        assert_eq!(template.main_event.busy, Some(true));
        assert_eq!(template.events.len(), 2);
        assert_eq!(
            template.events[1].start_time_delta.as_deref(),
            Some("-00:30:00")
        );
        assert!(!template.events[0].busy);
    }

    #[test]
    fn test_template_without_events_defaults_to_empty() {
        let template: TraitTemplate =
            serde_json::from_str(r#"{"name": "rest", "main_event": {"name": "Rest"}}"#).unwrap();
        assert!(template.events.is_empty());
    }

    #[test]
    fn test_satellite_requires_name() {
        let result: std::result::Result<SatelliteEventSpec, _> =
            serde_json::from_str(r#"{"start_time": "10:00:00"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_fields_are_not_persisted() {
        let template = TraitTemplate {
            name: "rest".to_string(),
            main_event: MainEventSpec {
                name: Some("Rest".to_string()),
                start_time: Some("20:00:00".to_string()),
                ..MainEventSpec::default()
            },
            events: Vec::new(),
        };

        let json = serde_json::to_string(&template).unwrap();
        assert!(!json.contains("duration"));
        assert!(!json.contains("events"));
    }
}
