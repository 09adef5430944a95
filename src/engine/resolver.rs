//! The temporal resolution passes
//!
//! Resolution happens per day, then per trait reference within the day, then
//! per satellite event within the trait. The trait's main event always
//! resolves first; its start and end instants form the read-only [`Anchor`]
//! every satellite event of that trait is resolved against.

use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime};

use crate::models::{Day, MainEventSpec, ResolvedEvent, SatelliteEventSpec, TraitRef, TraitTemplate};

use super::duration::{parse_signed_duration, parse_time_of_day};
use super::error::{ResolveError, ResolveResult};
use super::fields::first_present;

/// Configuration of a resolution run
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Fixed target timezone offset applied to every resolved instant
    pub timezone: FixedOffset,

    /// Fallback event length when neither a duration nor an end is given
    pub default_duration: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            // UTC+4, the calendar's display timezone
            timezone: FixedOffset::east_opt(4 * 3600).expect("offset within bounds"),
            default_duration: Duration::minutes(20),
        }
    }
}

/// The resolved main event's instants, the reference context for satellites
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    /// The main event's resolved start
    pub start: DateTime<FixedOffset>,
    /// The main event's resolved end
    pub end: DateTime<FixedOffset>,
}

/// Output of a full resolution run: the two event streams
#[derive(Debug, Clone, Default)]
pub struct ResolvedSchedule {
    /// One main event per trait occurrence, in input order
    pub main_events: Vec<ResolvedEvent>,
    /// All satellite events, in template order within each trait
    pub other_events: Vec<ResolvedEvent>,
}

/// The temporal resolution engine
#[derive(Debug, Clone)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    /// Create a resolver with the given configuration
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve a whole schedule, strictly in input order.
    ///
    /// The first error aborts the run; no partial output is produced.
    pub fn resolve_schedule(
        &self,
        days: &[Day],
        templates: &HashMap<String, TraitTemplate>,
    ) -> ResolveResult<ResolvedSchedule> {
        let mut schedule = ResolvedSchedule::default();

        for day in days {
            tracing::debug!(date = %day.date, traits = day.traits.len(), "Resolving day");

            for trait_ref in &day.traits {
                if trait_ref.name.trim().is_empty() {
                    return Err(ResolveError::MissingField {
                        context: format!("trait reference for day {}", day.date),
                        field: "name",
                    });
                }

                let template = templates
                    .get(&trait_ref.name)
                    .ok_or_else(|| ResolveError::UnknownTrait(trait_ref.name.clone()))?;

                let main = self.resolve_main_event(day.date, trait_ref, template)?;
                let anchor = Anchor {
                    start: main.start,
                    end: main.end,
                };

                tracing::debug!(
                    trait_name = %trait_ref.name,
                    event = %main.name,
                    start = %main.start,
                    end = %main.end,
                    "Resolved main event"
                );

                schedule.main_events.push(main);

                for spec in &template.events {
                    let satellite = self.resolve_satellite(day.date, spec, &anchor)?;
                    tracing::debug!(
                        event = %satellite.name,
                        start = %satellite.start,
                        end = %satellite.end,
                        "Resolved satellite event"
                    );
                    schedule.other_events.push(satellite);
                }
            }
        }

        Ok(schedule)
    }

    /// Resolve the main event of one trait occurrence.
    ///
    /// Fields are merged over `[day-level override, template default]`; the
    /// merged `name` and `start_time` are mandatory. A present duration wins
    /// over a present end time, and with neither the configured default
    /// duration applies.
    fn resolve_main_event(
        &self,
        date: NaiveDate,
        trait_ref: &TraitRef,
        template: &TraitTemplate,
    ) -> ResolveResult<ResolvedEvent> {
        let empty = MainEventSpec::default();
        let overrides = trait_ref.main_event.as_ref().unwrap_or(&empty);
        let candidates = [overrides, &template.main_event];

        let name = first_present(&candidates, |spec| spec.name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ResolveError::missing_main_field(&template.name, "name"))?;

        let start_value = first_present(&candidates, |spec| spec.start_time.as_deref())
            .ok_or_else(|| ResolveError::missing_main_field(&template.name, "start_time"))?;
        let start_naive = date.and_time(parse_time_of_day(start_value, "start_time")?);

        let duration = first_present(&candidates, |spec| spec.duration.as_deref())
            .map(parse_signed_duration)
            .transpose()?;
        let end_time = first_present(&candidates, |spec| spec.end_time.as_deref())
            .map(|value| parse_time_of_day(value, "end_time"))
            .transpose()?;

        let end_naive = if let Some(duration) = duration {
            start_naive + duration
        } else if let Some(end_time) = end_time {
            date.and_time(end_time)
        } else {
            start_naive + self.config.default_duration
        };

        // An end before its start crosses midnight into the next day
        let end_naive = if end_naive < start_naive {
            end_naive + Duration::days(1)
        } else {
            end_naive
        };

        Ok(ResolvedEvent {
            name: name.to_string(),
            start: self.localize(start_naive),
            end: self.localize(end_naive),
            description: first_present(&candidates, |spec| spec.description.as_deref())
                .map(str::to_string),
            busy: first_present(&candidates, |spec| spec.busy.as_ref())
                .copied()
                .unwrap_or(false),
        })
    }

    /// Resolve one satellite event against its trait's anchor.
    ///
    /// Start precedence: absolute time, delta from the main start, delta
    /// from the main end. End precedence: absolute time, delta from the main
    /// end, delta from the main start, duration, configured default.
    fn resolve_satellite(
        &self,
        date: NaiveDate,
        spec: &SatelliteEventSpec,
        anchor: &Anchor,
    ) -> ResolveResult<ResolvedEvent> {
        let day_delta = spec.day_delta.unwrap_or(0);
        let start_day = date + Duration::days(day_delta);

        // Every branch yields an instant already in the target offset
        let start = if let Some(value) = spec.start_time.as_deref() {
            self.localize(start_day.and_time(parse_time_of_day(value, "start_time")?))
        } else if let Some(value) = spec.start_time_delta.as_deref() {
            anchor.start + parse_signed_duration(value)? + Duration::days(day_delta)
        } else if let Some(value) = spec.start_time_delta_from_end.as_deref() {
            anchor.end + parse_signed_duration(value)? + Duration::days(day_delta)
        } else {
            return Err(ResolveError::MissingStartTime(spec.name.clone()));
        };

        let end = if let Some(value) = spec.end_time.as_deref() {
            self.localize(start_day.and_time(parse_time_of_day(value, "end_time")?))
        } else if let Some(value) = spec.end_time_delta.as_deref() {
            anchor.end + parse_signed_duration(value)? + Duration::days(day_delta)
        } else if let Some(value) = spec.end_time_delta_from_start.as_deref() {
            // No day_delta shift on this path: the delta stays in the main
            // start's own day context
            anchor.start + parse_signed_duration(value)?
        } else if let Some(value) = spec.duration.as_deref() {
            start + parse_signed_duration(value)?
        } else {
            start + self.config.default_duration
        };

        let end = if end < start { end + Duration::days(1) } else { end };

        Ok(ResolvedEvent {
            name: spec.name.clone(),
            start,
            end,
            description: spec.description.clone(),
            busy: spec.busy,
        })
    }

    /// Interpret a naive wall-clock time in the target timezone.
    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        let offset = self.config.timezone;
        // The instant behind a wall time at a fixed offset is the wall time
        // minus that offset
        DateTime::from_naive_utc_and_offset(naive - offset, offset)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn resolver() -> Resolver {
        Resolver::default()
    }

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(4 * 3600).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn template(main_event: MainEventSpec, events: Vec<SatelliteEventSpec>) -> TraitTemplate {
        TraitTemplate {
            name: "work".to_string(),
            main_event,
            events,
        }
    }

    fn plain_ref() -> TraitRef {
        TraitRef {
            name: "work".to_string(),
            main_event: None,
        }
    }

    fn main_spec(start_time: &str) -> MainEventSpec {
        MainEventSpec {
            name: Some("Work".to_string()),
            start_time: Some(start_time.to_string()),
            ..MainEventSpec::default()
        }
    }

    fn satellite(name: &str) -> SatelliteEventSpec {
        SatelliteEventSpec {
            name: name.to_string(),
            day_delta: None,
            start_time: None,
            start_time_delta: None,
            start_time_delta_from_end: None,
            end_time: None,
            end_time_delta: None,
            end_time_delta_from_start: None,
            duration: None,
            description: None,
            busy: false,
        }
    }

    #[test]
    fn test_main_event_default_duration() {
        let event = resolver()
            .resolve_main_event(date(), &plain_ref(), &template(main_spec("09:00:00"), vec![]))
            .unwrap();

        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap());
        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 10, 9, 20, 0).unwrap());
    }

    #[test]
    fn test_main_event_duration_wins_over_end_time() {
        let spec = MainEventSpec {
            duration: Some("02:00:00".to_string()),
            end_time: Some("10:00:00".to_string()),
            ..main_spec("09:00:00")
        };

        let event = resolver()
            .resolve_main_event(date(), &plain_ref(), &template(spec, vec![]))
            .unwrap();

        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 10, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_main_event_explicit_end_time() {
        let spec = MainEventSpec {
            end_time: Some("17:30:00".to_string()),
            ..main_spec("09:00:00")
        };

        let event = resolver()
            .resolve_main_event(date(), &plain_ref(), &template(spec, vec![]))
            .unwrap();

        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 10, 17, 30, 0).unwrap());
    }

    #[test]
    fn test_main_event_midnight_rollover() {
        let spec = MainEventSpec {
            end_time: Some("00:05:00".to_string()),
            ..main_spec("23:50:00")
        };

        let event = resolver()
            .resolve_main_event(date(), &plain_ref(), &template(spec, vec![]))
            .unwrap();

        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 10, 23, 50, 0).unwrap());
        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 11, 0, 5, 0).unwrap());
        assert!(event.end > event.start);
    }

    #[test]
    fn test_main_event_override_takes_precedence() {
        let trait_ref = TraitRef {
            name: "work".to_string(),
            main_event: Some(MainEventSpec {
                start_time: Some("10:00:00".to_string()),
                busy: Some(true),
                ..MainEventSpec::default()
            }),
        };
        let spec = MainEventSpec {
            busy: Some(false),
            ..main_spec("09:00:00")
        };

        let event = resolver()
            .resolve_main_event(date(), &trait_ref, &template(spec, vec![]))
            .unwrap();

        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap());
        assert_eq!(event.name, "Work");
        assert!(event.busy);
    }

    #[test]
    fn test_main_event_missing_start_is_an_error() {
        let spec = MainEventSpec {
            name: Some("Work".to_string()),
            ..MainEventSpec::default()
        };

        let err = resolver()
            .resolve_main_event(date(), &plain_ref(), &template(spec, vec![]))
            .unwrap_err();

        assert_eq!(err, ResolveError::missing_main_field("work", "start_time"));
    }

    #[test]
    fn test_main_event_missing_name_is_an_error() {
        let spec = MainEventSpec {
            start_time: Some("09:00:00".to_string()),
            ..MainEventSpec::default()
        };

        let err = resolver()
            .resolve_main_event(date(), &plain_ref(), &template(spec, vec![]))
            .unwrap_err();

        assert_eq!(err, ResolveError::missing_main_field("work", "name"));
    }

    #[test]
    fn test_main_event_busy_defaults_to_false() {
        let event = resolver()
            .resolve_main_event(date(), &plain_ref(), &template(main_spec("09:00:00"), vec![]))
            .unwrap();
        assert!(!event.busy);
    }

    fn anchor() -> Anchor {
        Anchor {
            start: tz().with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(),
            end: tz().with_ymd_and_hms(2024, 3, 10, 9, 20, 0).unwrap(),
        }
    }

    #[test]
    fn test_satellite_delta_from_main_start() {
        let spec = SatelliteEventSpec {
            start_time_delta: Some("00:15:00".to_string()),
            ..satellite("Standup")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();

        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap());
        // Default duration applies when no end strategy matches
        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 10, 9, 35, 0).unwrap());
    }

    #[test]
    fn test_satellite_absolute_start_wins_over_delta() {
        let spec = SatelliteEventSpec {
            start_time: Some("11:00:00".to_string()),
            start_time_delta: Some("00:15:00".to_string()),
            ..satellite("Review")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 10, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_satellite_delta_from_main_end() {
        let spec = SatelliteEventSpec {
            start_time_delta_from_end: Some("00:10:00".to_string()),
            ..satellite("Cooldown")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_satellite_negative_delta() {
        let spec = SatelliteEventSpec {
            start_time_delta: Some("-00:30:00".to_string()),
            ..satellite("Prepare")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_satellite_day_delta_shifts_absolute_start() {
        let spec = SatelliteEventSpec {
            day_delta: Some(1),
            start_time: Some("08:00:00".to_string()),
            ..satellite("Followup")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 11, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_satellite_day_delta_shifts_start_delta() {
        let spec = SatelliteEventSpec {
            day_delta: Some(1),
            start_time_delta: Some("00:00:00".to_string()),
            ..satellite("Same time tomorrow")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_satellite_end_delta_from_main_end() {
        let spec = SatelliteEventSpec {
            start_time_delta: Some("00:00:00".to_string()),
            end_time_delta: Some("01:00:00".to_string()),
            ..satellite("Overrun")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 10, 10, 20, 0).unwrap());
    }

    #[test]
    fn test_satellite_end_delta_from_start_ignores_day_offset() {
        let spec = SatelliteEventSpec {
            day_delta: Some(1),
            start_time: Some("08:00:00".to_string()),
            end_time_delta_from_start: Some("02:00:00".to_string()),
            ..satellite("Asymmetric")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();

        // Start shifts to the next day; the end delta stays anchored to the
        // main start's own day, and the rollover then restores ordering
        assert_eq!(event.start, tz().with_ymd_and_hms(2024, 3, 11, 8, 0, 0).unwrap());
        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 11, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_satellite_duration_end() {
        let spec = SatelliteEventSpec {
            start_time: Some("10:00:00".to_string()),
            duration: Some("01:30:00".to_string()),
            ..satellite("Workshop")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 10, 11, 30, 0).unwrap());
    }

    #[test]
    fn test_satellite_absolute_end_wins_over_deltas() {
        let spec = SatelliteEventSpec {
            start_time: Some("10:00:00".to_string()),
            end_time: Some("12:00:00".to_string()),
            end_time_delta: Some("01:00:00".to_string()),
            duration: Some("00:30:00".to_string()),
            ..satellite("Busy afternoon")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_satellite_without_start_strategy_is_an_error() {
        let err = resolver()
            .resolve_satellite(date(), &satellite("Orphan"), &anchor())
            .unwrap_err();
        assert_eq!(err, ResolveError::MissingStartTime("Orphan".to_string()));
    }

    #[test]
    fn test_satellite_rollover() {
        let spec = SatelliteEventSpec {
            start_time: Some("23:50:00".to_string()),
            end_time: Some("00:05:00".to_string()),
            ..satellite("Night shift")
        };

        let event = resolver().resolve_satellite(date(), &spec, &anchor()).unwrap();
        assert_eq!(event.end, tz().with_ymd_and_hms(2024, 3, 11, 0, 5, 0).unwrap());
        assert!(event.end > event.start);
    }

    #[test]
    fn test_schedule_end_to_end() {
        let days = vec![Day {
            date: date(),
            traits: vec![plain_ref()],
        }];
        let mut templates = HashMap::new();
        templates.insert(
            "work".to_string(),
            template(
                main_spec("09:00:00"),
                vec![SatelliteEventSpec {
                    start_time_delta: Some("00:15:00".to_string()),
                    ..satellite("Standup")
                }],
            ),
        );

        let schedule = resolver().resolve_schedule(&days, &templates).unwrap();

        assert_eq!(schedule.main_events.len(), 1);
        assert_eq!(schedule.other_events.len(), 1);

        let main = &schedule.main_events[0];
        assert_eq!(main.start, tz().with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap());
        assert_eq!(main.end, tz().with_ymd_and_hms(2024, 3, 10, 9, 20, 0).unwrap());

        let standup = &schedule.other_events[0];
        assert_eq!(standup.name, "Standup");
        assert_eq!(standup.start, tz().with_ymd_and_hms(2024, 3, 10, 9, 15, 0).unwrap());
        assert_eq!(standup.end, tz().with_ymd_and_hms(2024, 3, 10, 9, 35, 0).unwrap());
    }

    #[test]
    fn test_schedule_unknown_trait_aborts() {
        let days = vec![Day {
            date: date(),
            traits: vec![TraitRef {
                name: "mystery".to_string(),
                main_event: None,
            }],
        }];

        let err = resolver().resolve_schedule(&days, &HashMap::new()).unwrap_err();
        assert_eq!(err, ResolveError::UnknownTrait("mystery".to_string()));
    }

    #[test]
    fn test_schedule_empty_trait_name_aborts() {
        let days = vec![Day {
            date: date(),
            traits: vec![TraitRef {
                name: "  ".to_string(),
                main_event: None,
            }],
        }];

        let err = resolver().resolve_schedule(&days, &HashMap::new()).unwrap_err();
        assert!(matches!(err, ResolveError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_all_resolved_events_end_after_start() {
        let configured = Resolver::new(ResolverConfig {
            timezone: tz(),
            default_duration: Duration::minutes(45),
        });

        let event = configured
            .resolve_main_event(date(), &plain_ref(), &template(main_spec("12:00:00"), vec![]))
            .unwrap();

        // The default duration is configuration, not a hidden constant
        assert_eq!(event.duration(), Duration::minutes(45));
        assert!(event.end > event.start);
    }
}
