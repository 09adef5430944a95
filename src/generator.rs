//! Calendar generation orchestration
//!
//! One generation run: load the input documents, resolve every day in input
//! order, serialize the two event streams and replace the calendar feeds.
//! The run is fail-fast: output is only written after the whole schedule
//! resolved, so a bad input never clobbers a previously good calendar.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::engine::{Resolver, ResolverConfig};
use crate::error::Result;
use crate::ical::{Calendar, Event};
use crate::logging::Timer;
use crate::models::TraitTemplate;
use crate::store::{CalendarFile, Store};

/// Counters describing one successful generation run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Days processed
    pub days: usize,
    /// Main events emitted
    pub main_events: usize,
    /// Satellite events emitted
    pub other_events: usize,
}

/// Run one full generation pass over the stored input documents
pub async fn generate(store: &dyn Store, config: &GeneratorConfig) -> Result<GenerationReport> {
    let load_timer = Timer::start("load_inputs");
    let days = store.load_days().await?;
    let templates = store.load_templates().await?;
    let load_elapsed = load_timer.stop();

    let resolve_timer = Timer::start("resolve_schedule");
    let templates_by_name: HashMap<String, TraitTemplate> = templates
        .into_iter()
        .map(|template| (template.name.clone(), template))
        .collect();

    let timezone = config.timezone()?;
    let resolver = Resolver::new(ResolverConfig {
        timezone,
        default_duration: config.default_event_duration(),
    });
    let schedule = resolver.resolve_schedule(&days, &templates_by_name)?;
    let resolve_elapsed = resolve_timer.stop();

    let write_timer = Timer::start("write_calendars");
    let dtstamp = Utc::now().with_timezone(&timezone);

    let mut main_calendar = Calendar::new(&config.main_prodid);
    for event in &schedule.main_events {
        main_calendar.add_event(Event::from_resolved(event, dtstamp));
    }

    let mut other_calendar = Calendar::new(&config.other_prodid);
    for event in &schedule.other_events {
        other_calendar.add_event(Event::from_resolved(event, dtstamp));
    }

    store
        .write_calendar(CalendarFile::Main, &main_calendar.to_ics())
        .await?;
    store
        .write_calendar(CalendarFile::Other, &other_calendar.to_ics())
        .await?;
    let write_elapsed = write_timer.stop();

    let report = GenerationReport {
        days: days.len(),
        main_events: schedule.main_events.len(),
        other_events: schedule.other_events.len(),
    };

    tracing::info!(
        days = report.days,
        main_events = report.main_events,
        other_events = report.other_events,
        load_ms = load_elapsed.as_millis() as u64,
        resolve_ms = resolve_elapsed.as_millis() as u64,
        write_ms = write_elapsed.as_millis() as u64,
        "Calendar generation complete"
    );

    Ok(report)
}
