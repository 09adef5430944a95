//! iCalendar serialization for TraitCal
//!
//! A deliberately small RFC 5545 subset: typed `VCALENDAR`/`VEVENT`
//! components and a text writer, enough to publish the two resolved-event
//! streams as calendar feeds. The writer escapes TEXT values, folds long
//! content lines and terminates every line with CRLF.

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::models::ResolvedEvent;

/// Timezone identifier stamped on every DTSTART/DTEND
pub const TZID: &str = "Asia/Tbilisi";

/// Static VTIMEZONE definition embedded in every calendar for display
pub const VTIMEZONE: &str = "BEGIN:VTIMEZONE\r\n\
TZID:Asia/Tbilisi\r\n\
BEGIN:STANDARD\r\n\
DTSTART:20050101T000000\r\n\
TZOFFSETFROM:+0300\r\n\
TZOFFSETTO:+0400\r\n\
TZNAME:GET\r\n\
END:STANDARD\r\n\
END:VTIMEZONE\r\n";

/// Content lines longer than this many octets are folded
const FOLD_WIDTH: usize = 75;

/// A VCALENDAR container with its own product identifier
#[derive(Debug, Clone)]
pub struct Calendar {
    prodid: String,
    events: Vec<Event>,
}

impl Calendar {
    /// Create an empty calendar with the given PRODID
    pub fn new(prodid: impl Into<String>) -> Self {
        Self {
            prodid: prodid.into(),
            events: Vec::new(),
        }
    }

    /// Append an event component
    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Serialize to iCalendar text
    pub fn to_ics(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, "BEGIN:VCALENDAR");
        push_line(&mut out, &format!("PRODID:{}", escape_text(&self.prodid)));
        push_line(&mut out, "VERSION:2.0");
        out.push_str(VTIMEZONE);
        for event in &self.events {
            event.write(&mut out);
        }
        push_line(&mut out, "END:VCALENDAR");
        out
    }
}

/// A VEVENT component
#[derive(Debug, Clone)]
pub struct Event {
    uid: String,
    summary: String,
    dtstamp: DateTime<FixedOffset>,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    description: Option<String>,
    busy: bool,
}

impl Event {
    /// Build a VEVENT from a resolved event, stamped at `dtstamp`
    pub fn from_resolved(event: &ResolvedEvent, dtstamp: DateTime<FixedOffset>) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            summary: event.name.clone(),
            dtstamp,
            start: event.start,
            end: event.end,
            description: event.description.clone(),
            busy: event.busy,
        }
    }

    /// The busy flag maps to calendar transparency
    fn transparency(&self) -> &'static str {
        if self.busy {
            "OPAQUE"
        } else {
            "TRANSPARENT"
        }
    }

    fn write(&self, out: &mut String) {
        push_line(out, "BEGIN:VEVENT");
        push_line(out, &format!("UID:{}", self.uid));
        push_line(out, &format!("SUMMARY:{}", escape_text(&self.summary)));
        push_line(out, &format!("DTSTAMP:{}", format_datetime(&self.dtstamp)));
        push_line(
            out,
            &format!("DTSTART;TZID={}:{}", TZID, format_datetime(&self.start)),
        );
        push_line(
            out,
            &format!("DTEND;TZID={}:{}", TZID, format_datetime(&self.end)),
        );
        if let Some(description) = &self.description {
            push_line(out, &format!("DESCRIPTION:{}", escape_text(description)));
        }
        push_line(out, &format!("TRANSP:{}", self.transparency()));
        push_line(out, "END:VEVENT");
    }
}

/// Format an instant as an iCalendar local date-time
fn format_datetime(instant: &DateTime<FixedOffset>) -> String {
    instant.format("%Y%m%dT%H%M%S").to_string()
}

/// Escape a TEXT value: backslash, comma, semicolon and newline
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {},
            other => escaped.push(other),
        }
    }
    escaped
}

/// Write one content line, folded at the RFC 5545 width, CRLF-terminated
fn push_line(out: &mut String, line: &str) {
    let mut width = 0;
    for ch in line.chars() {
        let octets = ch.len_utf8();
        if width + octets > FOLD_WIDTH {
            out.push_str("\r\n ");
            // The leading space of a continuation line counts toward its width
            width = 1;
        }
        out.push(ch);
        width += octets;
    }
    out.push_str("\r\n");
}
