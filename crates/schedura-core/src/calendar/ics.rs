//! iCalendar (RFC 5545) exchange for events.
//!
//! Only the VEVENT properties UID, DTSTART, DTEND, SUMMARY, LOCATION and
//! DESCRIPTION are read or written. Times are floating local times; values
//! in UTC (`...Z`) are converted to local time on import.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use icalendar::{Calendar, CalendarComponent, CalendarDateTime, Component, EventLike};
use serde::Serialize;

use crate::model::Event;

const PRODID: &str = "-//schedura//planner//EN";

/// One VEVENT that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsEvent {
    pub uid: Option<String>,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Result of reading an ICS payload.
#[derive(Debug, Clone, Default)]
pub struct ParsedCalendar {
    pub events: Vec<IcsEvent>,
    /// `block N: reason` for every VEVENT that was dropped.
    pub skipped: Vec<String>,
}

/// Outcome of importing events into a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<String>,
}

/// Render `events` as a VCALENDAR with one VEVENT each.
pub fn export_events(events: &[Event]) -> String {
    let mut calendar = Calendar::new();
    for event in events {
        let mut vevent = icalendar::Event::new();
        vevent
            .uid(&event.id)
            .summary(&event.title)
            .starts(CalendarDateTime::Floating(event.start_time))
            .ends(CalendarDateTime::Floating(event.end_time));
        if !event.description.is_empty() {
            vevent.description(&event.description);
        }
        if !event.location.is_empty() {
            vevent.location(&event.location);
        }
        calendar.push(vevent.done());
    }
    calendar.done().to_string()
}

/// Parse every VEVENT block independently; bad blocks are skipped.
pub fn parse_events(text: &str) -> ParsedCalendar {
    let mut parsed = ParsedCalendar::default();
    for (index, block) in vevent_blocks(text).into_iter().enumerate() {
        match parse_block(&block) {
            Ok(event) => parsed.events.push(event),
            Err(reason) => {
                tracing::warn!(block = index, "skipping VEVENT: {reason}");
                parsed.skipped.push(format!("block {index}: {reason}"));
            }
        }
    }
    parsed
}

fn vevent_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().eq_ignore_ascii_case("BEGIN:VEVENT") {
            if let Some(unterminated) = current.take() {
                blocks.push(unterminated.join("\r\n"));
            }
            current = Some(vec![line.trim()]);
            continue;
        }
        if let Some(lines) = current.as_mut() {
            lines.push(line);
            if line.trim().eq_ignore_ascii_case("END:VEVENT") {
                blocks.push(lines.join("\r\n"));
                current = None;
            }
        }
    }
    if let Some(unterminated) = current {
        blocks.push(unterminated.join("\r\n"));
    }
    blocks
}

fn parse_block(block: &str) -> Result<IcsEvent, String> {
    if !block.trim_end().to_ascii_uppercase().ends_with("END:VEVENT") {
        return Err("missing END:VEVENT".to_string());
    }
    let wrapped = format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{PRODID}\r\n{block}\r\nEND:VCALENDAR\r\n"
    );
    let calendar: Calendar = wrapped.parse().map_err(|e| format!("unparseable: {e}"))?;
    let vevent = calendar
        .components
        .iter()
        .find_map(|c| match c {
            CalendarComponent::Event(e) => Some(e),
            _ => None,
        })
        .ok_or_else(|| "no VEVENT found".to_string())?;

    let text = |key: &str| {
        vevent
            .property_value(key)
            .map(unescape)
            .unwrap_or_default()
    };

    let summary = text("SUMMARY");
    if summary.trim().is_empty() {
        return Err("missing SUMMARY".to_string());
    }
    let raw_start = vevent
        .property_value("DTSTART")
        .ok_or_else(|| "missing DTSTART".to_string())?;
    let start = parse_datetime(raw_start).ok_or_else(|| format!("invalid DTSTART '{raw_start}'"))?;
    let end = match vevent.property_value("DTEND") {
        Some(raw) => parse_datetime(raw).ok_or_else(|| format!("invalid DTEND '{raw}'"))?,
        None => start + Duration::hours(1),
    };
    if end <= start {
        return Err(format!("DTEND {end} is not after DTSTART {start}"));
    }

    Ok(IcsEvent {
        uid: vevent
            .property_value("UID")
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(str::to_string),
        summary: summary.trim().to_string(),
        description: text("DESCRIPTION"),
        location: text("LOCATION"),
        start,
        end,
    })
}

/// `YYYYMMDDTHHMMSS[Z]` or a date-only `YYYYMMDD` (midnight).
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Some(utc) = raw.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        return Some(Utc.from_utc_datetime(&naive).with_timezone(&Local).naive_local());
    }
    if raw.contains('T') {
        return NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M"))
            .ok();
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_well_formed_block() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:abc-1\r\n\
                   SUMMARY:Dentist\r\nLOCATION:Main St\\, 4\r\nDTSTART:20240310T140000\r\n\
                   DTEND:20240310T150000\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let parsed = parse_events(ics);
        assert!(parsed.skipped.is_empty(), "{:?}", parsed.skipped);
        let event = &parsed.events[0];
        assert_eq!(event.uid.as_deref(), Some("abc-1"));
        assert_eq!(event.summary, "Dentist");
        assert_eq!(event.location, "Main St, 4");
        assert_eq!(event.start, at(2024, 3, 10, 14, 0));
        assert_eq!(event.end, at(2024, 3, 10, 15, 0));
    }

    #[test]
    fn missing_end_defaults_to_one_hour_and_dates_mean_midnight() {
        let ics = "BEGIN:VEVENT\nSUMMARY:Holiday\nDTSTART;VALUE=DATE:20240501\nEND:VEVENT\n";
        let parsed = parse_events(ics);
        let event = &parsed.events[0];
        assert_eq!(event.start, at(2024, 5, 1, 0, 0));
        assert_eq!(event.end, at(2024, 5, 1, 1, 0));
    }

    #[test]
    fn bad_blocks_are_skipped_with_reasons() {
        let ics = "BEGIN:VCALENDAR\n\
                   BEGIN:VEVENT\nDTSTART:20240101T090000\nEND:VEVENT\n\
                   BEGIN:VEVENT\nSUMMARY:Bad start\nDTSTART:tomorrow\nEND:VEVENT\n\
                   BEGIN:VEVENT\nSUMMARY:Backwards\nDTSTART:20240101T100000\nDTEND:20240101T090000\nEND:VEVENT\n\
                   BEGIN:VEVENT\nSUMMARY:Good\nDTSTART:20240102T090000\nDTEND:20240102T093000\nEND:VEVENT\n\
                   END:VCALENDAR\n";
        let parsed = parse_events(ics);
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.events[0].summary, "Good");
        assert_eq!(parsed.skipped.len(), 3);
        assert!(parsed.skipped[0].starts_with("block 0:"));
        assert!(parsed.skipped[1].contains("DTSTART"));
        assert!(parsed.skipped[2].starts_with("block 2:"));
    }

    #[test]
    fn unterminated_block_is_skipped() {
        let parsed = parse_events("BEGIN:VEVENT\nSUMMARY:Dangling\nDTSTART:20240101T090000\n");
        assert!(parsed.events.is_empty());
        assert_eq!(parsed.skipped.len(), 1);
    }

    #[test]
    fn export_then_parse_keeps_fields() {
        let mut event = Event::new("Review", at(2024, 7, 1, 10, 0), at(2024, 7, 1, 11, 30));
        event.location = "Room 2".to_string();
        event.description = "quarterly numbers".to_string();

        let ics = export_events(std::slice::from_ref(&event));
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("SUMMARY:Review"));

        let parsed = parse_events(&ics);
        assert_eq!(parsed.events.len(), 1);
        let back = &parsed.events[0];
        assert_eq!(back.uid.as_deref(), Some(event.id.as_str()));
        assert_eq!(back.start, event.start_time);
        assert_eq!(back.end, event.end_time);
        assert_eq!(back.location, "Room 2");
        assert_eq!(back.description, "quarterly numbers");
    }

    #[test]
    fn utc_times_convert_to_local() {
        let parsed =
            parse_events("BEGIN:VEVENT\nSUMMARY:Call\nDTSTART:20240601T120000Z\nEND:VEVENT\n");
        let expected = Utc
            .from_utc_datetime(&at(2024, 6, 1, 12, 0))
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed.events[0].start, expected);
    }

    #[test]
    fn unescape_handles_ics_sequences() {
        assert_eq!(unescape(r"a\, b\; c\nd\\e"), "a, b; c\nd\\e");
    }
}
