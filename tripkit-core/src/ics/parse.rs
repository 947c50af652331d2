//! Line-oriented VEVENT extraction.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use icalendar::parser::unfold;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::event::{CalendarEvent, EventStatus};

/// `YYYYMMDD` optionally followed by `THHMMSS`. Trailing `Z` and TZID
/// parameters are ignored: every timestamp is read as naive local time.
static DATE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{8})(?:T(\d{6}))?").expect("date pattern compiles"));

/// Events extracted from a document, plus counts of what was thrown away.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub events: Vec<CalendarEvent>,
    /// VEVENT blocks closed without a summary, start or end.
    pub dropped: usize,
    /// The document ended inside a VEVENT block.
    pub unterminated: bool,
}

/// Parse ICS content into events, in `END:VEVENT` order.
///
/// Incomplete blocks are skipped silently. Empty input, or input without any
/// VEVENT, yields an empty vector.
pub fn parse_ics(content: &str) -> Vec<CalendarEvent> {
    parse_ics_with_report(content).events
}

/// Like [`parse_ics`], also reporting how many blocks were dropped.
pub fn parse_ics_with_report(content: &str) -> ParseReport {
    let mut report = ParseReport::default();
    let mut current: Option<PartialEvent> = None;

    for line in logical_lines(content) {
        match line.trim_end() {
            "BEGIN:VEVENT" => {
                current = Some(PartialEvent::default());
            }
            "END:VEVENT" => {
                if let Some(partial) = current.take() {
                    match partial.finish() {
                        Some(event) => report.events.push(event),
                        None => report.dropped += 1,
                    }
                }
            }
            _ => {
                if let Some(partial) = current.as_mut() {
                    partial.apply(&line);
                }
            }
        }
    }

    report.unterminated = current.is_some();

    if report.dropped > 0 || report.unterminated {
        debug!(
            "ICS parse kept {} events, dropped {} incomplete blocks (unterminated: {})",
            report.events.len(),
            report.dropped,
            report.unterminated
        );
    }

    report
}

/// Normalize line endings to `\n`, join folded lines, split.
fn logical_lines(content: &str) -> Vec<String> {
    let normalized = content
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("\n\t", "\n ");
    unfold(&normalized).split('\n').map(String::from).collect()
}

/// Fields collected between BEGIN:VEVENT and END:VEVENT.
#[derive(Debug, Default)]
struct PartialEvent {
    uid: Option<String>,
    summary: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    location: Option<String>,
    description: Option<String>,
}

impl PartialEvent {
    /// Apply one content line. Later occurrences overwrite earlier ones.
    fn apply(&mut self, line: &str) {
        let Some((name, value)) = line.split_once(':') else {
            return;
        };
        // Parameters such as TZID or VALUE=DATE are not interpreted.
        let key = name.split(';').next().unwrap_or(name).to_ascii_uppercase();

        match key.as_str() {
            "UID" => self.uid = Some(value.to_string()),
            "SUMMARY" => self.summary = Some(value.to_string()),
            "DTSTART" => self.start = parse_timestamp(value),
            "DTEND" => self.end = parse_timestamp(value),
            "LOCATION" => self.location = Some(value.to_string()),
            "DESCRIPTION" => self.description = Some(value.to_string()),
            _ => {}
        }
    }

    fn finish(self) -> Option<CalendarEvent> {
        let summary = self.summary.filter(|s| !s.is_empty())?;
        let start = self.start?;
        let end = self.end?;
        let id = self
            .uid
            .filter(|uid| !uid.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Some(CalendarEvent {
            id,
            summary,
            start,
            end,
            location: self.location,
            description: self.description,
            status: EventStatus::Pending,
        })
    }
}

/// Extract the first `YYYYMMDD[THHMMSS]` run. Date-only values start at midnight.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let caps = DATE_TIME.captures(value)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok()?;
    let time = match caps.get(2) {
        Some(t) => NaiveTime::parse_from_str(t.as_str(), "%H%M%S").ok()?,
        None => NaiveTime::MIN,
    };
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const TWO_EVENTS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:keynote@trip\r\n\
SUMMARY:Opening Keynote\r\n\
DTSTART:20250615T090000\r\n\
DTEND:20250615T103000\r\n\
LOCATION:Hall A\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:dinner@trip\r\n\
SUMMARY:Team Dinner\r\n\
DTSTART;TZID=America/Los_Angeles:20250615T190000\r\n\
DTEND;TZID=America/Los_Angeles:20250615T210000\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_parse_emits_one_event_per_block_in_order() {
        let events = parse_ics(TWO_EVENTS);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "keynote@trip");
        assert_eq!(events[0].location.as_deref(), Some("Hall A"));
        assert_eq!(events[1].id, "dinner@trip");
        assert_eq!(events[1].start.hour(), 19);
        assert!(events.iter().all(|e| e.status == EventStatus::Pending));
    }

    #[test]
    fn test_block_without_times_is_dropped() {
        let report = parse_ics_with_report("BEGIN:VEVENT\nSUMMARY:X\nEND:VEVENT");

        assert!(report.events.is_empty());
        assert_eq!(report.dropped, 1);
    }

    #[test]
    fn test_block_without_summary_is_dropped() {
        let ics = "BEGIN:VEVENT\nUID:a\nDTSTART:20250615T090000\nDTEND:20250615T100000\nEND:VEVENT";
        assert!(parse_ics(ics).is_empty());
    }

    #[test]
    fn test_folded_summary_is_reassembled() {
        let ics = "BEGIN:VEVENT\r\n\
UID:a\r\n\
SUMMARY:Networking \r\n Breakfast\r\n\
DTSTART:20250615T080000\r\n\
DTEND:20250615T090000\r\n\
END:VEVENT\r\n";

        let events = parse_ics(ics);
        assert_eq!(events[0].summary, "Networking Breakfast");
    }

    #[test]
    fn test_tab_continuation_and_bare_lf() {
        let ics = "BEGIN:VEVENT\nUID:a\nSUMMARY:Lunch\n\t with sponsors\nDTSTART:20250615T120000\nDTEND:20250615T130000\nEND:VEVENT\n";
        assert_eq!(parse_ics(ics)[0].summary, "Lunch with sponsors");
    }

    #[test]
    fn test_datetime_components() {
        let ts = parse_timestamp("20250615T090000").unwrap();

        assert_eq!(ts.year(), 2025);
        assert_eq!(ts.month(), 6);
        assert_eq!(ts.day(), 15);
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (9, 0, 0));
    }

    #[test]
    fn test_all_day_value_starts_at_midnight() {
        let ts = parse_timestamp("20250615").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(ts.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_utc_suffix_is_read_as_local() {
        let ts = parse_timestamp("20250615T090000Z").unwrap();
        assert_eq!(ts.hour(), 9);
    }

    #[test]
    fn test_invalid_calendar_date_is_rejected() {
        assert!(parse_timestamp("20251340T090000").is_none());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_missing_uid_gets_synthesized_id() {
        let ics = "BEGIN:VEVENT\nSUMMARY:Walk\nDTSTART:20250615\nDTEND:20250616\nEND:VEVENT";
        let events = parse_ics(ics);

        assert_eq!(events.len(), 1);
        assert!(uuid::Uuid::parse_str(&events[0].id).is_ok());
    }

    #[test]
    fn test_duplicate_property_last_wins() {
        let ics = "BEGIN:VEVENT\nUID:a\nSUMMARY:First\nSUMMARY:Second\nDTSTART:20250615T090000\nDTEND:20250615T100000\nEND:VEVENT";
        assert_eq!(parse_ics(ics)[0].summary, "Second");
    }

    #[test]
    fn test_value_with_colons_is_kept_whole() {
        let ics = "BEGIN:VEVENT\nUID:a\nSUMMARY:Talk: Rust at scale\nDESCRIPTION:Join at https://example.com\nDTSTART:20250615T090000\nDTEND:20250615T100000\nEND:VEVENT";
        let events = parse_ics(ics);

        assert_eq!(events[0].summary, "Talk: Rust at scale");
        assert_eq!(
            events[0].description.as_deref(),
            Some("Join at https://example.com")
        );
    }

    #[test]
    fn test_unterminated_block_yields_nothing() {
        let ics = "BEGIN:VEVENT\nUID:a\nSUMMARY:Open\nDTSTART:20250615T090000\nDTEND:20250615T100000\n";
        let report = parse_ics_with_report(ics);

        assert!(report.events.is_empty());
        assert!(report.unterminated);
    }

    #[test]
    fn test_lines_outside_events_are_ignored() {
        let ics = "SUMMARY:Stray\nBEGIN:VEVENT\nUID:a\nSUMMARY:Real\nDTSTART:20250615T090000\nDTEND:20250615T100000\nEND:VEVENT\nEND:VEVENT";
        let events = parse_ics(ics);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Real");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_ics("").is_empty());
        assert!(parse_ics("BEGIN:VCALENDAR\nEND:VCALENDAR").is_empty());
    }
}
