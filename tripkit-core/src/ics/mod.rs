//! ICS import.
//!
//! Only the small property subset the trip calendar needs is extracted
//! (UID, SUMMARY, DTSTART, DTEND, LOCATION, DESCRIPTION). This is a lenient
//! extractor, not an RFC 5545 validator.

mod parse;

pub use parse::{ParseReport, parse_ics, parse_ics_with_report};
