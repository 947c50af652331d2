//! Calendar event records.
//!
//! Events come out of the ICS parser with `status = pending`. Once they live in
//! the store, the done flag in `calendarDone` is authoritative and `status` is a
//! projection of it (see [`crate::store::Store::events`]).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::Record;

/// A calendar event imported from an ICS document.
///
/// Timestamps are naive local times; no timezone conversion is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Completed,
}

impl EventStatus {
    pub fn from_done(done: bool) -> Self {
        if done {
            EventStatus::Completed
        } else {
            EventStatus::Pending
        }
    }

    pub fn is_completed(self) -> bool {
        self == EventStatus::Completed
    }
}

impl Record for CalendarEvent {
    fn id(&self) -> &str {
        &self.id
    }
}

impl CalendarEvent {
    /// Human-readable time span, e.g. `Sun Jun 15 09:00 - 10:30`.
    pub fn render_time(&self) -> String {
        if self.start.date() == self.end.date() {
            format!(
                "{} - {}",
                self.start.format("%a %b %-d %H:%M"),
                self.end.format("%H:%M")
            )
        } else {
            format!(
                "{} - {}",
                self.start.format("%a %b %-d %H:%M"),
                self.end.format("%a %b %-d %H:%M")
            )
        }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}
