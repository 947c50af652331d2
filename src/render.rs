//! Terminal rendering for tripkit-core types.
//!
//! Extension traits that add colored output with owo_colors.

use chrono::DateTime;
use owo_colors::OwoColorize;
use tripkit_core::store::ErrorEntry;
use tripkit_core::{CalendarEvent, EventStatus, MergeSummary, NetworkingTarget, TargetStatus};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventStatus {
    fn render(&self) -> String {
        match self {
            EventStatus::Completed => "[x]".green().to_string(),
            EventStatus::Pending => "[ ]".dimmed().to_string(),
        }
    }
}

impl Render for TargetStatus {
    fn render(&self) -> String {
        match self {
            TargetStatus::NotMet => self.label().dimmed().to_string(),
            TargetStatus::Connected => self.label().yellow().to_string(),
            TargetStatus::FollowedUp => self.label().green().to_string(),
        }
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {}",
            self.status.render(),
            self.summary,
            self.render_time().dimmed()
        );
        if let Some(location) = &self.location {
            line.push_str(&format!(" @ {}", location));
        }
        line
    }
}

impl Render for NetworkingTarget {
    fn render(&self) -> String {
        let status = self.status.unwrap_or_default();
        match &self.title {
            Some(title) => format!("{} ({}) {}", self.name, title.dimmed(), status.render()),
            None => format!("{} {}", self.name, status.render()),
        }
    }
}

impl Render for MergeSummary {
    fn render(&self) -> String {
        format!("{} added, {} already present", self.added, self.skipped)
    }
}

impl Render for ErrorEntry {
    fn render(&self) -> String {
        let when = DateTime::from_timestamp_millis(self.timestamp)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| self.timestamp.to_string());
        format!("{} {}", when.dimmed(), self.message.red())
    }
}

/// A tip line: star marker, read marker, content.
pub fn render_tip(content: &str, read: bool, starred: bool) -> String {
    let star = if starred { "*".yellow().to_string() } else { " ".to_string() };
    if read {
        format!("{} {}", star, content.dimmed())
    } else {
        format!("{} {}", star, content.bold())
    }
}
