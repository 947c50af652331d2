//! Tips, contacts and networking targets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::Record;

/// A networking tip, shown with read/starred/hidden flags kept by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkingTip {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A person worth meeting during the trip.
///
/// `status` is a cached projection; the store's `peopleStatus` map wins when
/// it has an entry for this id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkingTarget {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub personal_details: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_details: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TargetStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetStatus {
    #[default]
    NotMet,
    Connected,
    FollowedUp,
}

impl TargetStatus {
    pub fn label(self) -> &'static str {
        match self {
            TargetStatus::NotMet => "Not Met",
            TargetStatus::Connected => "Connected",
            TargetStatus::FollowedUp => "Followed Up",
        }
    }

    /// Next status in the cycle `not-met -> connected -> followed-up -> not-met`.
    pub fn next(self) -> Self {
        match self {
            TargetStatus::NotMet => TargetStatus::Connected,
            TargetStatus::Connected => TargetStatus::FollowedUp,
            TargetStatus::FollowedUp => TargetStatus::NotMet,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetStatus::NotMet => "not-met",
            TargetStatus::Connected => "connected",
            TargetStatus::FollowedUp => "followed-up",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Record for NetworkingTip {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Contact {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for NetworkingTarget {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle_wraps_around() {
        let mut status = TargetStatus::NotMet;
        status = status.next();
        assert_eq!(status, TargetStatus::Connected);
        status = status.next();
        assert_eq!(status, TargetStatus::FollowedUp);
        assert_eq!(status.next(), TargetStatus::NotMet);
    }

    #[test]
    fn test_status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&TargetStatus::FollowedUp).unwrap();
        assert_eq!(json, "\"followed-up\"");
        let status: TargetStatus = serde_json::from_str("\"not-met\"").unwrap();
        assert_eq!(status, TargetStatus::NotMet);
        assert!(serde_json::from_str::<TargetStatus>("\"met\"").is_err());
    }

    #[test]
    fn test_target_decodes_with_only_required_fields() {
        let target: NetworkingTarget =
            serde_json::from_str(r#"{"id":"p1","name":"Ada"}"#).unwrap();
        assert_eq!(target.status, None);
        assert!(target.questions.is_empty());
    }
}
