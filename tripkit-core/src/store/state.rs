//! The persisted application state and its two decoders.
//!
//! [`AppState::from_storage`] is lenient: every top-level field falls back to
//! its own default, so legacy or partially written blobs still load.
//! [`Snapshot::decode`] is strict and backs user-driven state restores.

use std::collections::{BTreeMap, VecDeque};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::event::CalendarEvent;
use crate::networking::{Contact, NetworkingTarget, NetworkingTip, TargetStatus};

/// Number of error entries kept; older ones are evicted first.
pub const MAX_ERROR_ENTRIES: usize = 10;

pub type FlagMap = BTreeMap<String, bool>;

/// Root of everything written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub tips_read: FlagMap,
    pub tips_starred: FlagMap,
    pub tips_hidden: FlagMap,
    pub calendar_done: FlagMap,
    #[serde(rename = "homeCompletedItems")]
    pub checklist_done: FlagMap,
    pub people_status: BTreeMap<String, TargetStatus>,
    pub custom_data: CustomData,
    pub use_default_data: bool,
    pub errors: VecDeque<ErrorEntry>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            tips_read: FlagMap::new(),
            tips_starred: FlagMap::new(),
            tips_hidden: FlagMap::new(),
            calendar_done: FlagMap::new(),
            checklist_done: FlagMap::new(),
            people_status: BTreeMap::new(),
            custom_data: CustomData::default(),
            use_default_data: true,
            errors: VecDeque::new(),
        }
    }
}

/// Imported collections, one slot per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<Vec<CalendarEvent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking_tips: Option<Vec<NetworkingTip>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<Contact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking: Option<Vec<NetworkingTarget>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

fn field_or_default<T: DeserializeOwned + Default>(obj: &Map<String, Value>, key: &str) -> T {
    obj.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

impl AppState {
    /// Decode a stored blob, defaulting each field that is missing or malformed.
    ///
    /// Returns `None` only when the blob is not a JSON object at all.
    pub fn from_storage(raw: &str) -> Option<AppState> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let obj = value.as_object()?;

        let custom_data = obj
            .get("customData")
            .and_then(Value::as_object)
            .map(|custom| CustomData {
                calendar: field_or_default(custom, "calendar"),
                networking_tips: field_or_default(custom, "networkingTips"),
                contacts: field_or_default(custom, "contacts"),
                networking: field_or_default(custom, "networking"),
            })
            .unwrap_or_default();

        let mut errors: VecDeque<ErrorEntry> = field_or_default(obj, "errors");
        while errors.len() > MAX_ERROR_ENTRIES {
            errors.pop_front();
        }

        Some(AppState {
            tips_read: field_or_default(obj, "tipsRead"),
            tips_starred: field_or_default(obj, "tipsStarred"),
            tips_hidden: field_or_default(obj, "tipsHidden"),
            calendar_done: field_or_default(obj, "calendarDone"),
            checklist_done: field_or_default(obj, "homeCompletedItems"),
            people_status: field_or_default(obj, "peopleStatus"),
            custom_data,
            use_default_data: obj
                .get("useDefaultData")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            errors,
        })
    }

    /// Everything except the error log.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tips_read: self.tips_read.clone(),
            tips_starred: self.tips_starred.clone(),
            tips_hidden: self.tips_hidden.clone(),
            calendar_done: self.calendar_done.clone(),
            checklist_done: self.checklist_done.clone(),
            people_status: self.people_status.clone(),
            custom_data: self.custom_data.clone(),
            use_default_data: self.use_default_data,
        }
    }

    /// Replace every exported field, keeping the current error log.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.tips_read = snapshot.tips_read;
        self.tips_starred = snapshot.tips_starred;
        self.tips_hidden = snapshot.tips_hidden;
        self.calendar_done = snapshot.calendar_done;
        self.checklist_done = snapshot.checklist_done;
        self.people_status = snapshot.people_status;
        self.custom_data = snapshot.custom_data;
        self.use_default_data = snapshot.use_default_data;
    }
}

/// The user-facing export format: [`AppState`] without `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tips_read: FlagMap,
    pub tips_starred: FlagMap,
    #[serde(default)]
    pub tips_hidden: FlagMap,
    pub calendar_done: FlagMap,
    #[serde(default, rename = "homeCompletedItems")]
    pub checklist_done: FlagMap,
    pub people_status: BTreeMap<String, TargetStatus>,
    pub custom_data: CustomData,
    #[serde(default = "default_true")]
    pub use_default_data: bool,
}

fn default_true() -> bool {
    true
}

enum Shape {
    Object,
    Bool,
}

impl Shape {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Shape::Object => value.is_object(),
            Shape::Bool => value.is_boolean(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Shape::Object => "an object",
            Shape::Bool => "a boolean",
        }
    }
}

/// (field, shape, required)
const SNAPSHOT_FIELDS: &[(&str, Shape, bool)] = &[
    ("tipsRead", Shape::Object, true),
    ("tipsStarred", Shape::Object, true),
    ("calendarDone", Shape::Object, true),
    ("peopleStatus", Shape::Object, true),
    ("customData", Shape::Object, true),
    ("tipsHidden", Shape::Object, false),
    ("homeCompletedItems", Shape::Object, false),
    ("useDefaultData", Shape::Bool, false),
];

impl Snapshot {
    /// Strictly decode an exported state document.
    ///
    /// Checks the top-level shape first so the error names the offending
    /// field, then decodes the typed contents.
    pub fn decode(text: &str) -> Result<Snapshot, ValidationError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ValidationError::InvalidFormat(e.to_string()))?;
        let obj = value
            .as_object()
            .ok_or_else(|| ValidationError::InvalidFormat("expected a JSON object".into()))?;

        for (field, shape, required) in SNAPSHOT_FIELDS {
            match obj.get(*field) {
                Some(v) if shape.matches(v) => {}
                None if !required => {}
                _ => {
                    return Err(ValidationError::InvalidField {
                        field: *field,
                        expected: shape.describe(),
                    });
                }
            }
        }

        serde_json::from_value(value).map_err(|e| ValidationError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_bundled_data() {
        assert!(AppState::default().use_default_data);
    }

    #[test]
    fn test_from_storage_defaults_each_field_independently() {
        let raw = r#"{
            "tipsRead": {"t1": true},
            "tipsStarred": "not a map",
            "peopleStatus": {"p1": "connected"},
            "errors": [{"message": "boom", "timestamp": 1}]
        }"#;

        let state = AppState::from_storage(raw).unwrap();
        assert_eq!(state.tips_read.get("t1"), Some(&true));
        assert!(state.tips_starred.is_empty());
        assert_eq!(
            state.people_status.get("p1"),
            Some(&TargetStatus::Connected)
        );
        assert!(state.use_default_data);
        assert_eq!(state.errors.len(), 1);
        assert_eq!(state.custom_data, CustomData::default());
    }

    #[test]
    fn test_from_storage_keeps_good_collections_when_one_is_bad() {
        let raw = r#"{
            "customData": {
                "networkingTips": [{"id": "t1", "content": "Say hi"}],
                "contacts": [{"name": "missing id"}]
            }
        }"#;

        let state = AppState::from_storage(raw).unwrap();
        assert_eq!(state.custom_data.networking_tips.unwrap().len(), 1);
        assert!(state.custom_data.contacts.is_none());
    }

    #[test]
    fn test_from_storage_rejects_non_objects() {
        assert!(AppState::from_storage("{not json").is_none());
        assert!(AppState::from_storage("[1, 2]").is_none());
    }

    #[test]
    fn test_from_storage_trims_oversized_error_log() {
        let errors: Vec<String> = (0..15)
            .map(|i| format!(r#"{{"message":"e{i}","timestamp":{i}}}"#))
            .collect();
        let raw = format!(r#"{{"errors":[{}]}}"#, errors.join(","));

        let state = AppState::from_storage(&raw).unwrap();
        assert_eq!(state.errors.len(), MAX_ERROR_ENTRIES);
        assert_eq!(state.errors.front().unwrap().message, "e5");
    }

    #[test]
    fn test_decode_requires_container_fields() {
        let err = Snapshot::decode(r#"{"tipsRead": {}, "tipsStarred": {}}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidField {
                field: "calendarDone",
                expected: "an object",
            }
        );
    }

    #[test]
    fn test_decode_rejects_wrong_container_type() {
        let text = r#"{"tipsRead": [], "tipsStarred": {}, "calendarDone": {},
                       "peopleStatus": {}, "customData": {}}"#;
        let err = Snapshot::decode(text).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "tipsRead", .. }));
    }

    #[test]
    fn test_decode_rejects_bad_enum_values() {
        let text = r#"{"tipsRead": {}, "tipsStarred": {}, "calendarDone": {},
                       "peopleStatus": {"p1": "best-friends"}, "customData": {}}"#;
        assert!(matches!(
            Snapshot::decode(text),
            Err(ValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_accepts_minimal_document() {
        let text = r#"{"tipsRead": {}, "tipsStarred": {}, "calendarDone": {},
                       "peopleStatus": {}, "customData": {}}"#;
        let snapshot = Snapshot::decode(text).unwrap();
        assert!(snapshot.use_default_data);
        assert!(snapshot.tips_hidden.is_empty());
    }
}
