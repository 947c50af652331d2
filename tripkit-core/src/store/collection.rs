//! Typed batches for the four importable collections.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::ValidationError;
use crate::event::CalendarEvent;
use crate::networking::{Contact, NetworkingTarget, NetworkingTip};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Calendar,
    NetworkingTips,
    Contacts,
    Networking,
}

impl CollectionKind {
    /// Key under `customData` in the persisted state.
    pub fn key(self) -> &'static str {
        match self {
            CollectionKind::Calendar => "calendar",
            CollectionKind::NetworkingTips => "networkingTips",
            CollectionKind::Contacts => "contacts",
            CollectionKind::Networking => "networking",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A batch of records of one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Calendar(Vec<CalendarEvent>),
    NetworkingTips(Vec<NetworkingTip>),
    Contacts(Vec<Contact>),
    Networking(Vec<NetworkingTarget>),
}

fn decode_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ValidationError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ValidationError::InvalidFormat(e.to_string()))?;
    if !value.is_array() {
        return Err(ValidationError::InvalidFormat(
            "expected a JSON array of records".into(),
        ));
    }
    serde_json::from_value(value).map_err(|e| ValidationError::InvalidFormat(e.to_string()))
}

impl Collection {
    /// Decode a JSON array of `kind` records, rejecting anything else.
    pub fn from_json(kind: CollectionKind, text: &str) -> Result<Collection, ValidationError> {
        Ok(match kind {
            CollectionKind::Calendar => Collection::Calendar(decode_array(text)?),
            CollectionKind::NetworkingTips => Collection::NetworkingTips(decode_array(text)?),
            CollectionKind::Contacts => Collection::Contacts(decode_array(text)?),
            CollectionKind::Networking => Collection::Networking(decode_array(text)?),
        })
    }

    pub fn kind(&self) -> CollectionKind {
        match self {
            Collection::Calendar(_) => CollectionKind::Calendar,
            Collection::NetworkingTips(_) => CollectionKind::NetworkingTips,
            Collection::Contacts(_) => CollectionKind::Contacts,
            Collection::Networking(_) => CollectionKind::Networking,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Calendar(v) => v.len(),
            Collection::NetworkingTips(v) => v.len(),
            Collection::Contacts(v) => v.len(),
            Collection::Networking(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_decodes_tips() {
        let text = r#"[{"id": "t1", "content": "Bring cards", "tags": ["prep"]}]"#;
        let batch = Collection::from_json(CollectionKind::NetworkingTips, text).unwrap();

        assert_eq!(batch.kind(), CollectionKind::NetworkingTips);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_from_json_rejects_objects() {
        let err = Collection::from_json(CollectionKind::Contacts, r#"{"id": "c1"}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidFormat("expected a JSON array of records".into())
        );
    }

    #[test]
    fn test_from_json_rejects_records_missing_required_fields() {
        let result = Collection::from_json(CollectionKind::Networking, r#"[{"id": "p1"}]"#);
        assert!(matches!(result, Err(ValidationError::InvalidFormat(_))));
    }
}
