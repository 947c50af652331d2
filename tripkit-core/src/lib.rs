//! Core types for tripkit.
//!
//! - `ics` turns calendar text into [`CalendarEvent`]s
//! - `store` owns the persisted trip state and its merge rules
//! - `import` and `config` cover file validation and settings

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod import;
pub mod networking;
pub mod record;
pub mod store;

pub use error::{StoreError, StoreResult, ValidationError};
pub use event::{CalendarEvent, EventStatus};
pub use networking::{Contact, NetworkingTarget, NetworkingTip, TargetStatus};
pub use record::{MergeSummary, Record};
pub use store::{Collection, CollectionKind, StatusMap, Store};
