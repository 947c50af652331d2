//! The single owner of trip state.
//!
//! A [`Store`] is built explicitly around a [`StateStorage`] backend and one
//! storage key, hydrated with [`Store::open`], and written through to storage
//! after every mutation. Callers hold it by `&mut`, so mutations never
//! interleave.

mod collection;
mod state;
mod storage;

pub use collection::{Collection, CollectionKind};
pub use state::{AppState, CustomData, ErrorEntry, FlagMap, MAX_ERROR_ENTRIES, Snapshot};
pub use storage::{FileStorage, MemoryStorage, StateStorage};

use std::error::Error;

use log::{debug, error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::event::{CalendarEvent, EventStatus};
use crate::ics::parse_ics_with_report;
use crate::networking::{Contact, NetworkingTarget, NetworkingTip, TargetStatus};
use crate::record::{MergeSummary, Record, merge_first_write_wins, with_defaults};

/// Storage key used when the configuration does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "vegas-app-state";

/// The boolean maps [`Store::toggle_status`] can flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMap {
    TipRead,
    TipStarred,
    TipHidden,
    EventDone,
    ChecklistItem,
}

/// Key of a checklist item in the completion map.
pub fn checklist_key(section: &str, item: &str) -> String {
    format!("{section}-{item}")
}

pub struct Store<S: StateStorage> {
    storage: S,
    key: String,
    state: AppState,
}

impl<S: StateStorage> Store<S> {
    /// A store with empty defaults. Nothing is read until [`Store::load_from_storage`].
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Store {
            storage,
            key: key.into(),
            state: AppState::default(),
        }
    }

    /// Construct and hydrate from storage.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let mut store = Self::new(storage, key);
        store.load_from_storage();
        store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // PERSISTENCE:

    /// Replace in-memory state with the stored blob.
    ///
    /// A missing, unreadable or corrupt entry yields the default state.
    pub fn load_from_storage(&mut self) {
        self.state = match self.storage.read(&self.key) {
            Ok(Some(raw)) => AppState::from_storage(&raw).unwrap_or_else(|| {
                warn!("Stored state under '{}' is corrupt, starting fresh", self.key);
                AppState::default()
            }),
            Ok(None) => AppState::default(),
            Err(e) => {
                warn!("Could not read stored state '{}': {e}", self.key);
                AppState::default()
            }
        };
    }

    /// Serialize the full state to the storage key.
    pub fn save_to_storage(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.state)?;
        self.storage.write(&self.key, &json)?;
        debug!("Saved state to '{}' ({} bytes)", self.key, json.len());
        Ok(())
    }

    /// Write-through after a mutation. A failed save is recorded in memory only.
    fn commit(&mut self) -> StoreResult<()> {
        match self.save_to_storage() {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Failed to save state: {e}");
                self.push_error_entry(&e);
                Err(e)
            }
        }
    }

    /// Drop the stored entry and return to defaults.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.storage.remove(&self.key)?;
        self.state = AppState::default();
        info!("Cleared stored state '{}'", self.key);
        Ok(())
    }

    // ERROR LOG:

    /// Record an error in the bounded log and persist it.
    pub fn log_error(&mut self, error: &dyn Error) {
        error!("Application error: {error}");
        self.push_error_entry(error);
        if let Err(e) = self.save_to_storage() {
            warn!("Could not persist error log: {e}");
        }
    }

    fn push_error_entry(&mut self, error: &dyn Error) {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        self.state.errors.push_back(ErrorEntry {
            message: error.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        });
        while self.state.errors.len() > MAX_ERROR_ENTRIES {
            self.state.errors.pop_front();
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.state.errors.iter()
    }

    // FLAGS:

    fn flags(&self, map: StatusMap) -> &FlagMap {
        match map {
            StatusMap::TipRead => &self.state.tips_read,
            StatusMap::TipStarred => &self.state.tips_starred,
            StatusMap::TipHidden => &self.state.tips_hidden,
            StatusMap::EventDone => &self.state.calendar_done,
            StatusMap::ChecklistItem => &self.state.checklist_done,
        }
    }

    fn flags_mut(&mut self, map: StatusMap) -> &mut FlagMap {
        match map {
            StatusMap::TipRead => &mut self.state.tips_read,
            StatusMap::TipStarred => &mut self.state.tips_starred,
            StatusMap::TipHidden => &mut self.state.tips_hidden,
            StatusMap::EventDone => &mut self.state.calendar_done,
            StatusMap::ChecklistItem => &mut self.state.checklist_done,
        }
    }

    pub fn is_flagged(&self, map: StatusMap, key: &str) -> bool {
        self.flags(map).get(key).copied().unwrap_or(false)
    }

    /// Flip the flag at `key`, returning its new value.
    pub fn toggle_status(&mut self, map: StatusMap, key: &str) -> StoreResult<bool> {
        let flag = self.flags_mut(map).entry(key.to_string()).or_insert(false);
        *flag = !*flag;
        let value = *flag;
        self.commit()?;
        Ok(value)
    }

    pub fn set_status(&mut self, map: StatusMap, key: &str, value: bool) -> StoreResult<()> {
        self.flags_mut(map).insert(key.to_string(), value);
        self.commit()
    }

    pub fn mark_tip_read(&mut self, tip_id: &str) -> StoreResult<()> {
        self.set_status(StatusMap::TipRead, tip_id, true)
    }

    pub fn mark_event_done(&mut self, event_id: &str) -> StoreResult<()> {
        self.set_status(StatusMap::EventDone, event_id, true)
    }

    /// Flip an event between pending and completed.
    pub fn toggle_event_status(&mut self, event_id: &str) -> StoreResult<EventStatus> {
        let embedded = self
            .state
            .custom_data
            .calendar
            .iter()
            .flatten()
            .find(|e| e.id == event_id)
            .map_or(EventStatus::Pending, |e| e.status);
        let current = self.event_done(event_id, embedded);
        self.set_status(StatusMap::EventDone, event_id, !current)?;
        Ok(EventStatus::from_done(!current))
    }

    pub fn toggle_checklist_item(&mut self, section: &str, item: &str) -> StoreResult<bool> {
        self.toggle_status(StatusMap::ChecklistItem, &checklist_key(section, item))
    }

    pub fn is_checklist_item_completed(&self, section: &str, item: &str) -> bool {
        self.is_flagged(StatusMap::ChecklistItem, &checklist_key(section, item))
    }

    fn event_done(&self, event_id: &str, embedded: EventStatus) -> bool {
        self.state
            .calendar_done
            .get(event_id)
            .copied()
            .unwrap_or(embedded.is_completed())
    }

    // PEOPLE:

    pub fn update_person_status(&mut self, person_id: &str, status: TargetStatus) -> StoreResult<()> {
        self.state
            .people_status
            .insert(person_id.to_string(), status);
        self.commit()
    }

    /// The stored status wins; the record's own status is only a fallback.
    pub fn person_status(&self, target: &NetworkingTarget) -> TargetStatus {
        self.state
            .people_status
            .get(&target.id)
            .copied()
            .or(target.status)
            .unwrap_or_default()
    }

    /// Resolve the status and write it onto the record for display.
    pub fn resolve_target(&self, target: &mut NetworkingTarget) -> TargetStatus {
        let status = self.person_status(target);
        target.status = Some(status);
        status
    }

    /// Advance `not-met -> connected -> followed-up -> not-met`.
    pub fn cycle_person_status(&mut self, target: &mut NetworkingTarget) -> StoreResult<TargetStatus> {
        let next = self.person_status(target).next();
        target.status = Some(next);
        self.update_person_status(&target.id, next)?;
        Ok(next)
    }

    // COLLECTIONS:

    /// Merge a batch into `customData`; ids already present are kept as-is.
    pub fn import_collection(&mut self, batch: Collection) -> StoreResult<MergeSummary> {
        let kind = batch.kind();
        let custom = &mut self.state.custom_data;
        let summary = match batch {
            Collection::Calendar(records) => {
                merge_first_write_wins(custom.calendar.get_or_insert_with(Vec::new), records)
            }
            Collection::NetworkingTips(records) => merge_first_write_wins(
                custom.networking_tips.get_or_insert_with(Vec::new),
                records,
            ),
            Collection::Contacts(records) => {
                merge_first_write_wins(custom.contacts.get_or_insert_with(Vec::new), records)
            }
            Collection::Networking(records) => {
                merge_first_write_wins(custom.networking.get_or_insert_with(Vec::new), records)
            }
        };

        info!(
            "Imported {kind}: {} added, {} already present",
            summary.added, summary.skipped
        );
        self.commit()?;
        Ok(summary)
    }

    /// Replace the stored collection of the batch's kind wholesale.
    pub fn replace_collection(&mut self, batch: Collection) -> StoreResult<()> {
        let kind = batch.kind();
        let count = batch.len();
        let custom = &mut self.state.custom_data;
        match batch {
            Collection::Calendar(records) => custom.calendar = Some(records),
            Collection::NetworkingTips(records) => custom.networking_tips = Some(records),
            Collection::Contacts(records) => custom.contacts = Some(records),
            Collection::Networking(records) => custom.networking = Some(records),
        }

        info!("Replaced {kind} with {count} records");
        self.commit()
    }

    /// Parse ICS text and merge its events into the calendar.
    ///
    /// Fails with [`StoreError::NoEvents`] when nothing usable was found.
    pub fn import_calendar_text(&mut self, content: &str, source: &str) -> StoreResult<MergeSummary> {
        let report = parse_ics_with_report(content);
        if report.dropped > 0 {
            debug!("{source}: skipped {} incomplete events", report.dropped);
        }

        if report.events.is_empty() {
            let err = StoreError::NoEvents(source.to_string());
            self.log_error(&err);
            return Err(err);
        }

        self.import_collection(Collection::Calendar(report.events))
    }

    pub fn use_default_data(&self) -> bool {
        self.state.use_default_data
    }

    pub fn set_use_default_data(&mut self, enabled: bool) -> StoreResult<()> {
        self.state.use_default_data = enabled;
        self.commit()
    }

    /// Imported events with `status` projected from the done map.
    pub fn events(&self) -> Vec<CalendarEvent> {
        self.state
            .custom_data
            .calendar
            .iter()
            .flatten()
            .map(|event| {
                let mut event = event.clone();
                event.status = EventStatus::from_done(self.event_done(&event.id, event.status));
                event
            })
            .collect()
    }

    pub fn tips(&self, defaults: &[NetworkingTip]) -> Vec<NetworkingTip> {
        self.visible(self.state.custom_data.networking_tips.as_deref(), defaults)
    }

    pub fn contacts(&self, defaults: &[Contact]) -> Vec<Contact> {
        self.visible(self.state.custom_data.contacts.as_deref(), defaults)
    }

    /// Networking targets with each status resolved.
    pub fn networking(&self, defaults: &[NetworkingTarget]) -> Vec<NetworkingTarget> {
        let mut targets = self.visible(self.state.custom_data.networking.as_deref(), defaults);
        for target in &mut targets {
            self.resolve_target(target);
        }
        targets
    }

    fn visible<T: Record>(&self, imported: Option<&[T]>, defaults: &[T]) -> Vec<T> {
        with_defaults(imported.unwrap_or(&[]), defaults, self.state.use_default_data)
    }

    // EXPORT / RESTORE:

    /// Pretty-printed state without the error log.
    pub fn export_state(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.state.snapshot())?)
    }

    /// Validate and commit an exported document. On failure nothing changes
    /// except the error log.
    pub fn import_state(&mut self, text: &str) -> StoreResult<()> {
        match Snapshot::decode(text) {
            Ok(snapshot) => {
                self.state.restore(snapshot);
                info!("Restored state from export");
                self.commit()
            }
            Err(e) => {
                let err = StoreError::Validation(e);
                self.log_error(&err);
                Err(err)
            }
        }
    }
}
