pub mod checklist;
pub mod defaults;
pub mod events;
pub mod import;
pub mod people;
pub mod state;
pub mod tips;
