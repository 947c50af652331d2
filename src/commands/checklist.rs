use anyhow::Result;
use tripkit_core::EventStatus;

use crate::app::App;
use crate::render::Render;

pub fn toggle(app: &mut App, section: &str, item: &str) -> Result<()> {
    let done = app.store.toggle_checklist_item(section, item)?;
    println!("{} {} - {}", EventStatus::from_done(done).render(), section, item);
    Ok(())
}
