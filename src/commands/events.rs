use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use tripkit_core::EventStatus;

use crate::app::App;
use crate::render::Render;

pub fn list(app: &App, all: bool) -> Result<()> {
    let mut events = app.store.events();

    if events.is_empty() {
        println!("No events. Import a calendar with `tripkit import calendar <file>`.");
        return Ok(());
    }

    events.sort_by_key(|e| e.start);

    for event in events.iter().filter(|e| all || !e.status.is_completed()) {
        println!("{}", event.render());
        println!("    {}", event.id.dimmed());
    }

    Ok(())
}

pub fn toggle(app: &mut App, event_id: &str) -> Result<()> {
    let Some(event) = app.store.events().into_iter().find(|e| e.id == event_id) else {
        bail!("Event '{}' not found", event_id);
    };

    let status = app.store.toggle_event_status(event_id)?;
    match status {
        EventStatus::Completed => println!("{} {}", status.render(), event.summary),
        EventStatus::Pending => println!("{} {} (reopened)", status.render(), event.summary),
    }
    Ok(())
}
