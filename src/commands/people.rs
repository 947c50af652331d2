use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use tripkit_core::TargetStatus;

use crate::app::App;
use crate::fetch;
use crate::render::Render;

pub async fn list(app: &mut App) -> Result<()> {
    let defaults = fetch::default_networking(app).await;
    let targets = app.store.networking(&defaults);

    if targets.is_empty() {
        println!("No networking targets. Import some with `tripkit import networking <file>`.");
        return Ok(());
    }

    for target in &targets {
        println!("{}", target.render());
        println!("    {}", target.id.dimmed());
        for question in &target.questions {
            println!("    ? {}", question);
        }
    }
    Ok(())
}

/// Set an explicit status, or advance the resolved one.
pub async fn update(app: &mut App, person_id: &str, status: Option<TargetStatus>) -> Result<()> {
    if let Some(status) = status {
        app.store.update_person_status(person_id, status)?;
        println!("{} is now {}", person_id, status.render());
        return Ok(());
    }

    let defaults = fetch::default_networking(app).await;
    let Some(mut target) = app
        .store
        .networking(&defaults)
        .into_iter()
        .find(|t| t.id == person_id)
    else {
        bail!("Person '{}' not found", person_id);
    };

    let next = app.store.cycle_person_status(&mut target)?;
    println!("{} is now {}", target.name, next.render());
    Ok(())
}

pub async fn contacts(app: &mut App) -> Result<()> {
    let defaults = fetch::default_contacts(app).await;
    let contacts = app.store.contacts(&defaults);

    if contacts.is_empty() {
        println!("No contacts.");
        return Ok(());
    }

    for contact in &contacts {
        let details: Vec<&str> = [&contact.title, &contact.email, &contact.phone]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect();
        if details.is_empty() {
            println!("{}", contact.name);
        } else {
            println!("{} {}", contact.name, details.join(" | ").dimmed());
        }
    }
    Ok(())
}
