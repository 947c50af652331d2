//! Loading bundled default data from a URL or a local path.

use anyhow::{Context, Result, bail};
use log::{debug, info};
use owo_colors::OwoColorize;
use reqwest::Client;
use tripkit_core::ics::parse_ics;
use tripkit_core::{Collection, CollectionKind, Contact, NetworkingTarget, NetworkingTip};

use crate::app::App;

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read a default data source as text. Non-success HTTP responses are errors.
pub async fn fetch_text(client: &Client, source: &str) -> Result<String> {
    if !is_remote(source) {
        return tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read default data. Path: {}", source));
    }

    let response = client
        .get(source)
        .send()
        .await
        .with_context(|| format!("Failed to fetch default data. URL: {}", source))?;

    if !response.status().is_success() {
        bail!(
            "Failed to fetch default data. Status code: {} URL: {}",
            response.status(),
            source
        );
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read default data. URL: {}", source))
}

/// Fetch and decode the bundled records of `kind`.
///
/// Returns `Ok(None)` when defaults are turned off or no source is configured.
pub async fn fetch_defaults(app: &App, kind: CollectionKind) -> Result<Option<Collection>> {
    if !app.store.use_default_data() {
        debug!("Skipping default {kind}: useDefaultData is off");
        return Ok(None);
    }

    let Some(source) = app.config.default_source(kind) else {
        debug!("No default source configured for {kind}");
        return Ok(None);
    };

    info!("Loading default {kind} from {source}");
    let text = fetch_text(app.client(), source).await?;

    let batch = match kind {
        CollectionKind::Calendar => {
            let events = parse_ics(&text);
            if events.is_empty() {
                bail!("No events found in default calendar. Source: {}", source);
            }
            Collection::Calendar(events)
        }
        _ => Collection::from_json(kind, &text)
            .with_context(|| format!("Invalid default data format. Source: {}", source))?,
    };

    Ok(Some(batch))
}

/// Like [`fetch_defaults`], but failures are reported, logged and treated as
/// "no defaults" so listing still works.
async fn defaults_or_none(app: &mut App, kind: CollectionKind) -> Option<Collection> {
    match fetch_defaults(app, kind).await {
        Ok(batch) => batch,
        Err(e) => {
            let e = app.fail(e);
            eprintln!("{}", format!("Could not load default {kind}: {e:#}").red());
            None
        }
    }
}

pub async fn default_tips(app: &mut App) -> Vec<NetworkingTip> {
    match defaults_or_none(app, CollectionKind::NetworkingTips).await {
        Some(Collection::NetworkingTips(tips)) => tips,
        _ => Vec::new(),
    }
}

pub async fn default_contacts(app: &mut App) -> Vec<Contact> {
    match defaults_or_none(app, CollectionKind::Contacts).await {
        Some(Collection::Contacts(contacts)) => contacts,
        _ => Vec::new(),
    }
}

pub async fn default_networking(app: &mut App) -> Vec<NetworkingTarget> {
    match defaults_or_none(app, CollectionKind::Networking).await {
        Some(Collection::Networking(targets)) => targets,
        _ => Vec::new(),
    }
}
