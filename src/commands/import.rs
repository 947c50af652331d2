use std::path::Path;

use anyhow::{Context, Result};
use tripkit_core::import::{CALENDAR_TYPES, JSON_TYPES, read_import_file};
use tripkit_core::{Collection, CollectionKind, StoreError};

use crate::app::App;
use crate::render::Render;

pub fn run(app: &mut App, kind: CollectionKind, file: &Path, merge: bool) -> Result<()> {
    let allowed = match kind {
        CollectionKind::Calendar => CALENDAR_TYPES,
        _ => JSON_TYPES,
    };

    let content = match read_import_file(file, allowed, app.config.max_import_bytes) {
        Ok(content) => content,
        Err(e) => {
            app.store.log_error(&e);
            return Err(e).with_context(|| format!("Could not import {}", file.display()));
        }
    };

    let source = file.display().to_string();

    if kind == CollectionKind::Calendar {
        let summary = app.store.import_calendar_text(&content, &source)?;
        println!("Imported {}: {}", source, summary.render());
        return Ok(());
    }

    let batch = match Collection::from_json(kind, &content) {
        Ok(batch) => batch,
        Err(e) => {
            let err = StoreError::from(e);
            app.store.log_error(&err);
            return Err(err).with_context(|| format!("Could not import {}", source));
        }
    };

    if merge {
        let summary = app.store.import_collection(batch)?;
        println!("Merged {} into {}: {}", source, kind, summary.render());
    } else {
        let count = batch.len();
        app.store.replace_collection(batch)?;
        println!("Replaced {} with {} records from {}", kind, count, source);
    }

    Ok(())
}
