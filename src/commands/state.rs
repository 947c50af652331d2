use std::path::Path;

use anyhow::{Context, Result};
use tripkit_core::import::{JSON_TYPES, read_import_file};

use crate::app::App;
use crate::render::Render;

pub fn export(app: &App, output: Option<&Path>) -> Result<()> {
    let json = app.store.export_state()?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported state to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn restore(app: &mut App, file: &Path) -> Result<()> {
    let content = match read_import_file(file, JSON_TYPES, app.config.max_import_bytes) {
        Ok(content) => content,
        Err(e) => {
            app.store.log_error(&e);
            return Err(e).with_context(|| format!("Could not restore {}", file.display()));
        }
    };

    app.store
        .import_state(&content)
        .with_context(|| format!("Could not restore {}", file.display()))?;
    println!("Restored state from {}", file.display());
    Ok(())
}

pub fn errors(app: &App) -> Result<()> {
    let mut any = false;
    for entry in app.store.errors() {
        println!("{}", entry.render());
        if let Some(stack) = &entry.stack {
            for line in stack.lines() {
                println!("    caused by: {}", line);
            }
        }
        any = true;
    }

    if !any {
        println!("No recorded errors.");
    }
    Ok(())
}

pub fn reset(app: &mut App) -> Result<()> {
    app.store.reset()?;
    println!("Cleared all stored state.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripkit_core::config::TripConfig;
    use tripkit_core::{StatusMap, TargetStatus};

    fn app_in(dir: &Path) -> App {
        App::with_config(TripConfig {
            data_dir: dir.join("data"),
            ..TripConfig::default()
        })
    }

    #[test]
    fn test_export_then_restore_into_fresh_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.json");

        let mut app = app_in(&dir.path().join("a"));
        app.store.mark_tip_read("t1").unwrap();
        app.store
            .update_person_status("p1", TargetStatus::Connected)
            .unwrap();
        export(&app, Some(&backup)).unwrap();

        let mut restored = app_in(&dir.path().join("b"));
        restore(&mut restored, &backup).unwrap();

        assert!(restored.store.is_flagged(StatusMap::TipRead, "t1"));
        assert_eq!(
            restored.store.state().people_status.get("p1"),
            Some(&TargetStatus::Connected)
        );
    }

    #[test]
    fn test_restore_rejects_invalid_backup() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.json");
        std::fs::write(&backup, r#"{"tipsRead": {}}"#).unwrap();

        let mut app = app_in(dir.path());
        assert!(restore(&mut app, &backup).is_err());
        assert_eq!(app.store.errors().count(), 1);
    }
}
