use anyhow::Result;
use tripkit_core::CollectionKind;

use crate::app::App;
use crate::fetch;
use crate::render::Render;

/// Fetch the bundled calendar and merge it; existing events keep their fields.
pub async fn load(app: &mut App) -> Result<()> {
    if !app.store.use_default_data() {
        println!("Default data is off. Turn it on with `tripkit defaults on`.");
        return Ok(());
    }

    let batch = match fetch::fetch_defaults(app, CollectionKind::Calendar).await {
        Ok(Some(batch)) => batch,
        Ok(None) => {
            println!("No default calendar configured (set `default_calendar` in config.toml).");
            return Ok(());
        }
        Err(e) => return Err(app.fail(e)),
    };

    let summary = app.store.import_collection(batch)?;
    println!("Default calendar: {}", summary.render());
    Ok(())
}

pub fn set_enabled(app: &mut App, enabled: bool) -> Result<()> {
    app.store.set_use_default_data(enabled)?;
    if enabled {
        println!("Bundled defaults will be shown alongside imported data.");
    } else {
        println!("Only imported data will be shown.");
    }
    Ok(())
}
