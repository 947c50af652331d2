use anyhow::Result;
use owo_colors::OwoColorize;
use tripkit_core::StatusMap;

use crate::TipAction;
use crate::app::App;
use crate::fetch;
use crate::render::render_tip;

pub async fn list(app: &mut App, all: bool, starred_only: bool) -> Result<()> {
    let defaults = fetch::default_tips(app).await;
    let tips = app.store.tips(&defaults);

    let mut shown = 0;
    for tip in &tips {
        let hidden = app.store.is_flagged(StatusMap::TipHidden, &tip.id);
        let starred = app.store.is_flagged(StatusMap::TipStarred, &tip.id);
        if (hidden && !all) || (starred_only && !starred) {
            continue;
        }

        let read = app.store.is_flagged(StatusMap::TipRead, &tip.id);
        println!("{}", render_tip(&tip.content, read, starred));

        let mut meta = vec![tip.id.clone()];
        if let Some(source) = &tip.source {
            meta.push(source.clone());
        }
        if !tip.tags.is_empty() {
            meta.push(format!("#{}", tip.tags.join(" #")));
        }
        println!("  {}", meta.join(" | ").dimmed());
        shown += 1;
    }

    if shown == 0 {
        println!("No tips to show.");
    }
    Ok(())
}

pub fn flag(app: &mut App, action: TipAction, tip_id: &str) -> Result<()> {
    match action {
        TipAction::Read => {
            app.store.mark_tip_read(tip_id)?;
            println!("Marked {} as read", tip_id);
        }
        TipAction::Star => {
            let starred = app.store.toggle_status(StatusMap::TipStarred, tip_id)?;
            println!("{} {}", if starred { "Starred" } else { "Unstarred" }, tip_id);
        }
        TipAction::Hide => {
            let hidden = app.store.toggle_status(StatusMap::TipHidden, tip_id)?;
            println!("{} {}", if hidden { "Hid" } else { "Unhid" }, tip_id);
        }
    }
    Ok(())
}
