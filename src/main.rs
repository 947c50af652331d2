mod app;
mod commands;
mod fetch;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tripkit_core::CollectionKind;
use tripkit_core::networking::TargetStatus;

use crate::app::App;

#[derive(Parser)]
#[command(name = "tripkit")]
#[command(about = "Offline trip companion: calendar, networking tips, contacts and checklists")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an .ics calendar or a JSON collection
    Import {
        #[arg(value_enum)]
        kind: ImportKind,

        /// File to import
        file: std::path::PathBuf,

        /// Merge JSON records into the existing collection instead of replacing it
        #[arg(long)]
        merge: bool,
    },
    /// Bundled default data
    Defaults {
        #[command(subcommand)]
        action: DefaultsAction,
    },
    /// List calendar events
    Events {
        /// Include completed events
        #[arg(short, long)]
        all: bool,
    },
    /// Toggle an event between pending and completed
    Done {
        event_id: String,
    },
    /// List networking tips
    Tips {
        /// Include hidden tips
        #[arg(short, long)]
        all: bool,

        /// Only starred tips
        #[arg(short, long)]
        starred: bool,
    },
    /// Mark or flag a tip
    Tip {
        #[arg(value_enum)]
        action: TipAction,

        tip_id: String,
    },
    /// List networking targets with their status
    People,
    /// Set a person's status, or advance it when no status is given
    Person {
        person_id: String,

        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },
    /// List contacts
    Contacts,
    /// Toggle a checklist item
    Check {
        section: String,
        item: String,
    },
    /// Write a backup of the app state (without the error log)
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Restore app state from a backup
    Restore {
        file: std::path::PathBuf,
    },
    /// Show the most recent recorded errors
    Errors,
    /// Delete all stored state
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportKind {
    Calendar,
    Tips,
    Contacts,
    Networking,
}

impl From<ImportKind> for CollectionKind {
    fn from(kind: ImportKind) -> Self {
        match kind {
            ImportKind::Calendar => CollectionKind::Calendar,
            ImportKind::Tips => CollectionKind::NetworkingTips,
            ImportKind::Contacts => CollectionKind::Contacts,
            ImportKind::Networking => CollectionKind::Networking,
        }
    }
}

#[derive(Subcommand)]
enum DefaultsAction {
    /// Fetch the default calendar and merge it into the imported events
    Load,
    /// Show bundled defaults alongside imported data
    On,
    /// Show only imported data and skip fetching defaults
    Off,
}

#[derive(Clone, Copy, ValueEnum)]
enum TipAction {
    Read,
    Star,
    Hide,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    NotMet,
    Connected,
    FollowedUp,
}

impl From<StatusArg> for TargetStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::NotMet => TargetStatus::NotMet,
            StatusArg::Connected => TargetStatus::Connected,
            StatusArg::FollowedUp => TargetStatus::FollowedUp,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut app = App::load()?;

    match cli.command {
        Commands::Import { kind, file, merge } => {
            commands::import::run(&mut app, kind.into(), &file, merge)
        }
        Commands::Defaults { action } => match action {
            DefaultsAction::Load => commands::defaults::load(&mut app).await,
            DefaultsAction::On => commands::defaults::set_enabled(&mut app, true),
            DefaultsAction::Off => commands::defaults::set_enabled(&mut app, false),
        },
        Commands::Events { all } => commands::events::list(&app, all),
        Commands::Done { event_id } => commands::events::toggle(&mut app, &event_id),
        Commands::Tips { all, starred } => commands::tips::list(&mut app, all, starred).await,
        Commands::Tip { action, tip_id } => commands::tips::flag(&mut app, action, &tip_id),
        Commands::People => commands::people::list(&mut app).await,
        Commands::Person { person_id, status } => {
            commands::people::update(&mut app, &person_id, status.map(Into::into)).await
        }
        Commands::Contacts => commands::people::contacts(&mut app).await,
        Commands::Check { section, item } => commands::checklist::toggle(&mut app, &section, &item),
        Commands::Export { output } => commands::state::export(&app, output.as_deref()),
        Commands::Restore { file } => commands::state::restore(&mut app, &file),
        Commands::Errors => commands::state::errors(&app),
        Commands::Reset => commands::state::reset(&mut app),
    }
}
