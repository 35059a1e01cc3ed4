//! Lander CLI
//!
//! Command-line interface for the landing page experiment service

use clap::{Parser, Subcommand};
use lander_engine::Settings;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "lander")]
#[command(about = "Lander - Landing page variants and experiment content", long_about = None)]
struct Cli {
    /// Settings file; `./lander.*` is read when present otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overriding the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Variant lifecycle operations
    Variant(commands::variant::VariantArgs),
    /// Snapshot export and import
    Snapshot(commands::snapshot::SnapshotArgs),
    /// Apply the snapshot directory to the store
    Sync(commands::sync::SyncArgs),
    /// Resolve the public landing configuration
    Landing(commands::landing::LandingArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = load_settings(cli.config, cli.db).and_then(|settings| match cli.command {
        Commands::Variant(args) => commands::variant::execute(args, &settings),
        Commands::Snapshot(args) => commands::snapshot::execute(args, &settings),
        Commands::Sync(args) => commands::sync::execute(args, &settings),
        Commands::Landing(args) => commands::landing::execute(args, &settings),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_settings(
    config: Option<PathBuf>,
    db: Option<PathBuf>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::load(config.as_deref())?;
    if let Some(db) = db {
        settings.database_path = db;
    }
    lander_core::logging_facility::init(settings.log_profile);
    Ok(settings)
}
