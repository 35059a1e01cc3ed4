//! Snapshot export and import commands

use super::{open_db, print_json};
use clap::{Args, Subcommand};
use lander_core::model::VariantSnapshot;
use lander_engine::commands::snapshot;
use lander_engine::Settings;
use lander_store::ImportOptions;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotCommand {
    Export(ExportArgs),
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    pub slug: String,

    /// Output file; `.yaml`/`.yml` writes YAML, anything else JSON.
    /// Prints JSON to stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    pub slug: String,

    /// Snapshot file (JSON or YAML by extension)
    pub file: PathBuf,

    /// Bring a soft-deleted variant back
    #[arg(long)]
    pub allow_resurrect: bool,
}

pub fn execute(args: SnapshotArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SnapshotCommand::Export(export_args) => execute_export(export_args, settings),
        SnapshotCommand::Import(import_args) => execute_import(import_args, settings),
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

fn execute_export(args: ExportArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(settings)?;
    let exported = snapshot::snapshot_export(&conn, &args.slug)?;

    match args.out {
        None => print_json(&exported),
        Some(path) => {
            let body = if is_yaml(&path) {
                serde_yaml::to_string(&exported)?
            } else {
                serde_json::to_string_pretty(&exported)?
            };
            std::fs::write(&path, body)?;
            println!(
                "Exported {} ({} sections) to {}",
                args.slug,
                exported.sections.len(),
                path.display()
            );
            Ok(())
        }
    }
}

fn execute_import(args: ImportArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.file)?;
    let parsed: VariantSnapshot = if is_yaml(&args.file) {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };

    let mut conn = open_db(settings)?;
    let committed = snapshot::snapshot_import(
        &mut conn,
        &args.slug,
        &parsed,
        ImportOptions {
            allow_resurrect: args.allow_resurrect,
        },
    )?;

    println!(
        "Imported {} ({} sections, status {})",
        args.slug,
        committed.sections.len(),
        committed.variant.status.as_deref().unwrap_or("active")
    );
    Ok(())
}
