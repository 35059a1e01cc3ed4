//! Snapshot directory sync command

use super::open_db;
use clap::{Args, ValueEnum};
use lander_core::observability::TracingObserver;
use lander_engine::commands::sync;
use lander_engine::Settings;
use lander_store::{ApplyMode, MissingPolicy, SyncReport};
use std::path::PathBuf;

/// Flags override the `sync` section of the settings file.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Directory holding one snapshot file per variant
    #[arg(long)]
    pub dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Policy for stored variants with no snapshot file
    #[arg(long, value_enum)]
    pub missing: Option<MissingArg>,

    #[arg(long)]
    pub allow_resurrect: bool,

    /// Fail when the directory is absent or empty
    #[arg(long)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    ContentOnly,
    Full,
}

impl From<ModeArg> for ApplyMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::ContentOnly => ApplyMode::ContentOnly,
            ModeArg::Full => ApplyMode::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MissingArg {
    Ignore,
    Archive,
    Delete,
}

impl From<MissingArg> for MissingPolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Ignore => MissingPolicy::Ignore,
            MissingArg::Archive => MissingPolicy::Archive,
            MissingArg::Delete => MissingPolicy::Delete,
        }
    }
}

pub fn execute(args: SyncArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = settings.sync.clone();
    if let Some(dir) = args.dir {
        options.snapshot_dir = dir;
    }
    if let Some(mode) = args.mode {
        options.apply_mode = mode.into();
    }
    if let Some(missing) = args.missing {
        options.missing_policy = missing.into();
    }
    options.allow_resurrect |= args.allow_resurrect;
    options.required |= args.required;

    let mut conn = open_db(settings)?;
    let report = sync::sync_run(&mut conn, &options, &TracingObserver)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &SyncReport) {
    if report.is_noop() {
        println!("Nothing to sync");
        return;
    }
    let outcomes = [
        ("created", &report.created),
        ("updated", &report.updated),
        ("resurrected", &report.resurrected),
        ("skipped", &report.skipped),
        ("archived", &report.archived),
        ("deleted", &report.deleted),
    ];
    for (label, slugs) in outcomes {
        if !slugs.is_empty() {
            println!("{}: {}", label, slugs.join(", "));
        }
    }
}
