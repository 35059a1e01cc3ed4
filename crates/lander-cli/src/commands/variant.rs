//! Variant lifecycle commands

use super::{open_db, print_json};
use clap::{Args, Subcommand};
use lander_core::model::{NewVariant, VariantStatus};
use lander_core::observability::TracingObserver;
use lander_engine::commands::variant;
use lander_engine::{Settings, VariantSelector};
use lander_store::export_snapshot;
use std::collections::BTreeMap;

#[derive(Debug, Args)]
pub struct VariantArgs {
    #[command(subcommand)]
    pub command: VariantCommand,
}

#[derive(Debug, Subcommand)]
pub enum VariantCommand {
    /// List variants (deleted ones only with --status deleted)
    List(ListArgs),
    /// Show one variant with all of its sections
    Show(SlugArgs),
    /// Draw an active variant by weight
    Select(SelectArgs),
    Create(CreateArgs),
    Archive(SlugArgs),
    /// Soft-delete a variant
    Delete(SlugArgs),
    /// Show the axis catalog variants are validated against
    Axes,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// active, archived or deleted
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct SlugArgs {
    pub slug: String,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Fixed seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub slug: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub weight: i64,

    /// Axis assignment as key=value; repeat for each axis
    #[arg(long = "axis", value_parser = parse_axis)]
    pub axes: Vec<(String, String)>,

    /// Slug of a variant whose sections are copied onto the new one
    #[arg(long)]
    pub copy_from: Option<String>,
}

fn parse_axis(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

pub fn execute(args: VariantArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        VariantCommand::List(list_args) => execute_list(list_args, settings),
        VariantCommand::Show(slug_args) => execute_show(slug_args, settings),
        VariantCommand::Select(select_args) => execute_select(select_args, settings),
        VariantCommand::Create(create_args) => execute_create(create_args, settings),
        VariantCommand::Archive(slug_args) => execute_archive(slug_args, settings),
        VariantCommand::Delete(slug_args) => execute_delete(slug_args, settings),
        VariantCommand::Axes => execute_axes(settings),
    }
}

fn execute_list(args: ListArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let status = args.status.as_deref().map(VariantStatus::parse).transpose()?;
    let conn = open_db(settings)?;
    let variants = variant::variant_list(&conn, status)?;

    for v in &variants {
        println!("{}\t{}\t{}\t{}", v.slug, v.status.as_str(), v.weight, v.name);
    }
    Ok(())
}

fn execute_show(args: SlugArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(settings)?;
    print_json(&export_snapshot(&conn, &args.slug)?)
}

fn execute_select(args: SelectArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(settings)?;
    let selector = match args.seed {
        Some(seed) => VariantSelector::seeded(seed),
        None => VariantSelector::from_entropy(),
    };
    let chosen = variant::variant_select(&conn, &selector)?;
    println!("{}", chosen.slug);
    Ok(())
}

fn execute_create(args: CreateArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let input = NewVariant {
        slug: args.slug,
        name: args.name,
        description: args.description,
        weight: args.weight,
        axes: args.axes.into_iter().collect::<BTreeMap<_, _>>(),
    };
    let mut conn = open_db(settings)?;
    let created = variant::variant_create(
        &mut conn,
        &input,
        args.copy_from.as_deref(),
        &TracingObserver,
    )?;

    println!("Created variant {}", created.variant.slug);
    println!("  id: {}", created.variant.id);
    if args.copy_from.is_some() {
        println!("  copied sections: {}", created.copied_sections);
    }
    Ok(())
}

fn execute_archive(args: SlugArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(settings)?;
    let archived = variant::variant_archive(&conn, &args.slug)?;
    println!("Archived variant {}", archived.slug);
    Ok(())
}

fn execute_delete(args: SlugArgs, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(settings)?;
    variant::variant_delete(&conn, &args.slug)?;
    println!("Deleted variant {}", args.slug);
    Ok(())
}

fn execute_axes(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(settings)?;
    let catalog = variant::list_axes(&conn)?;

    for axis in catalog.definitions() {
        let values: Vec<&str> = axis.values.iter().map(String::as_str).collect();
        println!("{} ({}): {}", axis.id, axis.label, values.join(", "));
    }
    Ok(())
}
