//! Output formatting for CLI display
//!
//! Entities render as a colored table for people, or as JSON / CSV for
//! scripts. Only the table form uses color; the machine formats are written
//! verbatim so they can be piped.

use clap::ValueEnum;
use colored::Colorize;
use std::collections::BTreeSet;
use std::io::Write;

use crate::feed::{Entity, FeedState};
use crate::resolver::{AliasEntry, Resolution};

/// How search results are printed
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable listing (default)
    #[default]
    Table,
    /// JSON array of entities
    Json,
    /// CSV with one column per attribute
    Csv,
}

/// Format one entity for the table listing
#[must_use]
pub fn entity_line(entity: &Entity, quiet: bool) -> String {
    if quiet {
        entity.name().to_string()
    } else {
        format!(
            "  {} {} {}",
            entity.name().bold(),
            format!("[{}]", entity.id()).dimmed(),
            entity.asset_ref().cyan()
        )
    }
}

/// One-line summary of where a feed stands
#[must_use]
pub fn status_line(state: &FeedState) -> String {
    if state.is_empty_result() {
        return "No matching entities".yellow().to_string();
    }
    format!(
        "Showing {} of {} ({})",
        state.items().len(),
        state.total_count(),
        state.phase()
    )
}

/// Format a dictionary entry
#[must_use]
pub fn alias_line(position: usize, entry: &AliasEntry) -> String {
    format!("{:>3}. {} → {}", position + 1, entry.key.bold(), entry.asset)
}

/// Format a traced resolution for `resolve --explain`
#[must_use]
pub fn resolution_line(resolution: &Resolution) -> String {
    let matched = resolution
        .key
        .as_deref()
        .map_or_else(String::new, |key| format!(" via '{key}'"));
    format!(
        "{} ({}{})",
        resolution.asset,
        resolution.tier.to_string().green(),
        matched
    )
}

/// Write entities in the requested format
///
/// # Errors
///
/// Returns `FeedError` if writing or serialization fails.
pub fn write_entities<W: Write>(
    out: &mut W,
    entities: &[Entity],
    format: OutputFormat,
    quiet: bool,
) -> crate::Result<()> {
    match format {
        OutputFormat::Table => {
            for entity in entities {
                writeln!(out, "{}", entity_line(entity, quiet))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, entities)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(out, entities)?,
    }
    Ok(())
}

/// Attribute keys present on any entity, excluding `id` and `name`
fn attribute_columns(entities: &[Entity]) -> Vec<String> {
    entities
        .iter()
        .flat_map(|entity| entity.raw_attributes().keys())
        .filter(|key| *key != "id" && *key != "name")
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn write_csv<W: Write>(out: &mut W, entities: &[Entity]) -> crate::Result<()> {
    let columns = attribute_columns(entities);
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["id", "name", "asset_ref"];
    header.extend(columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for entity in entities {
        let mut record = vec![
            entity.id().to_string(),
            entity.name().to_string(),
            entity.asset_ref().to_string(),
        ];
        record.extend(
            columns
                .iter()
                .map(|column| entity.attribute(column).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
