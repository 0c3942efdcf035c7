use anyhow::Result;
use std::io::Write;

use crate::config::OutputFormat;
use crate::listing::{MergedListing, ResultEntry};

use super::tables::render_summary;

/// A listing entry alongside the project it belongs to.
pub struct Row<'a> {
    pub project: &'a str,
    pub entry: &'a ResultEntry,
}

/// Rows ordered by project, then merge time, then title.
fn sorted_rows(listing: &MergedListing) -> Vec<Row<'_>> {
    let mut rows: Vec<Row<'_>> = listing
        .iter()
        .flat_map(|(project, entries)| {
            entries.iter().map(move |entry| Row {
                project: project.as_str(),
                entry,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.project
            .cmp(b.project)
            .then_with(|| a.entry.merged_at.cmp(&b.entry.merged_at))
            .then_with(|| a.entry.title.cmp(&b.entry.title))
    });
    rows
}

/// Writes the listing in the requested format.
///
/// - Table: tab-separated `Project / Merge Request / Date / Author` columns
/// - Summary: boxed terminal table including links
/// - JSON: the project-keyed mapping itself
pub fn export_listing(
    listing: &MergedListing,
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Table => export_tsv(listing, output),
        OutputFormat::Summary => {
            writeln!(output, "{}", render_summary(&sorted_rows(listing)))?;
            Ok(())
        }
        OutputFormat::Json => export_json(listing, pretty, output),
    }
}

fn export_tsv(listing: &MergedListing, output: &mut dyn Write) -> Result<()> {
    writeln!(output, "Project\tMerge Request\tDate\tAuthor")?;
    for row in sorted_rows(listing) {
        writeln!(
            output,
            "{}\t{}\t{}\t{}",
            sanitize(row.project),
            sanitize(&row.entry.title),
            row.entry.merged_at,
            sanitize(&row.entry.author)
        )?;
    }
    writeln!(output)?;
    Ok(())
}

fn export_json(listing: &MergedListing, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(listing)?
    } else {
        serde_json::to_string(listing)?
    };
    writeln!(output, "{}", json)?;
    Ok(())
}

/// Tabs and newlines inside a field would break the column layout.
fn sanitize(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}
