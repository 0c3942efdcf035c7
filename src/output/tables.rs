use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use super::exports::Row;

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Boxed table of merged requests, one row per request.
pub fn render_summary(rows: &[Row<'_>]) -> String {
    let mut table = create_table();
    table.set_header(create_cyan_header(&[
        "Project",
        "Merge Request",
        "Date",
        "Author",
        "Link",
    ]));

    for row in rows {
        table.add_row(vec![
            Cell::new(row.project).fg(TableColor::Magenta),
            Cell::new(&row.entry.title),
            Cell::new(&row.entry.merged_at),
            Cell::new(&row.entry.author),
            Cell::new(row.entry.web_url.as_deref().unwrap_or("-")),
        ]);
    }

    table.to_string()
}
