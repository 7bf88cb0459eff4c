//! Output formatting utilities for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use render_manager::layers::{LayerStatus, SyncState};

/// Column headers of the layer status table.
pub const STATUS_HEADERS: [&str; 7] = ["Layer", "In Scene", "Latest", "Range", "Frames", "AOVs", "Status"];

/// Text color of a sync state: red, cyan, green.
pub fn status_color(state: SyncState) -> Color {
    match state {
        SyncState::Unloaded => Color::Red,
        SyncState::Outdated => Color::Cyan,
        SyncState::Sync => Color::Green,
    }
}

/// Scene version cell; unloaded layers show `---`.
pub fn format_scene_version(version: u32) -> String {
    if version == 0 {
        "---".to_string()
    } else {
        format!("v{:03}", version)
    }
}

/// Print a table with custom column colors
pub fn print_table_colored(headers: &[&str], rows: Vec<Vec<(String, Option<Color>)>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        let cells: Vec<Cell> = row
            .into_iter()
            .map(|(text, color)| {
                let cell = Cell::new(text);
                if let Some(c) = color {
                    cell.fg(c)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }

    println!("{}", table);
}

/// Print a plain table
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print_table_colored(
        headers,
        rows.into_iter()
            .map(|row| row.into_iter().map(|text| (text, None)).collect())
            .collect(),
    );
}

fn status_cells(row: &LayerStatus) -> Vec<(String, Option<Color>)> {
    vec![
        (row.layer.clone(), None),
        (format_scene_version(row.in_scene), None),
        (format!("v{:03}", row.latest), None),
        (row.range.clone(), None),
        (row.frames.clone(), None),
        (row.aovs.to_string(), None),
        (row.status.label().to_string(), Some(status_color(row.status))),
    ]
}

/// Print the layer status table.
pub fn print_status_table(rows: &[LayerStatus]) {
    print_table_colored(&STATUS_HEADERS, rows.iter().map(status_cells).collect());
}
