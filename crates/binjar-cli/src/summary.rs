use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use binjar_build::BuildOutcome;
use binjar_zip::{ArchiveLayout, VerifyReport};

pub fn print_build_summary(outcome: &BuildOutcome) {
    println!("{}", build_table(outcome));
    println!("{}", outcome.artifact.display());
}

pub fn print_verify_report(path: &Path, report: &VerifyReport) {
    println!("{}", verify_line(path, report));
}

pub fn print_layout(path: &Path, layout: &ArchiveLayout) {
    let trailer = &layout.trailer;
    println!("Archive: {}", path.display());
    println!(
        "Central directory: offset {}, size {}, {} entries{}",
        trailer.central_dir_offset,
        trailer.central_dir_size,
        trailer.entry_count,
        if trailer.zip64.is_some() { " (zip64)" } else { "" }
    );
    println!("Archive starts at: {}", layout.archive_start());
    println!("{}", layout_table(layout));
}

pub(crate) fn build_table(outcome: &BuildOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Property"), header_cell("Value")]);
    apply_table_style(&mut table);

    table.add_row(vec![Cell::new("Artifact"), Cell::new(outcome.artifact.display())]);
    table.add_row(vec![
        Cell::new("Installed"),
        match &outcome.installed {
            Some(path) => Cell::new(path.display()),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![Cell::new("Preamble bytes"), Cell::new(outcome.preamble_len)]);
    table.add_row(vec![Cell::new("Archive bytes"), Cell::new(outcome.archive_len)]);
    table.add_row(vec![
        Cell::new("Verified"),
        match outcome.entries {
            Some(entries) => Cell::new(format!("yes ({entries} entries)")).fg(Color::Green),
            None => Cell::new("skipped").fg(Color::Yellow),
        },
    ]);
    table.add_row(vec![Cell::new("SHA-256"), Cell::new(&outcome.sha256)]);
    table
}

pub(crate) fn verify_line(path: &Path, report: &VerifyReport) -> String {
    format!(
        "ok: {}: {} entries, central directory at {}, archive starts at {}{}",
        path.display(),
        report.entries,
        report.central_dir_offset,
        report.archive_start,
        if report.zip64 { ", zip64" } else { "" }
    )
}

pub(crate) fn layout_table(layout: &ArchiveLayout) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Name"),
        header_cell("Local header"),
        header_cell("Compressed"),
        header_cell("Zip64 offset"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);

    for entry in &layout.entries {
        table.add_row(vec![
            Cell::new(entry.index),
            Cell::new(&entry.name),
            Cell::new(entry.local_header_offset),
            Cell::new(entry.compressed_size),
            if entry.zip64_offset.is_some() {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                dim_cell("-")
            },
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn dim_cell(value: impl ToString) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}
