//! Operator-facing run summary tables.
//!
//! This output is the QA feedback loop: status counts point config authors
//! at missing mapping or conversion rules, and the flag distribution shows
//! how the plausibility cutoffs are biting.

use std::collections::BTreeMap;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use meas_model::{ConfigVersionMeta, ObservationStatus, StandardizedObservation};

use crate::commands::StandardiseOutcome;

pub fn print_run_summary(outcome: &StandardiseOutcome) {
    let report = &outcome.report;
    println!("Definition: {}", report.definition_id);
    if let Some(version) = &report.definition_version {
        println!("Definition version: {version}");
    }
    println!(
        "Config: {} ({})",
        report.config_version, report.config_id
    );
    println!("State: {}", report.state);
    println!("Output: {}", outcome.output_path.display());

    let mut table = Table::new();
    table.set_header(vec![header_cell("Status"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for status in ObservationStatus::ALL {
        let count = report.summary.count(status);
        table.add_row(vec![status_cell(status), count_cell(count, status)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.summary.total).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let mut flags = Table::new();
    flags.set_header(vec![
        header_cell("Flag"),
        header_cell("true"),
        header_cell("false"),
    ]);
    apply_table_style(&mut flags);
    align_column(&mut flags, 1, CellAlignment::Right);
    align_column(&mut flags, 2, CellAlignment::Right);
    flags.add_row(vec![
        Cell::new("confidence"),
        Cell::new(report.summary.confidence_true),
        Cell::new(report.summary.confidence_false),
    ]);
    flags.add_row(vec![
        Cell::new("possible"),
        Cell::new(report.summary.possible_true),
        Cell::new(report.summary.possible_false),
    ]);
    println!();
    println!("Plausibility flags:");
    println!("{flags}");

    print_unmapped_units(&report.rows);
}

/// The raw unit strings no rule matched, most frequent first. Each line here
/// is a candidate for a new mapping rule in the next config version.
fn print_unmapped_units(rows: &[StandardizedObservation]) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        if row.status != ObservationStatus::UnmappedUnit {
            continue;
        }
        let unit = row
            .source_result_value_units
            .clone()
            .unwrap_or_else(|| "(blank)".to_string());
        *counts.entry(unit).or_insert(0) += 1;
    }
    if counts.is_empty() {
        return;
    }

    let mut ordered: Vec<(String, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut table = Table::new();
    table.set_header(vec![header_cell("Unmapped unit"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (unit, count) in ordered.into_iter().take(10) {
        table.add_row(vec![
            Cell::new(unit).fg(Color::Yellow),
            Cell::new(count),
        ]);
    }
    println!();
    println!("Units needing mapping rules:");
    println!("{table}");
}

pub fn print_versions(definition_id: &str, versions: &[ConfigVersionMeta]) {
    println!("Definition: {definition_id}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Config version"),
        header_cell("Config id"),
        header_cell("Published"),
    ]);
    apply_table_style(&mut table);
    for meta in versions {
        table.add_row(vec![
            Cell::new(&meta.config_version),
            Cell::new(&meta.config_id),
            Cell::new(meta.version_datetime.to_rfc3339()),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(status: ObservationStatus) -> Cell {
    match status {
        ObservationStatus::Ok => Cell::new(status).fg(Color::Green),
        ObservationStatus::UnmappedUnit | ObservationStatus::NoConversionRule => {
            Cell::new(status).fg(Color::Yellow)
        }
        ObservationStatus::ParseError => Cell::new(status).fg(Color::Red),
    }
}

fn count_cell(count: usize, status: ObservationStatus) -> Cell {
    if count == 0 {
        return Cell::new(count).fg(Color::DarkGrey);
    }
    match status {
        ObservationStatus::Ok => Cell::new(count).add_attribute(Attribute::Bold),
        _ => Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
    }
}
