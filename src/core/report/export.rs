//! Export functionality for library reports.
//!
//! CSV output flattens every summary into one long table so the result can
//! be pivoted in a spreadsheet; JSON output is the report serialized as-is.

use super::LibraryReport;
use std::io::Write;

/// Export a report to CSV format
///
/// CSV columns: Section, Key, Label, Count. `Key` carries the month for
/// trend rows, the bucket range for focal-length rows, and the ISO value
/// for ISO rows.
pub fn export_csv<W: Write>(report: &LibraryReport, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "Section,Key,Label,Count")?;

    for entry in &report.top_cameras {
        writeln!(
            writer,
            "top_cameras,,{},{}",
            csv_field(&entry.label),
            entry.count
        )?;
    }

    for entry in &report.top_lenses {
        writeln!(
            writer,
            "top_lenses,,{},{}",
            csv_field(&entry.label),
            entry.count
        )?;
    }

    for bucket in &report.focal_length_histogram {
        writeln!(
            writer,
            "focal_length_mm,{}-{},,{}",
            bucket.lower_mm, bucket.upper_mm, bucket.count
        )?;
    }

    for entry in &report.iso_distribution {
        writeln!(writer, "iso,{},,{}", entry.iso, entry.count)?;
    }

    for entry in &report.monthly_by_camera {
        writeln!(
            writer,
            "monthly_by_camera,{},{},{}",
            entry.month,
            csv_field(&entry.label),
            entry.count
        )?;
    }

    for entry in &report.monthly_by_lens {
        writeln!(
            writer,
            "monthly_by_lens,{},{},{}",
            entry.month,
            csv_field(&entry.label),
            entry.count
        )?;
    }

    Ok(())
}

/// Quote a field if it contains a comma or a quote
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
