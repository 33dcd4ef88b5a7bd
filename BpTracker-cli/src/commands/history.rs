//! Listing and exporting stored readings.

use std::io::Write;

use bp_tracker_data::ReadingStore;
use bp_tracker_domain::services::chart_data;

use crate::error::CliError;

/// Print stored readings as a table, oldest first. With a limit, only the
/// most recent `limit` readings are shown.
pub fn list_readings<W: Write>(store: &impl ReadingStore, limit: Option<usize>, out: &mut W) -> Result<(), CliError> {
    let records = store.read_all()?;

    if records.is_empty() {
        writeln!(out, "No readings recorded yet.")?;
        return Ok(());
    }

    let skip = limit.map_or(0, |limit| records.len().saturating_sub(limit));

    writeln!(
        out,
        "{:<10}  {:<8}  {:>8}  {:>9}  {:>4}  {}",
        "Date", "Time", "Systolic", "Diastolic", "BPM", "Category"
    )?;
    for record in &records[skip..] {
        writeln!(
            out,
            "{:<10}  {:<8}  {:>8}  {:>9}  {:>4}  {}",
            record.date_string(),
            record.time_string(),
            record.systolic,
            record.diastolic,
            record.pulse,
            record.category.abbreviation()
        )?;
    }
    Ok(())
}

/// Write the chart series and severity bands as pretty JSON
pub fn export_chart<W: Write>(store: &impl ReadingStore, out: &mut W) -> Result<(), CliError> {
    let records = store.read_all()?;

    serde_json::to_writer_pretty(&mut *out, &chart_data(&records))?;
    writeln!(out)?;
    Ok(())
}
