//! Recording a new reading, from arguments or interactive prompts.

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{debug, info};

use bp_tracker_data::ReadingStore;
use bp_tracker_domain::{validate_reading, BloodPressureReading};

use crate::error::CliError;

const PROMPT_RULE_WIDTH: usize = 45;

/// Check the store location, validate the values and append the reading
pub fn save_reading(
    store: &impl ReadingStore,
    csv_path: &Path,
    systolic: i32,
    diastolic: i32,
    bpm: i32,
) -> Result<BloodPressureReading, CliError> {
    if !store.verify_writable() {
        return Err(CliError::NotWritable(csv_path.to_path_buf()));
    }

    let input = validate_reading(systolic, diastolic, bpm)?;
    let reading = BloodPressureReading::create(input.systolic, input.diastolic, input.bpm, None);
    store.append(&reading)?;

    info!(
        "Saved reading {}/{} {} ({})",
        reading.systolic(),
        reading.diastolic(),
        reading.pulse(),
        reading.category().abbreviation()
    );
    Ok(reading)
}

/// Record a reading given on the command line
pub fn record_direct<W: Write>(
    store: &impl ReadingStore,
    csv_path: &Path,
    systolic: i32,
    diastolic: i32,
    bpm: i32,
    out: &mut W,
) -> Result<(), CliError> {
    let reading = save_reading(store, csv_path, systolic, diastolic, bpm)?;

    writeln!(
        out,
        "Reading saved: {}/{} mmHg, {} BPM ({})",
        reading.systolic(),
        reading.diastolic(),
        reading.pulse(),
        reading.category()
    )?;
    Ok(())
}

/// Prompt for the three values, then record the reading
pub fn record_interactive<R: BufRead, W: Write>(
    store: &impl ReadingStore,
    csv_path: &Path,
    input: &mut R,
    out: &mut W,
) -> Result<(), CliError> {
    writeln!(out, "Blood Pressure Tracker - Interactive Mode")?;
    writeln!(out, "{}", "=".repeat(PROMPT_RULE_WIDTH))?;

    let systolic = prompt_number(input, out, "Enter systolic pressure: ")?;
    let diastolic = prompt_number(input, out, "Enter diastolic pressure: ")?;
    let bpm = prompt_number(input, out, "Enter heart rate (BPM): ")?;

    let reading = save_reading(store, csv_path, systolic, diastolic, bpm)?;

    writeln!(out)?;
    writeln!(out, "Reading saved successfully!")?;
    writeln!(
        out,
        "  {} {} - {}/{} mmHg, {} BPM ({})",
        reading.date_string(),
        reading.time_string(),
        reading.systolic(),
        reading.diastolic(),
        reading.pulse(),
        reading.category()
    )?;
    Ok(())
}

/// Read one integer answer. End of input cancels.
fn prompt_number<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<i32, CliError> {
    write!(out, "{}", prompt)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        debug!("Input closed at prompt {:?}", prompt.trim());
        return Err(CliError::Cancelled);
    }

    line.trim().parse::<i32>().map_err(|_| CliError::InvalidNumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_tracker_data::repository::MockReadingStore;
    use bp_tracker_domain::BloodPressureCategory;
    use std::io::Cursor;

    fn writable_store() -> MockReadingStore {
        let mut store = MockReadingStore::new();
        store.expect_verify_writable().returning(|| true);
        store
    }

    #[test]
    fn test_record_direct_appends_and_reports() {
        let mut store = writable_store();
        store
            .expect_append()
            .withf(|reading| {
                reading.systolic() == 118
                    && reading.diastolic() == 76
                    && reading.pulse() == 72
                    && reading.category() == BloodPressureCategory::Normal
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut out = Vec::new();
        record_direct(&store, Path::new("bp.csv"), 118, 76, 72, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Reading saved: 118/76 mmHg, 72 BPM (Normal)\n"
        );
    }

    #[test]
    fn test_record_direct_rejects_invalid_values() {
        let mut store = writable_store();
        store.expect_append().never();

        let mut out = Vec::new();
        let err = record_direct(&store, Path::new("bp.csv"), 300, 80, 72, &mut out).unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.to_string().starts_with("Validation Error: Systolic"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_unwritable_store_is_reported_before_validation() {
        let mut store = MockReadingStore::new();
        store.expect_verify_writable().returning(|| false);
        store.expect_append().never();

        let err = save_reading(&store, Path::new("/readonly/bp.csv"), 10, 5, 1).unwrap_err();
        assert_eq!(err.to_string(), "Storage Error: CSV file is not writable: /readonly/bp.csv");
    }

    #[test]
    fn test_record_interactive() {
        let mut store = writable_store();
        store
            .expect_append()
            .withf(|reading| reading.systolic() == 135 && reading.diastolic() == 85 && reading.pulse() == 68)
            .times(1)
            .returning(|_| Ok(()));

        let mut input = Cursor::new("135\n 85 \n68\n");
        let mut out = Vec::new();
        record_interactive(&store, Path::new("bp.csv"), &mut input, &mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("Blood Pressure Tracker - Interactive Mode\n"));
        assert!(output.contains(&"=".repeat(45)));
        assert!(output.contains("Enter systolic pressure: "));
        assert!(output.contains("Enter heart rate (BPM): "));
        assert!(output.contains("Reading saved successfully!"));
        assert!(output.contains("135/85 mmHg, 68 BPM (Hypertension Stage 1)"));
    }

    #[test]
    fn test_record_interactive_non_numeric() {
        let mut store = writable_store();
        store.expect_append().never();

        let mut input = Cursor::new("120\nabc\n70\n");
        let mut out = Vec::new();
        let err = record_interactive(&store, Path::new("bp.csv"), &mut input, &mut out).unwrap_err();

        assert!(matches!(err, CliError::InvalidNumber));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_record_interactive_end_of_input_cancels() {
        let mut store = writable_store();
        store.expect_append().never();

        let mut input = Cursor::new("120\n");
        let mut out = Vec::new();
        let err = record_interactive(&store, Path::new("bp.csv"), &mut input, &mut out).unwrap_err();

        assert!(matches!(err, CliError::Cancelled));
        assert_eq!(err.exit_code(), 130);
    }
}
