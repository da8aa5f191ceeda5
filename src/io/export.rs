//! CSV export for simulation tick records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::sim::types::TickRecord;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "tick,time_s,demand,delivered,unmet,source_output,fuel_burned,\
                       storage_charged,storage_discharged,player_charged,player_drained,\
                       stored_energy,satisfaction,brownout";

/// Failure while writing telemetry.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create \"{path}\": {source}")]
    Create { path: String, source: io::Error },
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("flush failed: {0}")]
    Io(#[from] io::Error),
}

/// Exports tick records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick using the schema v1
/// column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `ExportError` if file creation or writing fails.
pub fn export_csv(records: &[TickRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.display().to_string(),
        source,
    })?;
    write_csv(records, io::BufWriter::new(file))
}

/// Writes tick records as CSV to any writer.
///
/// # Errors
///
/// Returns an `ExportError` if writing fails.
pub fn write_csv(records: &[TickRecord], writer: impl Write) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in records {
        let t = &r.report;
        wtr.write_record(&[
            r.tick.to_string(),
            format!("{:.3}", r.time_s),
            format!("{:.4}", t.demand),
            format!("{:.4}", t.delivered),
            format!("{:.4}", t.unmet),
            format!("{:.4}", t.source_output),
            format!("{:.4}", t.fuel_burned),
            format!("{:.4}", t.storage_charged),
            format!("{:.4}", t.storage_discharged),
            format!("{:.4}", t.player_charged),
            format!("{:.4}", t.player_drained),
            format!("{:.4}", t.stored_energy),
            format!("{:.4}", t.satisfaction),
            t.is_brownout().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
