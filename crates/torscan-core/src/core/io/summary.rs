use crate::core::models::scan::{ScanPoint, ScanSeries};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Cache file for catalogued QM scan energies.
pub const QM_SUMMARY_FILENAME: &str = "summary-qm.dat";
/// Cache file for catalogued MM scan energies.
pub const MM_SUMMARY_FILENAME: &str = "summary-mm.dat";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Summary parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct SummaryRow {
    angle: f64,
    energy: f64,
}

/// Writes a catalogued series to a two-column tab-delimited summary file.
///
/// Only points with a computed energy are written, matching the layout the
/// downstream tooling has always consumed. Whole reference angles render
/// without a decimal point, as every summary file before this one did.
pub fn write(path: &Path, series: &ScanSeries) -> Result<(), SummaryError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| SummaryError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

    for point in series.iter() {
        if let Some(energy) = point.energy {
            writer
                .write_record([format_angle(point.angle), energy.to_string()])
                .map_err(|e| SummaryError::Csv {
                    path: path.to_string_lossy().to_string(),
                    source: e,
                })?;
        }
    }
    writer.flush().map_err(|e| SummaryError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn format_angle(angle: f64) -> String {
    if angle.fract() == 0.0 {
        format!("{angle:.0}")
    } else {
        angle.to_string()
    }
}

/// Reads a summary file back into a series.
///
/// Legacy summary files have no way to spell "not computed" other than a
/// zero slot, so an energy of exactly `0.0` is mapped back to a missing
/// value here.
pub fn read(path: &Path) -> Result<ScanSeries, SummaryError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| SummaryError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

    let mut points = Vec::new();
    for row in reader.deserialize() {
        let row: SummaryRow = row.map_err(|e| SummaryError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let energy = (row.energy != 0.0).then_some(row.energy);
        points.push(ScanPoint {
            angle: row.angle,
            energy,
        });
    }
    Ok(ScanSeries::new(points))
}
