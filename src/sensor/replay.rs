//! CSV replay source for recorded sensor sessions.
//!
//! Reads raw samples from a CSV file with one row per sampling tick:
//!
//! ```text
//! t_ms,ax_upper,ay_upper,az_upper,ax_lower,ay_lower,az_lower,force_upper,force_lower
//! ```
//!
//! `t_ms` is the acquisition time in milliseconds; the remaining columns are
//! the raw readings the live acquisition side would deliver.

use crate::sensor::types::{RawSample, TimedSample, Vec3};
use chrono::TimeZone;
use chrono::Utc;
use std::path::Path;

/// Errors while loading a replay file.
#[derive(Debug)]
pub enum ReplayError {
    Io(String),
    Csv(String),
    /// A row had the wrong number of columns or a non-numeric field
    BadRow {
        row: usize,
        reason: String,
    },
    Empty,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Io(e) => write!(f, "IO error: {e}"),
            ReplayError::Csv(e) => write!(f, "CSV error: {e}"),
            ReplayError::BadRow { row, reason } => write!(f, "Bad row {row}: {reason}"),
            ReplayError::Empty => write!(f, "Replay file contains no samples"),
        }
    }
}

impl std::error::Error for ReplayError {}

const COLUMNS: usize = 9;

/// Load all samples from a raw-sample CSV file, in file order.
pub fn load_samples(path: &Path) -> Result<Vec<TimedSample>, ReplayError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ReplayError::Io(e.to_string()))?;

    let mut samples = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ReplayError::Csv(e.to_string()))?;
        // Header is row 0 as far as the user is concerned.
        let row = i + 1;

        if record.len() != COLUMNS {
            return Err(ReplayError::BadRow {
                row,
                reason: format!("expected {COLUMNS} columns, got {}", record.len()),
            });
        }

        let mut fields = [0.0f64; COLUMNS];
        for (j, field) in record.iter().enumerate() {
            fields[j] = field.parse().map_err(|_| ReplayError::BadRow {
                row,
                reason: format!("non-numeric field {:?}", field),
            })?;
        }

        let timestamp = Utc
            .timestamp_millis_opt(fields[0] as i64)
            .single()
            .ok_or_else(|| ReplayError::BadRow {
                row,
                reason: format!("invalid timestamp {}", fields[0]),
            })?;

        let sample = RawSample::new(
            Vec3::new(fields[1], fields[2], fields[3]),
            Vec3::new(fields[4], fields[5], fields[6]),
            fields[7],
            fields[8],
        );
        samples.push(TimedSample::at(timestamp, sample));
    }

    if samples.is_empty() {
        return Err(ReplayError::Empty);
    }
    Ok(samples)
}
