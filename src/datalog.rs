//! CSV dataset logging.
//!
//! Collection mode for building training data: one row of per-sample
//! features per sampling tick, tagged with the session's posture label
//! (1 = good posture session, 0 = bad). The column order matches the
//! training pipeline's expectations.

use crate::core::features::SampleFeatures;
use std::path::Path;

/// Errors while writing a dataset file.
#[derive(Debug)]
pub enum DatalogError {
    Io(String),
    Csv(String),
}

impl std::fmt::Display for DatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatalogError::Io(e) => write!(f, "IO error: {e}"),
            DatalogError::Csv(e) => write!(f, "CSV error: {e}"),
        }
    }
}

impl std::error::Error for DatalogError {}

/// Streams labeled per-sample feature rows to a CSV file.
pub struct FeatureLogger {
    writer: csv::Writer<std::fs::File>,
    label: u8,
    rows: u64,
}

impl FeatureLogger {
    /// Open `path` for writing and emit the header row.
    pub fn create(path: &Path, label: u8) -> Result<Self, DatalogError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| DatalogError::Io(e.to_string()))?;
        writer
            .write_record([
                "t_ms",
                "pitch_upper",
                "roll_upper",
                "pitch_lower",
                "roll_lower",
                "delta_pitch",
                "force_upper",
                "force_lower",
                "force_total",
                "force_balance",
                "label",
            ])
            .map_err(|e| DatalogError::Csv(e.to_string()))?;
        Ok(Self {
            writer,
            label,
            rows: 0,
        })
    }

    /// Append one labeled feature row.
    pub fn log(&mut self, t_ms: i64, f: &SampleFeatures) -> Result<(), DatalogError> {
        self.writer
            .write_record([
                t_ms.to_string(),
                f.pitch_upper.to_string(),
                f.roll_upper.to_string(),
                f.pitch_lower.to_string(),
                f.roll_lower.to_string(),
                f.delta_pitch.to_string(),
                f.force_upper.to_string(),
                f.force_lower.to_string(),
                f.force_total.to_string(),
                f.force_balance.to_string(),
                self.label.to_string(),
            ])
            .map_err(|e| DatalogError::Csv(e.to_string()))?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flush buffered rows to disk.
    pub fn finish(mut self) -> Result<u64, DatalogError> {
        self.writer
            .flush()
            .map_err(|e| DatalogError::Io(e.to_string()))?;
        Ok(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("spineguard_datalog_{}.csv", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_header_and_rows() {
        let path = temp_path();
        let mut logger = FeatureLogger::create(&path, 1).unwrap();

        let f = SampleFeatures {
            pitch_upper: 10.0,
            force_total: 10.0,
            ..SampleFeatures::default()
        };
        logger.log(0, &f).unwrap();
        logger.log(20, &f).unwrap();
        assert_eq!(logger.finish().unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("t_ms,pitch_upper,roll_upper"));
        assert!(lines[0].ends_with("force_balance,label"));
        assert!(lines[1].starts_with("0,10,"));
        assert!(lines[1].ends_with(",1"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_bad_session_label() {
        let path = temp_path();
        let mut logger = FeatureLogger::create(&path, 0).unwrap();
        logger.log(0, &SampleFeatures::default()).unwrap();
        logger.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().nth(1).unwrap().ends_with(",0"));
        std::fs::remove_file(path).ok();
    }
}
