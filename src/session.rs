//! Session statistics log.
//!
//! Tracks what the monitor has done this session (and cumulatively across
//! sessions). Only counters are persisted, never sensor data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Counters for the running monitor.
#[derive(Debug)]
pub struct SessionLog {
    samples_ingested: AtomicU64,
    windows_evaluated: AtomicU64,
    bad_windows: AtomicU64,
    alerts_fired: AtomicU64,
    session_start: DateTime<Utc>,
    /// Identifies this monitor instance in exported stats
    instance_id: Uuid,
    persist_path: Option<PathBuf>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self {
            samples_ingested: AtomicU64::new(0),
            windows_evaluated: AtomicU64::new(0),
            bad_windows: AtomicU64::new(0),
            alerts_fired: AtomicU64::new(0),
            session_start: Utc::now(),
            instance_id: Uuid::new_v4(),
            persist_path: None,
        }
    }

    /// Create a log that persists cumulative counters at `path`.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            eprintln!("Note: Could not load previous session stats: {e}");
        }
        log
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn record_sample(&self) {
        self.samples_ingested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evaluation(&self, is_bad: bool) {
        self.windows_evaluated.fetch_add(1, Ordering::Relaxed);
        if is_bad {
            self.bad_windows.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_alert(&self) {
        self.alerts_fired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            samples_ingested: self.samples_ingested.load(Ordering::Relaxed),
            windows_evaluated: self.windows_evaluated.load(Ordering::Relaxed),
            bad_windows: self.bad_windows.load(Ordering::Relaxed),
            alerts_fired: self.alerts_fired.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Human-readable summary for end-of-session display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        let bad_pct = if stats.windows_evaluated > 0 {
            100.0 * stats.bad_windows as f64 / stats.windows_evaluated as f64
        } else {
            0.0
        };
        format!(
            "Session Statistics:\n\
             - Samples ingested: {}\n\
             - Windows evaluated: {}\n\
             - Bad-posture windows: {} ({:.1}%)\n\
             - Alerts fired: {}\n\
             - Session duration: {} seconds",
            stats.samples_ingested,
            stats.windows_evaluated,
            stats.bad_windows,
            bad_pct,
            stats.alerts_fired,
            stats.session_duration_secs
        )
    }

    /// Save cumulative counters to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                samples_ingested: stats.samples_ingested,
                windows_evaluated: stats.windows_evaluated,
                bad_windows: stats.bad_windows,
                alerts_fired: stats.alerts_fired,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.samples_ingested
                    .store(persisted.samples_ingested, Ordering::Relaxed);
                self.windows_evaluated
                    .store(persisted.windows_evaluated, Ordering::Relaxed);
                self.bad_windows.store(persisted.bad_windows, Ordering::Relaxed);
                self.alerts_fired
                    .store(persisted.alerts_fired, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    pub fn reset(&self) {
        self.samples_ingested.store(0, Ordering::Relaxed);
        self.windows_evaluated.store(0, Ordering::Relaxed);
        self.bad_windows.store(0, Ordering::Relaxed);
        self.alerts_fired.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time view of the counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub samples_ingested: u64,
    pub windows_evaluated: u64,
    pub bad_windows: u64,
    pub alerts_fired: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    samples_ingested: u64,
    windows_evaluated: u64,
    bad_windows: u64,
    alerts_fired: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared session log.
pub type SharedSessionLog = Arc<SessionLog>;

pub fn create_shared_log() -> SharedSessionLog {
    Arc::new(SessionLog::new())
}

pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedSessionLog {
    Arc::new(SessionLog::with_persistence(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let log = SessionLog::new();

        log.record_sample();
        log.record_sample();
        log.record_evaluation(false);
        log.record_evaluation(true);
        log.record_alert();

        let stats = log.stats();
        assert_eq!(stats.samples_ingested, 2);
        assert_eq!(stats.windows_evaluated, 2);
        assert_eq!(stats.bad_windows, 1);
        assert_eq!(stats.alerts_fired, 1);
    }

    #[test]
    fn test_reset() {
        let log = SessionLog::new();
        log.record_sample();
        log.record_alert();
        log.reset();

        let stats = log.stats();
        assert_eq!(stats.samples_ingested, 0);
        assert_eq!(stats.alerts_fired, 0);
    }

    #[test]
    fn test_summary_format() {
        let log = SessionLog::new();
        log.record_evaluation(true);
        let summary = log.summary();

        assert!(summary.contains("Samples ingested"));
        assert!(summary.contains("Bad-posture windows"));
        assert!(summary.contains("Alerts fired"));
    }
}
