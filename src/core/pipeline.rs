//! The per-tick processing pipeline.
//!
//! A single `PosturePipeline` owns the sliding window, the model and the
//! alert state; the driver feeds it one raw sample per tick. Every `step`
//! samples, once the window is full, the window is aggregated, classified,
//! and the result is run through the alert machine. The pipeline itself has
//! no I/O and no timing; it is handed the current timestamp by the driver and
//! must not be shared across threads without external mutual exclusion.

use crate::core::aggregate::aggregate_window;
use crate::core::alert::AlertMonitor;
use crate::core::features::{compute_sample_features, SampleFeatures};
use crate::core::model::{Classification, PostureModel};
use crate::core::window::SampleWindow;
use crate::sensor::types::RawSample;
use chrono::{DateTime, Duration, Utc};

/// Result of an evaluation tick.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub classification: Classification,
    /// Whether the alert fired on this tick
    pub alert_fired: bool,
    pub timestamp: DateTime<Utc>,
}

/// Owns all mutable pipeline state for the lifetime of the device run.
pub struct PosturePipeline {
    model: PostureModel,
    window: SampleWindow,
    alert: AlertMonitor,
    /// Samples between evaluations (50% overlap at the default 25 of 50)
    step: usize,
}

impl PosturePipeline {
    /// `model` must already be validated; `window_len` and `step` come from
    /// config validation and are nonzero with `step <= window_len`.
    pub fn new(
        model: PostureModel,
        window_len: usize,
        step: usize,
        alert_threshold: Duration,
    ) -> Self {
        Self {
            model,
            window: SampleWindow::new(window_len),
            alert: AlertMonitor::new(alert_threshold),
            step,
        }
    }

    /// Per-sample features for the most recently ingested raw sample,
    /// without touching pipeline state. Used by the dataset-logging mode.
    pub fn extract(sample: &RawSample) -> SampleFeatures {
        compute_sample_features(sample)
    }

    /// Ingest one raw sample at `now`. Returns an `Evaluation` on the ticks
    /// where a classification was produced (window full and `step` new
    /// samples accumulated), `None` otherwise.
    pub fn ingest(&mut self, sample: &RawSample, now: DateTime<Utc>) -> Option<Evaluation> {
        self.window.push(compute_sample_features(sample));

        if !self.window.is_full() || self.window.steps_since_eval() < self.step {
            return None;
        }
        self.window.mark_evaluated();

        let snapshot = self.window.snapshot();
        let features = aggregate_window(&snapshot);
        let classification = self.model.predict(&features);
        let alert_fired = self.alert.update(&classification, now);

        Some(Evaluation {
            classification,
            alert_fired,
            timestamp: now,
        })
    }

    pub fn samples_in_window(&self) -> usize {
        self.window.len()
    }
}
