//! Core signal-processing pipeline: per-sample feature extraction, sliding
//! window statistics, logistic classification, and debounced alerting.

pub mod aggregate;
pub mod alert;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod window;

pub use aggregate::{aggregate_window, feature_names, FEATURE_SCHEMA, NUM_WINDOW_FEATURES};
pub use alert::AlertMonitor;
pub use features::{compute_sample_features, SampleFeatures};
pub use model::{Classification, ModelError, PostureModel};
pub use pipeline::{Evaluation, PosturePipeline};
pub use window::SampleWindow;
