//! Spineguard - wearable posture monitor.
//!
//! Turns a 50 Hz stream of raw readings from two back-mounted IMUs and two
//! force sensors into a periodic good/bad posture classification, and raises
//! a repeating alert when bad posture persists.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Spineguard                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │  Sensor  │──▶│ Features │──▶│  Window  │──▶│Aggregate │  │
//! │  │(sim/CSV) │   │(per tick)│   │ (ring 50)│   │ (36 dim) │  │
//! │  └──────────┘   └──────────┘   └──────────┘   └────┬─────┘  │
//! │                                                    ▼        │
//! │  ┌──────────┐                 ┌──────────┐   ┌──────────┐   │
//! │  │ Session  │                 │  Alert   │◀──│ Logistic │   │
//! │  │  Stats   │                 │ Machine  │   │  Model   │   │
//! │  └──────────┘                 └──────────┘   └──────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core is single-threaded and synchronous: the driver invokes
//! [`PosturePipeline::ingest`] once per sampling tick, and every 25 samples
//! (once the 50-sample window has filled) the pipeline aggregates the window
//! into 36 statistics, classifies them with a pretrained logistic model, and
//! feeds the label to the debounced alert machine. Sensor acquisition and the
//! physical alert actuator live outside the core.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use chrono::Utc;
//! use spineguard::core::{PostureModel, PosturePipeline};
//! use spineguard::sensor::{RawSample, Vec3};
//!
//! let model = PostureModel::load(Path::new("model.json")).expect("valid model");
//! let mut pipeline = PosturePipeline::new(model, 50, 25, chrono::Duration::milliseconds(3000));
//!
//! let sample = RawSample::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0), 5.0, 5.0);
//! if let Some(eval) = pipeline.ingest(&sample, Utc::now()) {
//!     println!("p_good = {:.3}, alert = {}", eval.classification.p_good, eval.alert_fired);
//! }
//! ```

pub mod config;
pub mod core;
pub mod datalog;
pub mod sensor;
pub mod session;

// Re-export key types at crate root for convenience
pub use config::Config;
pub use core::{
    Classification, Evaluation, ModelError, PostureModel, PosturePipeline, SampleFeatures,
};
pub use sensor::{PostureProfile, RawSample, SimSensor, SimSensorConfig, TimedSample, Vec3};
pub use session::{SessionLog, SessionStats, SharedSessionLog};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
