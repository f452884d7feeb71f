//! Sensor acquisition boundary.
//!
//! The pipeline core never talks to hardware; it consumes `RawSample`s
//! delivered over a channel by a source. Two sources are provided: a
//! deterministic simulator that paces samples at the nominal rate, and a CSV
//! replay reader for recorded sessions.

pub mod replay;
pub mod sim;
pub mod types;

pub use replay::{load_samples, ReplayError};
pub use sim::{PostureProfile, SimSensor, SimSensorConfig};
pub use types::{RawSample, TimedSample, Vec3};
