//! Raw sensor readings at the collaborator boundary.
//!
//! One `RawSample` arrives per sampling tick: two 3-axis accelerations from
//! the upper and lower IMUs (in units of g) and two force-sensor readings
//! already linearized to a unitless "pressure" scale by the acquisition side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A 3-axis acceleration vector in units of gravitational acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A zero vector, the contract value for an unavailable IMU read.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// One synchronized set of raw readings, immutable once constructed.
///
/// Force readings are >= 0 while sensor contact is valid and exactly 0 when a
/// read is invalid or the sensor is unavailable; the pipeline does not
/// distinguish "no pressure" from "sensor absent".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Upper-back IMU acceleration (g)
    pub accel_upper: Vec3,
    /// Lower-back IMU acceleration (g)
    pub accel_lower: Vec3,
    /// Upper force sensor, linearized scale
    pub force_upper: f64,
    /// Lower force sensor, linearized scale
    pub force_lower: f64,
}

impl RawSample {
    /// Build a sample, sanitizing non-finite readings to 0 per the
    /// acquisition contract (an unavailable sensor reads as zero).
    pub fn new(accel_upper: Vec3, accel_lower: Vec3, force_upper: f64, force_lower: f64) -> Self {
        Self {
            accel_upper: sanitize_vec(accel_upper),
            accel_lower: sanitize_vec(accel_lower),
            force_upper: sanitize(force_upper),
            force_lower: sanitize(force_lower),
        }
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn sanitize_vec(v: Vec3) -> Vec3 {
    Vec3::new(sanitize(v.x), sanitize(v.y), sanitize(v.z))
}

/// A raw sample paired with its acquisition timestamp, as delivered over the
/// source channel.
#[derive(Debug, Clone, Copy)]
pub struct TimedSample {
    pub timestamp: DateTime<Utc>,
    pub sample: RawSample,
}

impl TimedSample {
    pub fn new(sample: RawSample) -> Self {
        Self {
            timestamp: Utc::now(),
            sample,
        }
    }

    pub fn at(timestamp: DateTime<Utc>, sample: RawSample) -> Self {
        Self { timestamp, sample }
    }
}
