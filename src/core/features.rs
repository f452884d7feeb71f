//! Per-sample feature extraction.
//!
//! One `RawSample` becomes nine scalar signals: two pitch/roll pairs from the
//! IMUs, the pitch difference between them (a spinal curvature proxy), and
//! four force-derived values.

use crate::sensor::types::{RawSample, Vec3};
use serde::{Deserialize, Serialize};

/// Below this magnitude the total force is treated as zero and the balance
/// degrades to 0 instead of dividing by a near-zero sum.
const FORCE_TOTAL_EPSILON: f64 = 1e-3;

/// The nine per-sample signals derived from one raw reading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleFeatures {
    /// Upper IMU pitch (deg)
    pub pitch_upper: f64,
    /// Upper IMU roll (deg)
    pub roll_upper: f64,
    /// Lower IMU pitch (deg)
    pub pitch_lower: f64,
    /// Lower IMU roll (deg)
    pub roll_lower: f64,
    /// pitch_upper - pitch_lower (curvature indicator)
    pub delta_pitch: f64,
    /// Upper force sensor, scaled
    pub force_upper: f64,
    /// Lower force sensor, scaled
    pub force_lower: f64,
    /// force_upper + force_lower
    pub force_total: f64,
    /// (force_upper - force_lower) / force_total, 0 when the total is ~0
    pub force_balance: f64,
}

/// Pitch and roll (in degrees) from an acceleration vector in g.
///
/// Pitch is rotation about the Y axis (forward/backward lean), roll about the
/// X axis (sideways lean). Sign conventions follow the device's mounting.
pub fn pitch_roll(acc: Vec3) -> (f64, f64) {
    let pitch = (-acc.x).atan2((acc.y * acc.y + acc.z * acc.z).sqrt());
    let roll = acc.y.atan2(acc.z);
    (pitch.to_degrees(), roll.to_degrees())
}

/// Compute all nine per-sample signals from one raw reading.
pub fn compute_sample_features(sample: &RawSample) -> SampleFeatures {
    let (pitch_upper, roll_upper) = pitch_roll(sample.accel_upper);
    let (pitch_lower, roll_lower) = pitch_roll(sample.accel_lower);

    let force_total = sample.force_upper + sample.force_lower;
    let force_balance = if force_total.abs() > FORCE_TOTAL_EPSILON {
        (sample.force_upper - sample.force_lower) / force_total
    } else {
        0.0
    };

    SampleFeatures {
        pitch_upper,
        roll_upper,
        pitch_lower,
        roll_lower,
        delta_pitch: pitch_upper - pitch_lower,
        force_upper: sample.force_upper,
        force_lower: sample.force_lower,
        force_total,
        force_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(acc_upper: Vec3, acc_lower: Vec3, f1: f64, f2: f64) -> RawSample {
        RawSample::new(acc_upper, acc_lower, f1, f2)
    }

    #[test]
    fn test_level_device_has_zero_angles() {
        // Gravity straight down the Z axis: no lean in either direction.
        let s = sample(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0), 0.0, 0.0);
        let f = compute_sample_features(&s);
        assert!(f.pitch_upper.abs() < 1e-9);
        assert!(f.roll_upper.abs() < 1e-9);
        assert!(f.delta_pitch.abs() < 1e-9);
    }

    #[test]
    fn test_forward_lean_is_positive_pitch() {
        // Full forward pitch: x = -1g, y = z = 0 -> pitch = +90 deg.
        let s = sample(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0, 0.0);
        let f = compute_sample_features(&s);
        assert!((f.pitch_upper - 90.0).abs() < 1e-9);
        assert!((f.delta_pitch - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_tilt_angle() {
        // 30 degree forward lean: x = -sin(30), z = cos(30).
        let rad = 30f64.to_radians();
        let s = sample(
            Vec3::new(-rad.sin(), 0.0, rad.cos()),
            Vec3::new(0.0, 0.0, 1.0),
            0.0,
            0.0,
        );
        let f = compute_sample_features(&s);
        assert!((f.pitch_upper - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_roll_from_sideways_gravity() {
        // y = 1g, z = 0 -> roll = +90 deg.
        let s = sample(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0, 0.0);
        let f = compute_sample_features(&s);
        assert!((f.roll_upper - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_force_totals_and_balance() {
        let s = sample(Vec3::zero(), Vec3::zero(), 6.0, 2.0);
        let f = compute_sample_features(&s);
        assert_eq!(f.force_total, 8.0);
        assert_eq!(f.force_balance, 0.5);
    }

    #[test]
    fn test_balance_is_zero_near_zero_total() {
        let s = sample(Vec3::zero(), Vec3::zero(), 0.0005, 0.0004);
        let f = compute_sample_features(&s);
        assert!(f.force_total.abs() <= FORCE_TOTAL_EPSILON);
        assert_eq!(f.force_balance, 0.0);
    }

    #[test]
    fn test_balance_stays_in_unit_range() {
        for (a, b) in [(10.0, 0.0), (0.0, 10.0), (3.0, 3.0), (0.01, 9.9)] {
            let f = compute_sample_features(&sample(Vec3::zero(), Vec3::zero(), a, b));
            if f.force_total.abs() > FORCE_TOTAL_EPSILON {
                assert!((-1.0..=1.0).contains(&f.force_balance));
            }
        }
    }
}
