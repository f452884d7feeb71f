//! Simulated sensor source.
//!
//! Stands in for the IMU/force-sensor hardware: a background thread paces
//! synthetic `RawSample`s onto a channel at the nominal sample period. The
//! generated postures are deterministic (a small sinusoidal wobble around a
//! profile's base angles) so runs are reproducible.

use crate::sensor::types::{RawSample, TimedSample, Vec3};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Synthetic posture to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureProfile {
    /// Neutral seated posture: slight pitch, even force distribution
    Upright,
    /// Forward slouch: large upper pitch, curvature, uneven force
    Slouched,
    /// Upright and slouched phases alternating every few seconds
    Alternating,
}

impl PostureProfile {
    /// Parse a profile name as given on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "upright" => Some(PostureProfile::Upright),
            "slouched" => Some(PostureProfile::Slouched),
            "alternating" => Some(PostureProfile::Alternating),
            _ => None,
        }
    }
}

/// Configuration for the simulated source.
#[derive(Debug, Clone)]
pub struct SimSensorConfig {
    pub profile: PostureProfile,
    /// Nominal sampling period (20 ms = 50 Hz)
    pub sample_period: Duration,
}

impl Default for SimSensorConfig {
    fn default() -> Self {
        Self {
            profile: PostureProfile::Upright,
            sample_period: Duration::from_millis(20),
        }
    }
}

/// Errors from the simulated source.
#[derive(Debug)]
pub enum SensorError {
    AlreadyRunning,
}

impl std::fmt::Display for SensorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorError::AlreadyRunning => write!(f, "Sensor source is already running"),
        }
    }
}

impl std::error::Error for SensorError {}

/// A background sensor thread feeding timed samples into a channel.
pub struct SimSensor {
    config: SimSensorConfig,
    sender: Sender<TimedSample>,
    receiver: Receiver<TimedSample>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimSensor {
    pub fn new(config: SimSensorConfig) -> Self {
        let (sender, receiver) = bounded(1024);
        Self {
            config,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start the sampling thread.
    pub fn start(&mut self) -> Result<(), SensorError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(SensorError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);

        let running = self.running.clone();
        let sender = self.sender.clone();
        let profile = self.config.profile;
        let period = self.config.sample_period;
        // Ticks per alternating phase, ~5 s at the nominal rate.
        let phase_ticks = (Duration::from_secs(5).as_millis() / period.as_millis().max(1)) as u64;

        self.handle = Some(thread::spawn(move || {
            let mut tick: u64 = 0;
            while running.load(Ordering::SeqCst) {
                let sample = generate_sample(profile, tick, phase_ticks);
                // Drop samples if the consumer falls behind; the window only
                // ever wants the most recent data anyway.
                let _ = sender.try_send(TimedSample::new(sample));
                tick += 1;
                thread::sleep(period);
            }
        }));
        Ok(())
    }

    /// Stop the sampling thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn receiver(&self) -> &Receiver<TimedSample> {
        &self.receiver
    }
}

impl Drop for SimSensor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Synthesize one raw sample for a profile at a given tick.
pub fn generate_sample(profile: PostureProfile, tick: u64, phase_ticks: u64) -> RawSample {
    let slouched = match profile {
        PostureProfile::Upright => false,
        PostureProfile::Slouched => true,
        PostureProfile::Alternating => (tick / phase_ticks.max(1)) % 2 == 1,
    };

    // Base angles in degrees plus a slow wobble so std/min/max are nonzero.
    let wobble = (tick as f64 * 0.05).sin();
    let (pitch_upper, pitch_lower, force_upper, force_lower) = if slouched {
        (38.0 + 3.0 * wobble, 12.0 + wobble, 1.2, 6.5)
    } else {
        (6.0 + 2.0 * wobble, 4.0 + wobble, 5.0, 5.2)
    };

    RawSample::new(
        accel_for_pitch(pitch_upper),
        accel_for_pitch(pitch_lower),
        force_upper,
        force_lower,
    )
}

/// Gravity vector produced by a pure forward pitch (roll 0).
fn accel_for_pitch(pitch_deg: f64) -> Vec3 {
    let rad = pitch_deg.to_radians();
    Vec3::new(-rad.sin(), 0.0, rad.cos())
}
