//! Window feature aggregation.
//!
//! Reduces a chronological window of per-sample features into 36 statistics:
//! for each of the nine signals, its mean, population standard deviation,
//! minimum and maximum, in that order. This layout is the contract the model
//! parameters were trained against; it is expressed as explicit enums (rather
//! than positional convention) and stamped with a schema id so a model trained
//! on a different layout is rejected at load time instead of silently
//! misclassifying.

use crate::core::features::SampleFeatures;

/// Identifier for the 36-slot feature layout below. Bump when the signal or
/// statistic order changes; model files must carry a matching id.
pub const FEATURE_SCHEMA: &str = "posture-signals-v1";

/// Number of tracked per-sample signals.
pub const NUM_SIGNALS: usize = 9;

/// Statistics emitted per signal.
pub const STATS_PER_SIGNAL: usize = 4;

/// Length of the aggregated feature vector.
pub const NUM_WINDOW_FEATURES: usize = NUM_SIGNALS * STATS_PER_SIGNAL;

/// The nine base signals, in their canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    PitchUpper,
    RollUpper,
    PitchLower,
    RollLower,
    DeltaPitch,
    ForceUpper,
    ForceLower,
    ForceTotal,
    ForceBalance,
}

impl Signal {
    /// Canonical ordering, matching the training-side column order.
    pub const ALL: [Signal; NUM_SIGNALS] = [
        Signal::PitchUpper,
        Signal::RollUpper,
        Signal::PitchLower,
        Signal::RollLower,
        Signal::DeltaPitch,
        Signal::ForceUpper,
        Signal::ForceLower,
        Signal::ForceTotal,
        Signal::ForceBalance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Signal::PitchUpper => "pitch_upper",
            Signal::RollUpper => "roll_upper",
            Signal::PitchLower => "pitch_lower",
            Signal::RollLower => "roll_lower",
            Signal::DeltaPitch => "delta_pitch",
            Signal::ForceUpper => "force_upper",
            Signal::ForceLower => "force_lower",
            Signal::ForceTotal => "force_total",
            Signal::ForceBalance => "force_balance",
        }
    }

    /// Extract this signal's value from one sample.
    pub fn value(self, f: &SampleFeatures) -> f64 {
        match self {
            Signal::PitchUpper => f.pitch_upper,
            Signal::RollUpper => f.roll_upper,
            Signal::PitchLower => f.pitch_lower,
            Signal::RollLower => f.roll_lower,
            Signal::DeltaPitch => f.delta_pitch,
            Signal::ForceUpper => f.force_upper,
            Signal::ForceLower => f.force_lower,
            Signal::ForceTotal => f.force_total,
            Signal::ForceBalance => f.force_balance,
        }
    }
}

/// The four statistics emitted per signal, in their canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Mean,
    Std,
    Min,
    Max,
}

impl Stat {
    pub const ALL: [Stat; STATS_PER_SIGNAL] = [Stat::Mean, Stat::Std, Stat::Min, Stat::Max];

    pub fn name(self) -> &'static str {
        match self {
            Stat::Mean => "mean",
            Stat::Std => "std",
            Stat::Min => "min",
            Stat::Max => "max",
        }
    }
}

/// Slot index of a (signal, stat) pair in the aggregated vector.
///
/// Enum declaration order is the canonical order, so the index is derived
/// directly from the discriminants.
pub fn feature_index(signal: Signal, stat: Stat) -> usize {
    (signal as usize) * STATS_PER_SIGNAL + (stat as usize)
}

/// Names of all 36 slots in layout order ("pitch_upper_mean", ...).
pub fn feature_names() -> Vec<String> {
    let mut names = Vec::with_capacity(NUM_WINDOW_FEATURES);
    for signal in Signal::ALL {
        for stat in Stat::ALL {
            names.push(format!("{}_{}", signal.name(), stat.name()));
        }
    }
    names
}

/// Aggregate a chronological window snapshot into the 36-slot feature vector.
///
/// `samples` must be non-empty; the pipeline only calls this once the window
/// is full. Standard deviation is the population form, with the variance
/// clamped at zero so floating-point cancellation cannot leak a NaN through
/// the square root. Minima and maxima are seeded from the first sample, so
/// they are correct when every value is negative.
pub fn aggregate_window(samples: &[SampleFeatures]) -> [f64; NUM_WINDOW_FEATURES] {
    debug_assert!(!samples.is_empty());

    let n = samples.len() as f64;
    let mut out = [0.0; NUM_WINDOW_FEATURES];

    for (s, signal) in Signal::ALL.iter().enumerate() {
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut min = signal.value(&samples[0]);
        let mut max = min;

        for sample in samples {
            let x = signal.value(sample);
            sum += x;
            sum_sq += x * x;
            if x < min {
                min = x;
            }
            if x > max {
                max = x;
            }
        }

        let mean = sum / n;
        let var = (sum_sq / n - mean * mean).max(0.0);

        let base = s * STATS_PER_SIGNAL;
        out[base] = mean;
        out[base + 1] = var.sqrt();
        out[base + 2] = min;
        out[base + 3] = max;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::statistics::Statistics;

    fn constant_sample() -> SampleFeatures {
        SampleFeatures {
            pitch_upper: 10.0,
            roll_upper: 0.0,
            pitch_lower: 10.0,
            roll_lower: 0.0,
            delta_pitch: 0.0,
            force_upper: 5.0,
            force_lower: 5.0,
            force_total: 10.0,
            force_balance: 0.0,
        }
    }

    #[test]
    fn test_layout_matches_training_order() {
        let names = feature_names();
        assert_eq!(names.len(), 36);
        // First and last signal blocks, pinned by name and position.
        assert_eq!(names[0], "pitch_upper_mean");
        assert_eq!(names[1], "pitch_upper_std");
        assert_eq!(names[2], "pitch_upper_min");
        assert_eq!(names[3], "pitch_upper_max");
        assert_eq!(names[16], "delta_pitch_mean");
        assert_eq!(names[20], "force_upper_mean");
        assert_eq!(names[32], "force_balance_mean");
        assert_eq!(names[35], "force_balance_max");
    }

    #[test]
    fn test_feature_index_agrees_with_names() {
        let names = feature_names();
        for signal in Signal::ALL {
            for stat in Stat::ALL {
                let idx = feature_index(signal, stat);
                assert_eq!(names[idx], format!("{}_{}", signal.name(), stat.name()));
            }
        }
    }

    #[test]
    fn test_identical_samples_collapse_to_the_value() {
        let window = vec![constant_sample(); 50];
        let agg = aggregate_window(&window);

        let expected = [10.0, 0.0, 10.0, 10.0, 0.0, 5.0, 5.0, 10.0, 0.0];
        for (s, signal) in Signal::ALL.iter().enumerate() {
            assert_eq!(agg[feature_index(*signal, Stat::Mean)], expected[s]);
            assert_eq!(agg[feature_index(*signal, Stat::Std)], 0.0);
            assert_eq!(agg[feature_index(*signal, Stat::Min)], expected[s]);
            assert_eq!(agg[feature_index(*signal, Stat::Max)], expected[s]);
        }
    }

    #[test]
    fn test_min_mean_max_ordering() {
        let mut window = Vec::new();
        for i in 0..50 {
            window.push(SampleFeatures {
                pitch_upper: (i as f64 * 0.7).sin() * 20.0,
                delta_pitch: i as f64 - 25.0,
                force_total: 4.0 + (i % 7) as f64,
                ..SampleFeatures::default()
            });
        }
        let agg = aggregate_window(&window);
        for signal in Signal::ALL {
            let mean = agg[feature_index(signal, Stat::Mean)];
            let min = agg[feature_index(signal, Stat::Min)];
            let max = agg[feature_index(signal, Stat::Max)];
            assert!(min <= mean && mean <= max, "{}", signal.name());
        }
    }

    #[test]
    fn test_all_negative_values_keep_correct_extremes() {
        let window: Vec<SampleFeatures> = (1..=10)
            .map(|i| SampleFeatures {
                delta_pitch: -(i as f64),
                ..SampleFeatures::default()
            })
            .collect();
        let agg = aggregate_window(&window);
        assert_eq!(agg[feature_index(Signal::DeltaPitch, Stat::Min)], -10.0);
        assert_eq!(agg[feature_index(Signal::DeltaPitch, Stat::Max)], -1.0);
    }

    #[test]
    fn test_mean_and_std_against_statrs() {
        let values: Vec<f64> = (0..50).map(|i| ((i * 37) % 11) as f64 - 3.0).collect();
        let window: Vec<SampleFeatures> = values
            .iter()
            .map(|&v| SampleFeatures {
                pitch_upper: v,
                ..SampleFeatures::default()
            })
            .collect();
        let agg = aggregate_window(&window);

        let mean = agg[feature_index(Signal::PitchUpper, Stat::Mean)];
        let std = agg[feature_index(Signal::PitchUpper, Stat::Std)];
        assert!((mean - values.as_slice().mean()).abs() < 1e-12);
        assert!((std - values.as_slice().population_std_dev()).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_spread_never_goes_negative_under_sqrt() {
        // Values whose variance cancels to ~0 in floating point.
        let window: Vec<SampleFeatures> = (0..50)
            .map(|_| SampleFeatures {
                force_balance: 0.1 + 1e-16,
                ..SampleFeatures::default()
            })
            .collect();
        let agg = aggregate_window(&window);
        let std = agg[feature_index(Signal::ForceBalance, Stat::Std)];
        assert!(std >= 0.0 && std.is_finite());
    }
}
