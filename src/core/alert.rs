//! Debounced alert state machine.
//!
//! Consumes the stream of window classifications and decides when to fire the
//! physical alert. A bad episode must persist for the full threshold before
//! the first alert, and the alert then repeats every threshold interval for
//! as long as the episode lasts. A single good classification ends the
//! episode and restarts the timer from scratch.

use crate::core::model::Classification;
use chrono::{DateTime, Duration, Utc};

/// Tracks the current bad-posture episode and its debounce timer.
///
/// The stored timestamp marks either the start of the current bad episode or
/// the last alert firing, whichever is more recent.
#[derive(Debug, Clone)]
pub struct AlertMonitor {
    threshold: Duration,
    in_bad_episode: bool,
    /// None until the first evaluation arrives
    marker: Option<DateTime<Utc>>,
}

impl AlertMonitor {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            in_bad_episode: false,
            marker: None,
        }
    }

    /// Whether a bad episode is currently running.
    pub fn in_bad_episode(&self) -> bool {
        self.in_bad_episode
    }

    /// Feed one classification taken at `now`. Returns true when the alert
    /// should fire (at most once per evaluation tick).
    pub fn update(&mut self, classification: &Classification, now: DateTime<Utc>) -> bool {
        let marker = *self.marker.get_or_insert(now);

        if !classification.is_bad {
            // Good posture always resets, so a later bad streak starts its
            // own timer from scratch.
            self.in_bad_episode = false;
            self.marker = Some(now);
            return false;
        }

        if !self.in_bad_episode {
            self.in_bad_episode = true;
            self.marker = Some(now);
            return false;
        }

        if now - marker >= self.threshold {
            self.marker = Some(now);
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const GOOD: Classification = Classification {
        p_good: 0.9,
        is_bad: false,
    };
    const BAD: Classification = Classification {
        p_good: 0.1,
        is_bad: true,
    };

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn monitor() -> AlertMonitor {
        AlertMonitor::new(Duration::milliseconds(3000))
    }

    #[test]
    fn test_good_run_never_fires() {
        let mut m = monitor();
        for i in 0..1000i64 {
            assert!(!m.update(&GOOD, at(i * 500)));
        }
        assert!(!m.in_bad_episode());
    }

    #[test]
    fn test_no_alert_on_entering_bad_episode() {
        let mut m = monitor();
        assert!(!m.update(&BAD, at(0)));
        assert!(m.in_bad_episode());
    }

    #[test]
    fn test_repeating_cadence_during_long_bad_run() {
        let mut m = monitor();
        let mut fired_at = Vec::new();
        // Evaluations every 500 ms from t0 = 0.
        for i in 0..=20i64 {
            let t = i * 500;
            if m.update(&BAD, at(t)) {
                fired_at.push(t);
            }
        }
        assert_eq!(fired_at, vec![3000, 6000, 9000]);
    }

    #[test]
    fn test_good_result_resets_the_timer() {
        let mut m = monitor();
        assert!(!m.update(&BAD, at(0)));
        assert!(!m.update(&BAD, at(2500)));
        // Brief recovery ends the episode.
        assert!(!m.update(&GOOD, at(3000)));
        assert!(!m.in_bad_episode());
        // New bad streak starts its own timer; 3000 ms must elapse again.
        assert!(!m.update(&BAD, at(3500)));
        assert!(!m.update(&BAD, at(6000)));
        assert!(m.update(&BAD, at(6500)));
    }

    #[test]
    fn test_elapsed_exactly_threshold_fires() {
        let mut m = monitor();
        assert!(!m.update(&BAD, at(1000)));
        assert!(m.update(&BAD, at(4000)));
    }

    #[test]
    fn test_timer_restarts_after_each_firing() {
        let mut m = monitor();
        assert!(!m.update(&BAD, at(0)));
        assert!(m.update(&BAD, at(3200)));
        // 3000 ms from the firing, not from episode start.
        assert!(!m.update(&BAD, at(6000)));
        assert!(m.update(&BAD, at(6200)));
    }

    #[test]
    fn test_bad_run_at_step_cadence_fires_exactly_twice() {
        // 74 consecutive bad evaluations spanning 0..9000 ms of episode time
        // (one evaluation every ~123 ms): alerts at the 3000 and 6000 ms
        // boundaries only, none at episode start.
        let mut m = monitor();
        let mut alerts = 0;
        for i in 0..74i64 {
            let t = i * 9000 / 74;
            if m.update(&BAD, at(t)) {
                alerts += 1;
            }
        }
        assert_eq!(alerts, 2);
    }
}
