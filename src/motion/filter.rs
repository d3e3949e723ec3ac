//! Gravity tracking and dead-zone stabilisation.

use super::{MotionConfig, MotionSample};
use crate::dsp::Reconfigurable;
use tracing::trace;

/// Filter state carried across readings.
///
/// An explicitly owned value: it lives inside one [`MotionFilter`] and is
/// reset only at construction or through [`MotionFilter::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    pub gravity: [f32; 3],
    pub last_stable: [f32; 3],
    pub initialized: bool,
    pub last_update_ms: i64,
}

/// Rate-limited exponential low-pass plus dead-zone over accelerometer
/// readings.
///
/// Small jitters around the last stable vector are absorbed; larger genuine
/// motions pass through immediately and become the new baseline.
#[derive(Debug, Clone)]
pub struct MotionFilter {
    config: MotionConfig,
    state: MotionState,
}

impl MotionFilter {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config: clamp_config(config),
            state: MotionState::default(),
        }
    }

    pub fn config(&self) -> MotionConfig {
        self.config
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Latest fully settled stabilized vector.
    pub fn stabilized(&self) -> [f32; 3] {
        self.state.last_stable
    }

    /// Apply one accelerometer reading.
    ///
    /// Readings closer than `sampling_interval_ms` to the previously applied
    /// one are dropped without touching any state. All three axes settle
    /// before the update returns, so a concurrent read through the owning
    /// lock never observes a half-updated vector.
    pub fn update(&mut self, sample: &MotionSample) {
        if sample.timestamp_ms - self.state.last_update_ms <= self.config.sampling_interval_ms {
            trace!(timestamp_ms = sample.timestamp_ms, "reading dropped by rate limit");
            return;
        }
        self.state.last_update_ms = sample.timestamp_ms;

        let alpha = self.config.gravity_alpha;
        let raw = [sample.x, sample.y, sample.z];
        let mut candidate = [0.0f32; 3];

        for axis in 0..3 {
            let gravity = alpha * self.state.gravity[axis] + (1.0 - alpha) * raw[axis];
            self.state.gravity[axis] = gravity;
            candidate[axis] = raw[axis] - gravity;
        }

        if !self.state.initialized {
            self.state.last_stable = candidate;
            self.state.initialized = true;
            return;
        }

        for axis in 0..3 {
            let delta = (self.state.last_stable[axis] - candidate[axis]).abs();
            if delta >= self.config.noise_threshold {
                self.state.last_stable[axis] = candidate[axis];
            }
            // a held axis keeps last_stable, re-anchoring at the same value
        }
    }

    pub fn reset(&mut self) {
        self.state = MotionState::default();
    }
}

impl Reconfigurable<MotionConfig> for MotionFilter {
    fn update_config(&mut self, config: MotionConfig) {
        self.config = clamp_config(config);
    }
}

fn clamp_config(mut config: MotionConfig) -> MotionConfig {
    config.sampling_interval_ms = config.sampling_interval_ms.max(0);
    config.noise_threshold = config.noise_threshold.max(0.0);
    config.gravity_alpha = config.gravity_alpha.clamp(0.0, 1.0);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, y: f32, z: f32, timestamp_ms: i64) -> MotionSample {
        MotionSample {
            x,
            y,
            z,
            timestamp_ms,
        }
    }

    /// Passing gravity straight through makes candidates equal the raw
    /// readings, which keeps dead-zone expectations exact.
    fn passthrough_filter() -> MotionFilter {
        MotionFilter::new(MotionConfig {
            gravity_alpha: 1.0,
            ..MotionConfig::default()
        })
    }

    #[test]
    fn first_accepted_reading_bootstraps_the_baseline() {
        let mut filter = MotionFilter::new(MotionConfig::default());
        filter.update(&sample(1.0, 0.0, 0.0, 1_000));

        let state = filter.state();
        assert!(state.initialized);
        // gravity absorbs 0.2 of the reading, the rest becomes the baseline
        assert!((state.gravity[0] - 0.2).abs() < 1e-6);
        assert!((state.last_stable[0] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn readings_inside_the_sampling_interval_are_dropped() {
        let mut filter = MotionFilter::new(MotionConfig::default());
        filter.update(&sample(1.0, 2.0, 3.0, 1_000));

        let before = filter.state();
        filter.update(&sample(9.0, 9.0, 9.0, 1_400));
        assert_eq!(filter.state(), before);

        // exactly at the interval boundary is still too close
        filter.update(&sample(9.0, 9.0, 9.0, 1_500));
        assert_eq!(filter.state(), before);
    }

    #[test]
    fn small_changes_are_held_as_noise() {
        let mut filter = passthrough_filter();
        filter.update(&sample(1.0, 0.0, 0.0, 1_000));
        filter.update(&sample(1.4, 0.0, 0.0, 2_000));

        assert_eq!(filter.stabilized(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn changes_at_the_threshold_update_to_the_candidate() {
        let mut filter = passthrough_filter();
        filter.update(&sample(1.0, 0.0, 0.0, 1_000));
        filter.update(&sample(1.5, 0.0, 0.0, 2_000));

        assert_eq!(filter.stabilized(), [1.5, 0.0, 0.0]);
    }

    #[test]
    fn axes_are_stabilised_independently() {
        let mut filter = passthrough_filter();
        filter.update(&sample(1.0, 1.0, 1.0, 1_000));
        filter.update(&sample(1.1, 3.0, 0.9, 2_000));

        let stabilized = filter.stabilized();
        assert_eq!(stabilized[0], 1.0);
        assert_eq!(stabilized[1], 3.0);
        assert_eq!(stabilized[2], 1.0);
    }

    #[test]
    fn a_changed_axis_becomes_the_new_baseline() {
        let mut filter = passthrough_filter();
        filter.update(&sample(0.0, 0.0, 0.0, 1_000));
        filter.update(&sample(2.0, 0.0, 0.0, 2_000));
        // a jitter around the new baseline is absorbed
        filter.update(&sample(2.3, 0.0, 0.0, 3_000));

        assert_eq!(filter.stabilized(), [2.0, 0.0, 0.0]);
    }

    #[test]
    fn gravity_converges_toward_a_constant_reading() {
        let mut filter = MotionFilter::new(MotionConfig::default());
        for step in 0..50 {
            filter.update(&sample(0.0, 0.0, 9.8, 1_000 * (step + 1)));
        }

        let state = filter.state();
        assert!((state.gravity[2] - 9.8).abs() < 1e-3);
        // with gravity settled, the linear candidate decays to zero
        assert!(state.last_stable[2].abs() < 0.5);
    }

    #[test]
    fn reset_restores_the_uninitialised_state() {
        let mut filter = MotionFilter::new(MotionConfig::default());
        filter.update(&sample(1.0, 2.0, 3.0, 1_000));
        filter.reset();
        assert_eq!(filter.state(), MotionState::default());
    }

    #[test]
    fn interval_can_be_reconfigured_at_runtime() {
        let mut filter = passthrough_filter();
        filter.update(&sample(1.0, 0.0, 0.0, 1_000));

        filter.update_config(MotionConfig {
            sampling_interval_ms: 50,
            gravity_alpha: 1.0,
            ..MotionConfig::default()
        });
        filter.update(&sample(5.0, 0.0, 0.0, 1_100));

        assert_eq!(filter.stabilized(), [5.0, 0.0, 0.0]);
    }
}
