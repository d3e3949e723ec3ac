//! Facade tying the buffer and motion pipelines together.
//!
//! The audio side drives `submit_buffer` and the render/query calls from a
//! single context; `submit_motion` may arrive from any context. The motion
//! filter behind its lock is the only state the two pipelines share.

use crate::dsp::frequency::{BestEstimate, FrequencyConfig, FrequencyEstimator};
use crate::dsp::waveform::{self, LineSegment};
use crate::dsp::{PcmBuffer, PcmProcessor, ProcessorUpdate, Reconfigurable, SampleFormat};
use crate::error::Result;
use crate::motion::color::{self, OPAQUE_BLACK};
use crate::motion::{MotionConfig, MotionFilter, MotionSample};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level tuning for one engine instance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub format: SampleFormat,
    pub frequency: FrequencyConfig,
    pub motion: MotionConfig,
}

/// Owns the per-buffer analysis pass and the shared motion state.
pub struct ScopeEngine {
    format: SampleFormat,
    buffer: Option<PcmBuffer>,
    estimator: FrequencyEstimator,
    estimate: Option<BestEstimate>,
    motion: Mutex<MotionFilter>,
    color: u32,
}

impl ScopeEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            format: config.format,
            buffer: None,
            estimator: FrequencyEstimator::new(config.frequency),
            estimate: None,
            motion: Mutex::new(MotionFilter::new(config.motion)),
            color: OPAQUE_BLACK,
        }
    }

    /// Accept a freshly captured buffer, replacing the previous one.
    ///
    /// Runs the frequency pass and refreshes the display color from the
    /// current stabilized orientation; geometry is produced lazily by
    /// [`ScopeEngine::render_geometry`].
    pub fn submit_buffer(&mut self, samples: Vec<i8>, length_seconds: f32) {
        let buffer = PcmBuffer::new(samples, length_seconds, self.format);

        self.estimate = match self.estimator.process_buffer(&buffer) {
            ProcessorUpdate::Estimate(estimate) => Some(estimate),
            ProcessorUpdate::None => None,
        };
        self.color = color::orientation_color(self.motion.lock().stabilized());

        debug!(
            samples = buffer.len(),
            estimate = ?self.estimate,
            "buffer submitted"
        );
        self.buffer = Some(buffer);
    }

    /// Route one accelerometer reading through the motion filter.
    ///
    /// Callable from any scheduling context.
    pub fn submit_motion(&self, sample: MotionSample) {
        self.motion.lock().update(&sample);
    }

    /// Replace the motion tuning, e.g. after the host reloads preferences.
    pub fn update_motion_config(&self, config: MotionConfig) {
        self.motion.lock().update_config(config);
    }

    /// Downsample the current buffer into `points` segments across a render
    /// area `height` pixels tall.
    ///
    /// Width and height are render-time parameters and are not retained.
    /// Before the first buffer arrives this yields empty geometry.
    pub fn render_geometry(&self, points: usize, height: f32) -> Result<Vec<LineSegment>> {
        match &self.buffer {
            Some(buffer) => waveform::reduce(buffer, points, height),
            None => Ok(Vec::new()),
        }
    }

    /// Best (frequency, amplitude) estimate for the current buffer, if any.
    pub fn best_frequency_estimate(&self) -> Option<BestEstimate> {
        self.estimate
    }

    /// Packed ARGB color derived from the orientation at the last buffer
    /// submission. Opaque black until then.
    pub fn current_color(&self) -> u32 {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidInput;

    fn square_wave(half_period: usize, reps: usize, level: i8) -> Vec<i8> {
        let mut samples = Vec::with_capacity(half_period * 2 * reps);
        for _ in 0..reps {
            samples.extend(std::iter::repeat(level).take(half_period));
            samples.extend(std::iter::repeat(-level).take(half_period));
        }
        samples
    }

    #[test]
    fn starts_with_black_and_no_geometry() {
        let engine = ScopeEngine::new(EngineConfig::default());
        assert_eq!(engine.current_color(), 0xFF00_0000);
        assert_eq!(engine.best_frequency_estimate(), None);
        assert!(engine
            .render_geometry(64, 100.0)
            .expect("no buffer renders empty")
            .is_empty());
    }

    #[test]
    fn buffer_submission_produces_estimate_and_geometry() {
        let mut engine = ScopeEngine::new(EngineConfig::default());
        engine.submit_buffer(square_wave(10, 5, 10), 0.1);

        let best = engine.best_frequency_estimate().expect("estimate expected");
        assert!((best.frequency - 50.0).abs() < 1e-3);

        let segments = engine.render_geometry(50, 100.0).expect("valid request");
        assert_eq!(segments.len(), 50);
        assert_eq!(segments[0].y0, 50.0);
    }

    #[test]
    fn next_buffer_replaces_the_previous_estimate() {
        let mut engine = ScopeEngine::new(EngineConfig::default());
        engine.submit_buffer(square_wave(10, 5, 10), 0.1);
        assert!(engine.best_frequency_estimate().is_some());

        engine.submit_buffer(vec![0; 100], 0.1);
        assert_eq!(engine.best_frequency_estimate(), None);
    }

    #[test]
    fn color_tracks_the_stabilized_orientation_per_buffer() {
        let engine = ScopeEngine::new(EngineConfig::default());
        engine.submit_motion(MotionSample {
            x: 1.0,
            y: 1.0,
            z: 1.0,
            timestamp_ms: 1_000,
        });

        let mut engine = engine;
        engine.submit_buffer(vec![0; 32], 0.032);

        // gravity absorbs 0.2 of the bootstrap reading: round(255 * 0.8) = 204
        assert_eq!(engine.current_color(), 0xFFCC_CCCC);
    }

    #[test]
    fn render_errors_surface_through_the_engine() {
        let mut engine = ScopeEngine::new(EngineConfig::default());
        engine.submit_buffer(vec![1, 2, 3], 0.003);

        assert_eq!(
            engine.render_geometry(0, 100.0),
            Err(InvalidInput::ZeroWidth)
        );
        assert_eq!(
            engine.render_geometry(8, 100.0),
            Err(InvalidInput::WidthExceedsBuffer {
                points: 8,
                samples: 3
            })
        );
    }

    #[test]
    fn legacy_format_flows_through_the_engine() {
        let config = EngineConfig {
            format: SampleFormat::Pcm16LegacyCombine,
            ..EngineConfig::default()
        };
        let mut engine = ScopeEngine::new(config);
        engine.submit_buffer(vec![10, 2, 20, 1], 0.004);

        let segments = engine.render_geometry(2, 100.0).expect("valid request");
        assert_eq!(segments.len(), 2);
    }
}
