//! Sensor-side pipeline: accelerometer stabilisation and derived color.
//!
//! Readings arrive from whatever delivery mechanism the host platform
//! provides; [`filter::MotionFilter`] is a plain value callable from any
//! scheduling context, with no subscription machinery of its own.

pub mod color;
pub mod filter;

use serde::{Deserialize, Serialize};

pub use filter::{MotionFilter, MotionState};

pub const DEFAULT_SAMPLING_INTERVAL_MS: i64 = 500;
pub const DEFAULT_NOISE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_GRAVITY_ALPHA: f32 = 0.8;

/// One accelerometer reading, in device-acceleration units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Delivery timestamp in milliseconds.
    pub timestamp_ms: i64,
}

/// Tuning for the gravity low-pass and dead-zone stabilisation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Minimum spacing between applied readings; closer arrivals are
    /// dropped outright.
    pub sampling_interval_ms: i64,
    /// Candidate changes smaller than this are held as noise.
    pub noise_threshold: f32,
    /// Low-pass coefficient for the running gravity estimate.
    pub gravity_alpha: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            sampling_interval_ms: DEFAULT_SAMPLING_INTERVAL_MS,
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
            gravity_alpha: DEFAULT_GRAVITY_ALPHA,
        }
    }
}
