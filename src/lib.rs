//! Signal core for a loop-pedal style audio app: converts captured PCM
//! buffers into render geometry and a dominant-pitch estimate, and derives a
//! display color from smoothed accelerometer motion.
//!
//! The crate stops at the signal boundary. Audio capture, on-screen drawing
//! and sensor subscriptions belong to the host application, which feeds
//! buffers and readings in through [`engine::ScopeEngine`] and reads back
//! geometry, the best (frequency, amplitude) estimate and a packed color.

pub mod dsp;
pub mod engine;
pub mod error;
pub mod motion;
pub mod util;

pub use dsp::frequency::{BestEstimate, FrequencyConfig, FrequencyEstimator};
pub use dsp::waveform::LineSegment;
pub use dsp::{PcmBuffer, PcmProcessor, ProcessorUpdate, Reconfigurable, SampleFormat};
pub use engine::{EngineConfig, ScopeEngine};
pub use error::{InvalidInput, Result};
pub use motion::{MotionConfig, MotionFilter, MotionSample};
