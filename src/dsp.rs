//! Buffer-side signal processing shared by the waveform and pitch pipelines.
//!
//! This module provides the capture buffer type and the processor contracts;
//! the submodules hold the actual analysis passes. Each pass consumes one
//! [`PcmBuffer`] in full and keeps no history across buffers.

pub mod frequency;
pub mod waveform;

use serde::{Deserialize, Serialize};

/// Encoding of the samples inside a [`PcmBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SampleFormat {
    /// One signed byte per rendered sample.
    #[default]
    Pcm8,
    /// Two bytes per rendered sample, combined as `low + 127 * high`.
    ///
    /// Not a two's-complement 16-bit decode; this reproduces the historical
    /// combine used by one capture pipeline and stays a separate variant so
    /// existing recordings keep rendering the same way.
    Pcm16LegacyCombine,
}

impl SampleFormat {
    /// Number of bytes consumed per rendered sample.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::Pcm8 => 1,
            SampleFormat::Pcm16LegacyCombine => 2,
        }
    }

    /// Maximum representable magnitude, used to normalise decoded values.
    pub fn max_value(self) -> f32 {
        match self {
            SampleFormat::Pcm8 => i8::MAX as f32,
            SampleFormat::Pcm16LegacyCombine => i16::MAX as f32,
        }
    }

    /// Decode the rendered sample starting at `index`.
    ///
    /// Callers are responsible for keeping `index` (and `index + 1` for the
    /// two-byte variant) inside the slice.
    pub fn decode(self, samples: &[i8], index: usize) -> i32 {
        match self {
            SampleFormat::Pcm8 => samples[index] as i32,
            SampleFormat::Pcm16LegacyCombine => {
                let low = samples[index] as i32;
                let high = samples[index + 1] as i32;
                low + i8::MAX as i32 * high
            }
        }
    }
}

/// One capture's worth of PCM samples plus the wall-clock span it covers.
///
/// Owned read-only by the processing pass; the next submission replaces it
/// wholesale.
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    samples: Vec<i8>,
    length_seconds: f32,
    format: SampleFormat,
}

impl PcmBuffer {
    pub fn new(samples: Vec<i8>, length_seconds: f32, format: SampleFormat) -> Self {
        Self {
            samples,
            length_seconds,
            format,
        }
    }

    pub fn samples(&self) -> &[i8] {
        &self.samples
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Wall-clock seconds covered by a single sample slot.
    pub fn time_per_slot(&self) -> f32 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.length_seconds / self.samples.len() as f32
        }
    }
}

/// Output emitted by a processor after consuming a [`PcmBuffer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessorUpdate<T> {
    /// No result could be derived from the buffer. For the pitch pass this
    /// is the valid "no estimate" outcome, not a failure.
    None,
    /// A fresh estimate is available.
    Estimate(T),
}

/// Shared contract implemented by buffer-scanning analysers.
pub trait PcmProcessor {
    type Output;

    /// Consume one buffer and optionally produce a new estimate.
    fn process_buffer(&mut self, buffer: &PcmBuffer) -> ProcessorUpdate<Self::Output>;

    /// Clear any state accumulated during the last pass.
    fn reset(&mut self);
}

/// Optional helper trait for components that accept live configuration updates.
pub trait Reconfigurable<Cfg> {
    fn update_config(&mut self, config: Cfg);
}
