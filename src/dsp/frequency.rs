//! Zero-crossing pitch and amplitude estimation.
//!
//! A single pass over the buffer collects positive-run observations: a run
//! opens on the first strictly positive sample and resolves on the next
//! strictly negative one, yielding a half-wavelength in sample slots.
//! Observations sharing the exact same frequency accumulate under one
//! bucket, and the most repeated bucket wins.

use super::{PcmBuffer, PcmProcessor, ProcessorUpdate, Reconfigurable};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::trace;

pub const DEFAULT_MIN_HZ: f32 = 0.0;
pub const DEFAULT_MAX_HZ: f32 = 5_000.0;
pub const DEFAULT_MIN_WAVELENGTH: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrequencyConfig {
    /// Estimates at or below this frequency (Hz) are discarded.
    pub min_hz: f32,
    /// Estimates at or above this frequency (Hz) are discarded.
    pub max_hz: f32,
    /// Runs of this many sample slots or fewer are treated as noise.
    pub min_wavelength: usize,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            min_hz: DEFAULT_MIN_HZ,
            max_hz: DEFAULT_MAX_HZ,
            min_wavelength: DEFAULT_MIN_WAVELENGTH,
        }
    }
}

/// The most representative (frequency, amplitude) pair found in one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestEstimate {
    pub frequency: f32,
    pub amplitude: i32,
}

/// Ordering key over a finite frequency value.
///
/// Buckets must iterate in ascending numeric order so that ties between
/// equally-repeated frequencies resolve toward the lower one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hz(f32);

impl Eq for Hz {}

impl PartialOrd for Hz {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hz {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrequencyEstimator {
    config: FrequencyConfig,
    buckets: BTreeMap<Hz, Vec<i32>>,
}

impl FrequencyEstimator {
    pub fn new(config: FrequencyConfig) -> Self {
        Self {
            config: clamp_config(config),
            buckets: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> FrequencyConfig {
        self.config
    }

    fn scan(&mut self, samples: &[i8], time_per_slot: f32) {
        let mut run_start: Option<usize> = None;

        for (index, &sample) in samples.iter().enumerate() {
            if sample > 0 {
                if run_start.is_none() {
                    run_start = Some(index);
                }
            } else if sample < 0 {
                if let Some(start) = run_start.take() {
                    self.resolve_run(samples, start, index, time_per_slot);
                }
            }
            // zero samples neither open nor close a run
        }
    }

    fn resolve_run(&mut self, samples: &[i8], start: usize, end: usize, time_per_slot: f32) {
        let wavelength = end - start;
        if wavelength <= self.config.min_wavelength {
            trace!(wavelength, "run discarded as noise");
            return;
        }

        // the run spans half a period, hence the factor of 2
        let frequency = 1.0 / (wavelength as f32 * 2.0 * time_per_slot);
        if !(frequency > self.config.min_hz && frequency < self.config.max_hz) {
            trace!(frequency, "run discarded outside frequency window");
            return;
        }

        let amplitude = samples[(end + start) / 2] as i32;
        self.buckets.entry(Hz(frequency)).or_default().push(amplitude);
    }

    fn select(&self) -> Option<BestEstimate> {
        let mut best: Option<(Hz, &Vec<i32>)> = None;

        // ascending iteration keeps the lowest frequency on count ties
        for (&hz, amplitudes) in &self.buckets {
            let wins = match &best {
                None => true,
                Some((_, current)) => amplitudes.len() > current.len(),
            };
            if wins {
                best = Some((hz, amplitudes));
            }
        }

        best.map(|(hz, amplitudes)| BestEstimate {
            frequency: hz.0,
            amplitude: amplitudes.iter().copied().max().unwrap_or(0),
        })
    }
}

impl PcmProcessor for FrequencyEstimator {
    type Output = BestEstimate;

    fn process_buffer(&mut self, buffer: &PcmBuffer) -> ProcessorUpdate<BestEstimate> {
        self.buckets.clear();
        if buffer.is_empty() {
            return ProcessorUpdate::None;
        }

        self.scan(buffer.samples(), buffer.time_per_slot());

        match self.select() {
            Some(estimate) => ProcessorUpdate::Estimate(estimate),
            None => ProcessorUpdate::None,
        }
    }

    fn reset(&mut self) {
        self.buckets.clear();
    }
}

impl Reconfigurable<FrequencyConfig> for FrequencyEstimator {
    fn update_config(&mut self, config: FrequencyConfig) {
        self.config = clamp_config(config);
        self.buckets.clear();
    }
}

fn clamp_config(mut config: FrequencyConfig) -> FrequencyConfig {
    config.min_hz = config.min_hz.max(0.0);
    config.max_hz = config.max_hz.max(config.min_hz);
    config
}
