//! Waveform-to-geometry reduction.

use super::{PcmBuffer, SampleFormat};
use crate::error::{InvalidInput, Result};

/// One line of the rendered polyline, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Downsample `buffer` into exactly `points` connected line segments spread
/// over a render area `height` pixels tall.
///
/// One sample is read every `len / points` slots (integer division, trailing
/// samples dropped) and normalised into `[0, height]` around the vertical
/// midline. The polyline starts at the midline.
pub fn reduce(buffer: &PcmBuffer, points: usize, height: f32) -> Result<Vec<LineSegment>> {
    if points == 0 {
        return Err(InvalidInput::ZeroWidth);
    }

    let samples = buffer.samples();
    if points > samples.len() {
        return Err(InvalidInput::WidthExceedsBuffer {
            points,
            samples: samples.len(),
        });
    }

    let step = samples.len() / points;
    let format = buffer.format();

    if format == SampleFormat::Pcm16LegacyCombine {
        let last = (points - 1) * step + 1;
        if last >= samples.len() {
            return Err(InvalidInput::TruncatedSamplePair {
                index: last,
                samples: samples.len(),
            });
        }
    }

    let half_height = height / 2.0;
    let max_value = format.max_value();

    let mut segments = Vec::with_capacity(points);
    let mut prev_x = 0.0f32;
    let mut prev_y = half_height;

    for i in 0..points {
        let value = format.decode(samples, i * step) as f32;
        let x = i as f32;
        let y = value / max_value * half_height + half_height;
        segments.push(LineSegment {
            x0: prev_x,
            y0: prev_y,
            x1: x,
            y1: y,
        });
        prev_x = x;
        prev_y = y;
    }

    Ok(segments)
}
