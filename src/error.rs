//! Error types for render-input validation.

/// Result type alias for fallible core operations.
pub type Result<T> = std::result::Result<T, InvalidInput>;

/// A render request that cannot be satisfied by the current buffer.
///
/// Callers should skip the render pass; geometry from a previous pass must
/// not be reused in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    /// The requested render width was zero.
    #[error("render width must be greater than zero")]
    ZeroWidth,

    /// More output points were requested than samples are available.
    #[error("render width {points} exceeds buffer length {samples}")]
    WidthExceedsBuffer { points: usize, samples: usize },

    /// A two-byte sample read would run past the end of the buffer.
    #[error("sample pair at index {index} runs past buffer length {samples}")]
    TruncatedSamplePair { index: usize, samples: usize },
}
