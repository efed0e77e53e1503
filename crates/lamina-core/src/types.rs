//! Shared types for the lamina stacking engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reduce::ReduceMode;

/// Image shape: width, height, and channel count.
///
/// The first accepted sample in a run fixes the *reference shape*;
/// every later sample must match it exactly or is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel (1 = grayscale, 3 = RGB).
    pub channels: u8,
}

impl Shape {
    /// Create a new shape.
    #[must_use]
    pub const fn new(width: u32, height: u32, channels: u8) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Number of flat pixel-channel entries (`width * height * channels`).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Returns `true` if the shape holds no pixel data.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// One decoded image: a shape plus a flat byte buffer.
///
/// The buffer is row-major and channel-interleaved: entry
/// `(y * width + x) * channels + c` holds channel `c` of pixel `(x, y)`.
/// The collector only borrows a sample for one accumulation pass; the
/// caller keeps ownership and may drop it immediately afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSample {
    shape: Shape,
    data: Vec<u8>,
}

impl ImageSample {
    /// Build a sample from a raw buffer.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::BufferLength`] if `data.len()` does not
    /// equal `shape.len()`.
    pub fn from_raw(shape: Shape, data: Vec<u8>) -> Result<Self, StackError> {
        if data.len() != shape.len() {
            return Err(StackError::BufferLength {
                shape,
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// The sample's shape.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// The flat pixel-channel buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the sample and returns the underlying buffer.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// The reduced output buffer: one byte per flat pixel-channel index.
///
/// Produced by [`SampleCollector::finish`](crate::SampleCollector::finish)
/// and consumed by an encoder; the run ends once it is written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    shape: Shape,
    data: Vec<u8>,
}

impl Composite {
    /// Build a composite from a raw buffer.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::BufferLength`] if `data.len()` does not
    /// equal `shape.len()`.
    pub fn from_raw(shape: Shape, data: Vec<u8>) -> Result<Self, StackError> {
        if data.len() != shape.len() {
            return Err(StackError::BufferLength {
                shape,
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// The composite's shape (equal to the run's reference shape).
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// The flat pixel-channel buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the composite and returns the underlying buffer.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Configuration for a stacking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackConfig {
    /// Which statistical reduction collapses the stack.
    pub mode: ReduceMode,
}

impl StackConfig {
    /// Default reduction mode, exposed for CLI default values.
    pub const DEFAULT_MODE: ReduceMode = ReduceMode::Mean;
}

/// Why one input was skipped without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The input could not be decoded into pixel data.
    DecodeFailed(String),
    /// The input's shape disagrees with the reference shape.
    ShapeMismatch {
        /// The reference shape established by the first accepted sample.
        expected: Shape,
        /// The rejected sample's shape.
        actual: Shape,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeFailed(msg) => write!(f, "decode failed: {msg}"),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

/// Record of one skipped input, by position in the input sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    /// Zero-based index of the input in the sequence handed to the run.
    pub index: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of a completed stacking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutcome {
    /// The reduced composite image.
    pub composite: Composite,
    /// Number of inputs accepted into the stack.
    pub accepted: usize,
    /// Every input that was skipped, with its reason.
    pub skipped: Vec<Skipped>,
}

/// Errors that abort a stacking run.
///
/// Per-input failures (unreadable bytes, shape disagreements) are *not*
/// errors at this level — they surface as [`SkipReason`] records and the
/// run continues without them.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// Failed to decode input bytes into an image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input byte slice was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A raw buffer's length disagrees with its declared shape.
    #[error("buffer length {actual} does not match shape {shape} ({expected} entries)")]
    BufferLength {
        /// The declared shape.
        shape: Shape,
        /// Entries the shape requires.
        expected: usize,
        /// Entries actually provided.
        actual: usize,
    },

    /// The first accepted sample has a channel count the encoder cannot
    /// serialize. Only 1 (grayscale) and 3 (RGB) are supported.
    #[error("unsupported channel count {0} (only 1 and 3 are supported)")]
    UnsupportedChannelCount(u8),

    /// No input was accepted, so there is nothing to reduce.
    #[error("no images were accepted into the stack")]
    EmptyStack,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Shape tests ---

    #[test]
    fn shape_len() {
        assert_eq!(Shape::new(4, 3, 3).len(), 36);
        assert_eq!(Shape::new(2, 1, 1).len(), 2);
        assert_eq!(Shape::new(0, 5, 3).len(), 0);
    }

    #[test]
    fn shape_is_empty() {
        assert!(Shape::new(0, 10, 3).is_empty());
        assert!(!Shape::new(1, 1, 1).is_empty());
    }

    #[test]
    fn shape_display() {
        assert_eq!(Shape::new(640, 480, 3).to_string(), "640x480x3");
    }

    #[test]
    fn shape_equality_covers_all_components() {
        let reference = Shape::new(2, 1, 3);
        assert_eq!(reference, Shape::new(2, 1, 3));
        assert_ne!(reference, Shape::new(3, 1, 3));
        assert_ne!(reference, Shape::new(2, 2, 3));
        assert_ne!(reference, Shape::new(2, 1, 1));
    }

    // --- ImageSample tests ---

    #[test]
    fn sample_from_raw_accepts_matching_length() {
        let sample = ImageSample::from_raw(Shape::new(2, 1, 3), vec![0; 6]).unwrap();
        assert_eq!(sample.shape(), Shape::new(2, 1, 3));
        assert_eq!(sample.data().len(), 6);
    }

    #[test]
    fn sample_from_raw_rejects_wrong_length() {
        let result = ImageSample::from_raw(Shape::new(2, 2, 3), vec![0; 5]);
        assert!(matches!(
            result,
            Err(StackError::BufferLength {
                expected: 12,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn sample_into_data_round_trips() {
        let data = vec![1, 2, 3];
        let sample = ImageSample::from_raw(Shape::new(3, 1, 1), data.clone()).unwrap();
        assert_eq!(sample.into_data(), data);
    }

    // --- Composite tests ---

    #[test]
    fn composite_from_raw_rejects_wrong_length() {
        let result = Composite::from_raw(Shape::new(1, 1, 3), vec![0; 2]);
        assert!(matches!(result, Err(StackError::BufferLength { .. })));
    }

    // --- StackConfig tests ---

    #[test]
    fn config_default_mode_is_mean() {
        assert_eq!(StackConfig::default().mode, ReduceMode::Mean);
        assert_eq!(StackConfig::DEFAULT_MODE, ReduceMode::Mean);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = StackConfig {
            mode: ReduceMode::Median,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: StackConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    // --- SkipReason tests ---

    #[test]
    fn skip_reason_display() {
        let reason = SkipReason::ShapeMismatch {
            expected: Shape::new(2, 1, 3),
            actual: Shape::new(2, 1, 1),
        };
        assert_eq!(
            reason.to_string(),
            "shape mismatch: expected 2x1x3, got 2x1x1",
        );
    }

    #[test]
    fn skip_reason_serde_round_trip() {
        let skipped = Skipped {
            index: 4,
            reason: SkipReason::DecodeFailed("truncated file".to_string()),
        };
        let json = serde_json::to_string(&skipped).unwrap();
        let deserialized: Skipped = serde_json::from_str(&json).unwrap();
        assert_eq!(skipped, deserialized);
    }

    // --- StackError tests ---

    #[test]
    fn error_empty_stack_display() {
        assert_eq!(
            StackError::EmptyStack.to_string(),
            "no images were accepted into the stack",
        );
    }

    #[test]
    fn error_unsupported_channels_display() {
        assert_eq!(
            StackError::UnsupportedChannelCount(4).to_string(),
            "unsupported channel count 4 (only 1 and 3 are supported)",
        );
    }
}
