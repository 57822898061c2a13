//! Error handling for BVH parsing and pose evaluation

use std::io;
use thiserror::Error;

/// Errors that can occur when reading a BVH file
///
/// Every error is terminal for the current parse: the pipeline stops at the
/// first problem and never returns a partially evaluated skeleton.
#[derive(Debug, Error)]
pub enum BvhError {
    /// An I/O error from the underlying line source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unexpected or unrecognized line, unmatched brace, missing End Site offset
    #[error("Structural error at line {line}: {message} (`{content}`)")]
    Structural {
        /// 1-based line number
        line: usize,
        /// The offending line, trimmed
        content: String,
        /// What was wrong with it
        message: String,
    },

    /// A joint declared the wrong number of channels
    #[error("Invalid channel count for joint '{joint}': expected {expected}, found {found}")]
    ChannelCount {
        /// Joint name
        joint: String,
        /// 6 for the root, 3 for every other joint
        expected: usize,
        /// Declared count
        found: usize,
    },

    /// Two joints disagree on their rotation-axis order
    #[error(
        "Rotation order mismatch: joint '{joint}' uses {order}, but joint '{expected_joint}' uses {expected_order}"
    )]
    RotationOrderMismatch {
        /// Joint whose order differs
        joint: String,
        /// Order of that joint
        order: String,
        /// Joint that established the skeleton-wide order (the root)
        expected_joint: String,
        /// The skeleton-wide order
        expected_order: String,
    },

    /// Rotation order outside the six valid axis permutations
    #[error("Unsupported rotation order: {0}")]
    UnsupportedRotationOrder(String),

    /// A numeric field could not be parsed
    #[error("Invalid number at line {line}: cannot parse {field} from '{value}'")]
    NumericFormat {
        /// 1-based line number
        line: usize,
        /// What the value was meant to be
        field: String,
        /// The raw token
        value: String,
    },

    /// A motion line has the wrong number of values
    #[error("Invalid number of channels in frame {frame}: found {found}, should be {expected}")]
    FrameFieldCount {
        /// 0-based frame index
        frame: usize,
        /// Total channel count of the skeleton
        expected: usize,
        /// Values present on the line
        found: usize,
    },

    /// The number of motion lines differs from the declared frame count
    #[error("Invalid number of frames: found {found}, should be {expected}")]
    FrameCount {
        /// Declared `Frames:` value
        expected: usize,
        /// Motion lines present
        found: usize,
    },

    /// A fully evaluated skeleton violates a model invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// A joint without children or End Site has no bone direction
    #[error("Degenerate skeleton: joint '{joint}' has no children and no End Site")]
    DegenerateSkeleton {
        /// Joint name
        joint: String,
    },
}

impl BvhError {
    /// Create a structural error for a given line
    pub fn structural(line: usize, content: &str, message: impl Into<String>) -> Self {
        Self::Structural {
            line,
            content: content.trim().to_string(),
            message: message.into(),
        }
    }

    /// Create a numeric format error
    pub fn numeric(line: usize, field: impl Into<String>, value: &str) -> Self {
        Self::NumericFormat {
            line,
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Whether the motion block had the wrong shape (field count or frame count)
    pub fn is_frame_shape(&self) -> bool {
        matches!(self, Self::FrameFieldCount { .. } | Self::FrameCount { .. })
    }
}

/// Type alias for Results from BVH operations
pub type Result<T> = std::result::Result<T, BvhError>;
