//! Validation errors for basewatch inputs.

use thiserror::Error;

/// Errors raised when a caller-supplied value cannot be accepted.
///
/// Validation always happens before any state is touched, so a call that
/// fails with one of these never modifies a store.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The location id was empty or only whitespace.
    #[error("location id cannot be empty")]
    EmptyLocationId,

    /// A latitude or longitude was non-finite or out of range.
    #[error("invalid {axis} {value}: {reason}")]
    InvalidCoordinate {
        /// `"latitude"` or `"longitude"`.
        axis: &'static str,
        /// The rejected value.
        value: f64,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The zone radius was not a finite number greater than zero.
    #[error("invalid zone radius {0}: must be a finite number greater than zero")]
    InvalidRadius(f64),

    /// The capture timestamp was not RFC 3339.
    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A detection carried an empty class label.
    #[error("detection {index} has an empty class label")]
    EmptyClassLabel {
        /// Position of the detection in the payload.
        index: usize,
    },

    /// A detection's bounding box contained NaN or infinity.
    #[error("detection {index} has a non-finite bounding box")]
    InvalidBoundingBox {
        /// Position of the detection in the payload.
        index: usize,
    },

    /// A detection's confidence was outside `0.0..=1.0`.
    #[error("detection {index} has confidence {value} outside 0..=1")]
    InvalidConfidence {
        /// Position of the detection in the payload.
        index: usize,
        /// The rejected value.
        value: f64,
    },
}

/// Result type alias using [`ValidationError`].
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
