//! The stroker's error enumeration.

use crate::outline::OutlineError;

use std::fmt;

/// The stroker's result type.
pub type StrokeResult = Result<(), StrokeError>;

/// An error that can happen while stroking an outline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StrokeError {
    /// A parameter was invalid: a negative radius, a glyph without an
    /// outline, or an export from a border whose counts were never
    /// validated.
    InvalidArgument,
    /// The source outline is malformed: out-of-order contour ends, a
    /// contour starting on a cubic control point, or an unpaired cubic
    /// control point.
    InvalidOutline,
    /// A border's subpath begin/end markers do not nest; its counts are
    /// not trustworthy.
    InvalidBorderNesting,
    /// Growing an internal buffer failed.
    OutOfMemory,
}

impl fmt::Display for StrokeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StrokeError::InvalidArgument => {
                write!(f, "Invalid argument")
            }
            StrokeError::InvalidOutline => {
                write!(f, "Invalid outline")
            }
            StrokeError::InvalidBorderNesting => {
                write!(f, "Broken subpath nesting in a stroke border")
            }
            StrokeError::OutOfMemory => {
                write!(f, "Out of memory")
            }
        }
    }
}

impl std::error::Error for StrokeError {}

impl From<OutlineError> for StrokeError {
    fn from(_: OutlineError) -> Self {
        StrokeError::InvalidOutline
    }
}
