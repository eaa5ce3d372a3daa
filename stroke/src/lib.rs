#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::needless_range_loop)]

//! Stroking of font outlines.
//!
//! A [`Stroker`] widens a vector path by a radius: each subpath grows a pair
//! of offset *borders* (inside and outside), connected by the configured
//! join geometry at corners and by caps at the open ends. The result is a
//! regular outline that can be filled like any glyph shape.
//!
//! ## Overview
//!
//! The input path is replayed as commands
//! ([`begin_subpath`](Stroker::begin_subpath), [`line_to`](Stroker::line_to),
//! [`conic_to`](Stroker::conic_to), [`cubic_to`](Stroker::cubic_to),
//! [`end_subpath`](Stroker::end_subpath)), or in one call with
//! [`parse_outline`](Stroker::parse_outline). Curves are flattened
//! adaptively into small arcs that can be offset directly; corners are
//! classified into an inside (intersection) and an outside (join) side.
//! Once a path has been replayed, the accumulated borders are counted,
//! validated and exported into a caller-owned [`Outline`].
//!
//! All computation is in 26.6/16.16 fixed point and is deterministic: the
//! same path and options always produce the same outline, bit for bit.
//!
//! # Examples
//!
//! ```
//! use graver_stroke::{StrokeOptions, Stroker};
//! use graver_stroke::outline::Outline;
//! use graver_stroke::geom::{F26Dot6, Vector};
//!
//! # fn main() -> Result<(), graver_stroke::StrokeError> {
//! let mut stroker = Stroker::new();
//! stroker.set(&StrokeOptions::default().with_radius(F26Dot6::from_i32(5)))?;
//!
//! stroker.begin_subpath(Vector::from_i32(0, 0), true)?;
//! stroker.line_to(Vector::from_i32(100, 0))?;
//! stroker.end_subpath()?;
//!
//! let (points, contours) = stroker.counts()?;
//! let mut stroked = Outline::with_capacity(points, contours);
//! stroker.export(&mut stroked)?;
//! # Ok(())
//! # }
//! ```

pub use graver_outline as outline;
pub use graver_outline::geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

use crate::geom::{F16Dot16, F26Dot6};

#[cfg(all(debug_assertions, feature = "debugger"))]
macro_rules! stroke_log {
    ($fmt:expr) => (
        println!($fmt);
    );
    ($fmt:expr, $($arg:tt)*) => (
        println!($fmt, $($arg)*);
    );
}

#[cfg(not(all(debug_assertions, feature = "debugger")))]
macro_rules! stroke_log {
    ($fmt:expr) => {};
    ($fmt:expr, $($arg:tt)*) => {};
}

mod border;
mod error;
pub mod glyph;
mod stroker;

#[cfg(test)]
mod stroke_tests;

pub use crate::error::{StrokeError, StrokeResult};
#[doc(inline)]
pub use crate::glyph::{stroke_glyph, stroke_glyph_border};
pub use crate::stroker::Stroker;

/// Geometry drawn at the two ends of an open subpath.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineCap {
    /// The border stops on the line through the endpoint, perpendicular to
    /// the path.
    Butt,
    /// A half circle around the endpoint.
    Round,
    /// The stroke extends one radius past the endpoint before stopping.
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        LineCap::Butt
    }
}

/// Geometry connecting two border segments at a direction-changing vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// A circular arc around the vertex.
    Round,
    /// A straight segment between the two offset points.
    Bevel,
    /// A pointed corner, truncated at the miter limit distance when the
    /// limit is exceeded.
    MiterVariable,
    /// A pointed corner, falling back to a bevel when the miter limit is
    /// exceeded.
    MiterFixed,
}

impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::MiterVariable
    }
}

/// One side of a stroked path.
///
/// `Left` is the side a +90 degrees rotation of the drawing direction
/// points to (y axis up). For a clockwise (TrueType) source contour the
/// left side is the outside border.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Parameters for the stroker.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct StrokeOptions {
    /// Half the stroke width, in outline units.
    ///
    /// Default value: `StrokeOptions::DEFAULT_RADIUS`.
    pub radius: F26Dot6,

    /// What to draw at the ends of open subpaths.
    ///
    /// Default value: `LineCap::Butt`.
    pub line_cap: LineCap,

    /// What to draw at corners.
    ///
    /// Default value: `LineJoin::MiterVariable`.
    pub line_join: LineJoin,

    /// Maximum ratio of the miter length to the stroke radius; clamped up
    /// to at least 1.0 when applied.
    ///
    /// Default value: `StrokeOptions::DEFAULT_MITER_LIMIT`.
    pub miter_limit: F16Dot16,
}

impl StrokeOptions {
    /// Lowest accepted miter limit.
    pub const MINIMUM_MITER_LIMIT: F16Dot16 = F16Dot16::ONE;
    /// Default miter limit, matching the SVG default.
    pub const DEFAULT_MITER_LIMIT: F16Dot16 = F16Dot16::from_i32(4);
    pub const DEFAULT_LINE_CAP: LineCap = LineCap::Butt;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::MiterVariable;
    /// One outline unit of radius (a two unit wide stroke).
    pub const DEFAULT_RADIUS: F26Dot6 = F26Dot6::ONE;

    pub const DEFAULT: Self = StrokeOptions {
        radius: Self::DEFAULT_RADIUS,
        line_cap: Self::DEFAULT_LINE_CAP,
        line_join: Self::DEFAULT_LINE_JOIN,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
    };

    #[inline]
    pub const fn with_radius(mut self, radius: F26Dot6) -> Self {
        self.radius = radius;
        self
    }

    #[inline]
    pub const fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub const fn with_miter_limit(mut self, limit: F16Dot16) -> Self {
        self.miter_limit = limit;
        self
    }
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
