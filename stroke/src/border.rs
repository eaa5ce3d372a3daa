//! The per-side point accumulator of the stroker.
//!
//! Each side of the stroke grows into a [`Border`]: an ordered point/tag
//! sequence with just enough subpath bookkeeping to splice, reverse and
//! close contours cheaply. Exported outlines are produced from here.

use crate::error::{StrokeError, StrokeResult};
use crate::geom::{Angle, Arc, F26Dot6, Vector};
use crate::outline::{Outline, PointTag};

use bitflags::bitflags;

bitflags! {
    /// Classification of a border point.
    ///
    /// An empty set marks a conic control point. `BEGIN`/`END` only appear
    /// on on-curve points and are translated into the contour table on
    /// export.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(crate) struct Tags: u8 {
        const ON_CURVE = 0x1;
        const CUBIC = 0x2;
        const BEGIN = 0x4;
        const END = 0x8;
    }
}

/// One side of the stroke under construction.
pub(crate) struct Border {
    pub(crate) points: Vec<Vector>,
    pub(crate) tags: Vec<Tags>,
    /// Index of the first point of the currently open subpath, if any.
    pub(crate) start: Option<usize>,
    /// Whether the last point may be snapped in place by a following join.
    pub(crate) movable: bool,
    /// Set once the begin/end nesting has been verified by [`counts`].
    ///
    /// [`counts`]: Border::counts
    pub(crate) valid: bool,
}

impl Border {
    pub fn new() -> Self {
        Border {
            points: Vec::new(),
            tags: Vec::new(),
            start: None,
            movable: false,
            valid: false,
        }
    }

    /// Clears all points, keeping the allocations for reuse.
    pub fn rewind(&mut self) {
        self.points.clear();
        self.tags.clear();
        self.start = None;
        self.movable = false;
        self.valid = false;
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The most recently emitted point. Only meaningful inside a subpath.
    pub fn last_point(&self) -> Vector {
        self.points[self.points.len() - 1]
    }

    pub(crate) fn grow(&mut self, additional: usize) -> StrokeResult {
        self.points
            .try_reserve(additional)
            .map_err(|_| StrokeError::OutOfMemory)?;
        self.tags
            .try_reserve(additional)
            .map_err(|_| StrokeError::OutOfMemory)?;

        Ok(())
    }

    /// Starts a new subpath at `to`, closing any subpath left open.
    pub fn move_to(&mut self, to: Vector) -> StrokeResult {
        if self.start.is_some() {
            self.close(false);
        }

        self.start = Some(self.points.len());
        self.movable = false;

        self.line_to(to, false)
    }

    /// Emits an on-curve point.
    ///
    /// When the previous point is movable it is snapped to `to` instead of
    /// appending; `movable` marks the new point for the same treatment.
    pub fn line_to(&mut self, to: Vector, movable: bool) -> StrokeResult {
        if self.movable {
            // Snap the previous point in place.
            let last = self.points.len() - 1;
            self.points[last] = to;
        } else {
            // Don't add zero-length line segments. The movable flag is
            // left untouched in that case.
            if let Some(&last) = self.points.last() {
                if last.almost_eq(to) {
                    return Ok(());
                }
            }

            self.grow(1)?;
            self.points.push(to);
            self.tags.push(Tags::ON_CURVE);
        }

        self.movable = movable;

        Ok(())
    }

    /// Emits a conic control point and its on-curve end point.
    pub fn conic_to(&mut self, control: Vector, to: Vector) -> StrokeResult {
        debug_assert!(self.start.is_some());

        self.grow(2)?;
        self.points.push(control);
        self.tags.push(Tags::empty());
        self.points.push(to);
        self.tags.push(Tags::ON_CURVE);

        self.movable = false;

        Ok(())
    }

    /// Emits two cubic control points and their on-curve end point.
    pub fn cubic_to(&mut self, ctrl1: Vector, ctrl2: Vector, to: Vector) -> StrokeResult {
        debug_assert!(self.start.is_some());

        self.grow(3)?;
        self.points.push(ctrl1);
        self.tags.push(Tags::CUBIC);
        self.points.push(ctrl2);
        self.tags.push(Tags::CUBIC);
        self.points.push(to);
        self.tags.push(Tags::ON_CURVE);

        self.movable = false;

        Ok(())
    }

    /// Emits a circular arc around `center`, starting at `angle_start` and
    /// sweeping by `angle_diff`, as up to four cubic pieces.
    pub fn arc_to(
        &mut self,
        center: Vector,
        radius: F26Dot6,
        angle_start: Angle,
        angle_diff: Angle,
    ) -> StrokeResult {
        let arc = Arc {
            center,
            radius,
            start_angle: angle_start,
            sweep: angle_diff,
        };

        for piece in arc.to_cubics() {
            self.cubic_to(piece.ctrl1, piece.ctrl2, piece.to)?;
        }

        Ok(())
    }

    /// Closes the current subpath. Subpaths of one point or less are
    /// discarded; `reverse` flips the point order, which produces the
    /// opposite winding.
    pub fn close(&mut self, reverse: bool) {
        let start = match self.start.take() {
            Some(start) => start,
            None => {
                debug_assert!(false, "close without an open subpath");
                return;
            }
        };

        let count = self.points.len();

        if count <= start + 1 {
            // Nothing usable in this subpath.
            self.points.truncate(start);
            self.tags.truncate(start);
        } else {
            // The last point holds the adjusted starting coordinates; fold
            // it onto the subpath start.
            let last = count - 1;
            self.points[start] = self.points[last];
            self.points.truncate(last);
            self.tags.truncate(last);

            if reverse {
                self.points[start + 1..last].reverse();
                self.tags[start + 1..last].reverse();
            }

            self.tags[start] |= Tags::BEGIN;
            self.tags[last - 1] |= Tags::END;
        }

        self.movable = false;
    }

    /// Validates the begin/end nesting and returns the point and contour
    /// totals. On success the border becomes exportable.
    pub fn counts(&mut self) -> Result<(usize, usize), StrokeError> {
        let mut num_contours = 0;
        let mut in_contour = false;

        for tags in &self.tags {
            if tags.contains(Tags::BEGIN) {
                if in_contour {
                    return self.fail_counts();
                }
                in_contour = true;
            } else if !in_contour {
                return self.fail_counts();
            }

            if tags.contains(Tags::END) {
                in_contour = false;
                num_contours += 1;
            }
        }

        if in_contour {
            return self.fail_counts();
        }

        self.valid = true;

        Ok((self.points.len(), num_contours))
    }

    fn fail_counts(&mut self) -> Result<(usize, usize), StrokeError> {
        self.valid = false;

        Err(StrokeError::InvalidBorderNesting)
    }

    /// Appends the border's points, tags and contour ends to `outline`.
    pub fn export(&self, outline: &mut Outline) {
        debug_assert!(self.valid);

        for (&point, &tags) in self.points.iter().zip(&self.tags) {
            let tag = if tags.contains(Tags::ON_CURVE) {
                PointTag::On
            } else if tags.contains(Tags::CUBIC) {
                PointTag::Cubic
            } else {
                PointTag::Conic
            };

            outline.push_point(point, tag);

            if tags.contains(Tags::END) {
                outline.end_contour();
            }
        }
    }
}
