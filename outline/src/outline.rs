//! The outline data structure.

use crate::geom::Vector;

use std::fmt;
use std::ops::Range;

/// Classifies an outline point.
///
/// Off-curve points follow the usual font conventions: a [`Conic`] control
/// between two on points defines a quadratic arc, two consecutive conic
/// controls imply an on point at their midpoint, and [`Cubic`] controls
/// always come in pairs.
///
/// [`Conic`]: PointTag::Conic
/// [`Cubic`]: PointTag::Cubic
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PointTag {
    On,
    Conic,
    Cubic,
}

impl PointTag {
    #[inline]
    pub fn is_on_curve(self) -> bool {
        self == PointTag::On
    }
}

/// The filling orientation of an outline.
///
/// TrueType outlines fill clockwise contours, PostScript outlines fill
/// counter-clockwise ones (both with the y axis pointing up).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    /// Empty or degenerate outlines have no discernible orientation.
    None,
}

/// Errors detected by [`Outline::check`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutlineError {
    /// Contour end indices must be strictly increasing.
    UnorderedContours,
    /// A contour end index points past the last point.
    ContourOutOfRange,
    /// Points at the tail of the outline belong to no contour.
    TrailingPoints,
}

impl fmt::Display for OutlineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutlineError::UnorderedContours => {
                write!(f, "Contour end indices are not increasing")
            }
            OutlineError::ContourOutOfRange => {
                write!(f, "Contour end index out of range")
            }
            OutlineError::TrailingPoints => {
                write!(f, "Points after the last contour end")
            }
        }
    }
}

impl std::error::Error for OutlineError {}

/// A vector glyph shape: points with on/off-curve tags, grouped into
/// contours by a table of (inclusive) end indices.
///
/// Contours are implicitly closed; the last point connects back to the
/// first one.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Outline {
    points: Vec<Vector>,
    tags: Vec<PointTag>,
    contours: Vec<u16>,
}

impl Outline {
    /// Creates an empty outline.
    #[inline]
    pub fn new() -> Self {
        Outline {
            points: Vec::new(),
            tags: Vec::new(),
            contours: Vec::new(),
        }
    }

    /// Creates an empty outline with room for `points` points and
    /// `contours` contours.
    pub fn with_capacity(points: usize, contours: usize) -> Self {
        Outline {
            points: Vec::with_capacity(points),
            tags: Vec::with_capacity(points),
            contours: Vec::with_capacity(contours),
        }
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn num_contours(&self) -> usize {
        self.contours.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    #[inline]
    pub fn tags(&self) -> &[PointTag] {
        &self.tags
    }

    /// The inclusive end index of each contour.
    #[inline]
    pub fn contours(&self) -> &[u16] {
        &self.contours
    }

    /// The half-open point range of contour `n`.
    pub fn contour_range(&self, n: usize) -> Range<usize> {
        let first = if n == 0 {
            0
        } else {
            self.contours[n - 1] as usize + 1
        };

        first..self.contours[n] as usize + 1
    }

    /// Appends a point to the contour under construction.
    #[inline]
    pub fn push_point(&mut self, point: Vector, tag: PointTag) {
        self.points.push(point);
        self.tags.push(tag);
    }

    /// Ends the contour under construction at the last pushed point.
    pub fn end_contour(&mut self) {
        assert!(!self.points.is_empty());
        let last = self.points.len() - 1;
        assert!(last <= u16::MAX as usize, "too many outline points");

        self.contours.push(last as u16);
    }

    /// Appends a raw contour end index, without validation. Prefer
    /// [`end_contour`](Outline::end_contour); this exists to reconstruct
    /// outlines from external tables, and [`check`](Outline::check) will
    /// report inconsistent input.
    pub fn push_contour_end(&mut self, end: u16) {
        self.contours.push(end);
    }

    /// Removes all points and contours, keeping allocations.
    pub fn clear(&mut self) {
        self.points.clear();
        self.tags.clear();
        self.contours.clear();
    }

    /// Validates the contour table against the point array.
    pub fn check(&self) -> Result<(), OutlineError> {
        let mut next_first = 0usize;

        for &end in &self.contours {
            let end = end as usize;

            if end < next_first {
                return Err(OutlineError::UnorderedContours);
            }
            if end >= self.points.len() {
                return Err(OutlineError::ContourOutOfRange);
            }

            next_first = end + 1;
        }

        if next_first != self.points.len() {
            return Err(OutlineError::TrailingPoints);
        }

        Ok(())
    }

    /// The filling orientation of the outline, from the sign of its total
    /// signed area.
    ///
    /// Control points take part in the sum; since a bezier arc stays inside
    /// the convex hull of its control polygon this does not change the
    /// sign.
    pub fn orientation(&self) -> Orientation {
        let mut area: i64 = 0;

        for n in 0..self.contours.len() {
            let range = self.contour_range(n);
            if range.len() < 2 {
                continue;
            }

            let points = &self.points[range];
            let mut prev = points[points.len() - 1];

            for &point in points {
                area += i64::from((point.y - prev.y).raw())
                    * (i64::from(point.x.raw()) + i64::from(prev.x.raw()));
                prev = point;
            }
        }

        if area > 0 {
            Orientation::CounterClockwise
        } else if area < 0 {
            Orientation::Clockwise
        } else {
            Orientation::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vector;

    fn triangle(points: &[(i32, i32)]) -> Outline {
        let mut outline = Outline::new();
        for &(x, y) in points {
            outline.push_point(Vector::from_i32(x, y), PointTag::On);
        }
        outline.end_contour();

        outline
    }

    #[test]
    fn check_valid() {
        let outline = triangle(&[(0, 0), (10, 0), (0, 10)]);
        assert_eq!(outline.check(), Ok(()));
        assert_eq!(outline.num_points(), 3);
        assert_eq!(outline.num_contours(), 1);
        assert_eq!(outline.contour_range(0), 0..3);
    }

    #[test]
    fn check_rejects_bad_tables() {
        let mut outline = triangle(&[(0, 0), (10, 0), (0, 10)]);
        outline.contours.push(1);
        assert_eq!(outline.check(), Err(OutlineError::UnorderedContours));

        let mut outline = Outline::new();
        outline.push_point(Vector::ZERO, PointTag::On);
        outline.contours.push(4);
        assert_eq!(outline.check(), Err(OutlineError::ContourOutOfRange));

        let mut outline = triangle(&[(0, 0), (10, 0), (0, 10)]);
        outline.push_point(Vector::ZERO, PointTag::On);
        assert_eq!(outline.check(), Err(OutlineError::TrailingPoints));
    }

    #[test]
    fn orientation_from_winding() {
        // Counter-clockwise with y pointing up.
        let ccw = triangle(&[(0, 0), (10, 0), (0, 10)]);
        assert_eq!(ccw.orientation(), Orientation::CounterClockwise);

        let cw = triangle(&[(0, 0), (0, 10), (10, 0)]);
        assert_eq!(cw.orientation(), Orientation::Clockwise);

        assert_eq!(Outline::new().orientation(), Orientation::None);

        // A degenerate flat contour has no orientation.
        let flat = triangle(&[(0, 0), (5, 0), (10, 0)]);
        assert_eq!(flat.orientation(), Orientation::None);
    }
}
