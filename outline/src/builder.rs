//! Tools to build outlines from a sequence of imperative commands.
//!
//! # Examples
//!
//! ```
//! use graver_outline::OutlineBuilder;
//! use graver_outline::geom::Vector;
//!
//! let mut builder = OutlineBuilder::new();
//!
//! builder.move_to(Vector::from_i32(0, 0));
//! builder.line_to(Vector::from_i32(10, 0));
//! builder.conic_to(Vector::from_i32(10, 10), Vector::from_i32(0, 10));
//! builder.close();
//!
//! let outline = builder.build();
//! assert_eq!(outline.num_contours(), 1);
//! ```

use crate::geom::Vector;
use crate::outline::{Outline, PointTag};

/// Builds an [`Outline`] command by command.
///
/// Contours are implicitly closed, as in font files: `close` (or the next
/// `move_to`, or `build`) ends the current contour without duplicating its
/// first point.
#[derive(Clone, Debug, Default)]
pub struct OutlineBuilder {
    outline: Outline,
    contour_open: bool,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        OutlineBuilder {
            outline: Outline::new(),
            contour_open: false,
        }
    }

    /// Starts a new contour at `to`, ending any contour in progress.
    pub fn move_to(&mut self, to: Vector) {
        self.end_contour();
        self.outline.push_point(to, PointTag::On);
        self.contour_open = true;
    }

    /// Adds a line segment to the current contour.
    pub fn line_to(&mut self, to: Vector) {
        debug_assert!(self.contour_open, "line_to before move_to");
        self.outline.push_point(to, PointTag::On);
    }

    /// Adds a quadratic arc to the current contour.
    pub fn conic_to(&mut self, ctrl: Vector, to: Vector) {
        debug_assert!(self.contour_open, "conic_to before move_to");
        self.outline.push_point(ctrl, PointTag::Conic);
        self.outline.push_point(to, PointTag::On);
    }

    /// Adds a cubic arc to the current contour.
    pub fn cubic_to(&mut self, ctrl1: Vector, ctrl2: Vector, to: Vector) {
        debug_assert!(self.contour_open, "cubic_to before move_to");
        self.outline.push_point(ctrl1, PointTag::Cubic);
        self.outline.push_point(ctrl2, PointTag::Cubic);
        self.outline.push_point(to, PointTag::On);
    }

    /// Ends the current contour.
    pub fn close(&mut self) {
        self.end_contour();
    }

    /// Finishes and returns the outline.
    pub fn build(mut self) -> Outline {
        self.end_contour();

        self.outline
    }

    fn end_contour(&mut self) {
        if self.contour_open {
            self.outline.end_contour();
            self.contour_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::PointTag::*;

    #[test]
    fn two_contours() {
        let mut builder = OutlineBuilder::new();

        builder.move_to(Vector::from_i32(0, 0));
        builder.line_to(Vector::from_i32(10, 0));
        builder.line_to(Vector::from_i32(10, 10));
        builder.move_to(Vector::from_i32(20, 0));
        builder.cubic_to(
            Vector::from_i32(25, 0),
            Vector::from_i32(30, 5),
            Vector::from_i32(30, 10),
        );

        let outline = builder.build();

        assert_eq!(outline.check(), Ok(()));
        assert_eq!(outline.num_contours(), 2);
        assert_eq!(outline.contours(), &[2, 6]);
        assert_eq!(outline.tags(), &[On, On, On, On, Cubic, Cubic, On]);
    }

    #[test]
    fn empty_build() {
        let outline = OutlineBuilder::new().build();
        assert!(outline.is_empty());
        assert_eq!(outline.check(), Ok(()));
    }
}
