//! Circular arcs, approximated by sequences of cubic bezier curves.

use crate::fixed::{F16Dot16, F26Dot6};
use crate::trig::Angle;
use crate::vector::Vector;

use arrayvec::ArrayVec;

/// A circular arc: the set of points at `radius` from `center`, swept from
/// `start_angle` by `sweep` (counter-clockwise when positive).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Arc {
    pub center: Vector,
    pub radius: F26Dot6,
    pub start_angle: Angle,
    pub sweep: Angle,
}

/// One cubic piece of a flattened arc. The start point is the previous
/// piece's end point (or the arc's start point for the first piece).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArcCubic {
    pub ctrl1: Vector,
    pub ctrl2: Vector,
    pub to: Vector,
}

impl Arc {
    /// The start point of the arc.
    #[inline]
    pub fn from(&self) -> Vector {
        self.center + Vector::from_polar(self.radius, self.start_angle)
    }

    /// Approximates the arc with at most four cubic beziers, each spanning
    /// a quarter turn or less.
    ///
    /// The sweep must not exceed a full turn in either direction.
    pub fn to_cubics(&self) -> ArrayVec<ArcCubic, 4> {
        debug_assert!(self.sweep.raw().abs() <= Angle::TWO_PI.raw());

        let mut pieces = ArrayVec::new();

        let mut a = self.from();
        let mut total = self.sweep;
        let mut angle = self.start_angle;
        let rotate = if self.sweep.raw() >= 0 {
            Angle::PI2
        } else {
            -Angle::PI2
        };

        while total.raw() != 0 {
            let step = total.max(-Angle::PI2).min(Angle::PI2);
            let next = angle + step;
            let theta = step.abs().half();

            let b = self.center + Vector::from_polar(self.radius, next);

            // Tangent handle length for a cubic tracing the sector 2*theta:
            // r * 4*sin(theta) / (3*(1 + cos(theta))).
            let length = self
                .radius
                .mul_div(theta.sin() * 4, (F16Dot16::ONE + theta.cos()) * 3);

            let ctrl1 = a + Vector::from_polar(length, angle + rotate);
            let ctrl2 = b + Vector::from_polar(length, next - rotate);

            pieces.push(ArcCubic { ctrl1, ctrl2, to: b });

            a = b;
            total -= step;
            angle = next;
        }

        pieces
    }
}
