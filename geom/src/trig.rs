//! Fixed point angles and trigonometry.
//!
//! Angles are 16.16 fixed point degrees and the sine/cosine/arctangent
//! kernel is a CORDIC unit working entirely in integers, so that the same
//! input always produces the same output on every platform. The constants
//! below are load-bearing: rendered output is compared bit-for-bit against
//! them downstream.

use crate::fixed::{F16Dot16, F26Dot6};

use std::cmp;
use std::fmt;
use std::ops;

pub(crate) const ANGLE_PI: i32 = 180 << 16;
pub(crate) const ANGLE_2PI: i32 = 360 << 16;
pub(crate) const ANGLE_PI2: i32 = 90 << 16;
pub(crate) const ANGLE_PI4: i32 = 45 << 16;

/// The CORDIC shrink factor, 0.858785336480436 * 2^32.
const TRIG_SCALE: u32 = 0xDBD9_5B16;

/// Highest bit of overflow-safe vector components: MSB of
/// 0.858785336480436 * sqrt(0.5) * 2^30.
const TRIG_SAFE_MSB: i32 = 29;

/// Arctangents of 2^-i, in 16.16 degrees, for the pseudo-rotation steps.
const ARCTAN_TABLE: [i32; 22] = [
    1740967, 919879, 466945, 234379, 117304, 58666, 29335, 14668, 7334, 3667,
    1833, 917, 458, 229, 115, 57, 29, 14, 7, 4, 2, 1,
];

#[inline]
fn msb(z: u32) -> i32 {
    31 - z.leading_zeros() as i32
}

/// Undoes the CORDIC gain, rounding with a bias chosen by regression
/// against the true hypotenuse.
pub(crate) fn downscale(val: i32) -> i32 {
    let v = ((u64::from(val.unsigned_abs()) * u64::from(TRIG_SCALE) + 0x4000_0000) >> 32) as i32;

    if val < 0 {
        -v
    } else {
        v
    }
}

/// Scales the vector so that its largest component sits on the safe MSB.
/// Returns the (possibly negative) amount the components were shifted up.
pub(crate) fn prenorm(x: &mut i32, y: &mut i32) -> i32 {
    let shift = msb(x.unsigned_abs() | y.unsigned_abs());

    if shift <= TRIG_SAFE_MSB {
        let up = (TRIG_SAFE_MSB - shift) as u32;

        *x = x.wrapping_shl(up);
        *y = y.wrapping_shl(up);

        up as i32
    } else {
        let down = (shift - TRIG_SAFE_MSB) as u32;

        *x >>= down;
        *y >>= down;

        -(down as i32)
    }
}

/// Rotates the vector by `theta` through pseudo-rotations; the result is
/// scaled up by the inverse CORDIC gain (see [`downscale`]).
pub(crate) fn pseudo_rotate(x: &mut i32, y: &mut i32, mut theta: i32) {
    // Rotate into the [-PI/4, PI/4] sector.
    while theta < -ANGLE_PI4 {
        let tmp = *y;
        *y = -*x;
        *x = tmp;
        theta += ANGLE_PI2;
    }

    while theta > ANGLE_PI4 {
        let tmp = -*y;
        *y = *x;
        *x = tmp;
        theta -= ANGLE_PI2;
    }

    // Pseudo-rotations, with right shifts.
    let mut b = 1;
    for (idx, &arctan) in ARCTAN_TABLE.iter().enumerate() {
        let i = (idx + 1) as u32;

        if theta < 0 {
            let tmp = *x + ((*y + b) >> i);
            *y -= (*x + b) >> i;
            *x = tmp;
            theta += arctan;
        } else {
            let tmp = *x - ((*y + b) >> i);
            *y += (*x + b) >> i;
            *x = tmp;
            theta -= arctan;
        }

        b <<= 1;
    }
}

/// Rotates the vector onto the positive x axis and returns the angle it
/// was rotated by. The x component ends up scaled like [`pseudo_rotate`]'s
/// output.
pub(crate) fn pseudo_polarize(x: &mut i32, y: &mut i32) -> i32 {
    let mut theta;

    // Get the vector into the [-PI/4, PI/4] sector.
    if *y > *x {
        if *y > -*x {
            theta = ANGLE_PI2;
            let tmp = *y;
            *y = -*x;
            *x = tmp;
        } else {
            theta = if *y > 0 { ANGLE_PI } else { -ANGLE_PI };
            *x = -*x;
            *y = -*y;
        }
    } else if *y < -*x {
        theta = -ANGLE_PI2;
        let tmp = -*y;
        *y = *x;
        *x = tmp;
    } else {
        theta = 0;
    }

    let mut b = 1;
    for (idx, &arctan) in ARCTAN_TABLE.iter().enumerate() {
        let i = (idx + 1) as u32;

        if *y > 0 {
            let tmp = *x + ((*y + b) >> i);
            *y -= (*x + b) >> i;
            *x = tmp;
            theta += arctan;
        } else {
            let tmp = *x - ((*y + b) >> i);
            *y += (*x + b) >> i;
            *x = tmp;
            theta -= arctan;
        }

        b <<= 1;
    }

    // Round to acknowledge the accumulated error of the arctan table.
    if theta >= 0 {
        theta = (theta + 8) & !15;
    } else {
        theta = -((-theta + 8) & !15);
    }

    theta
}

/// An angle, in 16.16 fixed point degrees.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Angle(i32);

impl Angle {
    pub const ZERO: Self = Angle(0);
    pub const PI: Self = Angle(ANGLE_PI);
    pub const TWO_PI: Self = Angle(ANGLE_2PI);
    pub const PI2: Self = Angle(ANGLE_PI2);
    pub const PI4: Self = Angle(ANGLE_PI4);

    #[inline]
    pub const fn from_raw(bits: i32) -> Self {
        Angle(bits)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_degrees(degrees: i32) -> Self {
        Angle(degrees << 16)
    }

    #[inline]
    pub fn to_degrees(self) -> f32 {
        self.0 as f32 / 65536.0
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Angle(self.0.wrapping_abs())
    }

    /// Halves the angle, truncating toward zero.
    #[inline]
    pub const fn half(self) -> Self {
        Angle(self.0 / 2)
    }

    /// The shortest arc from `self` to `other`, normalized to (-PI, PI].
    pub fn diff(self, other: Angle) -> Angle {
        let mut delta = other.0 - self.0;

        while delta <= -ANGLE_PI {
            delta += ANGLE_2PI;
        }
        while delta > ANGLE_PI {
            delta -= ANGLE_2PI;
        }

        Angle(delta)
    }

    /// The angle halfway along the shortest arc from `self` to `other`.
    #[inline]
    pub fn mean(self, other: Angle) -> Angle {
        Angle(self.0 + self.diff(other).0 / 2)
    }

    /// The direction of the vector `(dx, dy)`; the zero vector maps to the
    /// zero angle.
    pub fn atan2(dx: F26Dot6, dy: F26Dot6) -> Angle {
        let mut x = dx.raw();
        let mut y = dy.raw();

        if x == 0 && y == 0 {
            return Angle::ZERO;
        }

        prenorm(&mut x, &mut y);

        Angle(pseudo_polarize(&mut x, &mut y))
    }

    pub fn cos(self) -> F16Dot16 {
        let mut x = (TRIG_SCALE >> 8) as i32;
        let mut y = 0;

        pseudo_rotate(&mut x, &mut y, self.0);

        F16Dot16::from_raw((x + 0x80) >> 8)
    }

    #[inline]
    pub fn sin(self) -> F16Dot16 {
        (Angle::PI2 - self).cos()
    }

    pub fn tan(self) -> F16Dot16 {
        let mut x = 1 << 24;
        let mut y = 0;

        pseudo_rotate(&mut x, &mut y, self.0);

        F16Dot16::from_raw(y).div_by(F16Dot16::from_raw(x))
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        cmp::min(self, other)
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        cmp::max(self, other)
    }
}

impl ops::Add for Angle {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Angle(self.0 + other.0)
    }
}

impl ops::Sub for Angle {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Angle(self.0 - other.0)
    }
}

impl ops::Neg for Angle {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Angle(-self.0)
    }
}

impl ops::Mul<i32> for Angle {
    type Output = Self;
    #[inline]
    fn mul(self, other: i32) -> Self {
        Angle(self.0 * other)
    }
}

impl ops::AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl ops::SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl fmt::Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}deg", self.to_degrees())
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}deg", self.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: F16Dot16, b: F16Dot16, tolerance: i32) {
        let d = (a - b).abs().raw();
        assert!(d <= tolerance, "{:?} != {:?} (d = {})", a, b, d);
    }

    #[test]
    fn angle_diff_wraps() {
        let a = Angle::from_degrees(170);
        let b = Angle::from_degrees(-170);

        assert_eq!(a.diff(b), Angle::from_degrees(20));
        assert_eq!(b.diff(a), Angle::from_degrees(-20));
        assert_eq!(a.diff(a), Angle::ZERO);
        // The boundary case maps to +PI, not -PI.
        assert_eq!(Angle::ZERO.diff(Angle::PI), Angle::PI);
    }

    #[test]
    fn angle_mean() {
        let a = Angle::from_degrees(170);
        let b = Angle::from_degrees(-170);

        assert_eq!(a.mean(b), Angle::from_degrees(180));
        assert_eq!(Angle::ZERO.mean(Angle::PI2), Angle::PI4);
    }

    #[test]
    fn cos_sin_values() {
        assert_close(Angle::ZERO.cos(), F16Dot16::ONE, 2);
        assert_close(Angle::PI2.cos(), F16Dot16::ZERO, 2);
        assert_close(Angle::PI.cos(), -F16Dot16::ONE, 2);
        assert_close(Angle::PI2.sin(), F16Dot16::ONE, 2);
        assert_close(Angle::from_degrees(30).sin(), F16Dot16::from_raw(0x8000), 4);
        assert_close(Angle::from_degrees(60).cos(), F16Dot16::from_raw(0x8000), 4);
        assert_close(
            Angle::PI4.cos(),
            F16Dot16::from_raw(46341), // sqrt(2)/2
            4,
        );
    }

    #[test]
    fn tan_values() {
        assert_close(Angle::PI4.tan(), F16Dot16::ONE, 4);
        assert_close(Angle::ZERO.tan(), F16Dot16::ZERO, 2);
        assert_close(
            Angle::from_degrees(60).tan(),
            F16Dot16::from_raw(113512), // sqrt(3)
            8,
        );
    }

    #[test]
    fn atan2_axes_are_exact() {
        let d = F26Dot6::from_i32(100);

        assert_eq!(Angle::atan2(d, F26Dot6::ZERO), Angle::ZERO);
        assert_eq!(Angle::atan2(F26Dot6::ZERO, d), Angle::PI2);
        assert_eq!(Angle::atan2(F26Dot6::ZERO, -d), -Angle::PI2);
        // The negative x axis polarizes to -PI, not PI.
        assert_eq!(Angle::atan2(-d, F26Dot6::ZERO), -Angle::PI);
        assert_eq!(Angle::atan2(F26Dot6::ZERO, F26Dot6::ZERO), Angle::ZERO);
    }

    #[test]
    fn atan2_diagonals() {
        let d = F26Dot6::from_i32(100);
        let tolerance = 32;

        let a = Angle::atan2(d, d);
        assert!((a - Angle::PI4).raw().abs() <= tolerance, "{:?}", a);

        let a = Angle::atan2(-d, d);
        assert!((a - Angle::from_degrees(135)).raw().abs() <= tolerance, "{:?}", a);

        let a = Angle::atan2(d, -d);
        assert!((a + Angle::PI4).raw().abs() <= tolerance, "{:?}", a);
    }
}
