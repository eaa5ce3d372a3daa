//! Fixed point 2D vectors.

use crate::fixed::F26Dot6;
use crate::trig::{self, Angle};

use std::fmt;
use std::ops;

/// A 2D vector (or position) in 26.6 fixed point outline units.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Vector {
    pub x: F26Dot6,
    pub y: F26Dot6,
}

/// Shorthand for `Vector { x, y }`.
#[inline]
pub const fn vector(x: F26Dot6, y: F26Dot6) -> Vector {
    Vector { x, y }
}

impl Vector {
    pub const ZERO: Self = vector(F26Dot6::ZERO, F26Dot6::ZERO);

    #[inline]
    pub fn from_i32(x: i32, y: i32) -> Self {
        vector(F26Dot6::from_i32(x), F26Dot6::from_i32(y))
    }

    /// The vector of the given length pointing in the direction `angle`.
    #[inline]
    pub fn from_polar(length: F26Dot6, angle: Angle) -> Self {
        let mut v = vector(length, F26Dot6::ZERO);
        v.rotate(angle);

        v
    }

    /// Rotates the vector in place, rounding both components to nearest.
    pub fn rotate(&mut self, angle: Angle) {
        if angle.raw() == 0 || (self.x.is_zero() && self.y.is_zero()) {
            return;
        }

        let mut x = self.x.raw();
        let mut y = self.y.raw();

        let shift = trig::prenorm(&mut x, &mut y);
        trig::pseudo_rotate(&mut x, &mut y, angle.raw());
        let x = trig::downscale(x);
        let y = trig::downscale(y);

        if shift > 0 {
            let half = 1 << (shift - 1);

            self.x = F26Dot6::from_raw((x + half - i32::from(x < 0)) >> shift);
            self.y = F26Dot6::from_raw((y + half - i32::from(y < 0)) >> shift);
        } else {
            let shift = (-shift) as u32;

            self.x = F26Dot6::from_raw(x.wrapping_shl(shift));
            self.y = F26Dot6::from_raw(y.wrapping_shl(shift));
        }
    }

    /// The length of the vector; exact for axis-aligned vectors.
    pub fn length(self) -> F26Dot6 {
        let mut x = self.x.raw();
        let mut y = self.y.raw();

        // Handle trivial cases.
        if x == 0 {
            return F26Dot6::from_raw(y.wrapping_abs());
        }
        if y == 0 {
            return F26Dot6::from_raw(x.wrapping_abs());
        }

        let shift = trig::prenorm(&mut x, &mut y);
        trig::pseudo_polarize(&mut x, &mut y);
        let x = trig::downscale(x);

        if shift > 0 {
            return F26Dot6::from_raw((x + (1 << (shift - 1))) >> shift);
        }

        F26Dot6::from_raw((x as u32).wrapping_shl((-shift) as u32) as i32)
    }

    /// The direction of the vector; zero for the zero vector.
    #[inline]
    pub fn angle(self) -> Angle {
        Angle::atan2(self.x, self.y)
    }

    /// Whether both components are within [`F26Dot6::EPSILON`] of `other`'s.
    #[inline]
    pub fn almost_eq(self, other: Vector) -> bool {
        (self.x - other.x).is_small() && (self.y - other.y).is_small()
    }
}

impl ops::Add for Vector {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        vector(self.x + other.x, self.y + other.y)
    }
}

impl ops::Sub for Vector {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        vector(self.x - other.x, self.y - other.y)
    }
}

impl ops::Neg for Vector {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        vector(-self.x, -self.y)
    }
}

impl ops::AddAssign for Vector {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl ops::SubAssign for Vector {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:?} {:?})", self.x, self.y)
    }
}
