#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Fixed point geometry for outline stroking.
//!
//! Everything here works in the two fixed point formats used by font
//! outlines: 26.6 for coordinates ([`F26Dot6`], [`Vector`]) and 16.16 for
//! angles and scale factors ([`Angle`], [`F16Dot16`]). The trigonometric
//! kernel is integer CORDIC; results are deterministic across platforms
//! and must stay bit-identical from release to release, since consumers
//! compare rendered output against golden images.
//!
//! This crate is reexported in `graver`.

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod arc;
mod fixed;
mod trig;
mod vector;

pub use crate::arc::{Arc, ArcCubic};
pub use crate::fixed::{F16Dot16, F26Dot6};
pub use crate::trig::Angle;
pub use crate::vector::{vector, Vector};
