#![deny(bare_trait_objects)]

//! Outline stroking for font rendering.
//!
//! This meta-crate (`graver`) reexports the following sub-crates for
//! convenience:
//!
//! * **graver_stroke** - The outline stroker: offset borders, joins and caps.
//! * **graver_outline** - Outline storage, builders and glyph containers.
//! * **graver_geom** - 26.6/16.16 fixed-point vectors, angles and trigonometry.
//!
//! Each `graver_<name>` crate is reexported as a `<name>` module in `graver`.
//! For example:
//!
//! ```ignore
//! extern crate graver_stroke;
//! use graver_stroke::Stroker;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate graver;
//! use graver::stroke::Stroker;
//! ```
//!
//! # Feature flags
//!
//! Serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default). The `debugger` flag
//! compiles in the internal tracing of the stroker in debug builds.

pub extern crate graver_geom;
pub extern crate graver_outline;
pub extern crate graver_stroke;

pub use graver_geom as geom;
pub use graver_outline as outline;
pub use graver_stroke as stroke;

pub use crate::geom::{Angle, F16Dot16, F26Dot6, Vector};
pub use crate::outline::{Glyph, Outline, OutlineBuilder, PointTag};
pub use crate::stroke::{LineCap, LineJoin, Side, StrokeOptions, Stroker};
