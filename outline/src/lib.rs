#![deny(bare_trait_objects)]

//! Data structures for font outlines (vector glyph shapes).
//!
//! An [`Outline`] stores its points the way font files do: a flat point
//! array, a parallel array of on/off-curve tags and a table of contour end
//! indices. [`OutlineBuilder`] offers an imperative way of building one,
//! and [`Glyph`] is the tagged container distinguishing outline glyphs
//! from bitmap ones.
//!
//! This crate is reexported in `graver`.

pub use graver_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod builder;
pub mod glyph;
mod outline;

#[doc(inline)]
pub use crate::builder::OutlineBuilder;
#[doc(inline)]
pub use crate::glyph::{Bitmap, BitmapGlyph, Glyph, OutlineGlyph};
pub use crate::outline::{Orientation, Outline, OutlineError, PointTag};
