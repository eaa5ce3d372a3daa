//! Glyph containers.
//!
//! A glyph slot holds either a vector outline or a rendered bitmap. Code
//! that needs an outline (hinting, stroking, scaling) asks the variant via
//! [`Glyph::outline`] instead of comparing implementation classes.

use crate::outline::Outline;

/// A rendered glyph image.
#[derive(Clone, Debug, Default)]
pub struct Bitmap {
    pub rows: u32,
    pub width: u32,
    /// Bytes per row; negative for bottom-up layouts.
    pub pitch: i32,
    pub buffer: Vec<u8>,
}

/// A glyph represented by a bitmap and its placement.
#[derive(Clone, Debug, Default)]
pub struct BitmapGlyph {
    pub left: i32,
    pub top: i32,
    pub bitmap: Bitmap,
}

/// A glyph represented by a vector outline.
#[derive(Clone, Debug, Default)]
pub struct OutlineGlyph {
    pub outline: Outline,
}

/// A glyph image in one of its possible representations.
#[derive(Clone, Debug)]
pub enum Glyph {
    Outline(OutlineGlyph),
    Bitmap(BitmapGlyph),
}

impl Glyph {
    /// Wraps an outline into a glyph.
    pub fn from_outline(outline: Outline) -> Self {
        Glyph::Outline(OutlineGlyph { outline })
    }

    #[inline]
    pub fn is_outline(&self) -> bool {
        matches!(self, Glyph::Outline(_))
    }

    /// The glyph's outline, if it has one.
    #[inline]
    pub fn outline(&self) -> Option<&Outline> {
        match self {
            Glyph::Outline(glyph) => Some(&glyph.outline),
            Glyph::Bitmap(_) => None,
        }
    }

    /// The glyph's outline, if it has one.
    #[inline]
    pub fn outline_mut(&mut self) -> Option<&mut Outline> {
        match self {
            Glyph::Outline(glyph) => Some(&mut glyph.outline),
            Glyph::Bitmap(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_check() {
        let glyph = Glyph::from_outline(Outline::new());
        assert!(glyph.is_outline());
        assert!(glyph.outline().is_some());

        let glyph = Glyph::Bitmap(BitmapGlyph::default());
        assert!(!glyph.is_outline());
        assert!(glyph.outline().is_none());
    }
}
