//! Glyph level stroking helpers.
//!
//! These replace an outline glyph's outline with its stroke. On any error
//! the glyph is left untouched: the replacement outline is built completely
//! before it is swapped in.

use crate::error::{StrokeError, StrokeResult};
use crate::outline::{Glyph, Orientation, Outline};
use crate::{Side, Stroker};

/// The border facing away from the filled side of the outline, derived
/// from its winding orientation so that "outside" is well defined
/// regardless of the source convention.
fn outside_side(outline: &Outline) -> Side {
    match outline.orientation() {
        Orientation::Clockwise => Side::Left,
        Orientation::CounterClockwise | Orientation::None => Side::Right,
    }
}

/// Replaces the glyph's outline with its complete stroke (both borders).
///
/// Fails with [`StrokeError::InvalidArgument`] if the glyph does not hold
/// an outline.
pub fn stroke_glyph(glyph: &mut Glyph, stroker: &mut Stroker) -> StrokeResult {
    let slot = match glyph {
        Glyph::Outline(slot) => slot,
        _ => return Err(StrokeError::InvalidArgument),
    };

    stroker.parse_outline(&slot.outline, false)?;

    let (num_points, num_contours) = stroker.counts()?;

    let mut stroked = Outline::with_capacity(num_points, num_contours);
    stroker.export(&mut stroked)?;

    slot.outline = stroked;

    Ok(())
}

/// Replaces the glyph's outline with one border of its stroke: the outside
/// one, or the inside one when `inside` is set.
pub fn stroke_glyph_border(glyph: &mut Glyph, stroker: &mut Stroker, inside: bool) -> StrokeResult {
    let slot = match glyph {
        Glyph::Outline(slot) => slot,
        _ => return Err(StrokeError::InvalidArgument),
    };

    let mut side = outside_side(&slot.outline);
    if inside {
        side = side.opposite();
    }

    stroker.parse_outline(&slot.outline, false)?;

    let (num_points, num_contours) = stroker.border_counts(side)?;

    let mut stroked = Outline::with_capacity(num_points, num_contours);
    stroker.export_border(side, &mut stroked)?;

    slot.outline = stroked;

    Ok(())
}
