use crate::geom::{Angle, F16Dot16, F26Dot6, Vector};
use crate::outline::{Glyph, Outline, OutlineBuilder, PointTag};
use crate::{
    stroke_glyph, stroke_glyph_border, LineCap, LineJoin, Side, StrokeError, StrokeOptions,
    Stroker,
};

fn px(value: i32) -> F26Dot6 {
    F26Dot6::from_i32(value)
}

fn v(x: i32, y: i32) -> Vector {
    Vector::from_i32(x, y)
}

fn stroker(options: StrokeOptions) -> Stroker {
    let mut stroker = Stroker::new();
    stroker.set(&options).unwrap();

    stroker
}

fn export_all(stroker: &mut Stroker) -> Outline {
    let (points, contours) = stroker.counts().unwrap();

    let mut outline = Outline::with_capacity(points, contours);
    stroker.export(&mut outline).unwrap();
    outline.check().unwrap();

    outline
}

fn export_side(stroker: &mut Stroker, side: Side) -> Outline {
    let (points, contours) = stroker.border_counts(side).unwrap();

    let mut outline = Outline::with_capacity(points, contours);
    stroker.export_border(side, &mut outline).unwrap();
    outline.check().unwrap();

    outline
}

fn contains_point(outline: &Outline, expected: Vector, tolerance: i32) -> bool {
    outline.points().iter().any(|&p| {
        (p.x - expected.x).abs().raw() <= tolerance && (p.y - expected.y).abs().raw() <= tolerance
    })
}

/// A counter-clockwise unit square, scaled by 100 outline units.
fn square_path(stroker: &mut Stroker) {
    stroker.begin_subpath(v(0, 0), false).unwrap();
    stroker.line_to(v(100, 0)).unwrap();
    stroker.line_to(v(100, 100)).unwrap();
    stroker.line_to(v(0, 100)).unwrap();
    stroker.end_subpath().unwrap();
}

#[test]
fn straight_segment_butt_caps() {
    // The outer border of a straight stroke holds the endpoints offset by
    // radius * normal, within one fixed point unit.
    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_cap(LineCap::Butt),
    );

    stroker.begin_subpath(v(0, 0), true).unwrap();
    stroker.line_to(v(100, 0)).unwrap();
    stroker.end_subpath().unwrap();

    let outline = export_all(&mut stroker);

    assert_eq!(outline.num_contours(), 1);
    assert!(contains_point(&outline, v(0, 10), 1));
    assert!(contains_point(&outline, v(100, 10), 1));
    assert!(contains_point(&outline, v(0, -10), 1));
    assert!(contains_point(&outline, v(100, -10), 1));

    // Butt caps add no extension past the endpoints.
    for &p in outline.points() {
        assert!(p.x >= px(0) - F26Dot6::from_raw(1));
        assert!(p.x <= px(100) + F26Dot6::from_raw(1));
    }
}

#[test]
fn square_bevel_join_counts() {
    // radius 10, bevel joins: one bevel pair per corner outside, a plain
    // intersection per corner inside.
    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_join(LineJoin::Bevel),
    );
    square_path(&mut stroker);

    // The square is counter-clockwise, so its outside border is the right
    // one.
    let (points, contours) = stroker.border_counts(Side::Right).unwrap();
    assert_eq!((points, contours), (8, 1));

    let (points, contours) = stroker.border_counts(Side::Left).unwrap();
    assert_eq!((points, contours), (4, 1));

    let outer = export_side(&mut stroker, Side::Right);
    let inner = export_side(&mut stroker, Side::Left);

    // The two bevel points at the (0, 0) corner.
    assert!(contains_point(&outer, v(-10, 0), 1));
    assert!(contains_point(&outer, v(0, -10), 1));

    // The inner border is the square inset by the radius. The secant
    // distance and the rotation each round once, so allow two units.
    for &p in &[v(10, 10), v(90, 10), v(90, 90), v(10, 90)] {
        assert!(contains_point(&inner, p, 2));
    }
}

#[test]
fn square_miter_join_apexes() {
    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_join(LineJoin::MiterFixed),
    );
    square_path(&mut stroker);

    // Miter apexes replace the edge endpoints entirely: four points per
    // border.
    let (points, contours) = stroker.border_counts(Side::Right).unwrap();
    assert_eq!((points, contours), (4, 1));

    let outer = export_side(&mut stroker, Side::Right);
    for &p in &[v(-10, -10), v(110, -10), v(110, 110), v(-10, 110)] {
        assert!(contains_point(&outer, p, 2));
    }
}

#[test]
fn square_round_join_counts() {
    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_join(LineJoin::Round),
    );
    square_path(&mut stroker);

    // Each 90 degree join is a single cubic piece: per corner the edge
    // endpoint plus two controls and the arc end.
    let (points, contours) = stroker.border_counts(Side::Right).unwrap();
    assert_eq!((points, contours), (16, 1));

    let (points, contours) = stroker.border_counts(Side::Left).unwrap();
    assert_eq!((points, contours), (4, 1));
}

#[test]
fn miter_limit_fallback() {
    // A 90 degree corner has a miter ratio of sqrt(2) = 1.414: a limit of
    // 1.0 is exceeded and MiterFixed falls back to a bevel.
    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_join(LineJoin::MiterFixed)
            .with_miter_limit(F16Dot16::ONE),
    );
    square_path(&mut stroker);

    let (points, _) = stroker.border_counts(Side::Right).unwrap();
    assert_eq!(points, 8);

    let outer = export_side(&mut stroker, Side::Right);
    assert!(contains_point(&outer, v(-10, 0), 1));
    assert!(contains_point(&outer, v(0, -10), 1));
    assert!(!contains_point(&outer, v(-10, -10), 2));
}

#[test]
fn miter_limit_truncation() {
    // With a variable miter the apex is truncated at the limit distance
    // instead of beveling at the offset points.
    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_join(LineJoin::MiterVariable)
            .with_miter_limit(F16Dot16::ONE),
    );
    square_path(&mut stroker);

    let (points, _) = stroker.border_counts(Side::Right).unwrap();
    assert_eq!(points, 8);

    let outer = export_side(&mut stroker, Side::Right);
    // No full apex, and no plain bevel points either.
    assert!(!contains_point(&outer, v(-10, -10), 2));
    assert!(!contains_point(&outer, v(-10, 0), 2));
    assert!(!contains_point(&outer, v(0, -10), 2));
}

#[test]
fn miter_limit_boundary_is_inclusive() {
    // Find a miter limit that lands exactly on the boundary for a 90
    // degree corner (limit * cos(45) == 1 in the stroker's own
    // arithmetic). At the boundary the full miter is still selected;
    // two units below it, the corner bevels.
    let mut boundary = None;
    for raw in 92500..92900 {
        let sigma = Vector::from_polar(F26Dot6::from_raw(raw), Angle::PI4);
        if sigma.x.raw() == F16Dot16::ONE.raw() {
            boundary = Some(raw);
            break;
        }
    }

    let boundary = match boundary {
        Some(raw) => raw,
        // No representable exact boundary on this table; nothing to check.
        None => return,
    };

    let mut at_limit = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_join(LineJoin::MiterFixed)
            .with_miter_limit(F16Dot16::from_raw(boundary)),
    );
    square_path(&mut at_limit);
    let (points, _) = at_limit.border_counts(Side::Right).unwrap();
    assert_eq!(points, 4, "the exact boundary keeps the miter");

    let mut above_limit = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_join(LineJoin::MiterFixed)
            .with_miter_limit(F16Dot16::from_raw(boundary - 2)),
    );
    square_path(&mut above_limit);
    let (points, _) = above_limit.border_counts(Side::Right).unwrap();
    assert_eq!(points, 8, "just past the boundary bevels");
}

#[test]
fn degenerate_segments_are_no_ops() {
    let mut stroker = stroker(StrokeOptions::default().with_radius(px(10)));

    stroker.begin_subpath(v(50, 50), true).unwrap();
    stroker.line_to(v(50, 50)).unwrap();
    stroker.conic_to(v(50, 50), v(50, 50)).unwrap();
    stroker
        .cubic_to(v(50, 50), v(50, 50), v(50, 50))
        .unwrap();
    stroker.end_subpath().unwrap();

    // Nothing was emitted at all.
    assert_eq!(stroker.counts().unwrap(), (0, 0));
}

#[test]
fn degenerate_segment_mid_path() {
    let options = StrokeOptions::default().with_radius(px(10));

    let mut with_noop = stroker(options);
    with_noop.begin_subpath(v(0, 0), true).unwrap();
    with_noop.line_to(v(100, 0)).unwrap();
    with_noop.line_to(v(100, 0)).unwrap();
    with_noop.line_to(v(100, 100)).unwrap();
    with_noop.end_subpath().unwrap();

    let mut without = stroker(options);
    without.begin_subpath(v(0, 0), true).unwrap();
    without.line_to(v(100, 0)).unwrap();
    without.line_to(v(100, 100)).unwrap();
    without.end_subpath().unwrap();

    assert_eq!(with_noop.counts().unwrap(), without.counts().unwrap());
}

#[test]
fn open_capsule_round_caps() {
    // An open segment with round caps becomes a single closed "capsule":
    // two straight sides plus two semicircular caps of two cubic pieces
    // each.
    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(5))
            .with_line_cap(LineCap::Round),
    );

    stroker.begin_subpath(v(0, 0), true).unwrap();
    stroker.line_to(v(100, 0)).unwrap();
    stroker.end_subpath().unwrap();

    let outline = export_all(&mut stroker);

    assert_eq!(outline.num_contours(), 1);

    // Cap apexes, one radius past each endpoint.
    assert!(contains_point(&outline, v(105, 0), 2));
    assert!(contains_point(&outline, v(-5, 0), 2));

    // Two cubic pieces per cap, two controls each.
    let cubics = outline
        .tags()
        .iter()
        .filter(|&&tag| tag == PointTag::Cubic)
        .count();
    assert_eq!(cubics, 8);
}

#[test]
fn closed_contour_yields_two_contours() {
    let mut stroker = stroker(StrokeOptions::default().with_radius(px(8)));

    stroker.begin_subpath(v(0, 0), false).unwrap();
    stroker.line_to(v(100, 0)).unwrap();
    stroker.line_to(v(50, 80)).unwrap();
    stroker.end_subpath().unwrap();

    let (_, contours) = stroker.counts().unwrap();
    assert_eq!(contours, 2);
}

#[test]
fn explicit_and_implicit_close_agree() {
    let options = StrokeOptions::default().with_radius(px(10));

    let mut implicit = stroker(options);
    square_path(&mut implicit);

    let mut explicit = stroker(options);
    explicit.begin_subpath(v(0, 0), false).unwrap();
    explicit.line_to(v(100, 0)).unwrap();
    explicit.line_to(v(100, 100)).unwrap();
    explicit.line_to(v(0, 100)).unwrap();
    explicit.line_to(v(0, 0)).unwrap();
    explicit.end_subpath().unwrap();

    assert_eq!(implicit.counts().unwrap(), explicit.counts().unwrap());
}

/// An eight arc conic circle around `center`; counter-clockwise.
fn conic_circle(center: Vector, radius: F26Dot6) -> Outline {
    let secant = radius.div_by(Angle::from_raw(45 << 15).cos());

    let on = |k: i32| center + Vector::from_polar(radius, Angle::from_raw(k * (45 << 16)));
    let ctrl =
        |k: i32| center + Vector::from_polar(secant, Angle::from_raw(k * (45 << 16) + (45 << 15)));

    let mut builder = OutlineBuilder::new();
    builder.move_to(on(0));
    for k in 0..8 {
        // Wrap the last arc back to the exact start point.
        builder.conic_to(ctrl(k), on((k + 1) % 8));
    }
    builder.close();

    builder.build()
}

#[test]
fn circle_borders_keep_their_distance() {
    let center = v(200, 200);
    let source_radius = px(100);
    let stroke_radius = px(10);

    let circle = conic_circle(center, source_radius);
    assert_eq!(circle.check(), Ok(()));

    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(stroke_radius)
            .with_line_join(LineJoin::Round),
    );
    stroker.parse_outline(&circle, false).unwrap();

    let (_, contours) = stroker.counts().unwrap();
    assert_eq!(contours, 2);

    // Three quarters of a pixel; covers the conic approximation of the
    // circle plus fixed point rounding.
    let tolerance = 48;

    let outer = export_side(&mut stroker, Side::Right);
    for (&point, &tag) in outer.points().iter().zip(outer.tags()) {
        if tag != PointTag::On {
            continue;
        }
        let d = (point - center).length() - (source_radius + stroke_radius);
        assert!(d.abs().raw() <= tolerance, "outer distance off by {:?}", d);
    }

    let inner = export_side(&mut stroker, Side::Left);
    for (&point, &tag) in inner.points().iter().zip(inner.tags()) {
        if tag != PointTag::On {
            continue;
        }
        let d = (point - center).length() - (source_radius - stroke_radius);
        assert!(d.abs().raw() <= tolerance, "inner distance off by {:?}", d);
    }
}

#[test]
fn wide_stroke_reversal_stays_consistent() {
    // The stroke radius exceeds the curve's radius of curvature: the
    // border direction reverses and the self-intersection fix splices in
    // the backward sector. The result must still validate.
    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(40))
            .with_line_cap(LineCap::Butt)
            .with_line_join(LineJoin::Bevel),
    );

    stroker.begin_subpath(v(0, 0), true).unwrap();
    stroker.conic_to(v(50, 80), v(100, 0)).unwrap();
    stroker.end_subpath().unwrap();

    let outline = export_all(&mut stroker);
    assert_eq!(outline.num_contours(), 1);
    assert!(outline.num_points() > 0);
}

#[test]
fn parse_outline_conic_conventions() {
    // An all-conic contour wraps through the midpoint of its first and
    // last points.
    let mut all_conic = Outline::new();
    for &(x, y) in &[(100, 0), (0, 100), (-100, 0), (0, -100)] {
        all_conic.push_point(v(x, y), PointTag::Conic);
    }
    all_conic.end_contour();
    assert_eq!(all_conic.check(), Ok(()));

    let mut stroker = stroker(StrokeOptions::default().with_radius(px(5)));
    stroker.parse_outline(&all_conic, false).unwrap();

    let (points, contours) = stroker.counts().unwrap();
    assert_eq!(contours, 2);
    assert!(points > 0);

    // A contour that starts on a conic control with an on-curve last
    // point starts there instead.
    let mut shifted = Outline::new();
    shifted.push_point(v(0, 100), PointTag::Conic);
    shifted.push_point(v(-100, 0), PointTag::On);
    shifted.push_point(v(0, -100), PointTag::Conic);
    shifted.push_point(v(100, 0), PointTag::On);
    shifted.end_contour();

    stroker.parse_outline(&shifted, false).unwrap();
    let (_, contours) = stroker.counts().unwrap();
    assert_eq!(contours, 2);
}

#[test]
fn parse_outline_rejects_malformed_input() {
    let mut stroker = stroker(StrokeOptions::default().with_radius(px(5)));

    // A contour cannot start with a cubic control point.
    let mut outline = Outline::new();
    outline.push_point(v(0, 0), PointTag::Cubic);
    outline.push_point(v(10, 0), PointTag::Cubic);
    outline.push_point(v(20, 0), PointTag::On);
    outline.end_contour();

    assert_eq!(
        stroker.parse_outline(&outline, false),
        Err(StrokeError::InvalidOutline)
    );

    // An unpaired cubic control point.
    let mut outline = Outline::new();
    outline.push_point(v(0, 0), PointTag::On);
    outline.push_point(v(10, 0), PointTag::Cubic);
    outline.push_point(v(20, 0), PointTag::On);
    outline.end_contour();

    assert_eq!(
        stroker.parse_outline(&outline, false),
        Err(StrokeError::InvalidOutline)
    );

    // Out-of-order contour end indices.
    let mut outline = Outline::new();
    for &(x, y) in &[(0, 0), (10, 0), (10, 10), (0, 10)] {
        outline.push_point(v(x, y), PointTag::On);
    }
    outline.push_contour_end(3);
    outline.push_contour_end(1);

    assert_eq!(
        stroker.parse_outline(&outline, false),
        Err(StrokeError::InvalidOutline)
    );
}

#[test]
fn parse_outline_skips_single_points() {
    let mut builder = OutlineBuilder::new();
    builder.move_to(v(42, 42));
    builder.move_to(v(0, 0));
    builder.line_to(v(100, 0));
    builder.line_to(v(100, 100));
    let outline = builder.build();

    let mut stroker = stroker(StrokeOptions::default().with_radius(px(10)));
    stroker.parse_outline(&outline, false).unwrap();

    // Only the triangle-ish contour contributes.
    let (_, contours) = stroker.counts().unwrap();
    assert_eq!(contours, 2);
}

#[test]
fn export_requires_validated_counts() {
    let mut stroker = stroker(StrokeOptions::default().with_radius(px(10)));

    stroker.begin_subpath(v(0, 0), true).unwrap();
    stroker.line_to(v(100, 0)).unwrap();
    stroker.end_subpath().unwrap();

    let mut outline = Outline::new();
    assert_eq!(
        stroker.export(&mut outline),
        Err(StrokeError::InvalidArgument)
    );

    stroker.counts().unwrap();
    assert_eq!(stroker.export(&mut outline), Ok(()));
}

#[test]
fn set_rejects_negative_radius() {
    let mut stroker = Stroker::new();

    assert_eq!(
        stroker.set(&StrokeOptions::default().with_radius(px(-1))),
        Err(StrokeError::InvalidArgument)
    );
}

#[test]
fn rewind_allows_reuse() {
    let mut builder = OutlineBuilder::new();
    builder.move_to(v(0, 0));
    builder.line_to(v(100, 0));
    builder.line_to(v(100, 100));
    builder.line_to(v(0, 100));
    let square = builder.build();

    let mut stroker = stroker(StrokeOptions::default().with_radius(px(10)));

    stroker.parse_outline(&square, false).unwrap();
    let first = stroker.counts().unwrap();
    let first_outline = {
        let mut outline = Outline::new();
        stroker.export(&mut outline).unwrap();
        outline
    };

    // parse_outline rewinds; replaying the same outline reproduces the
    // stroke exactly.
    stroker.parse_outline(&square, false).unwrap();
    assert_eq!(stroker.counts().unwrap(), first);

    let mut second_outline = Outline::new();
    stroker.export(&mut second_outline).unwrap();
    assert_eq!(first_outline.points(), second_outline.points());
}

#[test]
fn glyph_stroke_replaces_outline() {
    let mut builder = OutlineBuilder::new();
    builder.move_to(v(0, 0));
    builder.line_to(v(100, 0));
    builder.line_to(v(100, 100));
    builder.line_to(v(0, 100));
    let mut glyph = Glyph::from_outline(builder.build());

    let mut stroker = stroker(
        StrokeOptions::default()
            .with_radius(px(10))
            .with_line_join(LineJoin::Bevel),
    );

    stroke_glyph(&mut glyph, &mut stroker).unwrap();

    let outline = glyph.outline().unwrap();
    assert_eq!(outline.check(), Ok(()));
    assert_eq!(outline.num_contours(), 2);
    assert_eq!(outline.num_points(), 12);
}

#[test]
fn glyph_stroke_border_picks_the_outside() {
    let options = StrokeOptions::default()
        .with_radius(px(10))
        .with_line_join(LineJoin::Bevel);

    // Counter-clockwise square: the outside border has the bevels.
    let mut builder = OutlineBuilder::new();
    builder.move_to(v(0, 0));
    builder.line_to(v(100, 0));
    builder.line_to(v(100, 100));
    builder.line_to(v(0, 100));
    let mut glyph = Glyph::from_outline(builder.build());

    let mut stroker = stroker(options);
    stroke_glyph_border(&mut glyph, &mut stroker, false).unwrap();
    assert_eq!(glyph.outline().unwrap().num_points(), 8);

    // Same square wound clockwise: the outside is the other border, but
    // the selection must still find it.
    let mut builder = OutlineBuilder::new();
    builder.move_to(v(0, 0));
    builder.line_to(v(0, 100));
    builder.line_to(v(100, 100));
    builder.line_to(v(100, 0));
    let mut glyph = Glyph::from_outline(builder.build());

    let mut stroker = self::stroker(options);
    stroke_glyph_border(&mut glyph, &mut stroker, false).unwrap();
    assert_eq!(glyph.outline().unwrap().num_points(), 8);

    // And the inside border is the inset square.
    let mut builder = OutlineBuilder::new();
    builder.move_to(v(0, 0));
    builder.line_to(v(100, 0));
    builder.line_to(v(100, 100));
    builder.line_to(v(0, 100));
    let mut glyph = Glyph::from_outline(builder.build());

    let mut stroker = self::stroker(options);
    stroke_glyph_border(&mut glyph, &mut stroker, true).unwrap();
    assert_eq!(glyph.outline().unwrap().num_points(), 4);
}

#[test]
fn glyph_wrappers_leave_glyphs_intact_on_failure() {
    let mut stroker = stroker(StrokeOptions::default().with_radius(px(10)));

    // A bitmap glyph cannot be stroked.
    let mut glyph = Glyph::Bitmap(Default::default());
    assert_eq!(
        stroke_glyph(&mut glyph, &mut stroker),
        Err(StrokeError::InvalidArgument)
    );
    assert!(!glyph.is_outline());

    // A malformed outline leaves the original outline in place.
    let mut bad = Outline::new();
    bad.push_point(v(0, 0), PointTag::Cubic);
    bad.push_point(v(10, 0), PointTag::Cubic);
    bad.push_point(v(20, 0), PointTag::On);
    bad.end_contour();

    let mut glyph = Glyph::from_outline(bad.clone());
    assert_eq!(
        stroke_glyph(&mut glyph, &mut stroker),
        Err(StrokeError::InvalidOutline)
    );
    assert_eq!(glyph.outline().unwrap().points(), bad.points());
}
