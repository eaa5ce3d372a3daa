//! The outline stroker.

use crate::border::{Border, Tags};
use crate::error::{StrokeError, StrokeResult};
use crate::geom::{vector, Angle, F16Dot16, F26Dot6, Vector};
use crate::outline::{Outline, PointTag};
use crate::{LineCap, LineJoin, Side, StrokeOptions};

/// Tangent deviation under which a subdivided conic arc is accepted.
const SMALL_CONIC_THRESHOLD: Angle = Angle::from_raw(Angle::PI.raw() / 6);

/// Tangent deviation under which a subdivided cubic arc is accepted.
const SMALL_CUBIC_THRESHOLD: Angle = Angle::from_raw(Angle::PI.raw() / 8);

/// Half-turns sharper than this (slightly under 90 degrees) are treated as
/// U-turns by the inside corner intersection test.
const NEAR_U_TURN: i32 = 0x0059_C000;

/// Subdivision stack for conic arcs (3 points per arc, overlapping), and
/// the highest arc offset that may still be split.
const CONIC_STACK: usize = 34;
const CONIC_SPLIT_LIMIT: usize = 30;

/// Same for cubic arcs (4 points per arc).
const CUBIC_STACK: usize = 37;
const CUBIC_SPLIT_LIMIT: usize = 32;

/// Converts a vector path into the pair of offset borders outlining the
/// path widened by a radius.
///
/// A stroker is configured once with [`set`](Stroker::set), then fed
/// subpaths; [`rewind`](Stroker::rewind) clears the accumulated borders
/// while keeping their allocations, so one instance can be replayed over
/// many glyphs cheaply.
pub struct Stroker {
    radius: F26Dot6,
    line_cap: LineCap,
    line_join: LineJoin,
    line_join_saved: LineJoin,
    miter_limit: F16Dot16,

    /// Current pen position.
    center: Vector,
    /// Length of the last straight segment (zero for curves).
    line_length: F26Dot6,
    /// Direction of the segment entering the current vertex.
    angle_in: Angle,
    /// Direction of the segment leaving the current vertex.
    angle_out: Angle,
    /// No segment recorded yet for the current subpath.
    first_point: bool,
    subpath_open: bool,
    subpath_angle: Angle,
    subpath_start: Vector,
    subpath_line_length: F26Dot6,
    /// Whether curve offsetting must watch for direction reversals: round
    /// joins (and round/square caps on open subpaths) already cover the
    /// sector behind a reversal, everything else does not.
    handle_wide_strokes: bool,

    borders: [Border; 2],
}

impl Stroker {
    pub fn new() -> Self {
        let options = StrokeOptions::DEFAULT;

        Stroker {
            radius: options.radius,
            line_cap: options.line_cap,
            line_join: options.line_join,
            line_join_saved: options.line_join,
            miter_limit: options.miter_limit,

            center: Vector::ZERO,
            line_length: F26Dot6::ZERO,
            angle_in: Angle::ZERO,
            angle_out: Angle::ZERO,
            first_point: true,
            subpath_open: false,
            subpath_angle: Angle::ZERO,
            subpath_start: Vector::ZERO,
            subpath_line_length: F26Dot6::ZERO,
            handle_wide_strokes: false,

            borders: [Border::new(), Border::new()],
        }
    }

    /// Applies stroking parameters and rewinds the stroker.
    ///
    /// The radius must not be negative; the miter limit is clamped up to
    /// at least 1.0.
    pub fn set(&mut self, options: &StrokeOptions) -> StrokeResult {
        if options.radius < F26Dot6::ZERO {
            return Err(StrokeError::InvalidArgument);
        }

        self.radius = options.radius;
        self.line_cap = options.line_cap;
        self.line_join = options.line_join;
        self.miter_limit = options.miter_limit.max(StrokeOptions::MINIMUM_MITER_LIMIT);

        // The join style is restored after temporary round joins between
        // flattened arcs.
        self.line_join_saved = self.line_join;

        self.rewind();

        Ok(())
    }

    /// Discards the accumulated borders, keeping their allocations.
    pub fn rewind(&mut self) {
        self.borders[0].rewind();
        self.borders[1].rewind();
    }

    /// The rotation from the drawing direction to the given border's
    /// offset direction.
    fn rotation(side: usize) -> Angle {
        if side == 0 {
            Angle::PI2
        } else {
            -Angle::PI2
        }
    }

    /// Starts a new subpath at `to`. An open subpath is capped at both
    /// ends; a closed one wraps around back to `to`.
    ///
    /// Every `begin_subpath` must be paired with
    /// [`end_subpath`](Stroker::end_subpath).
    pub fn begin_subpath(&mut self, to: Vector, open: bool) -> StrokeResult {
        stroke_log!("begin subpath at {:?} (open: {})", to, open);

        self.first_point = true;
        self.center = to;
        self.subpath_open = open;

        self.handle_wide_strokes = self.line_join != LineJoin::Round
            || (self.subpath_open && self.line_cap == LineCap::Butt);

        self.subpath_start = to;
        self.angle_in = Angle::ZERO;

        Ok(())
    }

    /// Seeds both borders with their offset starting points once the
    /// initial direction of the subpath is known.
    fn start_borders(&mut self, start_angle: Angle, line_length: F26Dot6) -> StrokeResult {
        let delta = Vector::from_polar(self.radius, start_angle + Angle::PI2);

        self.borders[0].move_to(self.center + delta)?;
        self.borders[1].move_to(self.center - delta)?;

        // Saved for the final join (or caps) at end_subpath.
        self.subpath_angle = start_angle;
        self.first_point = false;
        self.subpath_line_length = line_length;

        Ok(())
    }

    /// Processes an inside corner: computes the intersection of the two
    /// adjoining border segments, or falls back to a plain offset point.
    fn inside_corner(&mut self, side: usize, line_length: F26Dot6) -> StrokeResult {
        let rotate = Self::rotation(side);
        let theta = self.angle_in.diff(self.angle_out).half();

        // Only intersect borders between two line segments, both long
        // enough (line_length is zero for curves), and not near a U-turn.
        let intersect = if !self.borders[side].movable
            || line_length.is_zero()
            || theta.raw() > NEAR_U_TURN
            || theta.raw() < -NEAR_U_TURN
        {
            false
        } else {
            // Minimum length the adjoining segments must have for their
            // borders to reach the intersection point.
            let min_length = self.radius.scale(theta.tan()).abs();

            !min_length.is_zero()
                && self.line_length >= min_length
                && line_length >= min_length
        };

        let delta = if intersect {
            // The intersection sits along the bisector, at the secant
            // distance.
            let phi = self.angle_in + theta + rotate;
            let length = self.radius.div_by(theta.cos());

            self.center + Vector::from_polar(length, phi)
        } else {
            self.borders[side].movable = false;

            self.center + Vector::from_polar(self.radius, self.angle_out + rotate)
        };

        self.borders[side].line_to(delta, false)
    }

    /// Emits a round join (or cap) arc between `angle_in` and `angle_out`.
    fn arc_join(&mut self, side: usize) -> StrokeResult {
        let rotate = Self::rotation(side);

        let mut total = self.angle_in.diff(self.angle_out);
        if total == Angle::PI {
            total = -rotate * 2;
        }

        let center = self.center;
        let radius = self.radius;
        let start = self.angle_in + rotate;

        let border = &mut self.borders[side];
        border.arc_to(center, radius, start, total)?;
        border.movable = false;

        Ok(())
    }

    /// Joins the outer corners with a single straight segment.
    fn bevel_join(&mut self, side: usize) -> StrokeResult {
        let delta = self.center
            + Vector::from_polar(self.radius, self.angle_out + Self::rotation(side));

        let border = &mut self.borders[side];
        border.movable = false;
        border.line_to(delta, false)
    }

    /// Processes an outside corner: a round, miter or bevel join.
    fn outside_corner(&mut self, side: usize, line_length: F26Dot6) -> StrokeResult {
        match self.line_join {
            LineJoin::Round => return self.arc_join(side),
            LineJoin::Bevel => return self.bevel_join(side),
            LineJoin::MiterVariable | LineJoin::MiterFixed => {}
        }

        // This is a mitered (pointed) or truncated corner.
        let radius = self.radius;
        let rotate = Self::rotation(side);
        let fixed_bevel = self.line_join != LineJoin::MiterVariable;

        let mut theta = self.angle_in.diff(self.angle_out).half();
        if theta == Angle::PI2 {
            theta = -rotate;
        }

        let phi = self.angle_in + theta + rotate;

        // sigma = miter_limit * (cos theta, sin theta); its components are
        // 16.16 values, the polar rotation is scale agnostic.
        let sigma = Vector::from_polar(F26Dot6::from_raw(self.miter_limit.raw()), theta);
        let sigma_x = F16Dot16::from_raw(sigma.x.raw());
        let sigma_y = F16Dot16::from_raw(sigma.y.raw());

        // The limit is exceeded when miter_limit * cos(theta) drops below
        // one. Very small deviations never get a variable bevel; sin(x)
        // is zero for x <= 57.
        if sigma_x < F16Dot16::ONE && (fixed_bevel || theta.raw().abs() > 57) {
            if fixed_bevel {
                return self.bevel_join(side);
            }

            // The miter is truncated at the limit distance.
            let apex = Vector::from_polar(radius.scale(self.miter_limit), phi);
            let coef = (F16Dot16::ONE - sigma_x).div_by(sigma_y);

            let offset = vector(apex.y.scale(coef), (-apex.x).scale(coef));
            let middle = apex + self.center;
            let first = middle + offset;

            let border = &mut self.borders[side];
            border.line_to(first, false)?;

            let second = middle + middle - first;
            border.line_to(second, false)?;

            // An end point is only needed after a curve (line_length is
            // zero for curves); line borders snap to the next join.
            if line_length.is_zero() {
                let delta = self.center + Vector::from_polar(radius, self.angle_out + rotate);

                border.line_to(delta, false)?;
            }

            return Ok(());
        }

        // A full miter: the apex sits at radius / cos(theta) along the
        // bisector.
        let length = radius.mul_div(self.miter_limit, sigma_x);

        let delta = self.center + Vector::from_polar(length, phi);

        let border = &mut self.borders[side];
        border.line_to(delta, false)?;

        if line_length.is_zero() {
            let delta = self.center + Vector::from_polar(radius, self.angle_out + rotate);

            border.line_to(delta, false)?;
        }

        Ok(())
    }

    /// Classifies the turn at the current vertex and processes its inside
    /// and outside sides.
    fn process_corner(&mut self, line_length: F26Dot6) -> StrokeResult {
        let turn = self.angle_in.diff(self.angle_out);

        // No corner processing required when going straight through.
        if turn.raw() == 0 {
            return Ok(());
        }

        // When turning right, the inside side is 0.
        let inside_side = (turn.raw() < 0) as usize;

        self.inside_corner(inside_side, line_length)?;
        self.outside_corner(1 - inside_side, line_length)
    }

    /// Caps the border `side` at the current position, facing `angle`.
    fn cap(&mut self, angle: Angle, side: usize) -> StrokeResult {
        if self.line_cap == LineCap::Round {
            // A half circle around the end point.
            self.angle_in = angle;
            self.angle_out = angle + Angle::PI;

            return self.arc_join(side);
        }

        // A square or butt cap crosses over in two straight segments.
        let radius = self.radius;
        let along = Vector::from_polar(radius, angle);
        let across = if side != 0 {
            vector(along.y, -along.x)
        } else {
            vector(-along.y, along.x)
        };

        let middle = if self.line_cap == LineCap::Square {
            self.center + along
        } else {
            self.center
        };

        let first = middle + across;

        let border = &mut self.borders[side];
        border.line_to(first, false)?;

        let second = middle + middle - first;
        border.line_to(second, false)
    }

    /// Appends the current subpath of the right border, reversed, onto the
    /// left border. Used to turn the two borders of an open subpath into a
    /// single contour.
    fn splice_reversed_right(&mut self) -> StrokeResult {
        let (left, right) = self.borders.split_at_mut(1);
        let left = &mut left[0];
        let right = &mut right[0];

        let right_start = match right.start {
            Some(start) => start,
            None => {
                debug_assert!(false, "splice without an open right subpath");
                return Ok(());
            }
        };

        let new_points = right.points.len() - right_start;
        if new_points > 0 {
            left.grow(new_points)?;

            for i in (right_start..right.points.len()).rev() {
                left.points.push(right.points[i]);
                // The spliced run is interior to the contour; subpath
                // markers are stripped.
                left.tags.push(right.tags[i] & (Tags::ON_CURVE | Tags::CUBIC));
            }

            right.points.truncate(right_start);
            right.tags.truncate(right_start);

            left.movable = false;
            right.movable = false;
        }

        Ok(())
    }

    /// Adds a straight segment to the current subpath.
    ///
    /// A segment of zero length is a no-op and creates no corner.
    pub fn line_to(&mut self, to: Vector) -> StrokeResult {
        let delta = to - self.center;

        if delta.x.is_zero() && delta.y.is_zero() {
            return Ok(());
        }

        let line_length = delta.length();
        let angle = delta.angle();

        if self.first_point {
            // This is the first segment of the subpath; the borders start
            // here.
            self.start_borders(angle, line_length)?;
        } else {
            self.angle_out = angle;
            self.process_corner(line_length)?;
        }

        // Offset the segment into both borders; line endpoints remain
        // movable so the next join can snap them in place.
        let mut offset = Vector::from_polar(self.radius, angle + Angle::PI2);
        for border in &mut self.borders {
            border.line_to(to + offset, true)?;
            offset = -offset;
        }

        self.angle_in = angle;
        self.center = to;
        self.line_length = line_length;

        Ok(())
    }

    /// Adds a conic (quadratic bezier) arc to the current subpath.
    pub fn conic_to(&mut self, control: Vector, to: Vector) -> StrokeResult {
        // Coincident control points are a no-op and keep the current
        // direction.
        if self.center.almost_eq(control) && control.almost_eq(to) {
            self.center = to;
            return Ok(());
        }

        let mut arcs = [Vector::ZERO; CONIC_STACK];
        arcs[0] = to;
        arcs[1] = control;
        arcs[2] = self.center;
        let mut arc = 0;

        let mut first_arc = true;

        loop {
            // Initialize the tangents with the current direction; nearly
            // degenerate arcs keep it.
            let mut angle_in = self.angle_in;
            let mut angle_out = self.angle_in;

            let small = conic_is_small_enough(&arcs[arc..arc + 3], &mut angle_in, &mut angle_out);

            if arc < CONIC_SPLIT_LIMIT && !small {
                if self.first_point {
                    self.angle_in = angle_in;
                }

                conic_split(&mut arcs[arc..arc + 5]);
                arc += 2;
                continue;
            }

            if first_arc {
                first_arc = false;

                if self.first_point {
                    self.start_borders(angle_in, F26Dot6::ZERO)?;
                } else {
                    self.angle_out = angle_in;
                    self.process_corner(F26Dot6::ZERO)?;
                }
            } else if self.angle_in.diff(angle_in).raw() > SMALL_CONIC_THRESHOLD.raw() / 4 {
                // The deviation from one arc to the next is too great;
                // insert a round corner between them.
                self.center = arcs[arc + 2];
                self.angle_out = angle_in;
                self.line_join = LineJoin::Round;

                self.process_corner(F26Dot6::ZERO)?;

                self.line_join = self.line_join_saved;
            }

            // The arc is small enough to be offset directly into each
            // border: the control point moves out along the tangent
            // bisector by the secant distance.
            let theta = angle_in.diff(angle_out).half();
            let phi = angle_in + theta;
            let length = self.radius.div_by(theta.cos());

            // Direction of the source arc, for the reversal check.
            let alpha0 = if self.handle_wide_strokes {
                (arcs[arc] - arcs[arc + 2]).angle()
            } else {
                Angle::ZERO
            };

            for side in 0..2 {
                let rotate = Self::rotation(side);

                let ctrl = arcs[arc + 1] + Vector::from_polar(length, phi + rotate);
                let end = arcs[arc] + Vector::from_polar(self.radius, angle_out + rotate);

                if self.handle_wide_strokes {
                    let start = self.borders[side].last_point();
                    let alpha1 = (end - start).angle();

                    // A border arc running opposite to the source arc means
                    // the offset self-intersects: the border radius exceeds
                    // the radius of curvature.
                    if alpha0.diff(alpha1).raw().abs() > Angle::PI2.raw() {
                        // Find the intersection point with the sine rule
                        // and trace the negative sector backwards.
                        let beta = (arcs[arc + 2] - start).angle();
                        let gamma = (arcs[arc] - end).angle();

                        let blen = (end - start).length();
                        let sin_a = (alpha1 - gamma).sin().abs();
                        let sin_b = (beta - gamma).sin().abs();
                        let alen = blen.mul_div(sin_a, sin_b);

                        let delta = start + Vector::from_polar(alen, beta);

                        let border = &mut self.borders[side];
                        border.movable = false;
                        border.line_to(delta, false)?;
                        border.line_to(end, false)?;
                        border.conic_to(ctrl, start)?;
                        // Then resume forward from the end point.
                        border.line_to(end, false)?;

                        continue;
                    }
                }

                self.borders[side].conic_to(ctrl, end)?;
            }

            self.angle_in = angle_out;

            if arc == 0 {
                break;
            }
            arc -= 2;
        }

        self.center = to;
        self.line_length = F26Dot6::ZERO;

        Ok(())
    }

    /// Adds a cubic bezier arc to the current subpath.
    pub fn cubic_to(&mut self, control1: Vector, control2: Vector, to: Vector) -> StrokeResult {
        if self.center.almost_eq(control1)
            && control1.almost_eq(control2)
            && control2.almost_eq(to)
        {
            self.center = to;
            return Ok(());
        }

        let mut arcs = [Vector::ZERO; CUBIC_STACK];
        arcs[0] = to;
        arcs[1] = control2;
        arcs[2] = control1;
        arcs[3] = self.center;
        let mut arc = 0;

        let mut first_arc = true;

        loop {
            let mut angle_in = self.angle_in;
            let mut angle_mid = self.angle_in;
            let mut angle_out = self.angle_in;

            let small = cubic_is_small_enough(
                &arcs[arc..arc + 4],
                &mut angle_in,
                &mut angle_mid,
                &mut angle_out,
            );

            if arc < CUBIC_SPLIT_LIMIT && !small {
                if self.first_point {
                    self.angle_in = angle_in;
                }

                cubic_split(&mut arcs[arc..arc + 7]);
                arc += 3;
                continue;
            }

            if first_arc {
                first_arc = false;

                if self.first_point {
                    self.start_borders(angle_in, F26Dot6::ZERO)?;
                } else {
                    self.angle_out = angle_in;
                    self.process_corner(F26Dot6::ZERO)?;
                }
            } else if self.angle_in.diff(angle_in).raw() > SMALL_CUBIC_THRESHOLD.raw() / 4 {
                self.center = arcs[arc + 3];
                self.angle_out = angle_in;
                self.line_join = LineJoin::Round;

                self.process_corner(F26Dot6::ZERO)?;

                self.line_join = self.line_join_saved;
            }

            let theta1 = angle_in.diff(angle_mid).half();
            let theta2 = angle_mid.diff(angle_out).half();
            let phi1 = angle_in.mean(angle_mid);
            let phi2 = angle_mid.mean(angle_out);
            let length1 = self.radius.div_by(theta1.cos());
            let length2 = self.radius.div_by(theta2.cos());

            let alpha0 = if self.handle_wide_strokes {
                (arcs[arc] - arcs[arc + 3]).angle()
            } else {
                Angle::ZERO
            };

            for side in 0..2 {
                let rotate = Self::rotation(side);

                let ctrl1 = arcs[arc + 2] + Vector::from_polar(length1, phi1 + rotate);
                let ctrl2 = arcs[arc + 1] + Vector::from_polar(length2, phi2 + rotate);
                let end = arcs[arc] + Vector::from_polar(self.radius, angle_out + rotate);

                if self.handle_wide_strokes {
                    let start = self.borders[side].last_point();
                    let alpha1 = (end - start).angle();

                    if alpha0.diff(alpha1).raw().abs() > Angle::PI2.raw() {
                        let beta = (arcs[arc + 3] - start).angle();
                        let gamma = (arcs[arc] - end).angle();

                        let blen = (end - start).length();
                        let sin_a = (alpha1 - gamma).sin().abs();
                        let sin_b = (beta - gamma).sin().abs();
                        let alen = blen.mul_div(sin_a, sin_b);

                        let delta = start + Vector::from_polar(alen, beta);

                        let border = &mut self.borders[side];
                        border.movable = false;
                        border.line_to(delta, false)?;
                        border.line_to(end, false)?;
                        border.cubic_to(ctrl2, ctrl1, start)?;
                        border.line_to(end, false)?;

                        continue;
                    }
                }

                self.borders[side].cubic_to(ctrl1, ctrl2, end)?;
            }

            self.angle_in = angle_out;

            if arc == 0 {
                break;
            }
            arc -= 3;
        }

        self.center = to;
        self.line_length = F26Dot6::ZERO;

        Ok(())
    }

    /// Ends the current subpath.
    ///
    /// An open subpath is capped at both ends and its two borders are
    /// spliced into a single contour; a closed one processes the seam
    /// corner and closes both borders with opposite windings.
    pub fn end_subpath(&mut self) -> StrokeResult {
        if self.first_point {
            // No segment was recorded; there is nothing to cap or close.
            return Ok(());
        }

        stroke_log!("end subpath (open: {})", self.subpath_open);

        if self.subpath_open {
            self.cap(self.angle_in, 0)?;

            // Add the right border backwards, then cap at the subpath
            // start.
            self.splice_reversed_right()?;

            self.center = self.subpath_start;
            self.cap(self.subpath_angle + Angle::PI, 0)?;

            self.borders[0].close(false);
        } else {
            // Close the path if needed.
            if self.center != self.subpath_start {
                let start = self.subpath_start;
                self.line_to(start)?;
            }

            // Process the corner at the seam.
            self.angle_out = self.subpath_angle;
            let turn = self.angle_in.diff(self.angle_out);

            if turn.raw() != 0 {
                let inside_side = (turn.raw() < 0) as usize;

                self.inside_corner(inside_side, self.subpath_line_length)?;
                self.outside_corner(1 - inside_side, self.subpath_line_length)?;
            }

            self.borders[0].close(false);
            self.borders[1].close(true);
        }

        Ok(())
    }

    /// Point and contour totals of one border, validating it for export.
    pub fn border_counts(&mut self, side: Side) -> Result<(usize, usize), StrokeError> {
        self.borders[side as usize].counts()
    }

    /// Point and contour totals of both borders, validating them for
    /// export.
    pub fn counts(&mut self) -> Result<(usize, usize), StrokeError> {
        let (points0, contours0) = self.borders[0].counts()?;
        let (points1, contours1) = self.borders[1].counts()?;

        Ok((points0 + points1, contours0 + contours1))
    }

    /// Appends one border to `outline`.
    ///
    /// The border must have been validated by a successful
    /// [`border_counts`](Stroker::border_counts) (or
    /// [`counts`](Stroker::counts)) call since the last rewind.
    pub fn export_border(&self, side: Side, outline: &mut Outline) -> StrokeResult {
        let border = &self.borders[side as usize];

        if !border.valid {
            return Err(StrokeError::InvalidArgument);
        }

        // Contour end indices are 16 bits in an outline.
        if outline.num_points() + border.num_points() > u16::MAX as usize + 1 {
            return Err(StrokeError::InvalidArgument);
        }

        border.export(outline);

        Ok(())
    }

    /// Appends both borders to `outline`.
    pub fn export(&self, outline: &mut Outline) -> StrokeResult {
        self.export_border(Side::Left, outline)?;
        self.export_border(Side::Right, outline)
    }

    /// Replays a whole outline through the stroker.
    ///
    /// Off-curve points follow the usual conventions: consecutive conic
    /// controls imply an on point at their midpoint, a contour may start
    /// on a conic control, and cubic controls come in pairs. `opened`
    /// strokes every contour as an open path instead of a closed loop.
    pub fn parse_outline(&mut self, outline: &Outline, opened: bool) -> StrokeResult {
        self.rewind();

        let points = outline.points();
        let tags = outline.tags();

        let mut first = 0usize;

        for n in 0..outline.num_contours() {
            let last = outline.contours()[n] as usize;

            // Unordered contour ends cannot be interpreted.
            if last < first || last >= points.len() {
                return Err(StrokeError::InvalidOutline);
            }

            // A single point is not stroked.
            if last == first {
                first = last + 1;
                continue;
            }

            let mut v_start = points[first];
            let v_last = points[last];

            let mut cursor = first as isize;
            let mut limit = last as isize;

            // A contour cannot start with a cubic control point.
            if tags[first] == PointTag::Cubic {
                return Err(StrokeError::InvalidOutline);
            }

            if tags[first] == PointTag::Conic {
                // Start at the last point if it is on curve, else at the
                // midpoint of the first and last points (both conic).
                if tags[last] == PointTag::On {
                    v_start = v_last;
                    limit -= 1;
                } else {
                    v_start = midpoint(v_start, v_last);
                }

                cursor -= 1;
            }

            self.begin_subpath(v_start, opened)?;

            'contour: while cursor < limit {
                cursor += 1;
                let index = cursor as usize;

                match tags[index] {
                    PointTag::On => {
                        self.line_to(points[index])?;
                    }
                    PointTag::Conic => {
                        let mut v_control = points[index];

                        loop {
                            if cursor >= limit {
                                // The contour ends on a conic control and
                                // wraps back to its start point.
                                self.conic_to(v_control, v_start)?;
                                break 'contour;
                            }

                            cursor += 1;
                            let index = cursor as usize;
                            let vec = points[index];

                            match tags[index] {
                                PointTag::On => {
                                    self.conic_to(v_control, vec)?;
                                    break;
                                }
                                PointTag::Conic => {
                                    // Two consecutive conic controls imply
                                    // an on point at their midpoint.
                                    let v_middle = midpoint(v_control, vec);

                                    self.conic_to(v_control, v_middle)?;
                                    v_control = vec;
                                }
                                PointTag::Cubic => {
                                    return Err(StrokeError::InvalidOutline);
                                }
                            }
                        }
                    }
                    PointTag::Cubic => {
                        // Cubic controls come in pairs, followed by an on
                        // point (or the contour start).
                        if cursor + 1 > limit || tags[index + 1] != PointTag::Cubic {
                            return Err(StrokeError::InvalidOutline);
                        }

                        cursor += 2;

                        let ctrl1 = points[index];
                        let ctrl2 = points[index + 1];

                        if cursor <= limit {
                            self.cubic_to(ctrl1, ctrl2, points[cursor as usize])?;
                        } else {
                            self.cubic_to(ctrl1, ctrl2, v_start)?;
                            break 'contour;
                        }
                    }
                }
            }

            // Don't end the subpath if no segments were generated.
            if !self.first_point {
                self.end_subpath()?;
            }

            first = last + 1;
        }

        Ok(())
    }
}

impl Default for Stroker {
    fn default() -> Self {
        Stroker::new()
    }
}

#[inline]
fn midpoint(a: Vector, b: Vector) -> Vector {
    vector(
        F26Dot6::from_raw((a.x.raw() + b.x.raw()) / 2),
        F26Dot6::from_raw((a.y.raw() + b.y.raw()) / 2),
    )
}

/// De Casteljau halving of the conic in `base[0..3]`, in place. The half
/// nearest the arc's source start lands in `base[2..5]`, so it is
/// processed first (points are stored end first).
fn conic_split(base: &mut [Vector]) {
    let x = split_conic_axis([base[0].x.raw(), base[1].x.raw(), base[2].x.raw()]);
    let y = split_conic_axis([base[0].y.raw(), base[1].y.raw(), base[2].y.raw()]);

    for i in 0..5 {
        base[i] = vector(F26Dot6::from_raw(x[i]), F26Dot6::from_raw(y[i]));
    }
}

fn split_conic_axis(c: [i32; 3]) -> [i32; 5] {
    let a = c[0] + c[1];
    let b = c[1] + c[2];

    [c[0], a >> 1, (a + b) >> 2, b >> 1, c[2]]
}

/// Same halving for the cubic in `base[0..4]`; the start-side half lands
/// in `base[3..7]`.
fn cubic_split(base: &mut [Vector]) {
    let x = split_cubic_axis([
        base[0].x.raw(),
        base[1].x.raw(),
        base[2].x.raw(),
        base[3].x.raw(),
    ]);
    let y = split_cubic_axis([
        base[0].y.raw(),
        base[1].y.raw(),
        base[2].y.raw(),
        base[3].y.raw(),
    ]);

    for i in 0..7 {
        base[i] = vector(F26Dot6::from_raw(x[i]), F26Dot6::from_raw(y[i]));
    }
}

fn split_cubic_axis(c: [i32; 4]) -> [i32; 7] {
    let a = c[0] + c[1];
    let b = c[1] + c[2];
    let d = c[2] + c[3];

    [
        c[0],
        a >> 1,
        (a + b) >> 2,
        (a + b + b + d) >> 3,
        (b + d) >> 2,
        d >> 1,
        c[3],
    ]
}

/// Whether the conic's tangents deviate little enough to offset it
/// directly. The entry/exit tangent angles are written to `angle_in` and
/// `angle_out`; near-coincident control points collapse to a single
/// direction (or keep the incoming values for a point-like arc).
fn conic_is_small_enough(base: &[Vector], angle_in: &mut Angle, angle_out: &mut Angle) -> bool {
    let d1 = base[1] - base[2];
    let d2 = base[0] - base[1];

    let close1 = d1.x.is_small() && d1.y.is_small();
    let close2 = d2.x.is_small() && d2.y.is_small();

    if close1 {
        if close2 {
            // Basically a point; keep the original direction.
        } else {
            *angle_in = d2.angle();
            *angle_out = *angle_in;
        }
    } else if close2 {
        *angle_in = d1.angle();
        *angle_out = *angle_in;
    } else {
        *angle_in = d1.angle();
        *angle_out = d2.angle();
    }

    let theta = angle_in.diff(*angle_out).abs();

    theta.raw() < SMALL_CONIC_THRESHOLD.raw()
}

/// Cubic version of [`conic_is_small_enough`], with a middle tangent.
fn cubic_is_small_enough(
    base: &[Vector],
    angle_in: &mut Angle,
    angle_mid: &mut Angle,
    angle_out: &mut Angle,
) -> bool {
    let d1 = base[2] - base[3];
    let d2 = base[1] - base[2];
    let d3 = base[0] - base[1];

    let close1 = d1.x.is_small() && d1.y.is_small();
    let close2 = d2.x.is_small() && d2.y.is_small();
    let close3 = d3.x.is_small() && d3.y.is_small();

    if close1 {
        if close2 {
            if close3 {
                // Basically a point; keep the original direction.
            } else {
                *angle_in = d3.angle();
                *angle_mid = *angle_in;
                *angle_out = *angle_in;
            }
        } else if close3 {
            *angle_in = d2.angle();
            *angle_mid = *angle_in;
            *angle_out = *angle_in;
        } else {
            *angle_in = d2.angle();
            *angle_mid = *angle_in;
            *angle_out = d3.angle();
        }
    } else if close2 {
        if close3 {
            *angle_in = d1.angle();
            *angle_mid = *angle_in;
            *angle_out = *angle_in;
        } else {
            *angle_in = d1.angle();
            *angle_out = d3.angle();
            *angle_mid = angle_in.mean(*angle_out);
        }
    } else if close3 {
        *angle_in = d1.angle();
        *angle_mid = d2.angle();
        *angle_out = *angle_mid;
    } else {
        *angle_in = d1.angle();
        *angle_mid = d2.angle();
        *angle_out = d3.angle();
    }

    let theta1 = angle_in.diff(*angle_mid).abs();
    let theta2 = angle_mid.diff(*angle_out).abs();

    theta1.raw() < SMALL_CUBIC_THRESHOLD.raw() && theta2.raw() < SMALL_CUBIC_THRESHOLD.raw()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32) -> Vector {
        Vector::from_i32(x, y)
    }

    #[test]
    fn conic_split_halves() {
        assert_eq!(split_conic_axis([0, 50, 100]), [0, 25, 50, 75, 100]);
        // Truncating shifts, as in the rasterizer's subdivision.
        assert_eq!(split_conic_axis([1, 2, 2]), [1, 1, 1, 2, 2]);
    }

    #[test]
    fn cubic_split_halves() {
        assert_eq!(split_cubic_axis([0, 30, 60, 90]), [0, 15, 30, 45, 60, 75, 90]);
    }

    #[test]
    fn conic_flatness() {
        let mut angle_in = Angle::ZERO;
        let mut angle_out = Angle::ZERO;

        // A flat arc is small enough and reports its single direction.
        let base = [v(100, 0), v(50, 0), v(0, 0)];
        assert!(conic_is_small_enough(&base, &mut angle_in, &mut angle_out));
        assert_eq!(angle_in, Angle::ZERO);
        assert_eq!(angle_out, Angle::ZERO);

        // A right-angle turn is not.
        let base = [v(100, 100), v(100, 0), v(0, 0)];
        assert!(!conic_is_small_enough(&base, &mut angle_in, &mut angle_out));

        // A point-like arc keeps the incoming direction untouched.
        let mut angle_in = Angle::PI4;
        let mut angle_out = Angle::PI4;
        let base = [v(0, 0), v(0, 0), v(0, 0)];
        assert!(conic_is_small_enough(&base, &mut angle_in, &mut angle_out));
        assert_eq!(angle_in, Angle::PI4);
        assert_eq!(angle_out, Angle::PI4);
    }

    #[test]
    fn cubic_flatness() {
        let mut angle_in = Angle::ZERO;
        let mut angle_mid = Angle::ZERO;
        let mut angle_out = Angle::ZERO;

        let base = [v(90, 0), v(60, 0), v(30, 0), v(0, 0)];
        assert!(cubic_is_small_enough(
            &base,
            &mut angle_in,
            &mut angle_mid,
            &mut angle_out
        ));

        let base = [v(100, 100), v(100, 50), v(50, 0), v(0, 0)];
        assert!(!cubic_is_small_enough(
            &base,
            &mut angle_in,
            &mut angle_mid,
            &mut angle_out
        ));
    }
}
