// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! Stroke-to-fill conversion.
//!
//! A stroked path is rewritten as a filled path made of quads, triangles,
//! round wedges and concentric arc slabs, one shape per segment body, join
//! and cap. Every shape is wound consistently so the result tessellates
//! correctly under the non-zero rule.

use arrayvec::ArrayVec;
use kurbo::{Cap, Join, Point, Stroke, Vec2};

use crate::flatten::{quad_is_line, split_cubic, DEFAULT_ANTI_ALIAS, SUBDIVISION_DEPTH};
use crate::geometry::perpendicular;
use crate::path::{ArcElement, PathData, PathElement};

/// Scale `v`'s perpendicular to the given length; zero for zero vectors.
fn scaled_normal(v: Vec2, length: f64) -> Vec2 {
    let normal = perpendicular(v);
    let norm_length = normal.length();
    if norm_length == 0.0 {
        return Vec2::ZERO;
    }
    (length / norm_length) * normal
}

/// How the direction changes from one line to the next at a joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Turn {
    Same,
    Reverse,
    Positive,
    Negative,
}

/// Cached per-segment stroking attributes: the direction, the half-width
/// offset and the four corners of the segment's body quad.
#[derive(Clone, Copy, Debug, Default)]
struct LineAttributes {
    location: Point,
    vector: Vec2,
    unit: Vec2,
    length: f64,
    /// Half-width step along the direction of travel; the body corners are
    /// offset by its perpendicular.
    offset: Vec2,
    start_top: Point,
    start_bottom: Point,
    end_top: Point,
    end_bottom: Point,
}

impl LineAttributes {
    fn set(&mut self, from: Point, to: Point, half_width: f64) {
        self.location = from;
        self.vector = to - from;

        if self.vector.x == 0.0 && self.vector.y == 0.0 {
            self.length = 0.0;
            return;
        }

        self.length = self.vector.length();
        self.unit = self.vector / self.length;
        self.offset = half_width * self.unit;

        let normal = perpendicular(self.offset);
        self.start_top = from + normal;
        self.start_bottom = from - normal;
        self.end_top = to + normal;
        self.end_bottom = to - normal;
    }

    fn turn_towards(&self, other: &LineAttributes) -> Turn {
        let direction = self.unit.cross(other.unit);
        if direction > 0.0 {
            return Turn::Positive;
        }
        if direction < 0.0 {
            return Turn::Negative;
        }
        if self.unit.x + other.unit.x == 0.0 && self.unit.y + other.unit.y == 0.0 {
            return Turn::Reverse;
        }
        Turn::Same
    }
}

/// Converts a stroked path into a fillable one.
///
/// Three attribute slots are kept: the subpath's opening segment (for the
/// closing join), the previous segment and the segment being processed; the
/// latter two swap roles after each accepted segment.
pub struct StrokeBuilder {
    lines: [LineAttributes; 3],
    last: usize,
    current: usize,
    has_shape_first_line: bool,

    half_width: f64,
    miter_limit_squared: f64,
    join: Join,
    cap: Cap,
    tolerance: f64,

    path: PathData,
}

const SHAPE_FIRST: usize = 0;

impl StrokeBuilder {
    pub fn new(style: &Stroke) -> Self {
        StrokeBuilder {
            lines: [LineAttributes::default(); 3],
            last: 1,
            current: 2,
            has_shape_first_line: false,
            half_width: style.width / 2.0,
            miter_limit_squared: style.miter_limit * style.miter_limit,
            join: style.join,
            cap: style.start_cap,
            tolerance: 1.0 / DEFAULT_ANTI_ALIAS as f64,
            path: PathData::new(),
        }
    }

    /// Walk `path` and return the stroke outline as a filled path built from
    /// MoveTo / LineTo / Arc / Close elements only.
    pub fn build(mut self, path: &PathData) -> PathData {
        let mut from = Point::ZERO;
        for element in path.elements() {
            let to = element.to();
            match element {
                PathElement::MoveTo { .. } => self.move_to_shape(to),
                PathElement::LineTo { .. } => self.line_shape(from, to),
                PathElement::Close { .. } => self.close_subpath_shape(from, to),
                PathElement::QuadTo { control, .. } => self.quad_shape(from, *control, to),
                PathElement::CurveTo {
                    control1, control2, ..
                } => self.curve_shape(from, *control1, *control2, to),
                PathElement::Arc(arc) => self.arc_shape(from, arc),
            }
            from = to;
        }
        self.cap_shape_if_needed();
        self.path
    }

    fn advance(&mut self) {
        std::mem::swap(&mut self.last, &mut self.current);
    }

    fn move_to_shape(&mut self, to: Point) {
        self.cap_shape_if_needed();
        self.lines[SHAPE_FIRST].set(to, to, self.half_width);
        self.lines[self.current].set(to, to, self.half_width);
        self.lines[self.last].set(to, to, self.half_width);
        self.has_shape_first_line = false;
    }

    fn line_shape(&mut self, start: Point, to: Point) {
        if start == to {
            return;
        }

        self.lines[self.current].set(start, to, self.half_width);
        if !self.has_shape_first_line {
            self.lines[SHAPE_FIRST].set(start, to, self.half_width);
            self.has_shape_first_line = true;
        } else {
            let (last, current) = (self.lines[self.last], self.lines[self.current]);
            self.add_join_shape(&last, &current);
        }

        let current = self.lines[self.current];
        self.add_quad_shape(
            current.start_top,
            current.start_bottom,
            current.end_bottom,
            current.end_top,
        );

        self.advance();
    }

    fn close_subpath_shape(&mut self, start: Point, to: Point) {
        if !self.has_shape_first_line || start == to {
            return;
        }

        self.lines[self.current].set(start, to, self.half_width);
        let (last, current, first) = (
            self.lines[self.last],
            self.lines[self.current],
            self.lines[SHAPE_FIRST],
        );
        self.add_join_shape(&last, &current);
        self.add_join_shape(&current, &first);

        self.add_quad_shape(
            current.start_top,
            current.start_bottom,
            current.end_bottom,
            current.end_top,
        );

        self.has_shape_first_line = false;
    }

    fn quad_shape(&mut self, start: Point, control: Point, to: Point) {
        // Degree elevation; the cubic handling covers the rest.
        let two_thirds = 2.0 / 3.0;
        let control1 = start + two_thirds * (control - start);
        let control2 = to + two_thirds * (control - to);
        self.curve_shape(start, control1, control2, to);
    }

    fn curve_shape(&mut self, start: Point, control1: Point, control2: Point, end: Point) {
        // Pick the tangent targets past any coincident control points.
        let mut to = control1;
        let mut from = control2;
        if control1 == start {
            if control1 == control2 {
                if control1 == end {
                    return;
                }
                to = end;
            } else {
                to = control2;
            }
        }
        if control2 == end {
            if control2 == control1 {
                from = start;
            } else {
                from = control1;
            }
        }

        // The start tangent participates in the join or records the subpath
        // opening direction.
        self.lines[self.current].set(start, to, self.half_width);
        if !self.has_shape_first_line {
            self.lines[SHAPE_FIRST].set(start, to, self.half_width);
            self.has_shape_first_line = true;
        } else {
            let (last, current) = (self.lines[self.last], self.lines[self.current]);
            self.add_join_shape(&last, &current);
        }

        // The end tangent is what the next join sees.
        self.lines[self.current].set(from, end, self.half_width);
        self.advance();

        self.offset_curve_shape(start, control1, control2, end);
    }

    /// Emit the two offset ("evolute" and "involute") sides of a cubic as
    /// pairs of quads, subdividing until both offsets pass the flatness test.
    fn offset_curve_shape(&mut self, start: Point, control1: Point, control2: Point, end: Point) {
        let mut stack: ArrayVec<[Point; 4], SUBDIVISION_DEPTH> = ArrayVec::new();
        stack.push([start, control1, control2, end]);

        while let Some(curve) = stack.pop() {
            let points = split_cubic(&curve);
            let p = |k: usize| points[k];

            let start_normal = if p(0) != p(1) {
                scaled_normal(p(1) - p(0), self.half_width)
            } else if p(0) != p(2) {
                scaled_normal(p(2) - p(0), self.half_width)
            } else {
                scaled_normal(p(3) - p(0), self.half_width)
            };

            let half_normal = if p(3) != p(4) {
                scaled_normal(p(4) - p(3), self.half_width)
            } else if p(3) != p(5) {
                scaled_normal(p(5) - p(3), self.half_width)
            } else {
                scaled_normal(p(6) - p(3), self.half_width)
            };

            let end_normal = if p(6) != p(5) {
                scaled_normal(p(6) - p(5), self.half_width)
            } else if p(6) != p(4) {
                scaled_normal(p(6) - p(4), self.half_width)
            } else {
                scaled_normal(p(6) - p(3), self.half_width)
            };

            let involute_start = p(0) - start_normal;
            let involute_half = p(3) - half_normal;
            let involute_end = p(6) - end_normal;

            if p(2) == p(3) && p(3) == p(4) {
                // A cusp; round it out as the limit of infinite curvature.
                let half_vec = scaled_normal(p(3) - p(1), self.half_width);
                let miter = p(3) + perpendicular(-half_vec);
                self.add_round_shape(p(3), p(3) + half_vec, miter + half_vec, miter);
                self.add_round_shape(p(3), miter, miter - half_vec, p(3) - half_vec);
            } else if (p(6) - p(0)).hypot2() < self.tolerance
                && (p(5) - p(0)).hypot2() < self.tolerance
                && (p(1) - p(0)).hypot2() < self.tolerance
            {
                // Vanishing sub-curve with a usable tangent: full round cap.
                let miter = p(0) + perpendicular(-start_normal);
                self.add_round_shape(p(0), p(0) + start_normal, miter + start_normal, miter);
                self.add_round_shape(p(0), miter, miter - start_normal, p(0) - start_normal);
                continue;
            }

            if quad_is_line(involute_start, involute_half, involute_end, self.tolerance) {
                let evolute_start = p(0) + start_normal;
                let evolute_half = p(3) + half_normal;
                let evolute_end = p(6) + end_normal;

                if quad_is_line(evolute_start, evolute_half, evolute_end, self.tolerance) {
                    self.add_quad_shape(evolute_start, involute_start, involute_half, evolute_half);
                    self.add_quad_shape(evolute_half, involute_half, involute_end, evolute_end);
                    continue;
                }
            }

            let first_half = [points[0], points[1], points[2], points[3]];
            let second_half = [points[3], points[4], points[5], points[6]];

            if stack.remaining_capacity() < 2 {
                // This recursive code path is rarely executed.
                self.offset_curve_shape(
                    second_half[0],
                    second_half[1],
                    second_half[2],
                    second_half[3],
                );
                stack.push(first_half);
            } else {
                stack.push(first_half);
                stack.push(second_half);
            }
        }
    }

    fn arc_shape(&mut self, start: Point, arc: &ArcElement) {
        let center = arc.center;
        let end = arc.to;
        let direction = if arc.counter_clockwise { 1.0 } else { -1.0 };
        let start_tangent =
            direction * Vec2::new(arc.start_angle.sin(), -arc.start_angle.cos());

        // The incoming tangent participates in the join or opens the shape.
        self.lines[self.current].set(start, start + start_tangent, self.half_width);
        if !self.has_shape_first_line {
            self.lines[SHAPE_FIRST].set(start, start + start_tangent, self.half_width);
            self.has_shape_first_line = true;
        } else {
            let (last, current) = (self.lines[self.last], self.lines[self.current]);
            self.add_join_shape(&last, &current);
        }

        // Connector from the current point to the arc's start point.
        self.line_shape(start, arc.start_point());
        let (last, current) = (self.lines[self.last], self.lines[self.current]);
        self.add_join_shape(&last, &current);

        // The outgoing tangent is what the next join sees.
        let end_tangent = direction * Vec2::new(arc.end_angle.sin(), -arc.end_angle.cos());
        self.lines[self.current].set(end - end_tangent, end, self.half_width);

        // The stroked arc body is a slab between two concentric arcs.
        let first_radii = arc.radii + direction * Vec2::new(self.half_width, self.half_width);
        let second_radii = arc.radii - direction * Vec2::new(self.half_width, self.half_width);
        let slab_start = center
            + Vec2::new(
                first_radii.x * arc.start_angle.cos(),
                first_radii.y * arc.start_angle.sin(),
            );
        let slab_end = center
            + Vec2::new(
                second_radii.x * arc.end_angle.cos(),
                second_radii.y * arc.end_angle.sin(),
            );

        self.path.move_to(slab_start);
        self.path.arc(
            center,
            first_radii,
            arc.start_angle,
            arc.end_angle,
            arc.counter_clockwise,
        );
        self.path.line_to(slab_end);
        self.path.arc(
            center,
            second_radii,
            arc.end_angle,
            arc.start_angle,
            !arc.counter_clockwise,
        );
        self.path.close_subpath();

        self.advance();
    }

    fn cap_shape_if_needed(&mut self) {
        if self.has_shape_first_line {
            self.add_cap_shape(self.cap, false);
        }
    }

    fn add_cap_shape(&mut self, cap: Cap, intermediate: bool) {
        if matches!(cap, Cap::Butt) {
            return;
        }

        let first = self.lines[SHAPE_FIRST];
        let last = self.lines[self.last];

        let start_top_margin = first.start_top - first.offset;
        let start_bottom_margin = first.start_bottom - first.offset;
        let end_top_margin = last.end_top + last.offset;
        let end_bottom_margin = last.end_bottom + last.offset;

        if matches!(cap, Cap::Square) {
            if first.length != 0.0 {
                self.add_quad_shape(
                    first.start_bottom,
                    start_bottom_margin,
                    start_top_margin,
                    first.start_top,
                );
            }
            if last.length != 0.0 {
                self.add_quad_shape(last.end_top, end_top_margin, end_bottom_margin, last.end_bottom);
            }
            return;
        }

        debug_assert!(matches!(cap, Cap::Round));

        // An intermediate cap only rounds the end that has extent.
        if !intermediate || first.length != 0.0 {
            let miter = start_top_margin.midpoint(start_bottom_margin);
            self.add_round_shape(first.location, first.start_bottom, start_bottom_margin, miter);
            self.add_round_shape(first.location, miter, start_top_margin, first.start_top);
        }

        if last.length != 0.0 {
            let end_location = last.location + last.vector;
            let miter = end_top_margin.midpoint(end_bottom_margin);
            self.add_round_shape(end_location, last.end_top, end_top_margin, miter);
            self.add_round_shape(end_location, miter, end_bottom_margin, last.end_bottom);
        }
    }

    /// Half-width over `sin(phi / 2)` along the angle bisector.
    fn miter_vector(&self, u1: Vec2, u2: Vec2) -> Vec2 {
        let miter_direction = u1 + u2;
        let direction_length = miter_direction.length();
        debug_assert!(direction_length > 0.0 && direction_length < 2.0);

        // 2 * sin^2(phi / 2) = 1 - cos(phi), and cos(phi) is the dot of the
        // unit vectors.
        let length = self.half_width / ((1.0 - u1.dot(u2)) * 0.5).sqrt();
        (length / direction_length) * miter_direction
    }

    fn add_join_shape(&mut self, from_line: &LineAttributes, to_line: &LineAttributes) {
        if from_line.length == 0.0 || to_line.length == 0.0 {
            return;
        }

        let turn = from_line.turn_towards(to_line);
        if turn == Turn::Same {
            return;
        }

        if matches!(self.join, Join::Round) {
            let unit_from = from_line.unit;
            let unit_to = -to_line.unit;

            if turn == Turn::Reverse {
                self.add_cap_shape(Cap::Round, true);
                return;
            }

            let miter_point = to_line.location + self.miter_vector(unit_from, unit_to);
            if turn == Turn::Negative {
                self.add_round_shape(
                    to_line.location,
                    from_line.end_bottom,
                    miter_point,
                    to_line.start_bottom,
                );
                return;
            }
            self.add_round_shape(
                to_line.location,
                to_line.start_top,
                miter_point,
                from_line.end_top,
            );
            return;
        }

        if turn == Turn::Reverse {
            return;
        }

        if matches!(self.join, Join::Miter) {
            let unit_from = from_line.unit;
            let unit_to = -to_line.unit;

            // Accept the miter iff limit^2 * (1 - cos(phi)) >= 2.
            if self.miter_limit_squared * (1.0 - unit_from.dot(unit_to)) >= 2.0 {
                let miter_point = to_line.location + self.miter_vector(unit_from, unit_to);

                if turn == Turn::Negative {
                    self.add_quad_shape(
                        to_line.location,
                        from_line.end_bottom,
                        miter_point,
                        to_line.start_bottom,
                    );
                } else {
                    self.add_quad_shape(
                        to_line.location,
                        to_line.start_top,
                        miter_point,
                        from_line.end_top,
                    );
                }
                return;
            }
        }

        // Bevel, and the miter fallback.
        if turn == Turn::Negative {
            self.add_triangle_shape(to_line.location, from_line.end_bottom, to_line.start_bottom);
        } else {
            self.add_triangle_shape(to_line.location, from_line.end_top, to_line.start_top);
        }
    }

    fn add_signed_triangle(&mut self, p0: Point, p1: Point, p2: Point, cross: f64) {
        if cross == 0.0 {
            return;
        }

        self.path.move_to(p0);
        if cross > 0.0 {
            self.path.line_to(p1);
            self.path.line_to(p2);
        } else {
            self.path.line_to(p2);
            self.path.line_to(p1);
        }
        self.path.close_subpath();
    }

    fn add_triangle_shape(&mut self, p0: Point, p1: Point, p2: Point) {
        let cross = (p1 - p0).cross(p2 - p0);
        self.add_signed_triangle(p0, p1, p2, -cross);
    }

    /// Emit a quad, decomposing into triangles around the intersection when
    /// the corner order self-intersects.
    fn add_quad_shape(&mut self, p0: Point, p1: Point, p2: Point, p3: Point) {
        let p1p0 = p1 - p0;
        let p2p0 = p2 - p0;
        let p3p0 = p3 - p0;

        // The most frequent case first: the diagonal p0-p2 separates p1 and
        // p3, so the two triangles tile the quad.
        let p2p0_x_p1p0 = p2p0.cross(p1p0);
        let p2p0_x_p3p0 = p2p0.cross(p3p0);

        if p2p0_x_p1p0 * p2p0_x_p3p0 < 0.0 {
            self.add_signed_triangle(p0, p1, p2, p2p0_x_p1p0);
            self.add_signed_triangle(p0, p3, p2, p2p0_x_p3p0);
            return;
        }

        let p3p1 = p3 - p1;
        let p2p1 = p2 - p1;
        let p3p1_x_p0p1 = p3p1.cross(-p1p0);
        let p3p1_x_p2p1 = p3p1.cross(p2p1);

        if p3p1_x_p0p1 * p3p1_x_p2p1 < 0.0 {
            self.add_signed_triangle(p1, p0, p3, p3p1_x_p0p1);
            self.add_signed_triangle(p1, p2, p3, p3p1_x_p2p1);
            return;
        }

        // Self-intersecting corner order; solve for the crossing point of
        // the two offending sides and re-triangulate around it.
        let p1p0_x_p2p0 = -p2p0_x_p1p0;
        let p1p0_x_p3p0 = p1p0.cross(p3p0);

        if p1p0_x_p2p0 * p1p0_x_p3p0 < 0.0 {
            let mut intersection = Point::ZERO;
            if p3.y - p2.y != 0.0 {
                let m = (p3.x - p2.x) / (p3.y - p2.y);
                let k1 =
                    (m * (p2.y - p0.y) - p2.x + p0.x) / (m * (p1.y - p0.y) - p1.x + p0.x);
                intersection = p0 + k1 * p1p0;
            } else if p0.y - p1.y != 0.0 {
                let m = (p0.x - p1.x) / (p0.y - p1.y);
                let k2 = (m * (p1.y - p3.y) - p1.x + p3.x) / (-p2.x + p3.x);
                intersection = p3 + k2 * (p2 - p3);
            }
            self.add_signed_triangle(intersection, p2, p1, p1p0_x_p2p0);
            self.add_signed_triangle(p0, p3, intersection, p1p0_x_p3p0);
            return;
        }

        let mut intersection = Point::ZERO;
        if p2.y - p1.y != 0.0 {
            let m = (p2.x - p1.x) / (p2.y - p1.y);
            let k1 = (m * (p1.y - p0.y) - p1.x + p0.x) / (m * (p3.y - p0.y) - p3.x + p0.x);
            intersection = p0 + k1 * p3p0;
        } else if p3.y - p0.y != 0.0 {
            let m = (p2.x - p1.x) / (p3.y - p0.y);
            let k2 = (m * (p0.y - p1.y) - p0.x + p1.x) / (-p2.x + p1.x);
            intersection = p1 + k2 * p2p1;
        }
        self.add_signed_triangle(p0, p1, intersection, p3p0.cross(p1p0));
        self.add_signed_triangle(intersection, p2, p3, -p2p0_x_p3p0);
    }

    /// Emit a filled circular wedge from `from` to `to` around `location`,
    /// bulging through the tangent intersection `miter`.
    fn add_round_shape(&mut self, location: Point, from: Point, miter: Point, to: Point) {
        if from == to || location == from || location == to {
            return;
        }

        let cross = (from - location).cross(to - location);

        self.path.move_to(location);
        if cross < 0.0 {
            self.path.line_to(from);
            self.path.arc_to(miter, to, self.half_width);
        } else {
            self.path.line_to(to);
            self.path.arc_to(miter, from, self.half_width);
        }
        self.path.close_subpath();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn stroke_elements(path: &PathData, style: &Stroke) -> Vec<PathElement> {
        StrokeBuilder::new(style)
            .build(path)
            .elements()
            .copied()
            .collect()
    }

    #[test]
    fn output_contains_only_fillable_primitives() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.line_to(p(40.0, 10.0));
        path.quad_to(p(60.0, 40.0), p(80.0, 10.0));
        path.close_subpath();

        let style = Stroke::new(6.0).with_caps(Cap::Round).with_join(Join::Round);
        for element in stroke_elements(&path, &style) {
            assert!(matches!(
                element,
                PathElement::MoveTo { .. }
                    | PathElement::LineTo { .. }
                    | PathElement::Arc(_)
                    | PathElement::Close { .. }
            ));
        }
    }

    #[test]
    fn empty_and_degenerate_paths_produce_nothing() {
        let style = Stroke::new(4.0).with_caps(Cap::Butt).with_join(Join::Miter);

        let empty = PathData::new();
        assert!(StrokeBuilder::new(&style).build(&empty).is_empty());

        let mut degenerate = PathData::new();
        degenerate.move_to(p(5.0, 5.0));
        assert!(StrokeBuilder::new(&style).build(&degenerate).is_empty());
    }

    #[test]
    fn single_line_butt_emits_body_only() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.line_to(p(10.0, 0.0));

        let style = Stroke::new(4.0).with_caps(Cap::Butt).with_join(Join::Miter);
        let elements = stroke_elements(&path, &style);

        // One body quad, triangulated: two MoveTo..Close fans.
        assert_eq!(elements.len(), 8);
        assert!(elements[0].is_move_to());
        assert_eq!(elements.iter().filter(|el| el.is_close()).count(), 2);

        // The body covers the half-width on both sides.
        let ys: Vec<f64> = elements.iter().map(|el| el.to().y).collect();
        assert!(ys.iter().any(|&y| y == 2.0));
        assert!(ys.iter().any(|&y| y == -2.0));
    }

    #[test]
    fn round_caps_add_arc_elements() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.line_to(p(10.0, 0.0));

        let style = Stroke::new(4.0).with_caps(Cap::Round).with_join(Join::Miter);
        let elements = stroke_elements(&path, &style);
        let arcs = elements
            .iter()
            .filter(|el| matches!(el, PathElement::Arc(_)))
            .count();
        assert_eq!(arcs, 4);
    }

    #[test]
    fn stroking_an_arc_emits_concentric_slab() {
        let mut path = PathData::new();
        path.move_to(p(30.0, 20.0));
        path.arc(
            p(20.0, 20.0),
            Vec2::new(10.0, 10.0),
            0.0,
            std::f64::consts::PI,
            false,
        );

        let style = Stroke::new(2.0).with_caps(Cap::Butt).with_join(Join::Miter);
        let elements = stroke_elements(&path, &style);
        let radii: Vec<Vec2> = elements
            .iter()
            .filter_map(|el| match el {
                PathElement::Arc(arc) => Some(arc.radii),
                _ => None,
            })
            .collect();
        assert_eq!(radii.len(), 2);
        assert!(radii.contains(&Vec2::new(9.0, 9.0)));
        assert!(radii.contains(&Vec2::new(11.0, 11.0)));
    }

    #[test]
    fn parallel_continuation_emits_no_join() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.line_to(p(5.0, 0.0));
        path.line_to(p(10.0, 0.0));

        let style = Stroke::new(2.0).with_caps(Cap::Butt).with_join(Join::Miter);
        let elements = stroke_elements(&path, &style);
        // Two body quads (two triangles each) and no join geometry.
        let moves = elements.iter().filter(|el| el.is_move_to()).count();
        assert_eq!(moves, 4);
        assert!(elements
            .iter()
            .all(|el| !matches!(el, PathElement::Arc(_))));
    }
}
