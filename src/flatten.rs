// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! Curve flattening and segment preparation.
//!
//! Paths are reduced to line segments in an enlarged coordinate system where
//! y is scaled by the anti-alias factor and floored to an integer. Segments
//! are then split at every y boundary and at every pairwise intersection so
//! that the tessellator can walk them as a sorted list of slab-aligned edges.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use arrayvec::ArrayVec;
use kurbo::{Point, Vec2};
use log::trace;

use crate::geometry::BoundingBox;
use crate::path::ArcElement;

/// Default y oversampling factor.
pub const DEFAULT_ANTI_ALIAS: u32 = 16;

/// Orientation of the original edge before endpoint normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Negative,
    Zero,
    Positive,
}

impl Direction {
    /// Contribution to the non-zero winding count.
    pub fn winding(self) -> i32 {
        match self {
            Direction::Negative => -1,
            Direction::Zero => 0,
            Direction::Positive => 1,
        }
    }
}

/// An oriented line segment in the enlarged coordinate system.
///
/// After construction `from.y < to.y` holds; `direction` records whether the
/// endpoints were swapped to get there. `slope` is the inverse slope of the
/// segment this one was originally split from, cached so that two fragments
/// of the same edge still compare equal after rounding.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub id: u32,
    pub slope: f64,
    pub direction: Direction,
}

impl Segment {
    fn new(from: Point, to: Point, id: u32, slope: Option<f64>) -> Self {
        let denom = to.y - from.y;
        let (from, to, direction) = if denom < 0.0 {
            (to, from, Direction::Negative)
        } else if denom > 0.0 {
            (from, to, Direction::Positive)
        } else {
            (from, to, Direction::Zero)
        };
        let slope_inv = if denom != 0.0 {
            (to.x - from.x) / (to.y - from.y)
        } else {
            f64::INFINITY
        };
        Segment {
            from,
            to,
            id,
            slope: slope.unwrap_or(slope_inv),
            direction,
        }
    }

    pub fn top_y(&self) -> i32 {
        self.from.y.floor() as i32
    }

    pub fn bottom_y(&self) -> i32 {
        self.to.y.floor() as i32
    }

    fn slope_inv(&self) -> f64 {
        (self.to.x - self.from.x) / (self.to.y - self.from.y)
    }

    /// x-axis intercept scaled by the inverse slope; two segments lying on
    /// the same infinite line share this value.
    fn factor(&self) -> f64 {
        self.slope_inv() * self.from.y - self.from.x
    }

    fn contains_y(&self, y: f64) -> bool {
        y > self.from.y && y < self.to.y
    }

    /// Split at `y`, keeping the upper part in `self` and returning the
    /// remainder. Both keep the original id and slope, and the returned
    /// segment preserves the original orientation.
    fn split_at(&mut self, y: f64) -> Segment {
        debug_assert!(self.from.y < self.to.y);
        debug_assert!(self.contains_y(y));

        let x = self.slope_inv() * (y - self.from.y) + self.from.x;
        let old_to = self.to;
        self.to = Point::new(x, y);

        let (new_from, new_to) = match self.direction {
            Direction::Negative => (old_to, self.to),
            _ => (self.to, old_to),
        };
        debug_assert!(new_from.y != new_to.y);
        Segment::new(new_from, new_to, self.id, Some(self.slope))
    }

    /// y coordinate where the infinite lines through `self` and `other`
    /// intersect, if it is finite and strictly inside `self`.
    fn intersection_y(&self, other: &Segment) -> Option<f64> {
        if self.from.x == other.from.x || self.to.x == other.to.x {
            return None;
        }
        let denom = self.slope_inv() - other.slope_inv();
        if denom == 0.0 {
            return None;
        }
        let y = (self.factor() - other.factor()) / denom;
        (y.is_finite() && self.contains_y(y)).then_some(y)
    }
}

fn cmp_points(a: Point, b: Point) -> std::cmp::Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

fn cmp_segments(a: &Segment, b: &Segment) -> std::cmp::Ordering {
    cmp_points(a.from, b.from).then(cmp_points(a.to, b.to))
}

/// Depth cap of the explicit De Casteljau subdivision stacks; deeper
/// subdivision falls back to a bounded recursive call.
pub(crate) const SUBDIVISION_DEPTH: usize = 16;

/// Midpoint subdivision of a quadratic; the halves share the middle point.
fn split_quad(curve: &[Point; 3]) -> [Point; 5] {
    let [a, b, c] = *curve;
    let ab = a.midpoint(b);
    let bc = b.midpoint(c);
    let mid = ab.midpoint(bc);
    [a, ab, mid, bc, c]
}

/// Midpoint subdivision of a cubic, expanding four points into seven.
pub(crate) fn split_cubic(curve: &[Point; 4]) -> [Point; 7] {
    let [a, b, c, d] = *curve;
    let ab = a.midpoint(b);
    let bc = b.midpoint(c);
    let cd = c.midpoint(d);
    let abbc = ab.midpoint(bc);
    let bccd = bc.midpoint(cd);
    let mid = abbc.midpoint(bccd);
    [a, ab, abbc, mid, bccd, cd, d]
}

/// Whether a quadratic is indistinguishable from its chord: the control
/// point deviates from the chord by no more than `tolerance` and lies inside
/// the tolerance-expanded box of the endpoints.
pub(crate) fn quad_is_line(p0: Point, control: Point, p1: Point, tolerance: f64) -> bool {
    let dt = ((p1.x - p0.x) * (p0.y - control.y) - (p0.x - control.x) * (p1.y - p0.y)).abs();
    if dt > tolerance {
        return false;
    }

    let (min_x, max_x) = if p0.x < p1.x {
        (p0.x - tolerance, p1.x + tolerance)
    } else {
        (p1.x - tolerance, p0.x + tolerance)
    };
    let (min_y, max_y) = if p0.y < p1.y {
        (p0.y - tolerance, p1.y + tolerance)
    } else {
        (p1.y - tolerance, p0.y + tolerance)
    };

    !(control.x < min_x || control.x > max_x || control.y < min_y || control.y > max_y)
}

/// The cubic generalization of [`quad_is_line`]: both controls must pass.
fn cubic_is_line(p0: Point, control1: Point, control2: Point, p1: Point, tolerance: f64) -> bool {
    let dt1 = ((p1.x - p0.x) * (p0.y - control1.y) - (p0.x - control1.x) * (p1.y - p0.y)).abs();
    let dt2 = ((p1.x - p0.x) * (p0.y - control2.y) - (p0.x - control2.x) * (p1.y - p0.y)).abs();
    if dt1 > tolerance || dt2 > tolerance {
        return false;
    }

    let (min_x, max_x) = if p0.x < p1.x {
        (p0.x - tolerance, p1.x + tolerance)
    } else {
        (p1.x - tolerance, p0.x + tolerance)
    };
    let (min_y, max_y) = if p0.y < p1.y {
        (p0.y - tolerance, p1.y + tolerance)
    } else {
        (p1.y - tolerance, p0.y + tolerance)
    };

    !(control1.x < min_x
        || control1.x > max_x
        || control1.y < min_y
        || control1.y > max_y
        || control2.x < min_x
        || control2.x > max_x
        || control2.y < min_y
        || control2.y > max_y)
}

/// Unit-circle cubic control points for the sub-arc between two angles.
///
/// The handle length `4/3 * tan((a1 - a0) / 4)` makes the cubic match the
/// circular arc at both endpoints and the midpoint.
fn arc_to_curve(start_angle: f64, end_angle: f64) -> [Point; 3] {
    let (sin_start, cos_start) = start_angle.sin_cos();
    let (sin_end, cos_end) = end_angle.sin_cos();
    let height = 4.0 / 3.0 * ((end_angle - start_angle) / 4.0).tan();

    [
        Point::new(cos_start - height * sin_start, sin_start + height * cos_start),
        Point::new(cos_end + height * sin_end, sin_end - height * cos_end),
        Point::new(cos_end, sin_end),
    ]
}

/// Flattens path elements into y-bucketed segments.
pub struct SegmentApproximator {
    buckets: BTreeMap<i32, Vec<Segment>>,
    scale: f64,
    tolerance: f64,
    bounding_box: BoundingBox,
    next_id: u32,
}

impl SegmentApproximator {
    /// `anti_alias` is the y oversampling factor, `sub_pixel` the tolerance
    /// numerator; non-positive arguments fall back to the defaults.
    pub fn new(anti_alias: u32, sub_pixel: f64) -> Self {
        let level = if anti_alias > 0 {
            anti_alias
        } else {
            DEFAULT_ANTI_ALIAS
        };
        let sub_pixel = if sub_pixel > 0.0 { sub_pixel } else { 1.0 };
        SegmentApproximator {
            buckets: BTreeMap::new(),
            scale: level as f64,
            tolerance: sub_pixel / level as f64,
            bounding_box: BoundingBox::new(),
            next_id: 0,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn insert_line(&mut self, from: Point, to: Point) {
        let from = Point::new(from.x * self.scale, (from.y * self.scale).floor());
        let to = Point::new(to.x * self.scale, (to.y * self.scale).floor());

        if from.y == to.y {
            return;
        }
        self.insert_segment(from, to);
    }

    fn insert_segment(&mut self, from: Point, to: Point) {
        debug_assert!(from.y != to.y);
        self.next_id += 1;
        let segment = Segment::new(from, to, self.next_id, None);

        self.bounding_box.stretch(segment.from);
        self.bounding_box.stretch(segment.to);

        let top = segment.top_y();
        let bottom = segment.bottom_y();
        self.buckets.entry(top).or_default().push(segment);
        // An empty bucket marks a y boundary other segments must split at.
        self.buckets.entry(bottom).or_default();
    }

    /// Flatten a quadratic with an explicit De Casteljau stack.
    pub fn insert_quad(&mut self, from: Point, control: Point, to: Point) {
        let mut stack: ArrayVec<[Point; 3], SUBDIVISION_DEPTH> = ArrayVec::new();
        stack.push([from, control, to]);

        while let Some(curve) = stack.pop() {
            let [a, b, c] = curve;
            if quad_is_line(a, b, c, self.tolerance) {
                self.insert_line(a, c);
                continue;
            }

            let points = split_quad(&curve);
            let first_half = [points[0], points[1], points[2]];
            let second_half = [points[2], points[3], points[4]];

            if stack.remaining_capacity() < 2 {
                // This recursive code path is rarely executed.
                self.insert_quad(second_half[0], second_half[1], second_half[2]);
                stack.push(first_half);
            } else {
                stack.push(first_half);
                stack.push(second_half);
            }
        }
    }

    /// Flatten a cubic with an explicit De Casteljau stack.
    pub fn insert_cubic(&mut self, from: Point, control1: Point, control2: Point, to: Point) {
        let mut stack: ArrayVec<[Point; 4], SUBDIVISION_DEPTH> = ArrayVec::new();
        stack.push([from, control1, control2, to]);

        while let Some(curve) = stack.pop() {
            let [a, b, c, d] = curve;
            if cubic_is_line(a, b, c, d, self.tolerance) {
                self.insert_line(a, d);
                continue;
            }

            let points = split_cubic(&curve);
            let first_half = [points[0], points[1], points[2], points[3]];
            let second_half = [points[3], points[4], points[5], points[6]];

            if stack.remaining_capacity() < 2 {
                // This recursive code path is rarely executed.
                self.insert_cubic(second_half[0], second_half[1], second_half[2], second_half[3]);
                stack.push(first_half);
            } else {
                stack.push(first_half);
                stack.push(second_half);
            }
        }
    }

    /// Smallest number of sub-arcs keeping the cubic approximation of an arc
    /// of the given sweep within tolerance at this radius.
    fn segment_count(&self, angle: f64, radius: f64) -> i32 {
        let epsilon = self.tolerance / radius;
        let mut i = 1;
        let mut angle_step;
        loop {
            angle_step = PI / i as f64;
            i += 1;
            let quarter = angle_step / 4.0;
            let error = 2.0 / 27.0 * quarter.sin().powi(6) / quarter.cos().powi(2);
            if error <= epsilon {
                break;
            }
        }
        (angle.abs() / angle_step).ceil() as i32
    }

    /// Replace an arc by a run of cubics and flatten those.
    pub fn insert_arc(&mut self, last_end_point: Point, arc: &ArcElement) {
        let mut start_angle = arc.start_angle;
        let end_angle = arc.end_angle;

        let mut start_point = arc.start_point();
        self.insert_line(last_end_point, start_point);

        debug_assert!(start_angle != end_angle);
        let delta_angle = if arc.counter_clockwise {
            start_angle - end_angle
        } else {
            end_angle - start_angle
        };

        let radius = (arc.radii.x * 2.0).max(arc.radii.y * 2.0);
        let segments = self.segment_count(delta_angle, radius);
        let mut step = delta_angle / segments as f64;
        if arc.counter_clockwise {
            step = -step;
        }

        for i in 0..segments {
            let last = i == segments - 1;
            let segment_end = if last { end_angle } else { start_angle + step };
            let curve = arc_to_curve(start_angle, segment_end);

            let control1 = arc.center
                + Vec2::new(curve[0].x * arc.radii.x, curve[0].y * arc.radii.y);
            let control2 = arc.center
                + Vec2::new(curve[1].x * arc.radii.x, curve[1].y * arc.radii.y);
            let to = if last {
                arc.to
            } else {
                arc.center + Vec2::new(curve[2].x * arc.radii.x, curve[2].y * arc.radii.y)
            };

            self.insert_cubic(start_point, control1, control2, to);
            start_point = to;
            start_angle += step;
        }
    }

    /// Split every segment that crosses the next bucket's y line, moving the
    /// lower fragment into that bucket. Buckets are visited in ascending
    /// order so fragments cascade down in a single pass.
    fn split_segments(&mut self) {
        let keys: Vec<i32> = self.buckets.keys().copied().collect();
        for pair in keys.windows(2) {
            let split_y = pair[1] as f64;
            let mut moved = Vec::new();
            let list = self.buckets.get_mut(&pair[0]).unwrap();
            for segment in list.iter_mut() {
                if segment.contains_y(split_y) {
                    moved.push(segment.split_at(split_y));
                }
            }
            if !moved.is_empty() {
                self.buckets.get_mut(&pair[1]).unwrap().extend(moved);
            }
        }
    }

    /// Produce the final sorted segment list: split at every y boundary,
    /// re-split at intersection lines, normalize quasi-overlapping pairs and
    /// merge the buckets.
    pub fn segments(&mut self) -> Vec<Segment> {
        // 1. Split segments at all existing y boundaries.
        self.split_segments();

        // 2. Find intersection points and register their y lines.
        let mut ys = BTreeSet::new();
        for list in self.buckets.values_mut() {
            list.sort_by(cmp_segments);
            for i in 0..list.len() {
                for j in (i + 1)..list.len() {
                    if let Some(y) = list[i].intersection_y(&list[j]) {
                        let floor_y = y.floor();
                        ys.insert(floor_y as i32);
                        if floor_y != y {
                            ys.insert(floor_y as i32 + 1);
                        }
                    }
                }
            }
        }
        for y in ys {
            self.buckets.entry(y).or_default();
        }

        // 3. Split again at the intersection boundaries.
        self.split_segments();

        // 4. Fix quasi-overlapping pairs, then merge the sorted buckets.
        let mut segments = Vec::new();
        for list in self.buckets.values_mut() {
            list.sort_by(cmp_segments);

            let mut need_sorting = false;
            for i in 0..list.len() {
                debug_assert!(list[i].to.y - list[i].from.y >= 1.0);
                let current = list[i];
                for j in (i + 1)..list.len() {
                    debug_assert!(list[j].from.y == current.from.y);
                    debug_assert!(list[j].to.y == current.to.y);
                    debug_assert!(list[j].from.x >= current.from.x);
                    if list[j].to.x < current.to.x {
                        // Clip whichever end is closer to the wider segment.
                        if list[j].from.x - current.from.x < current.to.x - list[j].to.x {
                            list[j].from.x = current.from.x;
                            need_sorting = true;
                        } else {
                            list[j].to.x = current.to.x;
                        }
                    }
                }
            }
            if need_sorting {
                list.sort_by(cmp_segments);
            }

            segments.extend(list.iter().copied());
        }

        trace!(
            "approximated {} segments across {} buckets",
            segments.len(),
            self.buckets.len()
        );
        segments
    }
}
