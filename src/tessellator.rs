// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! Conversion of a path into a sorted, non-overlapping trapezoid list.

use log::debug;

use crate::flatten::{SegmentApproximator, DEFAULT_ANTI_ALIAS};
use crate::geometry::{fix_precision, BoundingBox};
use crate::path::{PathData, PathElement};

/// Rule deciding whether a winding count is inside the fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// A horizontal slab bounded by two parallel y lines and two sloped sides.
///
/// The ids and slopes of the bounding segments are kept so that vertically
/// adjacent slabs cut from the same pair of edges can be recognized and
/// merged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Trapezoid {
    pub top_y: f64,
    pub top_left_x: f64,
    pub top_right_x: f64,
    pub bottom_y: f64,
    pub bottom_left_x: f64,
    pub bottom_right_x: f64,

    pub left_id: u32,
    pub right_id: u32,
    pub left_slope: f64,
    pub right_slope: f64,
}

impl Trapezoid {
    /// Whether `self` can be absorbed into `other`, which starts at the y
    /// line where `self` ends. Requires matching x coordinates and either
    /// matching segment ids or matching original slopes on both sides.
    fn is_mergable_into(&self, other: &Trapezoid) -> bool {
        debug_assert!(self.bottom_y == other.top_y);

        if self.bottom_left_x == other.top_left_x && self.bottom_right_x == other.top_right_x {
            if self.left_id == other.left_id && self.right_id == other.right_id {
                return true;
            }
            if self.left_slope == other.left_slope && self.right_slope == other.right_slope {
                return true;
            }
        }
        false
    }

    pub fn height(&self) -> f64 {
        self.bottom_y - self.top_y
    }

    /// Signed area; zero for degenerate slabs.
    pub fn area(&self) -> f64 {
        0.5 * self.height()
            * ((self.top_right_x - self.top_left_x) + (self.bottom_right_x - self.bottom_left_x))
    }
}

fn cmp_trapezoids(a: &Trapezoid, b: &Trapezoid) -> std::cmp::Ordering {
    a.top_y
        .total_cmp(&b.top_y)
        .then(a.top_left_x.total_cmp(&b.top_left_x))
        .then(a.bottom_left_x.total_cmp(&b.bottom_left_x))
}

/// Walks a path's segments under a fill rule and emits trapezoids.
pub struct Tessellator<'a> {
    path: &'a PathData,
    fill_rule: FillRule,
    anti_alias: u32,
    bounding_box: BoundingBox,
}

impl<'a> Tessellator<'a> {
    pub fn new(path: &'a PathData, fill_rule: FillRule, anti_alias: u32) -> Self {
        Tessellator {
            path,
            fill_rule,
            anti_alias: if anti_alias > 0 {
                anti_alias
            } else {
                DEFAULT_ANTI_ALIAS
            },
            bounding_box: BoundingBox::new(),
        }
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn anti_alias(&self) -> u32 {
        self.anti_alias
    }

    /// Bounding box of the last tessellation, in un-scaled coordinates.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Tessellate the path into a merged, sorted trapezoid list.
    pub fn trapezoid_list(&mut self) -> Vec<Trapezoid> {
        let mut elements = self.path.elements();
        let Some(first) = elements.next() else {
            return Vec::new();
        };
        debug_assert!(first.is_move_to());

        let sub_pixel_precision = 1.0;
        let mut approximator = SegmentApproximator::new(self.anti_alias, sub_pixel_precision);
        let mut to = first.to();
        let mut last_move_to = to;

        // 1. Feed the path elements, implicitly closing subpaths at each
        // MoveTo and at the end of the path.
        for element in elements {
            let from = to;
            to = element.to();
            match element {
                PathElement::MoveTo { .. } => {
                    approximator.insert_line(from, last_move_to);
                    last_move_to = to;
                }
                PathElement::LineTo { .. } => {
                    approximator.insert_line(from, to);
                }
                PathElement::Close { .. } => {
                    approximator.insert_line(from, last_move_to);
                    last_move_to = to;
                }
                PathElement::QuadTo { control, .. } => {
                    approximator.insert_quad(from, *control, to);
                }
                PathElement::CurveTo {
                    control1, control2, ..
                } => {
                    approximator.insert_cubic(from, *control1, *control2, to);
                }
                PathElement::Arc(arc) => {
                    approximator.insert_arc(from, arc);
                }
            }
        }
        approximator.insert_line(to, last_move_to);

        // 2. Generate the sorted segment list.
        let segments = approximator.segments();

        // 3. Emit trapezoids while walking the winding count.
        let denom = self.anti_alias as f64;
        let mut trapezoids = Vec::new();
        let mut trapezoid = Trapezoid::default();
        let mut fill = 0i32;
        let mut is_in_fill = false;
        for segment in &segments {
            if segment.from.y == segment.to.y {
                continue;
            }
            match self.fill_rule {
                FillRule::EvenOdd => fill ^= 1,
                FillRule::NonZero => fill += segment.direction.winding(),
            }

            if fill != 0 {
                if !is_in_fill {
                    trapezoid.top_y = fix_precision(segment.top_y() as f64 / denom);
                    trapezoid.bottom_y = fix_precision(segment.bottom_y() as f64 / denom);
                    trapezoid.top_left_x = fix_precision(segment.from.x) / denom;
                    trapezoid.bottom_left_x = fix_precision(segment.to.x) / denom;
                    trapezoid.left_id = segment.id;
                    trapezoid.left_slope = segment.slope;
                    if trapezoid.top_y != trapezoid.bottom_y {
                        is_in_fill = true;
                    }
                }
            } else {
                trapezoid.top_right_x = fix_precision(segment.from.x) / denom;
                trapezoid.bottom_right_x = fix_precision(segment.to.x) / denom;
                trapezoid.right_id = segment.id;
                trapezoid.right_slope = segment.slope;
                if trapezoid.top_y != trapezoid.bottom_y {
                    trapezoids.push(trapezoid);
                }
                is_in_fill = false;
            }
        }

        let bb = approximator.bounding_box();
        self.bounding_box = BoundingBox {
            min_x: fix_precision(bb.min_x) / denom,
            min_y: fix_precision(bb.min_y) / denom,
            max_x: fix_precision(bb.max_x) / denom,
            max_y: fix_precision(bb.max_y) / denom,
        };

        // 4. Merge vertically adjacent trapezoids cut from the same edges.
        trapezoids.sort_by(cmp_trapezoids);
        let mut merged = Vec::with_capacity(trapezoids.len());
        for i in 0..trapezoids.len() {
            let current = trapezoids[i];
            debug_assert!(current.left_id != 0 && current.right_id != 0);
            let mut consumed = false;
            for j in (i + 1)..trapezoids.len() {
                if trapezoids[j].top_y > current.bottom_y {
                    break;
                }
                if trapezoids[j].top_y == current.bottom_y
                    && current.is_mergable_into(&trapezoids[j])
                {
                    trapezoids[j].top_y = current.top_y;
                    trapezoids[j].top_left_x = current.top_left_x;
                    trapezoids[j].top_right_x = current.top_right_x;
                    consumed = true;
                    break;
                }
            }
            if !consumed {
                merged.push(current);
            }
        }

        debug!(
            "tessellated {} segments into {} trapezoids ({:?})",
            segments.len(),
            merged.len(),
            self.fill_rule
        );
        merged
    }
}
