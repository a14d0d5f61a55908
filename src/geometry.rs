// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! Scalar precision control and bounding boxes.

use kurbo::{Point, Vec2};

/// Denominator used by [`fix_precision`]; coordinates are canonicalized to
/// nine decimal digits before they participate in equality comparisons.
pub const PRECISION: f64 = 1_000_000_000.0;

/// Truncate `v` to the fixed precision grid.
///
/// Applied at emission boundaries only, so that values which drifted apart
/// by a few ulps during flattening compare equal when trapezoids are merged.
#[inline]
pub fn fix_precision(v: f64) -> f64 {
    (v * PRECISION).floor() / PRECISION
}

/// Rotate a vector by 90 degrees. With y growing downward this points to the
/// left-hand side of the direction of travel.
#[inline]
pub(crate) fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// An axis-aligned accumulator rectangle.
///
/// Starts inverted (`+inf` mins, `-inf` maxes) and grows by absorbing
/// points; a box that never absorbed anything stays inverted, which callers
/// treat as empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stretch_x(&mut self, x: f64) {
        if x < self.min_x {
            self.min_x = x;
        }
        if x > self.max_x {
            self.max_x = x;
        }
    }

    pub fn stretch_y(&mut self, y: f64) {
        if y < self.min_y {
            self.min_y = y;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    pub fn stretch(&mut self, p: Point) {
        self.stretch_x(p.x);
        self.stretch_y(p.y);
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}
