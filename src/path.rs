// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! Append-only path storage and the canvas path-building operations.

use std::f64::consts::PI;

use kurbo::{Point, Vec2};

/// An elliptical arc element, parameterized by center, per-axis radii and a
/// pair of angles measured clockwise from the positive x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcElement {
    pub center: Point,
    pub radii: Vec2,
    pub start_angle: f64,
    pub end_angle: f64,
    pub counter_clockwise: bool,
    pub to: Point,
}

impl ArcElement {
    pub fn new(
        center: Point,
        radii: Vec2,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    ) -> Self {
        debug_assert!(radii.x >= 0.0 && radii.y >= 0.0);
        let to = center + Vec2::new(end_angle.cos() * radii.x, end_angle.sin() * radii.y);
        ArcElement {
            center,
            radii,
            start_angle,
            end_angle,
            counter_clockwise,
            to,
        }
    }

    pub fn start_point(&self) -> Point {
        self.center
            + Vec2::new(
                self.start_angle.cos() * self.radii.x,
                self.start_angle.sin() * self.radii.y,
            )
    }
}

/// One element of a path. Every variant carries its end point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathElement {
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadTo { control: Point, to: Point },
    CurveTo { control1: Point, control2: Point, to: Point },
    Arc(ArcElement),
    Close { to: Point },
}

impl PathElement {
    pub fn to(&self) -> Point {
        match self {
            PathElement::MoveTo { to }
            | PathElement::LineTo { to }
            | PathElement::QuadTo { to, .. }
            | PathElement::CurveTo { to, .. }
            | PathElement::Close { to } => *to,
            PathElement::Arc(arc) => arc.to,
        }
    }

    pub fn is_move_to(&self) -> bool {
        matches!(self, PathElement::MoveTo { .. })
    }

    pub fn is_close(&self) -> bool {
        matches!(self, PathElement::Close { .. })
    }

    fn set_to(&mut self, p: Point) {
        match self {
            PathElement::MoveTo { to }
            | PathElement::LineTo { to }
            | PathElement::QuadTo { to, .. }
            | PathElement::CurveTo { to, .. }
            | PathElement::Close { to } => *to = p,
            PathElement::Arc(arc) => arc.to = p,
        }
    }
}

/// Nominal byte size of one arena block.
const REGION_BLOCK_BYTES: usize = 2048;

/// Elements per block; blocks are never reallocated, so references into the
/// region stay valid for the lifetime of the owning [`PathData`].
const REGION_BLOCK_CAPACITY: usize = {
    let capacity = REGION_BLOCK_BYTES / std::mem::size_of::<PathElement>();
    if capacity == 0 {
        1
    } else {
        capacity
    }
};

/// Stable index of an element inside a [`Region`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ElementRef(u32);

/// A bump arena of fixed-size blocks. Elements are only ever appended and
/// are released all at once when the region is dropped.
#[derive(Clone, Debug, Default)]
pub(crate) struct Region {
    blocks: Vec<Vec<PathElement>>,
}

impl Region {
    fn alloc(&mut self, element: PathElement) -> ElementRef {
        if self
            .blocks
            .last()
            .map_or(true, |block| block.len() == REGION_BLOCK_CAPACITY)
        {
            self.blocks.push(Vec::with_capacity(REGION_BLOCK_CAPACITY));
        }
        let num_blocks = self.blocks.len();
        let block = self.blocks.last_mut().unwrap();
        block.push(element);
        let index = (num_blocks - 1) * REGION_BLOCK_CAPACITY + block.len() - 1;
        ElementRef(index as u32)
    }

    fn get(&self, r: ElementRef) -> &PathElement {
        let index = r.0 as usize;
        &self.blocks[index / REGION_BLOCK_CAPACITY][index % REGION_BLOCK_CAPACITY]
    }

    fn len(&self) -> usize {
        match self.blocks.last() {
            Some(block) => (self.blocks.len() - 1) * REGION_BLOCK_CAPACITY + block.len(),
            None => 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn last(&self) -> Option<&PathElement> {
        self.blocks.last().and_then(|block| block.last())
    }

    fn last_mut(&mut self) -> Option<&mut PathElement> {
        self.blocks.last_mut().and_then(|block| block.last_mut())
    }

    fn iter(&self) -> impl Iterator<Item = &PathElement> + '_ {
        self.blocks.iter().flatten()
    }
}

/// An append-only list of path elements with canvas building semantics.
///
/// Invariants maintained by the builder operations:
/// - the first element, if any, is a `MoveTo`;
/// - consecutive `MoveTo`s collapse into one (the later position wins);
/// - a `LineTo` that would not move the current point is dropped;
/// - a `Close` always ends at the most recent `MoveTo` position.
#[derive(Clone, Debug, Default)]
pub struct PathData {
    region: Region,
    last_move_to: Option<ElementRef>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> impl Iterator<Item = &PathElement> + '_ {
        self.region.iter()
    }

    pub fn len(&self) -> usize {
        self.region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.region.last()
    }

    /// End point of the last element, if any.
    pub fn last_point(&self) -> Option<Point> {
        self.region.last().map(PathElement::to)
    }

    pub fn move_to(&mut self, to: Point) {
        if let Some(last) = self.region.last_mut() {
            if last.is_move_to() {
                last.set_to(to);
                return;
            }
        }
        let r = self.region.alloc(PathElement::MoveTo { to });
        self.last_move_to = Some(r);
    }

    pub fn line_to(&mut self, to: Point) {
        let Some(last) = self.region.last() else {
            self.move_to(to);
            return;
        };
        if !last.is_move_to() && last.to() == to {
            return;
        }
        self.region.alloc(PathElement::LineTo { to });
    }

    pub fn quad_to(&mut self, control: Point, to: Point) {
        if self.region.is_empty() {
            self.move_to(to);
        }
        self.region.alloc(PathElement::QuadTo { control, to });
    }

    pub fn curve_to(&mut self, control1: Point, control2: Point, to: Point) {
        if self.region.is_empty() {
            self.move_to(to);
        }
        self.region.alloc(PathElement::CurveTo {
            control1,
            control2,
            to,
        });
    }

    /// Append an arc around `center`, connecting from the current point with
    /// a line when necessary. Angles are normalized so that the stored sweep
    /// is at most a full turn in the requested direction.
    pub fn arc(
        &mut self,
        center: Point,
        radii: Vec2,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    ) {
        let start = center + Vec2::new(start_angle.cos() * radii.x, start_angle.sin() * radii.y);

        if self.region.is_empty() {
            self.move_to(center);
        }

        if radii.x == 0.0 || radii.y == 0.0 || start_angle == end_angle {
            self.line_to(start);
            return;
        }

        if self.last_point() != Some(start) {
            self.line_to(start);
        }

        let two_pi = 2.0 * PI;
        let mut start_angle = start_angle;
        let mut end_angle = end_angle;
        if counter_clockwise && start_angle - end_angle >= two_pi {
            start_angle %= two_pi;
            end_angle = start_angle - two_pi;
        } else if !counter_clockwise && end_angle - start_angle >= two_pi {
            start_angle %= two_pi;
            end_angle = start_angle + two_pi;
        } else {
            start_angle %= two_pi;
            if start_angle < 0.0 {
                start_angle += two_pi;
            }
            end_angle %= two_pi;
            if end_angle < 0.0 {
                end_angle += two_pi;
            }
            // Angles that were distinct but collapse under normalization
            // describe a full turn.
            if !counter_clockwise {
                if start_angle >= end_angle {
                    end_angle += two_pi;
                }
                debug_assert!((0.0..=two_pi).contains(&start_angle));
                debug_assert!(start_angle <= end_angle && end_angle - start_angle <= two_pi);
            } else {
                if start_angle <= end_angle {
                    end_angle -= two_pi;
                }
                debug_assert!((0.0..=two_pi).contains(&start_angle));
                debug_assert!(end_angle <= start_angle && start_angle - end_angle <= two_pi);
            }
        }

        let arc = ArcElement::new(center, radii, start_angle, end_angle, counter_clockwise);
        self.region.alloc(PathElement::Arc(arc));
    }

    /// Append an arc of the given radius tangent to the two half-lines
    /// (current point -> `control`) and (`control` -> `end`), following the
    /// HTML5 `arcTo` rules. Degenerate configurations fall back to a line to
    /// `control`.
    pub fn arc_to(&mut self, control: Point, end: Point, radius: f64) {
        let Some(last) = self.region.last() else {
            self.move_to(control);
            return;
        };
        let start = last.to();

        if start == control || control == end || radius == 0.0 {
            self.line_to(control);
            return;
        }

        let delta1 = start - control;
        let delta2 = end - control;
        let delta1_length = delta1.length();
        let delta2_length = delta2.length();

        debug_assert!(delta1_length != 0.0 && delta2_length != 0.0);
        let cos_phi = delta1.dot(delta2) / (delta1_length * delta2_length);

        // All three points on one straight line (HTML5, 4.8.11.1.8).
        if cos_phi.abs() >= 0.9999 {
            self.line_to(control);
            return;
        }

        let tangent = radius / (cos_phi.acos() / 2.0).tan();
        let delta1_factor = tangent / delta1_length;
        let arc_start = control + delta1_factor * delta1;

        let mut ortho_start = Vec2::new(delta1.y, -delta1.x);
        let ortho_start_length = ortho_start.length();
        let radius_factor = radius / ortho_start_length;

        let cos_alpha = ortho_start.dot(delta2) / (ortho_start_length * delta2_length);
        if cos_alpha < 0.0 {
            ortho_start = -ortho_start;
        }

        let center = arc_start + radius_factor * ortho_start;

        // Angles for the arc element.
        let ortho_start = -ortho_start;
        let mut start_angle = (ortho_start.x / ortho_start_length).acos();
        if ortho_start.y < 0.0 {
            start_angle = 2.0 * PI - start_angle;
        }

        let delta2_factor = tangent / delta2_length;
        let arc_end = control + delta2_factor * delta2;
        let ortho_end = arc_end - center;
        let ortho_end_length = ortho_end.length();
        let mut end_angle = (ortho_end.x / ortho_end_length).acos();
        if ortho_end.y < 0.0 {
            end_angle = 2.0 * PI - end_angle;
        }

        let mut counter_clockwise = false;
        if start_angle > end_angle && start_angle - end_angle < PI {
            counter_clockwise = true;
        }
        if start_angle < end_angle && end_angle - start_angle > PI {
            counter_clockwise = true;
        }

        self.arc(
            center,
            Vec2::new(radius, radius),
            start_angle,
            end_angle,
            counter_clockwise,
        );
    }

    /// Close the current subpath back to the most recent `MoveTo` position.
    pub fn close_subpath(&mut self) {
        let Some(last) = self.region.last().copied() else {
            return;
        };
        if last.is_close() {
            return;
        }
        if last.is_move_to() {
            self.line_to(last.to());
        }
        let to = self
            .last_move_to
            .map(|r| self.region.get(r).to())
            .unwrap_or_default();
        self.region.alloc(PathElement::Close { to });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn first_element_is_move_to() {
        let mut path = PathData::new();
        path.line_to(p(1.0, 2.0));
        assert_eq!(path.len(), 1);
        assert!(path.last().unwrap().is_move_to());
        assert_eq!(path.last_point(), Some(p(1.0, 2.0)));
    }

    #[test]
    fn consecutive_move_to_collapse() {
        let mut path = PathData::new();
        path.move_to(p(1.0, 1.0));
        path.move_to(p(2.0, 2.0));
        assert_eq!(path.len(), 1);
        assert_eq!(path.last_point(), Some(p(2.0, 2.0)));

        path.close_subpath();
        let close = path.last().unwrap();
        assert!(close.is_close());
        assert_eq!(close.to(), p(2.0, 2.0));
    }

    #[test]
    fn degenerate_line_to_is_absorbed() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.line_to(p(5.0, 0.0));
        let len = path.len();
        path.line_to(p(5.0, 0.0));
        assert_eq!(path.len(), len);
    }

    #[test]
    fn close_on_bare_move_to_promotes_to_line() {
        let mut path = PathData::new();
        path.move_to(p(3.0, 4.0));
        path.close_subpath();
        let elements: Vec<_> = path.elements().copied().collect();
        assert_eq!(elements.len(), 3);
        assert!(elements[0].is_move_to());
        assert!(matches!(elements[1], PathElement::LineTo { .. }));
        assert_eq!(elements[1].to(), p(3.0, 4.0));
        assert!(elements[2].is_close());
    }

    #[test]
    fn repeated_close_is_idempotent() {
        let mut path = PathData::new();
        path.move_to(p(3.0, 4.0));
        path.close_subpath();
        let len = path.len();
        path.close_subpath();
        assert_eq!(path.len(), len);
    }

    #[test]
    fn close_targets_last_move_to() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.line_to(p(4.0, 0.0));
        path.move_to(p(10.0, 10.0));
        path.line_to(p(14.0, 10.0));
        path.close_subpath();
        assert_eq!(path.last().unwrap().to(), p(10.0, 10.0));
    }

    #[test]
    fn degenerate_arc_becomes_line() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.arc(p(5.0, 5.0), Vec2::new(0.0, 3.0), 0.0, 1.0, false);
        let elements: Vec<_> = path.elements().copied().collect();
        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[1], PathElement::LineTo { .. }));
    }

    #[test]
    fn arc_normalizes_angles() {
        let mut path = PathData::new();
        path.move_to(p(15.0, 10.0));
        path.arc(p(10.0, 10.0), Vec2::new(5.0, 5.0), -PI / 2.0, PI / 2.0, false);
        let arc = path
            .elements()
            .find_map(|el| match el {
                PathElement::Arc(arc) => Some(*arc),
                _ => None,
            })
            .unwrap();
        assert!((0.0..=2.0 * PI).contains(&arc.start_angle));
        assert!(arc.end_angle >= arc.start_angle);
        assert!(arc.end_angle - arc.start_angle <= 2.0 * PI);
    }

    #[test]
    fn arc_on_empty_path_starts_at_center() {
        let mut path = PathData::new();
        path.arc(p(10.0, 10.0), Vec2::new(5.0, 5.0), 0.0, PI, false);
        let first = path.elements().next().unwrap();
        assert!(first.is_move_to());
        assert_eq!(first.to(), p(10.0, 10.0));
    }

    #[test]
    fn arc_to_collinear_falls_back_to_line() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.arc_to(p(10.0, 0.0), p(20.0, 0.0), 5.0);
        let elements: Vec<_> = path.elements().copied().collect();
        assert_eq!(elements.len(), 2);
        assert!(elements[0].is_move_to());
        assert_eq!(elements[1], PathElement::LineTo { to: p(10.0, 0.0) });
    }

    #[test]
    fn arc_to_right_angle_emits_line_and_arc() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        path.arc_to(p(10.0, 0.0), p(10.0, 10.0), 2.0);
        let kinds: Vec<_> = path
            .elements()
            .map(|el| std::mem::discriminant(el))
            .collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(
            path.elements().nth(1),
            Some(PathElement::LineTo { .. })
        ));
        assert!(matches!(
            path.elements().nth(2),
            Some(PathElement::Arc(_))
        ));
    }

    #[test]
    fn region_grows_across_blocks_in_order() {
        let mut path = PathData::new();
        path.move_to(p(0.0, 0.0));
        for i in 1..200 {
            path.line_to(p(i as f64, i as f64));
        }
        assert_eq!(path.len(), 200);
        for (i, element) in path.elements().enumerate() {
            assert_eq!(element.to(), p(i as f64, i as f64));
        }
        // The close still finds the move-to recorded before the blocks grew.
        path.close_subpath();
        assert_eq!(path.last().unwrap().to(), p(0.0, 0.0));
    }
}
