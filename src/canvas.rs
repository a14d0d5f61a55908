// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! The canvas-style drawing facade and its state stack.
//!
//! Numeric semantics follow the HTML5 2D context: angles are radians, y
//! grows downward, arcs default clockwise. Filling and stroking never mutate
//! the current path.

use kurbo::{Cap, Join, Point, Stroke, Vec2};

use crate::backend::{Backend, Color};
use crate::path::PathData;
use crate::stroke::StrokeBuilder;
use crate::tessellator::{FillRule, Tessellator};

pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
pub const DEFAULT_MITER_LIMIT: f64 = 10.0;

/// Parse a canvas line cap keyword. Values are case-sensitive; anything
/// unrecognized yields `None`.
pub fn parse_line_cap(value: &str) -> Option<Cap> {
    match value {
        "butt" => Some(Cap::Butt),
        "square" => Some(Cap::Square),
        "round" => Some(Cap::Round),
        _ => None,
    }
}

/// Parse a canvas line join keyword.
pub fn parse_line_join(value: &str) -> Option<Join> {
    match value {
        "miter" => Some(Join::Miter),
        "bevel" => Some(Join::Bevel),
        "round" => Some(Join::Round),
        _ => None,
    }
}

/// One entry of the drawing state stack.
#[derive(Clone, Debug)]
struct DrawState {
    fill_color: Color,
    stroke_color: Color,
    stroke: Stroke,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            stroke: Stroke::new(DEFAULT_LINE_WIDTH)
                .with_caps(Cap::Butt)
                .with_join(Join::Miter)
                .with_miter_limit(DEFAULT_MITER_LIMIT),
        }
    }
}

/// A stateful drawing surface over some backend.
pub struct Canvas<B: Backend> {
    backend: B,
    path: PathData,
    states: Vec<DrawState>,
    anti_alias: u32,
}

impl<B: Backend> Canvas<B> {
    pub fn new(backend: B) -> Self {
        Canvas {
            backend,
            path: PathData::new(),
            states: vec![DrawState::default()],
            anti_alias: crate::flatten::DEFAULT_ANTI_ALIAS,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn set_anti_alias(&mut self, level: u32) {
        if level > 0 {
            self.anti_alias = level;
        }
    }

    fn state(&self) -> &DrawState {
        self.states.last().unwrap()
    }

    fn state_mut(&mut self) -> &mut DrawState {
        self.states.last_mut().unwrap()
    }

    /* State */

    pub fn save(&mut self) {
        let state = self.state().clone();
        self.states.push(state);
    }

    /// Pop the state stack; the base state can not be removed.
    pub fn restore(&mut self) {
        if self.states.len() > 1 {
            self.states.pop();
        }
    }

    /* Building paths */

    pub fn begin_path(&mut self) {
        self.path = PathData::new();
    }

    pub fn close_path(&mut self) {
        self.path.close_subpath();
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(Point::new(x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(Point::new(x, y));
    }

    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.path.quad_to(Point::new(cpx, cpy), Point::new(x, y));
    }

    pub fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.path.curve_to(
            Point::new(cp1x, cp1y),
            Point::new(cp2x, cp2y),
            Point::new(x, y),
        );
    }

    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        self.path
            .arc_to(Point::new(x1, y1), Point::new(x2, y2), radius);
    }

    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    ) {
        self.path.arc(
            Point::new(x, y),
            Vec2::new(radius, radius),
            start_angle,
            end_angle,
            counter_clockwise,
        );
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }

    /// Replace the current path wholesale.
    pub fn set_path(&mut self, path: PathData) {
        self.path = path;
    }

    pub fn path(&self) -> &PathData {
        &self.path
    }

    /* Drawing */

    pub fn fill(&mut self) {
        self.fill_with_rule(FillRule::NonZero);
    }

    pub fn fill_with_rule(&mut self, fill_rule: FillRule) {
        let color = self.state().fill_color;
        let mut tessellator = Tessellator::new(&self.path, fill_rule, self.anti_alias);
        let trapezoids = tessellator.trapezoid_list();
        let bounds = tessellator.bounding_box();
        self.backend
            .fill_trapezoids(&trapezoids, &bounds, color, self.anti_alias);
    }

    pub fn stroke(&mut self) {
        let state = self.state().clone();
        let outline = StrokeBuilder::new(&state.stroke).build(&self.path);
        let mut tessellator = Tessellator::new(&outline, FillRule::NonZero, self.anti_alias);
        let trapezoids = tessellator.trapezoid_list();
        let bounds = tessellator.bounding_box();
        self.backend
            .fill_trapezoids(&trapezoids, &bounds, state.stroke_color, self.anti_alias);
    }

    /// Fill a rectangle without touching the current path.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        if w == 0.0 || h == 0.0 {
            return;
        }
        let mut rect = PathData::new();
        rect.move_to(Point::new(x, y));
        rect.line_to(Point::new(x + w, y));
        rect.line_to(Point::new(x + w, y + h));
        rect.line_to(Point::new(x, y + h));
        rect.close_subpath();

        let color = self.state().fill_color;
        let mut tessellator = Tessellator::new(&rect, FillRule::NonZero, self.anti_alias);
        let trapezoids = tessellator.trapezoid_list();
        let bounds = tessellator.bounding_box();
        self.backend
            .fill_trapezoids(&trapezoids, &bounds, color, self.anti_alias);
    }

    /* Style */

    pub fn set_fill_color(&mut self, color: Color) {
        self.state_mut().fill_color = color;
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.state_mut().stroke_color = color;
    }

    pub fn set_stroke_style(&mut self, stroke: Stroke) {
        self.state_mut().stroke = stroke;
    }

    pub fn stroke_style(&self) -> &Stroke {
        &self.state().stroke
    }

    /// Set the line width; non-positive or non-finite values are ignored.
    pub fn set_line_width(&mut self, width: f64) {
        if width > 0.0 && width.is_finite() {
            self.state_mut().stroke.width = width;
        }
    }

    pub fn set_miter_limit(&mut self, limit: f64) {
        if limit > 0.0 && limit.is_finite() {
            self.state_mut().stroke.miter_limit = limit;
        }
    }

    /// Set the line cap from its canvas keyword; unknown values are ignored.
    pub fn set_line_cap(&mut self, cap: &str) {
        if let Some(cap) = parse_line_cap(cap) {
            let state = self.state_mut();
            state.stroke.start_cap = cap;
            state.stroke.end_cap = cap;
        }
    }

    pub fn set_line_join(&mut self, join: &str) {
        if let Some(join) = parse_line_join(join) {
            self.state_mut().stroke.join = join;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SoftwareBackend;

    #[test]
    fn option_keywords_are_case_sensitive() {
        assert_eq!(parse_line_cap("butt"), Some(Cap::Butt));
        assert_eq!(parse_line_cap("square"), Some(Cap::Square));
        assert_eq!(parse_line_cap("round"), Some(Cap::Round));
        assert_eq!(parse_line_cap("Round"), None);
        assert_eq!(parse_line_cap(""), None);

        assert_eq!(parse_line_join("miter"), Some(Join::Miter));
        assert_eq!(parse_line_join("bevel"), Some(Join::Bevel));
        assert_eq!(parse_line_join("round"), Some(Join::Round));
        assert_eq!(parse_line_join("MITER"), None);
    }

    #[test]
    fn save_restore_round_trips_stroke_state() {
        let mut canvas = Canvas::new(SoftwareBackend::new(1, 1));
        canvas.set_line_width(5.0);
        canvas.save();
        canvas.set_line_width(9.0);
        canvas.set_line_cap("round");
        assert_eq!(canvas.stroke_style().width, 9.0);
        canvas.restore();
        assert_eq!(canvas.stroke_style().width, 5.0);
        assert_eq!(canvas.stroke_style().start_cap, Cap::Butt);
    }

    #[test]
    fn restore_on_base_state_is_a_no_op() {
        let mut canvas = Canvas::new(SoftwareBackend::new(1, 1));
        canvas.set_line_width(3.0);
        canvas.restore();
        assert_eq!(canvas.stroke_style().width, 3.0);
    }

    #[test]
    fn invalid_option_values_are_ignored() {
        let mut canvas = Canvas::new(SoftwareBackend::new(1, 1));
        canvas.set_line_width(-4.0);
        canvas.set_line_width(f64::NAN);
        canvas.set_miter_limit(0.0);
        canvas.set_line_cap("flat");
        assert_eq!(canvas.stroke_style().width, DEFAULT_LINE_WIDTH);
        assert_eq!(canvas.stroke_style().miter_limit, DEFAULT_MITER_LIMIT);
        assert_eq!(canvas.stroke_style().start_cap, Cap::Butt);
    }

    #[test]
    fn fill_rect_covers_pixels_without_touching_the_path() {
        let mut canvas = Canvas::new(SoftwareBackend::new(4, 4));
        canvas.move_to(0.0, 0.0);
        let elements_before = canvas.path().len();

        canvas.set_fill_color(Color::from_rgba8(0, 255, 0, 255));
        canvas.fill_rect(1.0, 1.0, 2.0, 2.0);

        assert_eq!(canvas.path().len(), elements_before);
        assert_eq!(canvas.backend().bitmap().pixel(1, 1), [0, 255, 0, 255]);
        assert_eq!(canvas.backend().bitmap().pixel(2, 2), [0, 255, 0, 255]);
        assert_eq!(canvas.backend().bitmap().pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(canvas.backend().bitmap().pixel(3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn rect_builds_a_closed_subpath() {
        let mut canvas = Canvas::new(SoftwareBackend::new(1, 1));
        canvas.rect(0.0, 0.0, 10.0, 10.0);
        let path = canvas.path();
        assert_eq!(path.len(), 5);
        assert!(path.elements().next().unwrap().is_move_to());
        assert!(path.last().unwrap().is_close());
    }

    #[test]
    fn zero_sized_fill_rect_is_a_no_op() {
        let mut canvas = Canvas::new(SoftwareBackend::new(4, 4));
        canvas.fill_rect(0.0, 0.0, 0.0, 4.0);
        canvas.fill_rect(0.0, 0.0, 4.0, 0.0);
        assert!(canvas.backend().bitmap().pixels().iter().all(|&b| b == 0));
    }
}
