// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! A 2D vector graphics core built around trapezoid tessellation.
//!
//! Paths made of lines, Bézier curves and arcs are flattened into y-bucketed
//! segments, split at scanline boundaries and intersections, and walked
//! under a fill rule into a sorted, non-overlapping list of horizontal
//! trapezoids ready for scanline or GPU rasterization. Strokes are first
//! converted into fillable outlines and then go through the same pipeline.

pub mod backend;
pub mod canvas;
pub mod flatten;
pub mod geometry;
pub mod path;
pub mod stroke;
pub mod svg;
pub mod tessellator;

pub use backend::{Backend, Bitmap, Color, SoftwareBackend};
pub use canvas::Canvas;
pub use geometry::BoundingBox;
pub use path::PathData;
pub use stroke::StrokeBuilder;
pub use tessellator::{FillRule, Tessellator, Trapezoid};
