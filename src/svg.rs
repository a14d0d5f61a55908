// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

//! A very basic SVG scene loader for the rasterizer CLI.
//!
//! Only `<g>` and `<path>` elements and the presentation attributes the
//! pipeline can honor are recognized; everything else is skipped.

use std::error::Error;
use std::str::FromStr;

use kurbo::{BezPath, PathEl, Stroke};
use roxmltree::{Document, Node};

use crate::backend::Color;
use crate::canvas::{parse_line_cap, parse_line_join, DEFAULT_MITER_LIMIT};
use crate::path::PathData;
use crate::tessellator::FillRule;

/// A path plus the paint attributes found on its element.
pub struct StyledPath {
    pub path: PathData,
    pub fill: Option<Color>,
    pub fill_rule: FillRule,
    pub stroke: Option<Color>,
    pub stroke_style: Stroke,
}

pub struct SvgScene {
    pub width: u32,
    pub height: u32,
    pub paths: Vec<StyledPath>,
}

impl SvgScene {
    pub fn load(xml: &str) -> Result<SvgScene, Box<dyn Error>> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        let mut scene = SvgScene {
            width: parse_length(root.attribute("width")).unwrap_or(512),
            height: parse_length(root.attribute("height")).unwrap_or(512),
            paths: vec![],
        };
        for node in root.children() {
            parse_rec(node, &mut scene)?;
        }
        Ok(scene)
    }
}

fn parse_length(value: Option<&str>) -> Option<u32> {
    let value = value?.trim_end_matches("px");
    f64::from_str(value).ok().map(|v| v.max(0.0) as u32)
}

/// Convert a parsed `d` attribute into path data, re-establishing the
/// builder invariants along the way.
fn path_data_from_bez(bez: &BezPath) -> PathData {
    let mut path = PathData::new();
    for element in bez.elements() {
        match element {
            PathEl::MoveTo(p) => path.move_to(*p),
            PathEl::LineTo(p) => path.line_to(*p),
            PathEl::QuadTo(c, p) => path.quad_to(*c, *p),
            PathEl::CurveTo(c1, c2, p) => path.curve_to(*c1, *c2, *p),
            PathEl::ClosePath => path.close_subpath(),
        }
    }
    path
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse `#rgb`, `#rrggbb` or one of a handful of keywords; `None` for
/// `"none"` and anything unrecognized.
pub fn parse_color(value: &str) -> Option<Color> {
    match value {
        "none" => return None,
        "black" => return Some(Color::BLACK),
        "white" => return Some(Color::WHITE),
        "red" => return Some(Color::from_rgba8(255, 0, 0, 255)),
        "green" => return Some(Color::from_rgba8(0, 128, 0, 255)),
        "blue" => return Some(Color::from_rgba8(0, 0, 255, 255)),
        _ => {}
    }

    let hex = value.strip_prefix('#')?.as_bytes();
    match hex.len() {
        3 => {
            let r = hex_nibble(hex[0])?;
            let g = hex_nibble(hex[1])?;
            let b = hex_nibble(hex[2])?;
            Some(Color::from_rgba8(r << 4 | r, g << 4 | g, b << 4 | b, 255))
        }
        6 => {
            let r = hex_nibble(hex[0])? << 4 | hex_nibble(hex[1])?;
            let g = hex_nibble(hex[2])? << 4 | hex_nibble(hex[3])?;
            let b = hex_nibble(hex[4])? << 4 | hex_nibble(hex[5])?;
            Some(Color::from_rgba8(r, g, b, 255))
        }
        _ => None,
    }
}

fn parse_rec(node: Node, scene: &mut SvgScene) -> Result<(), Box<dyn Error>> {
    match node.tag_name().name() {
        "g" => {
            for child in node.children() {
                parse_rec(child, scene)?;
            }
        }
        "path" => {
            let d = node.attribute("d").ok_or("path without 'd'")?;
            let path = path_data_from_bez(&BezPath::from_svg(d)?);

            // Fill defaults to black per SVG; stroke defaults to none.
            let fill = match node.attribute("fill") {
                Some(value) => parse_color(value),
                None => Some(Color::BLACK),
            };
            let fill_rule = match node.attribute("fill-rule") {
                Some("evenodd") => FillRule::EvenOdd,
                _ => FillRule::NonZero,
            };

            let stroke = node.attribute("stroke").and_then(parse_color);
            let width = node
                .attribute("stroke-width")
                .and_then(|a| f64::from_str(a).ok())
                .unwrap_or(1.0);
            let cap = node
                .attribute("stroke-linecap")
                .and_then(parse_line_cap)
                .unwrap_or(kurbo::Cap::Butt);
            let join = node
                .attribute("stroke-linejoin")
                .and_then(parse_line_join)
                .unwrap_or(kurbo::Join::Miter);
            let miter_limit = node
                .attribute("stroke-miterlimit")
                .and_then(|a| f64::from_str(a).ok())
                .unwrap_or(DEFAULT_MITER_LIMIT);
            let stroke_style = Stroke::new(width)
                .with_caps(cap)
                .with_join(join)
                .with_miter_limit(miter_limit);

            scene.paths.push(StyledPath {
                path,
                fill,
                fill_rule,
                stroke,
                stroke_style,
            });
        }
        _ => {}
    }
    Ok(())
}
