// Copyright 2026 the Trapeze Authors
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use clap::Parser;
use log::info;

use trapeze::backend::SoftwareBackend;
use trapeze::canvas::Canvas;
use trapeze::svg::SvgScene;
use trapeze::tessellator::Tessellator;

#[derive(Parser)]
#[command(about = "Trapezoid-tessellation SVG rasterizer")]
enum Args {
    /// Rasterize an SVG file to a PNG image.
    Render(RenderArgs),
    /// Print tessellation statistics for an SVG file.
    Trapezoids(TrapezoidsArgs),
}

#[derive(Parser)]
struct RenderArgs {
    filename: String,
    #[arg(short, long, default_value = "out.png")]
    output: String,
    /// y oversampling factor used while tessellating.
    #[arg(long, default_value_t = 16)]
    anti_alias: u32,
}

#[derive(Parser)]
struct TrapezoidsArgs {
    filename: String,
    #[arg(long, default_value_t = 16)]
    anti_alias: u32,
}

fn render(args: RenderArgs) -> Result<(), Box<dyn Error>> {
    let xml = std::fs::read_to_string(&args.filename)?;
    let scene = SvgScene::load(&xml)?;
    info!(
        "rendering {} paths at {}x{}",
        scene.paths.len(),
        scene.width,
        scene.height
    );

    let mut canvas = Canvas::new(SoftwareBackend::new(scene.width, scene.height));
    canvas.set_anti_alias(args.anti_alias);

    let start = Instant::now();
    for styled in &scene.paths {
        canvas.set_path(styled.path.clone());
        if let Some(color) = styled.fill {
            canvas.set_fill_color(color);
            canvas.fill_with_rule(styled.fill_rule);
        }
        if let Some(color) = styled.stroke {
            canvas.set_stroke_color(color);
            canvas.set_stroke_style(styled.stroke_style.clone());
            canvas.stroke();
        }
    }
    println!("rendered in {:?}", start.elapsed());

    let file = File::create(&args.output)?;
    canvas
        .backend()
        .bitmap()
        .encode_png(BufWriter::new(file))?;
    println!("wrote {}", args.output);
    Ok(())
}

fn trapezoids(args: TrapezoidsArgs) -> Result<(), Box<dyn Error>> {
    let xml = std::fs::read_to_string(&args.filename)?;
    let scene = SvgScene::load(&xml)?;

    let start = Instant::now();
    let mut total = 0usize;
    for styled in &scene.paths {
        let mut tessellator =
            Tessellator::new(&styled.path, styled.fill_rule, args.anti_alias);
        let trapezoids = tessellator.trapezoid_list();
        let bounds = tessellator.bounding_box();
        total += trapezoids.len();
        println!(
            "{} trapezoids, bounds {:.2},{:.2}..{:.2},{:.2}",
            trapezoids.len(),
            bounds.min_x,
            bounds.min_y,
            bounds.max_x,
            bounds.max_y
        );
    }
    println!("{total} trapezoids total, {:?}", start.elapsed());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    match Args::parse() {
        Args::Render(args) => render(args),
        Args::Trapezoids(args) => trapezoids(args),
    }
}
