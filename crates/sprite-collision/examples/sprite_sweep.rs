//! Example: slide one sprite across another and report the contact range.
//!
//! Both images are traced with the default outline settings, then the second
//! sprite is moved horizontally in fixed steps across the first. Every step
//! runs a full collision query.
//!
//! Run from the workspace root:
//!   cargo run -p sprite-collision --example sprite_sweep -- --help
//!   cargo run -p sprite-collision --example sprite_sweep -- --first a.png --second b.png

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use sprite_collision::{
    CancelToken, FsImageProvider, ImageProvider, OutlineConfig, PlacedOutline, Transform2f,
    build_outline, collides,
};

#[derive(Parser, Debug)]
#[command(about = "Sweep one sprite across another and record collisions")]
struct Args {
    #[arg(long)]
    first: PathBuf,

    #[arg(long)]
    second: PathBuf,

    /// Horizontal start offset of the second sprite
    #[arg(long, default_value_t = -200.0)]
    from: f32,

    /// Horizontal end offset of the second sprite
    #[arg(long, default_value_t = 200.0)]
    to: f32,

    #[arg(long, default_value_t = 2.0)]
    step: f32,

    /// Vertical offset of the second sprite
    #[arg(long, default_value_t = 0.0)]
    y: f32,

    /// Output JSON path
    #[arg(long, default_value = "sweep.json")]
    out: PathBuf,
}

#[derive(Serialize)]
struct StepDto {
    x: f32,
    collides: bool,
}

#[derive(Serialize)]
struct SweepResult {
    first_vertices: usize,
    second_vertices: usize,
    /// Mean wall-clock time per query, in microseconds.
    mean_query_us: f64,
    first_contact: Option<f32>,
    last_contact: Option<f32>,
    steps: Vec<StepDto>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.step.is_nan() || args.step <= 0.0 || args.to < args.from {
        bail!("need step > 0 and from <= to");
    }

    let cfg = OutlineConfig::default();
    let mut outlines = Vec::with_capacity(2);
    for path in [&args.first, &args.second] {
        let mask = FsImageProvider
            .load_mask(path)
            .with_context(|| format!("loading {}", path.display()))?;
        let outline = build_outline(&mask, &cfg, &CancelToken::new())
            .with_context(|| format!("tracing {}", path.display()))?;
        println!(
            "{}: {}x{}, {} polygons",
            path.display(),
            mask.width(),
            mask.height(),
            outline.polygons.len()
        );
        outlines.push(outline);
    }
    let (first, second) = (&outlines[0], &outlines[1]);

    let anchor = PlacedOutline::new(first, &Transform2f::default(), true);
    let mut steps = Vec::new();
    let start = Instant::now();
    let mut x = args.from;
    while x <= args.to {
        let moving = PlacedOutline::new(second, &Transform2f::translation(x, args.y), true);
        steps.push(StepDto {
            x,
            collides: collides(&anchor, &moving),
        });
        x += args.step;
    }
    let mean_query_us = start.elapsed().as_secs_f64() * 1e6 / steps.len().max(1) as f64;

    let first_contact = steps.iter().find(|s| s.collides).map(|s| s.x);
    let last_contact = steps.iter().rev().find(|s| s.collides).map(|s| s.x);
    match (first_contact, last_contact) {
        (Some(a), Some(b)) => println!("contact from x={a} to x={b}"),
        _ => println!("no contact"),
    }
    println!("{} queries, {mean_query_us:.2} us each", steps.len());

    let out_file = std::fs::File::create(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    serde_json::to_writer_pretty(
        out_file,
        &SweepResult {
            first_vertices: first.vertex_count(),
            second_vertices: second.vertex_count(),
            mean_query_us,
            first_contact,
            last_contact,
            steps,
        },
    )
    .with_context(|| format!("writing JSON to {}", args.out.display()))?;

    println!("results written to {}", args.out.display());
    Ok(())
}
