use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::{Rgb, RgbImage};
use log::info;
use sc_collide::{PlacedOutline, check_collision_between_looks};
use sc_core::{Image, Point2f, Transform2f, Vec2f};
use sc_look::{
    CollisionRegistry, FsImageProvider, GatherConfig, ImageProvider, OutlineSource,
    SidecarMetadataStore,
};
use sc_outline::{
    CancelToken, Outline, OutlineConfig, OutlineTrace, build_outline, encode, trace_outline,
};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "sc_gallery")]
#[command(about = "Compute and inspect sprite collision outlines")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trace one image and dump grid, loops, polygons and an overlay.
    #[command(name = "outline")]
    Outline(OutlineArgs),
    /// Place two images and report whether their outlines collide.
    #[command(name = "collide")]
    Collide(CollideArgs),
    /// Resolve every image of a directory, persisting outlines in sidecars.
    #[command(name = "gather")]
    Gather(GatherArgs),
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// JSON file with outline settings; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    cell_size: Option<usize>,
    #[arg(long)]
    epsilon: Option<f32>,
    /// Keep image row order instead of scanning bottom-up.
    #[arg(long, default_value_t = false)]
    no_flip: bool,
}

#[derive(Args, Debug, Clone)]
struct OutlineArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "out/outline")]
    out: PathBuf,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
struct CollideArgs {
    #[arg(long, required = true)]
    first: PathBuf,
    #[arg(long, required = true)]
    second: PathBuf,
    #[arg(long, default_value_t = 0.0)]
    first_x: f32,
    #[arg(long, default_value_t = 0.0)]
    first_y: f32,
    #[arg(long, default_value_t = 0.0)]
    second_x: f32,
    #[arg(long, default_value_t = 0.0)]
    second_y: f32,
    #[arg(long, default_value_t = 0.0)]
    second_rotation: f32,
    #[arg(long, default_value_t = 1.0)]
    second_scale: f32,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug, Clone)]
struct GatherArgs {
    #[arg(long, required = true)]
    dir: PathBuf,
    /// Ignore the background tasks and compute every look synchronously.
    #[arg(long, default_value_t = false)]
    sequential: bool,
    #[arg(long, default_value_t = false)]
    no_persist: bool,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OutlineConfigDto {
    cell_size: Option<usize>,
    epsilon: Option<f32>,
    flip_vertical: Option<bool>,
    min_vertices: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct OutlineDto {
    width: usize,
    height: usize,
    cell_size: usize,
    epsilon: f32,
    flip_vertical: bool,
    grid_width: usize,
    grid_height: usize,
    occupied_cells: usize,
    vertical_edges: usize,
    horizontal_edges: usize,
    loops: Vec<Vec<[f32; 2]>>,
    polygons: Vec<Vec<[f32; 2]>>,
    encoded: String,
}

#[derive(Debug, Clone, Serialize)]
struct CollideDto {
    first_polygons: usize,
    second_polygons: usize,
    collides: bool,
    signal: f64,
}

#[derive(Debug, Clone, Serialize)]
struct GatherLookDto {
    name: String,
    source: &'static str,
    polygons: usize,
    vertices: usize,
}

#[derive(Debug, Clone, Serialize)]
struct GatherDto {
    persisted: usize,
    background: usize,
    synchronous: usize,
    missing: usize,
    looks: Vec<GatherLookDto>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Outline(args) => run_outline(args),
        Command::Collide(args) => run_collide(args),
        Command::Gather(args) => run_gather(args),
    }
}

fn run_outline(args: OutlineArgs) -> Result<()> {
    ensure_file_exists(&args.input, "input")?;
    let cfg = resolve_config(&args.config)?;
    let mask = load_mask(&args.input)?;

    let trace = trace_outline(&mask, &cfg, &CancelToken::new())
        .with_context(|| format!("tracing outline of {}", args.input.display()))?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;
    fs::write(args.out.join("grid.txt"), trace.grid.to_string())
        .with_context(|| format!("writing {}", args.out.join("grid.txt").display()))?;

    write_json(args.out.join("outline.json"), &outline_dto(&mask, &cfg, &trace))?;

    let overlay = render_overlay(&args.input, &trace.outline, cfg.flip_vertical)?;
    let overlay_path = args.out.join("overlay.png");
    overlay
        .save(&overlay_path)
        .with_context(|| format!("saving image {}", overlay_path.display()))?;

    info!(
        "{}: {} polygons, {} vertices -> {}",
        args.input.display(),
        trace.outline.polygons.len(),
        trace.outline.vertex_count(),
        args.out.display()
    );
    Ok(())
}

fn run_collide(args: CollideArgs) -> Result<()> {
    ensure_file_exists(&args.first, "first")?;
    ensure_file_exists(&args.second, "second")?;
    let cfg = resolve_config(&args.config)?;

    let first = compute(&args.first, &cfg)?;
    let second_mask = load_mask(&args.second)?;
    let second = build_outline(&second_mask, &cfg, &CancelToken::new())
        .with_context(|| format!("building outline of {}", args.second.display()))?;

    let first_placed =
        PlacedOutline::new(&first, &Transform2f::translation(args.first_x, args.first_y), true);
    let second_placed = PlacedOutline::new(
        &second,
        &Transform2f {
            position: Vec2f {
                x: args.second_x,
                y: args.second_y,
            },
            origin: Point2f::new(
                second_mask.width() as f32 * 0.5,
                second_mask.height() as f32 * 0.5,
            ),
            scale: Vec2f {
                x: args.second_scale,
                y: args.second_scale,
            },
            rotation_deg: args.second_rotation,
        },
        true,
    );

    let signal = check_collision_between_looks(&first_placed, &second_placed);
    let dto = CollideDto {
        first_polygons: first.polygons.len(),
        second_polygons: second.polygons.len(),
        collides: signal > 0.0,
        signal,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&dto).context("serializing json")?
    );
    Ok(())
}

fn run_gather(args: GatherArgs) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("not a directory: {}", args.dir.display());
    }
    let outline = resolve_config(&args.config)?;

    let mut images = fs::read_dir(&args.dir)
        .with_context(|| format!("listing {}", args.dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"))
        })
        .collect::<Vec<_>>();
    images.sort();

    let mut registry = CollisionRegistry::new(
        Arc::new(FsImageProvider),
        Arc::new(SidecarMetadataStore),
        GatherConfig {
            outline,
            persist_computed: !args.no_persist,
            ..GatherConfig::default()
        },
    );
    for path in &images {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        registry.add_look(name, path);
    }
    if !args.sequential {
        registry.start_all();
    }
    let report = registry.gather();

    let looks = registry
        .ids()
        .map(|id| {
            let outline = registry.outline(id);
            GatherLookDto {
                name: registry.name(id).unwrap_or_default().to_owned(),
                source: source_name(registry.source(id)),
                polygons: outline.map_or(0, |o| o.polygons.len()),
                vertices: outline.map_or(0, Outline::vertex_count),
            }
        })
        .collect();

    write_json(
        args.dir.join("gather.json"),
        &GatherDto {
            persisted: report.persisted,
            background: report.background,
            synchronous: report.synchronous,
            missing: report.missing,
            looks,
        },
    )
}

fn resolve_config(args: &ConfigArgs) -> Result<OutlineConfig> {
    let mut cfg = OutlineConfig::default();

    if let Some(path) = &args.config {
        ensure_file_exists(path, "config")?;
        let dto: OutlineConfigDto = read_json(path)?;
        if let Some(v) = dto.cell_size {
            cfg.cell_size = v;
        }
        if let Some(v) = dto.epsilon {
            cfg.epsilon = v;
        }
        if let Some(v) = dto.flip_vertical {
            cfg.flip_vertical = v;
        }
        if let Some(v) = dto.min_vertices {
            cfg.min_vertices = v;
        }
    }
    if let Some(v) = args.cell_size {
        cfg.cell_size = v;
    }
    if let Some(v) = args.epsilon {
        cfg.epsilon = v;
    }
    if args.no_flip {
        cfg.flip_vertical = false;
    }

    if cfg.cell_size == 0 {
        bail!("cell size must be positive");
    }
    if !(cfg.epsilon.is_finite() && cfg.epsilon >= 0.0) {
        bail!("epsilon must be a non-negative number, got {}", cfg.epsilon);
    }
    Ok(cfg)
}

fn load_mask(path: &Path) -> Result<Image<u8>> {
    FsImageProvider
        .load_mask(path)
        .with_context(|| format!("loading opacity mask from {}", path.display()))
}

fn compute(path: &Path, cfg: &OutlineConfig) -> Result<Outline> {
    let mask = load_mask(path)?;
    build_outline(&mask, cfg, &CancelToken::new())
        .with_context(|| format!("building outline of {}", path.display()))
}

fn outline_dto(mask: &Image<u8>, cfg: &OutlineConfig, trace: &OutlineTrace) -> OutlineDto {
    let xy = |p: &Point2f| [p.x, p.y];

    OutlineDto {
        width: mask.width(),
        height: mask.height(),
        cell_size: cfg.cell_size,
        epsilon: cfg.epsilon,
        flip_vertical: cfg.flip_vertical,
        grid_width: trace.grid.width(),
        grid_height: trace.grid.height(),
        occupied_cells: trace.grid.occupied_count(),
        vertical_edges: trace.vertical_edges,
        horizontal_edges: trace.horizontal_edges,
        loops: trace
            .loops
            .iter()
            .map(|l| l.points().iter().map(xy).collect())
            .collect(),
        polygons: trace
            .outline
            .polygons
            .iter()
            .map(|p| p.points.iter().map(xy).collect())
            .collect(),
        encoded: encode(&trace.outline),
    }
}

fn render_overlay(input: &Path, outline: &Outline, flipped: bool) -> Result<RgbImage> {
    let mut rgb = image::open(input)
        .with_context(|| format!("opening input image {}", input.display()))?
        .to_rgb8();
    let height = rgb.height() as f32;
    let to_image = |p: Point2f| {
        if flipped {
            Point2f::new(p.x, height - p.y)
        } else {
            p
        }
    };

    for polygon in &outline.polygons {
        for (a, b) in polygon.edges() {
            draw_segment(&mut rgb, to_image(a), to_image(b), Rgb([255, 64, 64]));
        }
        for &p in &polygon.points {
            draw_dot(&mut rgb, to_image(p), Rgb([64, 255, 64]));
        }
    }
    Ok(rgb)
}

fn draw_segment(img: &mut RgbImage, a: Point2f, b: Point2f, color: Rgb<u8>) {
    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        put_clipped(
            img,
            (a.x + (b.x - a.x) * t).round() as i32,
            (a.y + (b.y - a.y) * t).round() as i32,
            color,
        );
    }
}

fn draw_dot(img: &mut RgbImage, p: Point2f, color: Rgb<u8>) {
    let xi = p.x.round() as i32;
    let yi = p.y.round() as i32;

    for dy in -1..=1 {
        for dx in -1..=1 {
            put_clipped(img, xi + dx, yi + dy, color);
        }
    }
}

fn put_clipped(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (ux, uy) = (x as u32, y as u32);
    if ux >= img.width() || uy >= img.height() {
        return;
    }
    img.put_pixel(ux, uy, color);
}

fn source_name(source: Option<OutlineSource>) -> &'static str {
    match source {
        Some(OutlineSource::Persisted) => "persisted",
        Some(OutlineSource::Background) => "background",
        Some(OutlineSource::Synchronous) => "synchronous",
        Some(OutlineSource::Missing) | None => "missing",
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
