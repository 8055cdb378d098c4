use log::debug;
use sc_core::Polygon2f;

use crate::cancel::CancelToken;
use crate::edges::{extract_horizontal_edges, extract_vertical_edges};
use crate::error::{OutlineError, PipelineStage};
use crate::grid::{FlipVertical, OpacitySource, SilhouetteGrid};
use crate::outline::Outline;
use crate::simplify::{fit_to_grid_size, simplify_closed};
use crate::stitch::{EdgeLoop, stitch_loops};

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineConfig {
    /// Side of the square pixel block behind one grid cell.
    pub cell_size: usize,
    /// Simplification tolerance in grid units.
    pub epsilon: f32,
    /// Scan the image bottom-up so the outline lives in y-up space.
    pub flip_vertical: bool,
    /// Simplified polygons with fewer vertices are dropped.
    pub min_vertices: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            cell_size: 10,
            epsilon: 1.0,
            flip_vertical: true,
            min_vertices: 3,
        }
    }
}

/// Every intermediate product of one pipeline run.
#[derive(Debug, Clone)]
pub struct OutlineTrace {
    pub grid: SilhouetteGrid,
    pub vertical_edges: usize,
    pub horizontal_edges: usize,
    pub loops: Vec<EdgeLoop>,
    pub outline: Outline,
}

/// Computes the collision outline of `src`.
///
/// `cancel` is polled after the grid is built, after vertical extraction and
/// on every stitching step; a cancelled run yields no partial outline.
pub fn build_outline<S: OpacitySource + ?Sized>(
    src: &S,
    cfg: &OutlineConfig,
    cancel: &CancelToken,
) -> Result<Outline, OutlineError> {
    trace_outline(src, cfg, cancel).map(|t| t.outline)
}

/// Same as [`build_outline`], keeping the grid and stitched loops.
pub fn trace_outline<S: OpacitySource + ?Sized>(
    src: &S,
    cfg: &OutlineConfig,
    cancel: &CancelToken,
) -> Result<OutlineTrace, OutlineError> {
    if cfg.cell_size == 0 {
        return Err(OutlineError::InvalidCellSize);
    }

    let grid = if cfg.flip_vertical {
        SilhouetteGrid::build(&FlipVertical(src), cfg.cell_size)
    } else {
        SilhouetteGrid::build(src, cfg.cell_size)
    };
    checkpoint(cancel, PipelineStage::Grid)?;

    let vertical = extract_vertical_edges(&grid);
    checkpoint(cancel, PipelineStage::VerticalEdges)?;

    let horizontal = extract_horizontal_edges(&grid);
    let (vertical_edges, horizontal_edges) = (vertical.len(), horizontal.len());
    let loops = stitch_loops(vertical, horizontal, cancel)?;

    let mut polygons = Vec::with_capacity(loops.len());
    for l in &loops {
        let simplified = simplify_closed(&l.points(), cfg.epsilon);
        if simplified.len() < cfg.min_vertices {
            debug!(
                "dropping loop of {} edges: {} vertices after simplification",
                l.len(),
                simplified.len()
            );
            continue;
        }
        polygons.push(Polygon2f::new(fit_to_grid_size(&simplified, cfg.cell_size)));
    }

    let outline = Outline::new(polygons);
    debug!(
        "outline: grid {}x{} ({} occupied), {}+{} edges, {} loops, {} polygons, {} vertices",
        grid.width(),
        grid.height(),
        grid.occupied_count(),
        vertical_edges,
        horizontal_edges,
        loops.len(),
        outline.polygons.len(),
        outline.vertex_count()
    );

    Ok(OutlineTrace {
        grid,
        vertical_edges,
        horizontal_edges,
        loops,
        outline,
    })
}

fn checkpoint(cancel: &CancelToken, after: PipelineStage) -> Result<(), OutlineError> {
    if cancel.is_cancelled() {
        debug!("outline cancelled after {after}");
        return Err(OutlineError::Cancelled { after });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sc_core::{Image, Point2f, Rect2f};

    use super::{OutlineConfig, build_outline, trace_outline};
    use crate::cancel::CancelToken;
    use crate::error::{OutlineError, PipelineStage};
    use crate::simplify::{segment_distance, simplify_closed};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// `w x h` image, opaque on `[x0, x1) x [y0, y1)`.
    fn rect_image(
        w: usize,
        h: usize,
        (x0, y0): (usize, usize),
        (x1, y1): (usize, usize),
    ) -> Image<u8> {
        Image::from_fn(w, h, |x, y| {
            u8::from((x0..x1).contains(&x) && (y0..y1).contains(&y)) * 255
        })
    }

    #[test]
    fn single_cell_square_keeps_four_corners() {
        init_logging();
        let img = rect_image(10, 10, (0, 0), (10, 10));
        let trace =
            trace_outline(&img, &OutlineConfig::default(), &CancelToken::new()).expect("outline");

        assert_eq!(trace.vertical_edges + trace.horizontal_edges, 4);
        assert_eq!(trace.loops.len(), 1);
        assert_eq!(trace.loops[0].len(), 4);
        assert_eq!(trace.outline.polygons.len(), 1);
        assert_eq!(
            trace.outline.polygons[0].points,
            vec![
                Point2f::new(0.0, 0.0),
                Point2f::new(0.0, 10.0),
                Point2f::new(10.0, 10.0),
                Point2f::new(10.0, 0.0),
            ]
        );
    }

    #[test]
    fn cancelled_before_vertical_extraction_yields_nothing() {
        let img = rect_image(40, 40, (5, 5), (35, 35));
        let token = CancelToken::new();
        token.cancel();

        let err = build_outline(&img, &OutlineConfig::default(), &token).expect_err("cancelled");
        assert_eq!(
            err,
            OutlineError::Cancelled {
                after: PipelineStage::Grid
            }
        );
        assert!(err.is_cancelled());
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let img = rect_image(10, 10, (0, 0), (10, 10));
        let cfg = OutlineConfig {
            cell_size: 0,
            ..OutlineConfig::default()
        };
        assert_eq!(
            build_outline(&img, &cfg, &CancelToken::new()),
            Err(OutlineError::InvalidCellSize)
        );
    }

    #[test]
    fn transparent_image_has_empty_outline() {
        let img = Image::new_fill(50, 30, 0u8);
        let outline =
            build_outline(&img, &OutlineConfig::default(), &CancelToken::new()).expect("outline");
        assert!(outline.is_empty());
    }

    #[test]
    fn frame_gives_outer_polygon_and_hole() {
        init_logging();
        let img = Image::from_fn(30, 30, |x, y| {
            u8::from(!((10..20).contains(&x) && (10..20).contains(&y)))
        });
        let outline =
            build_outline(&img, &OutlineConfig::default(), &CancelToken::new()).expect("outline");

        assert_eq!(outline.polygons.len(), 2);
        let mut boxes = outline
            .polygons
            .iter()
            .filter_map(|p| p.bounds())
            .map(|b| (b.width, b.height))
            .collect::<Vec<_>>();
        boxes.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(boxes, vec![(10.0, 10.0), (30.0, 30.0)]);
    }

    #[test]
    fn flip_moves_top_rows_to_high_y() {
        // Opaque block in the top image rows.
        let img = rect_image(20, 40, (0, 0), (20, 10));
        let flipped =
            build_outline(&img, &OutlineConfig::default(), &CancelToken::new()).expect("outline");
        let raw = build_outline(
            &img,
            &OutlineConfig {
                flip_vertical: false,
                ..OutlineConfig::default()
            },
            &CancelToken::new(),
        )
        .expect("outline");

        assert_eq!(
            raw.bounds(),
            Some(Rect2f {
                x: 0.0,
                y: 0.0,
                width: 20.0,
                height: 10.0
            })
        );
        assert_eq!(
            flipped.bounds(),
            Some(Rect2f {
                x: 0.0,
                y: 30.0,
                width: 20.0,
                height: 10.0
            })
        );
    }

    #[test]
    fn outline_stays_within_tolerance_of_the_grid() {
        // Filled disc; every simplified vertex is a grid corner.
        let img = Image::from_fn(200, 200, |x, y| {
            let (dx, dy) = (x as f32 - 100.0, y as f32 - 100.0);
            u8::from(dx * dx + dy * dy < 80.0 * 80.0)
        });
        let cfg = OutlineConfig::default();
        let trace = trace_outline(&img, &cfg, &CancelToken::new()).expect("outline");

        assert_eq!(trace.outline.polygons.len(), 1);
        let raw_vertices = trace.loops[0].len();
        let polygon = &trace.outline.polygons[0];
        assert!(polygon.len() >= cfg.min_vertices);
        assert!(polygon.len() < raw_vertices);
        for p in &polygon.points {
            assert_eq!(p.x % 10.0, 0.0);
            assert_eq!(p.y % 10.0, 0.0);
        }
    }

    #[test]
    fn inverted_t_sprite_keeps_its_polygon() {
        init_logging();
        let img = Image::from_fn(30, 20, |x, y| {
            u8::from(y < 10 || (10..20).contains(&x)) * 255
        });
        let trace =
            trace_outline(&img, &OutlineConfig::default(), &CancelToken::new()).expect("outline");

        assert_eq!(trace.loops.len(), 1);
        assert_eq!(trace.outline.polygons.len(), 1);
        assert!(trace.outline.polygons[0].len() >= 3);
        assert_eq!(
            trace.outline.bounds(),
            Some(Rect2f {
                x: 0.0,
                y: 0.0,
                width: 30.0,
                height: 20.0
            })
        );
    }

    #[test]
    fn scattered_cells_keep_every_loop_within_tolerance() {
        let cfg = OutlineConfig {
            cell_size: 1,
            flip_vertical: false,
            ..OutlineConfig::default()
        };
        for seed in 0..24u64 {
            let img = Image::from_fn(14, 11, |x, y| {
                let h = (x as u64 * 73_856_093) ^ (y as u64 * 19_349_663) ^ (seed * 83_492_791);
                u8::from((h.wrapping_mul(2_654_435_761) >> 29) & 3 == 0)
            });
            let trace = trace_outline(&img, &cfg, &CancelToken::new()).expect("outline");
            assert_eq!(trace.outline.polygons.len(), trace.loops.len(), "seed {seed}");

            for l in &trace.loops {
                let ring = l.points();
                let out = simplify_closed(&ring, cfg.epsilon);
                assert!(out.len() >= 3, "seed {seed}: {ring:?}");
                for &p in &ring {
                    let d = (0..out.len())
                        .map(|i| segment_distance(out[i], out[(i + 1) % out.len()], p))
                        .fold(f32::INFINITY, f32::min);
                    assert!(d <= cfg.epsilon + 1e-4, "seed {seed}: {p:?} off by {d}");
                }
            }
        }
    }
}
