//! Collision outlines from sprite opacity.
//!
//! The pipeline coarsens an image into a [`SilhouetteGrid`] of
//! `cell_size x cell_size` blocks, extracts the grid boundary as maximal
//! horizontal and vertical runs, stitches those runs into closed loops and
//! simplifies every loop with Ramer–Douglas–Peucker before scaling it back
//! to pixel units:
//! - [`extract_horizontal_edges`] / [`extract_vertical_edges`] merge a new
//!   unit edge into the newest or second-newest run that ends where it starts.
//! - [`stitch_loops`] alternates between the two edge pools; loops may be
//!   outer boundaries or holes.
//! - [`build_outline`] runs all stages and polls a [`CancelToken`] between
//!   them.
//!
//! Outlines persist as text through [`encode`] / [`decode`].

mod build;
mod cancel;
mod codec;
mod edges;
mod error;
mod grid;
mod outline;
mod simplify;
mod stitch;

pub use build::{OutlineConfig, OutlineTrace, build_outline, trace_outline};
pub use cancel::CancelToken;
pub use codec::{COORDINATE_SEPARATOR, CodecError, POLYGON_SEPARATOR, decode, encode};
pub use edges::{BoundaryEdge, GridPoint, extract_horizontal_edges, extract_vertical_edges};
pub use error::{OutlineError, PipelineStage, StitchError};
pub use grid::{FlipVertical, OpacitySource, PixelOpacity, SilhouetteGrid};
pub use outline::Outline;
pub use simplify::{
    fit_to_grid_size, perpendicular_distance, segment_distance, simplify_closed, simplify_polyline,
};
pub use stitch::{EdgeLoop, stitch_loops};
