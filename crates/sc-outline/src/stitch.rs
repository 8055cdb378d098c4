use log::debug;
use sc_core::Point2f;

use crate::cancel::CancelToken;
use crate::edges::{BoundaryEdge, GridPoint};
use crate::error::{OutlineError, PipelineStage, StitchError};

/// Chain of boundary edges where each edge starts at the previous edge's end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgeLoop {
    pub edges: Vec<BoundaryEdge>,
}

impl EdgeLoop {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// True when the walk returns to its first corner.
    pub fn is_closed(&self) -> bool {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) => last.connects_to(first),
            _ => false,
        }
    }

    /// Vertex sequence: the start corner of every edge, in walk order.
    pub fn points(&self) -> Vec<Point2f> {
        self.edges.iter().map(BoundaryEdge::start_point).collect()
    }

    fn end(&self) -> Option<GridPoint> {
        self.edges.last().map(BoundaryEdge::end)
    }
}

/// Reassembles unordered boundary edges into closed loops.
///
/// Each loop is seeded with the first remaining vertical edge. The walk then
/// alternates between the horizontal and the vertical pool, taking an edge
/// that starts at the current end as-is or one that ends there flipped.
/// When neither pool continues the walk, the loop is finished and a new one
/// is seeded. The walk stops once the horizontal pool is empty; vertical
/// edges still connected to the open loop are appended, and any others are
/// reported as [`StitchError::UnconsumedEdges`].
pub fn stitch_loops(
    mut vertical: Vec<BoundaryEdge>,
    mut horizontal: Vec<BoundaryEdge>,
    cancel: &CancelToken,
) -> Result<Vec<EdgeLoop>, OutlineError> {
    if vertical.is_empty() && horizontal.is_empty() {
        return Ok(Vec::new());
    }

    let mut loops = Vec::new();
    let mut current = EdgeLoop {
        edges: vec![take_seed(&mut vertical, horizontal.len())?],
    };

    loop {
        if cancel.is_cancelled() {
            return Err(OutlineError::Cancelled {
                after: PipelineStage::Stitching,
            });
        }

        let mut found = false;
        if let Some(edge) = current
            .end()
            .and_then(|at| take_connected(&mut horizontal, at))
        {
            current.edges.push(edge);
            found = true;
        }
        if let Some(edge) = current
            .end()
            .and_then(|at| take_connected(&mut vertical, at))
        {
            current.edges.push(edge);
            found = true;
        }

        if !found {
            let seed = take_seed(&mut vertical, horizontal.len())?;
            loops.push(core::mem::replace(
                &mut current,
                EdgeLoop { edges: vec![seed] },
            ));
        }

        if horizontal.is_empty() {
            break;
        }
    }

    while let Some(at) = current.end() {
        let Some(edge) = take_connected(&mut vertical, at) else {
            break;
        };
        current.edges.push(edge);
    }
    loops.push(current);

    if !vertical.is_empty() {
        return Err(StitchError::UnconsumedEdges {
            vertical: vertical.len(),
        }
        .into());
    }

    debug!(
        "stitched {} loops from {} edges",
        loops.len(),
        loops.iter().map(EdgeLoop::len).sum::<usize>()
    );

    Ok(loops)
}

fn take_seed(
    vertical: &mut Vec<BoundaryEdge>,
    horizontal_left: usize,
) -> Result<BoundaryEdge, StitchError> {
    if vertical.is_empty() {
        return Err(StitchError::EmptyVerticalPool { horizontal_left });
    }
    Ok(vertical.remove(0))
}

fn take_connected(pool: &mut Vec<BoundaryEdge>, at: GridPoint) -> Option<BoundaryEdge> {
    let i = pool
        .iter()
        .position(|e| e.start() == at || e.end() == at)?;
    let edge = pool.remove(i);
    if edge.start() == at {
        Some(edge)
    } else {
        Some(edge.flipped())
    }
}
