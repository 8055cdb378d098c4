use core::fmt;

use sc_core::Point2f;

use crate::grid::SilhouetteGrid;

/// Integer grid-corner coordinate `(x, y)`.
pub type GridPoint = (usize, usize);

/// Directed boundary segment between two grid corners.
///
/// Start and end always differ. Equality is exact endpoint equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryEdge {
    start: GridPoint,
    end: GridPoint,
}

impl BoundaryEdge {
    /// Returns `None` for zero-length edges.
    pub fn new(start: GridPoint, end: GridPoint) -> Option<Self> {
        (start != end).then_some(Self { start, end })
    }

    pub fn start(&self) -> GridPoint {
        self.start
    }

    pub fn end(&self) -> GridPoint {
        self.end
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.1 == self.end.1
    }

    /// Moves the end point forward, absorbing a collinear neighbour.
    pub fn extend(&mut self, end: GridPoint) {
        debug_assert_ne!(self.start, end, "extension would collapse the edge");
        self.end = end;
    }

    pub fn flip(&mut self) {
        core::mem::swap(&mut self.start, &mut self.end);
    }

    pub fn flipped(mut self) -> Self {
        self.flip();
        self
    }

    /// True when `other` starts where this edge ends.
    pub fn connects_to(&self, other: &BoundaryEdge) -> bool {
        other.start == self.end
    }

    /// True when `other` ends where this edge ends, i.e. it connects once flipped.
    pub fn connects_backwards(&self, other: &BoundaryEdge) -> bool {
        other.end == self.end
    }

    pub fn start_point(&self) -> Point2f {
        Point2f::new(self.start.0 as f32, self.start.1 as f32)
    }

    pub fn end_point(&self) -> Point2f {
        Point2f::new(self.end.0 as f32, self.end.1 as f32)
    }
}

impl fmt::Display for BoundaryEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} -> {}/{}",
            self.start.0, self.start.1, self.end.0, self.end.1
        )
    }
}

/// Top and bottom cell borders, scanned row by row.
pub fn extract_horizontal_edges(grid: &SilhouetteGrid) -> Vec<BoundaryEdge> {
    let (w, h) = (grid.width(), grid.height());
    let mut edges = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if !grid.is_set(x, y) {
                continue;
            }

            if y == 0 || !grid.is_set(x, y - 1) {
                push_or_extend(&mut edges, (x, y), (x + 1, y));
            }
            if y + 1 == h || !grid.is_set(x, y + 1) {
                push_or_extend(&mut edges, (x, y + 1), (x + 1, y + 1));
            }
        }
    }

    edges
}

/// Left and right cell borders, scanned column by column.
pub fn extract_vertical_edges(grid: &SilhouetteGrid) -> Vec<BoundaryEdge> {
    let (w, h) = (grid.width(), grid.height());
    let mut edges = Vec::new();

    for x in 0..w {
        for y in 0..h {
            if !grid.is_set(x, y) {
                continue;
            }

            if x == 0 || !grid.is_set(x - 1, y) {
                push_or_extend(&mut edges, (x, y), (x, y + 1));
            }
            if x + 1 == w || !grid.is_set(x + 1, y) {
                push_or_extend(&mut edges, (x + 1, y), (x + 1, y + 1));
            }
        }
    }

    edges
}

// The two sides of a run are emitted interleaved, so the edge to extend is
// either the newest one or the one right before it. Newest wins.
fn push_or_extend(edges: &mut Vec<BoundaryEdge>, start: GridPoint, end: GridPoint) {
    let n = edges.len();
    for back in 1..=2 {
        if n < back {
            break;
        }
        let candidate = &mut edges[n - back];
        if candidate.end == start {
            candidate.extend(end);
            return;
        }
    }

    edges.push(BoundaryEdge { start, end });
}
