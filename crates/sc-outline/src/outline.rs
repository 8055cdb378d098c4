use sc_core::{Polygon2f, Rect2f, Transform2f};

/// Simplified collision shape of one image: zero or more closed polygons.
///
/// Polygons may be disjoint parts or holes; which is which follows from
/// even–odd nesting, not from winding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    pub polygons: Vec<Polygon2f>,
}

impl Outline {
    pub fn new(polygons: Vec<Polygon2f>) -> Self {
        Self { polygons }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(Polygon2f::len).sum()
    }

    /// Axis-aligned box around every vertex, `None` without vertices.
    pub fn bounds(&self) -> Option<Rect2f> {
        self.polygons
            .iter()
            .filter_map(Polygon2f::bounds)
            .reduce(|a, b| a.union(&b))
    }

    pub fn transformed(&self, t: &Transform2f) -> Self {
        Self {
            polygons: self.polygons.iter().map(|p| p.transformed(t)).collect(),
        }
    }
}
