use sc_core::{Polygon2f, Rect2f, Transform2f};
use sc_outline::Outline;

use crate::predicates::polygons_collide;

/// One look's collision shape in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOutline {
    pub polygons: Vec<Polygon2f>,
    /// Fast-reject box; defaults to the bounds of `polygons`.
    pub hit_box: Option<Rect2f>,
    pub visible: bool,
}

impl PlacedOutline {
    /// Applies `transform` to every vertex of `outline`.
    pub fn new(outline: &Outline, transform: &Transform2f, visible: bool) -> Self {
        let world = outline.transformed(transform);
        Self {
            hit_box: world.bounds(),
            polygons: world.polygons,
            visible,
        }
    }

    /// Overrides the fast-reject box, e.g. with the look's transformed image rectangle.
    pub fn with_hit_box(mut self, hit_box: Rect2f) -> Self {
        self.hit_box = Some(hit_box);
        self
    }
}

/// Boolean collision between two placed looks.
///
/// Invisible looks and looks whose hit boxes do not overlap never collide;
/// only then are the polygon sets compared.
pub fn collides(a: &PlacedOutline, b: &PlacedOutline) -> bool {
    if !a.visible || !b.visible {
        return false;
    }
    match (a.hit_box, b.hit_box) {
        (Some(ra), Some(rb)) if ra.overlaps(&rb) => polygons_collide(&a.polygons, &b.polygons),
        _ => false,
    }
}

/// [`collides`] as the numeric signal used by scripts: `1.0` or `0.0`.
pub fn check_collision_between_looks(a: &PlacedOutline, b: &PlacedOutline) -> f64 {
    if collides(a, b) { 1.0 } else { 0.0 }
}
