//! Polygon-set collision between two placed sprite looks.
//!
//! A query first rejects on visibility and hit-box overlap, then looks for
//! any edge crossing between the two polygon sets, and finally falls back to
//! even–odd containment of one representative vertex per polygon so that a
//! shape fully inside another still collides while one sitting in a hole
//! does not.
//!
//! Every function here is pure and safe to call from several threads at once.

mod predicates;
mod tester;

pub use predicates::{
    contained_with_odd_parity, intersect_polygons, point_in_polygon, polygons_collide,
    segment_intersects_polygon,
};
pub use tester::{PlacedOutline, check_collision_between_looks, collides};
