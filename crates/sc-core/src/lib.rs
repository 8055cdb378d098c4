//! Shared primitives for sprite outline extraction and collision queries.
//!
//! ## Coordinate Spaces
//! Image space has its origin at the top-left pixel with `y` growing down.
//! Outlines are usually produced in sprite space, which is image space
//! mirrored vertically so that `y` grows up.
//!
//! ## Polygons
//! [`Polygon2f`] is always closed: the last vertex connects back to the
//! first. [`Transform2f`] places a polygon in world space using scale and
//! rotation about an origin followed by a translation.

mod error;
mod geom;
mod image;

pub use error::Error;
pub use geom::{Point2f, Polygon2f, Rect2f, Transform2f, Vec2f};
pub use image::Image;
