use core::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, rhs: Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Add<Vec2f> for Point2f {
    type Output = Point2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        Point2f {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Point2f> for Point2f {
    type Output = Vec2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Vec2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2f {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Axis-aligned rectangle anchored at its lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect2f {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect2f {
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2f>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    /// Strict overlap: rectangles that only share a border do not overlap.
    pub fn overlaps(&self, other: &Rect2f) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn union(&self, other: &Rect2f) -> Rect2f {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Rect2f {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }
}

/// Placement of a shape in world space.
///
/// Vertices are scaled and rotated (degrees, counter-clockwise) around
/// `origin`, then shifted by `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2f {
    pub position: Vec2f,
    pub origin: Point2f,
    pub scale: Vec2f,
    pub rotation_deg: f32,
}

impl Default for Transform2f {
    fn default() -> Self {
        Self {
            position: Vec2f::default(),
            origin: Point2f::default(),
            scale: Vec2f { x: 1.0, y: 1.0 },
            rotation_deg: 0.0,
        }
    }
}

impl Transform2f {
    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            position: Vec2f { x, y },
            ..Self::default()
        }
    }

    pub fn apply(&self, p: Point2f) -> Point2f {
        let mut x = p.x - self.origin.x;
        let mut y = p.y - self.origin.y;
        x *= self.scale.x;
        y *= self.scale.y;

        if self.rotation_deg != 0.0 {
            let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
            let old_x = x;
            x = cos * x - sin * y;
            y = sin * old_x + cos * y;
        }

        Point2f {
            x: self.position.x + x + self.origin.x,
            y: self.position.y + y + self.origin.y,
        }
    }
}

/// Closed polygon; the last vertex implicitly connects back to the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon2f {
    pub points: Vec<Point2f>,
}

impl Polygon2f {
    pub fn new(points: Vec<Point2f>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over `(start, end)` of every edge, including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = (Point2f, Point2f)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn transformed(&self, t: &Transform2f) -> Polygon2f {
        Polygon2f {
            points: self.points.iter().map(|&p| t.apply(p)).collect(),
        }
    }

    pub fn bounds(&self) -> Option<Rect2f> {
        Rect2f::from_points(self.points.iter().copied())
    }
}
