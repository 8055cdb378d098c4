use sc_core::{Point2f, Polygon2f};

/// True when segment `a -> b` touches any edge of `polygon`.
///
/// Both segment parameters are tested inclusively, so touching an endpoint
/// counts. Parallel and collinear edges never intersect.
pub fn segment_intersects_polygon(a: Point2f, b: Point2f, polygon: &Polygon2f) -> bool {
    polygon.edges().any(|(c, d)| segments_intersect(a, b, c, d))
}

fn segments_intersect(a: Point2f, b: Point2f, c: Point2f, d: Point2f) -> bool {
    let r = b - a;
    let s = d - c;
    let denom = s.y * r.x - s.x * r.y;
    if denom == 0.0 {
        return false;
    }

    let ac = a - c;
    let ua = (s.x * ac.y - s.y * ac.x) / denom;
    if !(0.0..=1.0).contains(&ua) {
        return false;
    }
    let ub = (r.x * ac.y - r.y * ac.x) / denom;
    (0.0..=1.0).contains(&ub)
}

/// Even–odd ray cast towards `-x`.
///
/// Each edge counts when it straddles `p.y` half-open (one end strictly
/// below, the other at or above) and crosses the ray left of `p.x`.
pub fn point_in_polygon(p: Point2f, polygon: &Polygon2f) -> bool {
    let mut inside = false;
    for (pi, pj) in polygon.edges() {
        let straddles = (pi.y < p.y && pj.y >= p.y) || (pj.y < p.y && pi.y >= p.y);
        if straddles && pi.x + (p.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x) < p.x {
            inside = !inside;
        }
    }
    inside
}

/// True when any edge of `a`, including its closing edge, crosses `b`.
pub fn intersect_polygons(a: &Polygon2f, b: &Polygon2f) -> bool {
    a.edges().any(|(s, e)| segment_intersects_polygon(s, e, b))
}

/// True when the first vertex of some polygon in `inner` lies inside an odd
/// number of polygons of `outer`.
///
/// Odd depth means the vertex is in filled area; even depth means it sits in
/// a hole (or outside everything).
pub fn contained_with_odd_parity(inner: &[Polygon2f], outer: &[Polygon2f]) -> bool {
    inner.iter().any(|polygon| {
        let Some(&probe) = polygon.points.first() else {
            return false;
        };
        let depth = outer.iter().filter(|o| point_in_polygon(probe, o)).count();
        depth % 2 == 1
    })
}

/// Full polygon-set test without any bounding-box shortcut: an edge
/// crossing between any pair, or odd-parity nesting either way round.
pub fn polygons_collide(a: &[Polygon2f], b: &[Polygon2f]) -> bool {
    let crossing = a
        .iter()
        .any(|pa| b.iter().any(|pb| intersect_polygons(pa, pb)));

    crossing || contained_with_odd_parity(a, b) || contained_with_odd_parity(b, a)
}
