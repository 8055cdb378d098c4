//! Ramer–Douglas–Peucker polyline reduction and grid-to-image scaling.

use sc_core::Point2f;

/// Distance from `p` to the infinite line through `a` and `b`.
///
/// Returns `None` when `a == b`.
pub fn perpendicular_distance(a: Point2f, b: Point2f, p: Point2f) -> Option<f32> {
    let chord = b - a;
    let len = chord.norm();
    if len == 0.0 {
        return None;
    }
    Some(chord.cross(p - a).abs() / len)
}

/// Distance from `p` to the closed segment `a`..`b`.
pub fn segment_distance(a: Point2f, b: Point2f, p: Point2f) -> f32 {
    let chord = b - a;
    let len2 = chord.dot(chord);
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(chord) / len2).clamp(0.0, 1.0);
    (p - (a + chord * t)).norm()
}

/// Simplifies `points[start..=end]` so that no dropped point lies farther
/// than `epsilon` from the segment that replaced it.
///
/// The split vertex is the one farthest from the chord's line. A span whose
/// points all hug that line is still split when one of them lies beyond the
/// chord's ends. The result always keeps `points[start]` and `points[end]`.
/// A sub-span whose endpoints coincide is returned unchanged. Out-of-range
/// indices yield an empty result.
pub fn simplify_polyline(
    points: &[Point2f],
    start: usize,
    end: usize,
    epsilon: f32,
) -> Vec<Point2f> {
    if end >= points.len() || start > end {
        return Vec::new();
    }
    if end - start < 2 {
        return points[start..=end].to_vec();
    }

    let (a, b) = (points[start], points[end]);
    let (mut dmax, mut index) = (0.0_f32, start);
    let (mut smax, mut overshoot) = (0.0_f32, start);
    for i in start + 1..end {
        let Some(d) = perpendicular_distance(a, b, points[i]) else {
            return points[start..=end].to_vec();
        };
        if d > dmax {
            dmax = d;
            index = i;
        }
        let s = segment_distance(a, b, points[i]);
        if s > smax {
            smax = s;
            overshoot = i;
        }
    }

    let split = if dmax > epsilon {
        index
    } else if smax > epsilon {
        overshoot
    } else {
        return vec![a, b];
    };

    let mut out = simplify_polyline(points, start, split, epsilon);
    out.pop();
    out.extend(simplify_polyline(points, split, end, epsilon));
    out
}

/// Simplifies a closed vertex ring.
///
/// The ring is cut at `points[0]` and the vertex farthest from it, and both
/// halves are simplified on their own, so the result starts at `points[0]`
/// and keeps both cut vertices. When that still leaves fewer than three
/// vertices (thin rectangles, unit cells) the ring is returned unchanged.
pub fn simplify_closed(points: &[Point2f], epsilon: f32) -> Vec<Point2f> {
    if points.len() < 4 {
        return points.to_vec();
    }

    let origin = points[0];
    let (mut far, mut dmax) = (0, 0.0_f32);
    for (i, &p) in points.iter().enumerate().skip(1) {
        let d = (p - origin).norm();
        if d > dmax {
            dmax = d;
            far = i;
        }
    }
    if far == 0 {
        return points.to_vec();
    }

    let mut out = simplify_polyline(points, 0, far, epsilon);
    out.pop();
    let mut back = points[far..].to_vec();
    back.push(origin);
    out.extend(simplify_polyline(&back, 0, back.len() - 1, epsilon));
    out.pop();

    if out.len() < 3 {
        return points.to_vec();
    }
    out
}

/// Maps grid-corner coordinates back to pixel coordinates.
pub fn fit_to_grid_size(points: &[Point2f], cell_size: usize) -> Vec<Point2f> {
    let factor = cell_size as f32;
    points.iter().map(|p| p.scaled(factor)).collect()
}

#[cfg(test)]
mod tests {
    use sc_core::Point2f;

    use super::{
        fit_to_grid_size, perpendicular_distance, segment_distance, simplify_closed,
        simplify_polyline,
    };

    fn pts(coords: &[(f32, f32)]) -> Vec<Point2f> {
        coords.iter().map(|&(x, y)| Point2f::new(x, y)).collect()
    }

    #[test]
    fn distance_to_horizontal_line() {
        let d = perpendicular_distance(
            Point2f::new(0.0, 0.0),
            Point2f::new(10.0, 0.0),
            Point2f::new(3.0, -4.0),
        );
        assert_eq!(d, Some(4.0));
        assert_eq!(
            perpendicular_distance(
                Point2f::new(1.0, 1.0),
                Point2f::new(1.0, 1.0),
                Point2f::new(0.0, 0.0)
            ),
            None
        );
    }

    #[test]
    fn collinear_points_collapse_to_endpoints() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (5.0, 0.0)]);
        assert_eq!(
            simplify_polyline(&line, 0, 3, 0.1),
            pts(&[(0.0, 0.0), (5.0, 0.0)])
        );
    }

    #[test]
    fn far_point_is_kept_once() {
        let line = pts(&[(0.0, 0.0), (1.0, 1.5), (2.0, 3.0), (3.0, 1.5), (4.0, 0.0)]);
        let out = simplify_polyline(&line, 0, 4, 0.5);
        assert_eq!(out, pts(&[(0.0, 0.0), (2.0, 3.0), (4.0, 0.0)]));
    }

    #[test]
    fn staircase_within_tolerance_becomes_a_diagonal() {
        let stairs = pts(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (2.0, 2.0),
            (2.0, 3.0),
            (3.0, 3.0),
        ]);
        let out = simplify_polyline(&stairs, 0, 6, 0.75);
        assert_eq!(out, pts(&[(0.0, 0.0), (3.0, 3.0)]));
    }

    /// Largest distance from any of `points` to the nearest segment of `out`.
    fn max_deviation(points: &[Point2f], out: &[Point2f], closed: bool) -> f32 {
        let mut segments = out.windows(2).map(|s| (s[0], s[1])).collect::<Vec<_>>();
        if let (true, Some(&first), Some(&last)) = (closed, out.first(), out.last()) {
            segments.push((last, first));
        }
        points
            .iter()
            .map(|&p| {
                segments
                    .iter()
                    .map(|&(a, b)| segment_distance(a, b, p))
                    .fold(f32::INFINITY, f32::min)
            })
            .fold(0.0, f32::max)
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let (a, b) = (Point2f::new(0.0, 0.0), Point2f::new(4.0, 0.0));
        assert_eq!(segment_distance(a, b, Point2f::new(2.0, 3.0)), 3.0);
        assert_eq!(segment_distance(a, b, Point2f::new(7.0, 4.0)), 5.0);
        assert_eq!(segment_distance(a, a, Point2f::new(0.0, 2.0)), 2.0);
    }

    #[test]
    fn error_bound_holds_for_wavy_line() {
        let wavy = (0..40)
            .map(|i| {
                let x = i as f32 * 0.5;
                Point2f::new(x, (x * 0.9).sin() * 2.0 + (x * 3.1).cos() * 0.3)
            })
            .collect::<Vec<_>>();

        for &eps in &[0.05_f32, 0.2, 0.5, 1.0, 3.0] {
            let out = simplify_polyline(&wavy, 0, wavy.len() - 1, eps);
            assert!(out.len() <= wavy.len());
            assert_eq!(out.first(), wavy.first());
            assert_eq!(out.last(), wavy.last());
            let d = max_deviation(&wavy, &out, false);
            assert!(d <= eps + 1e-4, "eps={eps} deviation={d}");
        }
    }

    #[test]
    fn point_past_the_chord_end_is_kept() {
        // (6, 0) sits on the chord's line but two units past its end.
        let line = pts(&[(0.0, 0.0), (6.0, 0.0), (4.0, 0.0)]);
        assert_eq!(simplify_polyline(&line, 0, 2, 1.0), line);
    }

    #[test]
    fn spur_in_grid_ring_stays_within_tolerance() {
        let ring = pts(&[
            (4.0, 7.0),
            (4.0, 8.0),
            (5.0, 8.0),
            (5.0, 9.0),
            (6.0, 9.0),
            (6.0, 5.0),
            (5.0, 5.0),
            (5.0, 7.0),
        ]);
        let out = simplify_closed(&ring, 1.0);
        assert!(out.len() >= 3);
        assert!(out.len() <= ring.len());
        let d = max_deviation(&ring, &out, true);
        assert!(d <= 1.0 + 1e-4, "deviation={d}");
    }

    #[test]
    fn coincident_endpoints_keep_span() {
        let ring = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]);
        assert_eq!(simplify_polyline(&ring, 0, 3, 10.0), ring);
    }

    #[test]
    fn rings_that_would_collapse_are_left_alone() {
        let square = pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        assert_eq!(simplify_closed(&square, 0.75), square);
        assert_eq!(simplify_closed(&square, 5.0), square);

        let bar = pts(&[(0.0, 0.0), (0.0, 1.0), (3.0, 1.0), (3.0, 0.0)]);
        assert_eq!(simplify_closed(&bar, 1.0), bar);
    }

    #[test]
    fn closed_ring_drops_shallow_notch() {
        // 3x1 bar with a one-cell bump on top of the middle cell.
        let ring = pts(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (2.0, 2.0),
            (2.0, 1.0),
            (3.0, 1.0),
            (3.0, 0.0),
        ]);
        let out = simplify_closed(&ring, 1.0);
        assert!(out.len() >= 3);
        assert!(out.len() < ring.len());
        assert_eq!(out.first(), ring.first());
        assert!(out.contains(&Point2f::new(3.0, 1.0)));
        assert!(max_deviation(&ring, &out, true) <= 1.0 + 1e-4);
    }

    #[test]
    fn t_shaped_ring_keeps_an_area() {
        let ring = pts(&[
            (2.0, 2.0),
            (2.0, 3.0),
            (5.0, 3.0),
            (5.0, 2.0),
            (4.0, 2.0),
            (4.0, 1.0),
            (3.0, 1.0),
            (3.0, 2.0),
        ]);
        let out = simplify_closed(&ring, 1.0);
        assert!(out.len() >= 3, "{out:?}");
        assert!(out.contains(&Point2f::new(5.0, 3.0)));
        assert!(max_deviation(&ring, &out, true) <= 1.0 + 1e-4);
    }

    #[test]
    fn degenerate_ranges() {
        let line = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(simplify_polyline(&line, 0, 5, 1.0).is_empty());
        assert!(simplify_polyline(&line, 1, 0, 1.0).is_empty());
        assert_eq!(simplify_polyline(&line, 1, 1, 1.0), pts(&[(1.0, 1.0)]));
        assert!(simplify_closed(&[], 1.0).is_empty());
    }

    #[test]
    fn scale_up_multiplies_by_cell_size() {
        let out = fit_to_grid_size(&pts(&[(1.0, 2.0), (0.0, 3.5)]), 10);
        assert_eq!(out, pts(&[(10.0, 20.0), (0.0, 35.0)]));
    }
}
