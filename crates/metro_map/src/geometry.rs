//! Small 2D helpers shared by the curve generator, the river polygon and the validator.
use glam::Vec2;

/// Points closer than this are treated as coincident.
pub const COINCIDENT_EPSILON: f32 = 1e-4;

/// `n` evenly spaced values from `start` to `end` inclusive.
///
/// A single sample yields `[start]`; zero samples yield an empty vector.
pub fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f32;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f32 })
                .collect()
        }
    }
}

/// Closest point to `p` on the segment `a..b`.
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

/// Euclidean distance from `p` to the segment `a..b`.
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// Distance from `p` to the nearest point of an open polyline.
///
/// Returns `f32::INFINITY` for an empty polyline.
pub fn distance_to_polyline(p: Vec2, points: &[Vec2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => p.distance(*only),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Distance from `p` to the rectangle swept by segment `a..b` with half-width `radius`
/// and flat ends at `a` and `b`. Zero inside.
pub fn distance_to_flat_capsule(p: Vec2, a: Vec2, b: Vec2, radius: f32) -> f32 {
    let ab = b - a;
    let len = ab.length();
    if len <= COINCIDENT_EPSILON {
        return (p.distance(a) - radius).max(0.0);
    }
    let along = ab / len;
    let across = along.perp();
    let rel = p - a;
    let t = rel.dot(along);
    let s = rel.dot(across);
    let dx = (-t).max(t - len).max(0.0);
    let dy = (s.abs() - radius).max(0.0);
    (dx * dx + dy * dy).sqrt()
}

/// Drops consecutive points closer than [`COINCIDENT_EPSILON`].
pub fn dedup_consecutive(points: &[Vec2]) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(points.len());
    for &p in points {
        if out
            .last()
            .is_none_or(|last| last.distance(p) > COINCIDENT_EPSILON)
        {
            out.push(p);
        }
    }
    out
}
