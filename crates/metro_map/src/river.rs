//! River polygon: the centerline thickened into an obstacle region.
//!
//! The region is the constant-radius buffer of the centerline with round joins and flat
//! end caps. Membership and distance queries are answered analytically from the
//! centerline segments, so they do not depend on how finely the boundary ring is sampled.
//! The ring itself is produced for collaborators that draw the river.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{
    dedup_consecutive, distance_to_flat_capsule, distance_to_segment, linspace,
};

/// Angular step used when sampling round joins on the outer side of a bend.
const JOIN_ARC_STEP: f32 = std::f32::consts::PI / 32.0;

/// Overlap shallower than this does not hide a boundary piece.
const COVER_EPSILON: f32 = 1e-4;

/// Visible boundary pieces shorter than this are dropped.
const MIN_PIECE_LENGTH: f32 = 1e-3;

/// Largest gap bridged when chaining boundary pieces into rings.
const CHAIN_TOLERANCE: f32 = 1.0;

/// Rings enclosing less area than this are discarded.
const MIN_RING_AREA: f32 = 1.0;

/// River width at its start, middle and end.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThicknessProfile {
    pub start: f32,
    pub middle: f32,
    pub end: f32,
}

impl Default for ThicknessProfile {
    fn default() -> Self {
        Self {
            start: 10.0,
            middle: 30.0,
            end: 15.0,
        }
    }
}

impl ThicknessProfile {
    pub fn new(start: f32, middle: f32, end: f32) -> Self {
        Self { start, middle, end }
    }

    /// Per-sample thickness for a centerline of `num_points` points: a ramp from `start` to
    /// `middle` over the first half followed by a ramp from `middle` to `end`.
    ///
    /// Only the maximum feeds the buffer today; see [`ThicknessProfile::buffer_radius`].
    pub fn interpolate(&self, num_points: usize) -> Vec<f32> {
        let half = num_points / 2;
        let mut values = linspace(self.start, self.middle, half);
        values.extend(linspace(self.middle, self.end, half));
        values
    }

    /// Radius of the uniform buffer: the largest interpolated thickness, or `None` when the
    /// centerline is too short to interpolate over.
    pub fn buffer_radius(&self, num_points: usize) -> Option<f32> {
        self.interpolate(num_points)
            .into_iter()
            .reduce(f32::max)
    }
}

/// Closed obstacle region around a river centerline.
///
/// An empty polygon means "no river": it contains nothing and every point is infinitely far away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiverPolygon {
    centerline: Vec<Vec2>,
    radius: f32,
    ring: Vec<Vec2>,
    holes: Vec<Vec<Vec2>>,
}

impl RiverPolygon {
    /// A polygon with no area.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Buffer `centerline` by `radius` with flat caps.
    ///
    /// Falls back to [`RiverPolygon::empty`] for fewer than two distinct points, a zero-length
    /// line, or a non-positive radius.
    pub fn buffer(centerline: &[Vec2], radius: f32) -> Self {
        let points = dedup_consecutive(centerline);
        if points.len() < 2 {
            warn!(
                "River centerline has {} distinct point(s); using an empty polygon.",
                points.len()
            );
            return Self::empty();
        }
        if !radius.is_finite() || radius <= 0.0 {
            warn!("River buffer radius {radius} is not positive; using an empty polygon.");
            return Self::empty();
        }

        let pieces: Vec<(Vec2, Vec2)> = boundary_candidates(&points, radius)
            .iter()
            .flat_map(|piece| visible_parts(piece, &points, radius))
            .collect();
        let mut rings = chain_rings(&pieces);
        rings.retain(|r| signed_area(r).abs() > MIN_RING_AREA);

        let outer = rings
            .iter()
            .enumerate()
            .max_by(|a, b| signed_area(a.1).abs().total_cmp(&signed_area(b.1).abs()))
            .map(|(i, _)| i);
        let ring = outer.map(|i| rings.swap_remove(i)).unwrap_or_default();
        debug!(
            "River polygon: {} points, radius {radius}, {} ring vertices, {} hole(s).",
            points.len(),
            ring.len(),
            rings.len()
        );

        Self {
            centerline: points,
            radius,
            ring,
            holes: rings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.centerline.len() < 2
    }

    /// Buffer distance around the centerline.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// The centerline the polygon was built from, without repeated points.
    pub fn centerline(&self) -> &[Vec2] {
        &self.centerline
    }

    /// Outer boundary vertices in order; the ring closes implicitly from the last back to the
    /// first.
    pub fn ring(&self) -> &[Vec2] {
        &self.ring
    }

    /// Boundaries of land pockets fully enclosed by the river, in the same form as [`ring`].
    ///
    /// [`ring`]: RiverPolygon::ring
    pub fn holes(&self) -> &[Vec<Vec2>] {
        &self.holes
    }

    /// Shortest distance from `p` to the region; zero inside, infinite for an empty polygon.
    pub fn distance(&self, p: Vec2) -> f32 {
        if self.is_empty() {
            return f32::INFINITY;
        }

        let bands = self
            .centerline
            .windows(2)
            .map(|w| distance_to_flat_capsule(p, w[0], w[1], self.radius));
        let joins = self.centerline[1..self.centerline.len() - 1]
            .iter()
            .map(|v| (p.distance(*v) - self.radius).max(0.0));

        bands.chain(joins).fold(f32::INFINITY, f32::min)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        !self.is_empty() && self.distance(p) <= 0.0
    }
}

/// Build the river polygon for a centerline and a thickness profile.
///
/// The per-sample profile is computed but only its maximum is used, giving a uniform width.
pub fn build_river_polygon(centerline: &[Vec2], thickness: &ThicknessProfile) -> RiverPolygon {
    match thickness.buffer_radius(centerline.len()) {
        Some(radius) => RiverPolygon::buffer(centerline, radius),
        None => {
            warn!(
                "River centerline has {} point(s); using an empty polygon.",
                centerline.len()
            );
            RiverPolygon::empty()
        }
    }
}

/// Component of the buffered region: the flat band around a segment or the round join at an
/// interior vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Part {
    Band(usize),
    Join(usize),
}

/// Straight piece of a component outline, oriented with the region on its right.
#[derive(Clone, Copy, Debug)]
struct Piece {
    from: Vec2,
    to: Vec2,
    owner: Part,
}

/// Every outline piece that can appear on the region boundary: both long sides of each band,
/// the outer-bend join arcs and the two end caps. Band ends at interior vertices always lie
/// inside the join disk and are left out.
fn boundary_candidates(points: &[Vec2], radius: f32) -> Vec<Piece> {
    let last = points.len() - 1;
    let mut pieces = Vec::with_capacity(points.len() * 4);

    side_pieces(points, radius, false, &mut pieces);
    let n_end = (points[last] - points[last - 1]).normalize().perp();
    pieces.push(Piece {
        from: points[last] + n_end * radius,
        to: points[last] - n_end * radius,
        owner: Part::Band(last - 1),
    });

    side_pieces(points, radius, true, &mut pieces);
    let n_start = (points[1] - points[0]).normalize().perp();
    pieces.push(Piece {
        from: points[0] - n_start * radius,
        to: points[0] + n_start * radius,
        owner: Part::Band(0),
    });

    pieces
}

/// Left-hand outline of `points` (walked backwards when `reversed`): band sides plus round
/// joins where the left side is the outer side of the bend. Owners use forward indices.
fn side_pieces(points: &[Vec2], radius: f32, reversed: bool, out: &mut Vec<Piece>) {
    let n = points.len();
    let at = |i: usize| if reversed { points[n - 1 - i] } else { points[i] };
    let band = |k: usize| if reversed { n - 2 - k } else { k };
    let join = |i: usize| if reversed { n - 1 - i } else { i };
    let normal = |k: usize| (at(k + 1) - at(k)).normalize().perp();

    for k in 0..n - 1 {
        let n_here = normal(k);
        out.push(Piece {
            from: at(k) + n_here * radius,
            to: at(k + 1) + n_here * radius,
            owner: Part::Band(band(k)),
        });
        if k + 2 >= n {
            continue;
        }

        let vertex = at(k + 1);
        let turn = (at(k + 1) - at(k)).perp_dot(at(k + 2) - at(k + 1));
        if turn >= 0.0 {
            continue;
        }
        let n_next = normal(k + 1);
        let a0 = n_here.to_angle();
        let delta = wrap_angle(n_next.to_angle() - a0);
        let steps = ((delta.abs() / JOIN_ARC_STEP).ceil() as usize).max(1);
        let mut prev = vertex + n_here * radius;
        for step in 1..=steps {
            let next = if step == steps {
                vertex + n_next * radius
            } else {
                vertex + Vec2::from_angle(a0 + delta * (step as f32 / steps as f32)) * radius
            };
            out.push(Piece {
                from: prev,
                to: next,
                owner: Part::Join(join(k + 1)),
            });
            prev = next;
        }
    }
}

/// Parts of `piece` not strictly inside any other component.
fn visible_parts(piece: &Piece, points: &[Vec2], radius: f32) -> Vec<(Vec2, Vec2)> {
    let e = piece.to - piece.from;
    let length = e.length();
    if length <= MIN_PIECE_LENGTH {
        return Vec::new();
    }
    let mid = piece.from + e * 0.5;
    let reach = radius + length * 0.5;
    let inner = radius - COVER_EPSILON;

    let mut hidden: Vec<(f32, f32)> = Vec::new();
    for k in 0..points.len() - 1 {
        if piece.owner == Part::Band(k) {
            continue;
        }
        let (a, b) = (points[k], points[k + 1]);
        if distance_to_segment(mid, a, b) > reach {
            continue;
        }
        let seg_len = a.distance(b);
        let along = (b - a) / seg_len;
        let across = along.perp();
        let rel = piece.from - a;
        let (t0, tu) = (rel.dot(along), e.dot(along));
        let (s0, su) = (rel.dot(across), e.dot(across));

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        restrict_positive(t0 - COVER_EPSILON, tu, &mut lo, &mut hi);
        restrict_positive(seg_len - COVER_EPSILON - t0, -tu, &mut lo, &mut hi);
        restrict_positive(inner - s0, -su, &mut lo, &mut hi);
        restrict_positive(inner + s0, su, &mut lo, &mut hi);
        if lo < hi {
            hidden.push((lo, hi));
        }
    }

    for i in 1..points.len() - 1 {
        if piece.owner == Part::Join(i) {
            continue;
        }
        let v = points[i];
        if mid.distance(v) > reach {
            continue;
        }
        let w = piece.from - v;
        let qa = e.length_squared();
        let qb = 2.0 * w.dot(e);
        let qc = w.length_squared() - inner * inner;
        let disc = qb * qb - 4.0 * qa * qc;
        if disc <= 0.0 {
            continue;
        }
        let root = disc.sqrt();
        let lo = ((-qb - root) / (2.0 * qa)).max(0.0);
        let hi = ((-qb + root) / (2.0 * qa)).min(1.0);
        if lo < hi {
            hidden.push((lo, hi));
        }
    }

    hidden.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut visible = Vec::new();
    let mut cursor = 0.0f32;
    for (lo, hi) in hidden {
        if lo > cursor {
            visible.push((cursor, lo));
        }
        cursor = cursor.max(hi);
    }
    if cursor < 1.0 {
        visible.push((cursor, 1.0));
    }

    visible
        .into_iter()
        .filter(|(lo, hi)| (hi - lo) * length >= MIN_PIECE_LENGTH)
        .map(|(lo, hi)| (piece.from + e * lo, piece.from + e * hi))
        .collect()
}

/// Narrow `[lo, hi]` to the parameters `u` where `c0 + u * c1 > 0`.
fn restrict_positive(c0: f32, c1: f32, lo: &mut f32, hi: &mut f32) {
    if c1.abs() <= f32::EPSILON {
        if c0 <= 0.0 {
            *hi = *lo;
        }
        return;
    }
    let root = -c0 / c1;
    if c1 > 0.0 {
        *lo = lo.max(root);
    } else {
        *hi = hi.min(root);
    }
}

/// Link oriented pieces end to start into closed rings.
fn chain_rings(pieces: &[(Vec2, Vec2)]) -> Vec<Vec<Vec2>> {
    let mut used = vec![false; pieces.len()];
    let mut rings = Vec::new();

    for first in 0..pieces.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let (start, mut end) = pieces[first];
        let mut ring = vec![start];
        push_distinct(&mut ring, end);

        loop {
            let closing = end.distance(start);
            let next = used
                .iter()
                .enumerate()
                .filter(|(_, taken)| !**taken)
                .map(|(j, _)| (j, pieces[j].0.distance(end)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match next {
                Some((j, gap)) if gap <= CHAIN_TOLERANCE && gap < closing => {
                    used[j] = true;
                    push_distinct(&mut ring, pieces[j].0);
                    push_distinct(&mut ring, pieces[j].1);
                    end = pieces[j].1;
                }
                _ => {
                    if closing > CHAIN_TOLERANCE {
                        debug!("River boundary chain left open by {closing}; closing it.");
                    }
                    break;
                }
            }
        }

        if ring.len() > 1 && ring[ring.len() - 1].distance(ring[0]) <= MIN_PIECE_LENGTH {
            ring.pop();
        }
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }

    rings
}

fn push_distinct(ring: &mut Vec<Vec2>, p: Vec2) {
    if ring.last().is_none_or(|last| last.distance(p) > MIN_PIECE_LENGTH) {
        ring.push(p);
    }
}

/// Shoelace area; the sign follows the winding.
fn signed_area(ring: &[Vec2]) -> f32 {
    let n = ring.len();
    (0..n)
        .map(|i| ring[i].perp_dot(ring[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Wrap an angle into `(-PI, PI]`.
fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = a % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}
