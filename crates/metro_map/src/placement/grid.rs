//! Lattice enumeration and the pool of unused candidate points.
use glam::Vec2;
use tracing::warn;

/// Axis-aligned lattice of points `min + spacing * (i, j)` strictly below `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    pub min: Vec2,
    pub max: Vec2,
    pub spacing: f32,
}

impl Lattice {
    pub fn new(min: Vec2, max: Vec2, spacing: f32) -> Self {
        Self { min, max, spacing }
    }

    /// Lattice points, columns first (all `y` for the first `x`, then the next `x`).
    ///
    /// A non-positive or non-finite spacing yields no points.
    pub fn points(&self) -> Vec<Vec2> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            warn!("Lattice spacing {} is not positive; no points.", self.spacing);
            return Vec::new();
        }

        let cols = axis_count(self.min.x, self.max.x, self.spacing);
        let rows = axis_count(self.min.y, self.max.y, self.spacing);
        let mut points = Vec::with_capacity(cols * rows);
        for i in 0..cols {
            let x = self.min.x + i as f32 * self.spacing;
            for j in 0..rows {
                points.push(Vec2::new(x, self.min.y + j as f32 * self.spacing));
            }
        }
        points
    }
}

/// Number of samples `min + k * step` with value `< max`.
fn axis_count(min: f32, max: f32, step: f32) -> usize {
    if max <= min {
        return 0;
    }
    let n = ((max - min) / step).ceil() as usize;
    // Guard against rounding producing a sample equal to `max`.
    if n > 0 && min + (n - 1) as f32 * step >= max {
        n - 1
    } else {
        n
    }
}

/// Unused candidate points for station placement.
///
/// The set only shrinks: a point leaves when a station is created on it and never comes
/// back. Iteration order is the insertion order, so seeded selections are reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCandidates {
    points: Vec<Vec2>,
}

impl GridCandidates {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn from_lattice(lattice: &Lattice) -> Self {
        Self::from_points(lattice.points())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Vec2] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.points.contains(&p)
    }

    /// Keep only points matching `keep`.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(Vec2) -> bool) {
        self.points.retain(|p| keep(*p));
    }

    /// Remove and return the point at `index`, keeping the order of the rest.
    pub(crate) fn take(&mut self, index: usize) -> Vec2 {
        self.points.remove(index)
    }
}
