//! River centerline generation.
//!
//! A centerline is a polyline that enters the map through one border of the bounding
//! rectangle and leaves through a different one. Both ends sit `offset` units outside the
//! rectangle so the river visibly crosses the whole playable area.
//!
//! The shape between the two ends is selected by [`CurveType`]:
//! - [`CurveType::Linear`]: straight interpolation.
//! - [`CurveType::Parabolic`]: a parabola through start, end and a vertically perturbed midpoint.
//! - [`CurveType::Sine`] / [`CurveType::Cosine`]: the straight line plus an oscillation whose
//!   wavelength is half the horizontal span. The oscillation is shifted so it is zero at both
//!   ends, keeping the endpoints on their borders.
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geometry::{linspace, COINCIDENT_EPSILON};
use crate::random::{int_inclusive, pick_index, uniform};

pub const DEFAULT_CENTERLINE_POINTS: usize = 100;

/// Range of the random vertical displacement of the parabola's midpoint.
pub const PARABOLA_MID_PERTURBATION: f32 = 50.0;
pub const OSCILLATION_AMPLITUDE_MIN: f32 = 20.0;
pub const OSCILLATION_AMPLITUDE_MAX: f32 = 50.0;

/// Shape family of a river centerline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CurveType {
    Linear,
    Parabolic,
    Sine,
    Cosine,
}

impl CurveType {
    pub const ALL: [CurveType; 4] = [
        CurveType::Linear,
        CurveType::Parabolic,
        CurveType::Sine,
        CurveType::Cosine,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CurveType::Linear => "linear",
            CurveType::Parabolic => "parabolic",
            CurveType::Sine => "sine",
            CurveType::Cosine => "cosine",
        }
    }

    /// Pick a curve type uniformly at random.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::ALL[pick_index(rng, Self::ALL.len())]
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown curve type '{s}'")))
    }
}

/// One side of the bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Border {
    Top,
    Bottom,
    Left,
    Right,
}

impl Border {
    pub const ALL: [Border; 4] = [Border::Top, Border::Bottom, Border::Left, Border::Right];

    /// Draw a start and a distinct end border.
    pub fn random_pair(rng: &mut dyn RngCore) -> (Border, Border) {
        let start = Self::ALL[pick_index(rng, Self::ALL.len())];
        let remaining: Vec<Border> = Self::ALL.into_iter().filter(|b| *b != start).collect();
        let end = remaining[pick_index(rng, remaining.len())];
        (start, end)
    }

    /// Random entry point on this border, drawn from the first half of the side.
    fn start_point(self, width: u32, height: u32, offset: u32, rng: &mut dyn RngCore) -> Vec2 {
        let (w, h, o) = (width as i64, height as i64, offset as i64);
        let (wf, hf, of) = (width as f32, height as f32, offset as f32);
        match self {
            Border::Top => Vec2::new(int_inclusive(rng, -o, w / 2) as f32, -of),
            Border::Bottom => Vec2::new(int_inclusive(rng, -o, w / 2) as f32, hf + of),
            Border::Left => Vec2::new(-of, int_inclusive(rng, -o, h / 2) as f32),
            Border::Right => Vec2::new(wf + of, int_inclusive(rng, -o, h / 2) as f32),
        }
    }

    /// Random exit point on this border, drawn from the second half of the side.
    fn end_point(self, width: u32, height: u32, offset: u32, rng: &mut dyn RngCore) -> Vec2 {
        let (w, h, o) = (width as i64, height as i64, offset as i64);
        let (wf, hf, of) = (width as f32, height as f32, offset as f32);
        match self {
            Border::Top => Vec2::new(int_inclusive(rng, w / 2, w + o) as f32, -of),
            Border::Bottom => Vec2::new(int_inclusive(rng, w / 2, w + o) as f32, hf + of),
            Border::Left => Vec2::new(-of, int_inclusive(rng, h / 2, h + o) as f32),
            Border::Right => Vec2::new(wf + of, int_inclusive(rng, h / 2, h + o) as f32),
        }
    }

    /// Whether `p` lies on this side of the rectangle expanded by `offset`.
    pub fn contains(self, p: Vec2, width: u32, height: u32, offset: u32, tolerance: f32) -> bool {
        let o = offset as f32;
        match self {
            Border::Top => (p.y + o).abs() <= tolerance,
            Border::Bottom => (p.y - (height as f32 + o)).abs() <= tolerance,
            Border::Left => (p.x + o).abs() <= tolerance,
            Border::Right => (p.x - (width as f32 + o)).abs() <= tolerance,
        }
    }
}

/// A generated river centerline.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    pub points: Vec<Vec2>,
    pub start_border: Border,
    pub end_border: Border,
    pub curve_type: CurveType,
}

impl Centerline {
    pub fn first(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// Total polyline length.
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// Generate a centerline crossing a `width` x `height` rectangle.
///
/// Fails with [`Error::InvalidConfig`] when fewer than two points are requested.
pub fn generate_centerline(
    width: u32,
    height: u32,
    offset: u32,
    curve_type: CurveType,
    num_points: usize,
    rng: &mut dyn RngCore,
) -> Result<Centerline> {
    if num_points < 2 {
        return Err(Error::InvalidConfig(format!(
            "centerline needs at least 2 points, got {num_points}"
        )));
    }

    let (start_border, end_border) = Border::random_pair(rng);
    let start = start_border.start_point(width, height, offset, rng);
    let end = end_border.end_point(width, height, offset, rng);
    debug!(
        "Centerline {curve_type}: {start_border:?} {start} -> {end_border:?} {end}, {num_points} points."
    );

    let mut points = match curve_type {
        CurveType::Linear => linear(start, end, num_points),
        CurveType::Parabolic => parabolic(start, end, num_points, rng),
        CurveType::Sine => oscillating(start, end, num_points, f32::sin, rng),
        CurveType::Cosine => oscillating(start, end, num_points, f32::cos, rng),
    };

    // Pin the ends so rounding never moves them off their borders.
    points[0] = start;
    points[num_points - 1] = end;

    Ok(Centerline {
        points,
        start_border,
        end_border,
        curve_type,
    })
}

fn linear(start: Vec2, end: Vec2, n: usize) -> Vec<Vec2> {
    linspace(start.x, end.x, n)
        .into_iter()
        .zip(linspace(start.y, end.y, n))
        .map(|(x, y)| Vec2::new(x, y))
        .collect()
}

/// Parabola through `start`, `end` and the midpoint raised or lowered by up to
/// [`PARABOLA_MID_PERTURBATION`]. Written in vertex-relative form around the midpoint:
/// `y = a (x - mx)^2 + b (x - mx) + my`.
fn parabolic(start: Vec2, end: Vec2, n: usize, rng: &mut dyn RngCore) -> Vec<Vec2> {
    let mid_x = (start.x + end.x) / 2.0;
    let mid_y = (start.y + end.y) / 2.0
        + uniform(rng, -PARABOLA_MID_PERTURBATION, PARABOLA_MID_PERTURBATION);

    let half_span = mid_x - start.x;
    if half_span.abs() <= COINCIDENT_EPSILON {
        warn!("Parabolic centerline has no horizontal span; falling back to linear.");
        return linear(start, end, n);
    }

    let a = (start.y - 2.0 * mid_y + end.y) / (2.0 * half_span * half_span);
    let b = (end.y - start.y) / (2.0 * half_span);

    linspace(start.x, end.x, n)
        .into_iter()
        .map(|x| {
            let dx = x - mid_x;
            Vec2::new(x, a * dx * dx + b * dx + mid_y)
        })
        .collect()
}

fn oscillating(
    start: Vec2,
    end: Vec2,
    n: usize,
    wave: fn(f32) -> f32,
    rng: &mut dyn RngCore,
) -> Vec<Vec2> {
    let amplitude = uniform(rng, OSCILLATION_AMPLITUDE_MIN, OSCILLATION_AMPLITUDE_MAX);
    let phase = uniform(rng, 0.0, PI);

    let wavelength = (end.x - start.x) / 2.0;
    if wavelength.abs() <= COINCIDENT_EPSILON {
        warn!("Oscillating centerline has no horizontal span; falling back to linear.");
        return linear(start, end, n);
    }

    // The span is exactly two wavelengths, so the wave has the same value at both ends.
    let anchor = wave(phase);
    linear(start, end, n)
        .into_iter()
        .map(|p| {
            let theta = 2.0 * PI * (p.x - start.x) / wavelength + phase;
            Vec2::new(p.x, p.y + amplitude * (wave(theta) - anchor))
        })
        .collect()
}
