//! Stations and their shape tags.
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::random::pick_index;

/// Radius used when resolving a click to a station.
pub const STATION_HIT_RADIUS: f32 = 20.0;

/// Shape tag of a station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum StationShape {
    Circle,
    Square,
    Triangle,
}

impl StationShape {
    pub const ALL: [StationShape; 3] = [
        StationShape::Circle,
        StationShape::Square,
        StationShape::Triangle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StationShape::Circle => "circle",
            StationShape::Square => "square",
            StationShape::Triangle => "triangle",
        }
    }

    /// Pick a shape uniformly at random.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::ALL[pick_index(rng, Self::ALL.len())]
    }
}

impl fmt::Display for StationShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StationShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unsupported station shape '{s}'")))
    }
}

/// A placed station. Its position never changes after creation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Station {
    position: Vec2,
    shape: StationShape,
}

impl Station {
    pub fn new(position: Vec2, shape: StationShape) -> Self {
        Self { position, shape }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn shape(&self) -> StationShape {
        self.shape
    }

    /// Hit test for a pointer position, using the shape's outline (the triangle uses its
    /// bounding box).
    pub fn contains(&self, pos: Vec2) -> bool {
        let d = pos - self.position;
        let r = STATION_HIT_RADIUS;
        match self.shape {
            StationShape::Circle => d.length() <= r,
            StationShape::Square => d.x.abs() <= r && d.y.abs() <= r,
            StationShape::Triangle => {
                let half_height = r * 3f32.sqrt() / 4.0;
                d.x.abs() <= r && d.y.abs() <= half_height
            }
        }
    }
}
