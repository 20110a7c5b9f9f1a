//! Map records: the full description of a generated map.
use glam::Vec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GameConfig;
use crate::curve::{generate_centerline, CurveType};
use crate::error::Result;
use crate::river::{build_river_polygon, RiverPolygon, ThicknessProfile};

/// River part of a [`MapRecord`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiverRecord {
    /// Centerline as `[x, y]` pairs.
    pub path: Vec<[f32; 2]>,
    pub thickness: ThicknessProfile,
    pub curve_type: CurveType,
}

/// A generated map. Produced once and never mutated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapRecord {
    pub width: u32,
    pub height: u32,
    pub river: RiverRecord,
}

impl MapRecord {
    /// Generate a map with a river of the given curve type.
    pub fn generate(
        config: &GameConfig,
        curve_type: CurveType,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        config.validate()?;
        let centerline = generate_centerline(
            config.width,
            config.height,
            config.river_offset,
            curve_type,
            config.centerline_points,
            rng,
        )?;
        info!(
            "Generated {}x{} map with a {curve_type} river from {:?} to {:?}.",
            config.width, config.height, centerline.start_border, centerline.end_border
        );

        Ok(Self {
            width: config.width,
            height: config.height,
            river: RiverRecord {
                path: centerline.points.iter().map(|p| p.to_array()).collect(),
                thickness: config.thickness,
                curve_type,
            },
        })
    }

    /// Generate a map with a uniformly random curve type.
    pub fn generate_random(config: &GameConfig, rng: &mut dyn RngCore) -> Result<Self> {
        let curve_type = CurveType::random(rng);
        Self::generate(config, curve_type, rng)
    }

    /// Centerline points.
    pub fn centerline(&self) -> Vec<Vec2> {
        self.river.path.iter().copied().map(Vec2::from).collect()
    }

    /// Rebuild the river obstacle from the stored centerline and thickness.
    pub fn river_polygon(&self) -> RiverPolygon {
        build_river_polygon(&self.centerline(), &self.river.thickness)
    }
}
