//! Game configuration: map dimensions, grid layout, clearances and timing.
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::curve::DEFAULT_CENTERLINE_POINTS;
use crate::error::{Error, Result};
use crate::placement::{Lattice, PlacementRules};
use crate::river::ThicknessProfile;

/// Configuration shared by map generation and the simulation loop.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameConfig {
    /// Map width in world units, sidebar included.
    pub width: u32,
    /// Map height in world units.
    pub height: u32,
    /// Width of the strip on the right reserved for the sidebar.
    pub sidebar_width: u32,
    /// Spacing of candidate lattice points.
    pub grid_size: u32,
    /// Margin between the map edge and the debug overlay lattice.
    pub border_margin: u32,
    /// Distance the river's ends extend beyond the map.
    pub river_offset: u32,
    /// Number of centerline samples.
    pub centerline_points: usize,
    /// River thickness profile for newly generated maps.
    pub thickness: ThicknessProfile,
    /// Station clearances.
    pub rules: PlacementRules,
    /// Simulated time between incremental station placements.
    pub station_spawn_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            sidebar_width: 200,
            grid_size: 50,
            border_margin: 20,
            river_offset: 50,
            centerline_points: DEFAULT_CENTERLINE_POINTS,
            thickness: ThicknessProfile::default(),
            rules: PlacementRules::default(),
            station_spawn_interval: Duration::from_secs(10),
        }
    }
}

impl GameConfig {
    /// Creates a new [`GameConfig`] with the given map size and default everything else.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_sidebar_width(mut self, sidebar_width: u32) -> Self {
        self.sidebar_width = sidebar_width;
        self
    }

    pub fn with_grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_border_margin(mut self, border_margin: u32) -> Self {
        self.border_margin = border_margin;
        self
    }

    pub fn with_river_offset(mut self, river_offset: u32) -> Self {
        self.river_offset = river_offset;
        self
    }

    pub fn with_centerline_points(mut self, centerline_points: usize) -> Self {
        self.centerline_points = centerline_points;
        self
    }

    pub fn with_thickness(mut self, thickness: ThicknessProfile) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_rules(mut self, rules: PlacementRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_station_spawn_interval(mut self, interval: Duration) -> Self {
        self.station_spawn_interval = interval;
        self
    }

    /// Lattice shown by the debug overlay: every grid point inside the border margin.
    pub fn overlay_lattice(&self) -> Lattice {
        let m = self.border_margin as f32;
        let step = self.grid_size as f32;
        Lattice::new(
            glam::Vec2::splat(m),
            glam::Vec2::new(self.width as f32 - m + 1.0, self.height as f32 - m + 1.0),
            step,
        )
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(
                "width and height must be > 0".into(),
            ));
        }
        if self.sidebar_width >= self.width {
            return Err(Error::InvalidConfig(
                "sidebar_width must be smaller than width".into(),
            ));
        }
        if self.grid_size == 0 {
            return Err(Error::InvalidConfig("grid_size must be > 0".into()));
        }
        if self.centerline_points < 2 {
            return Err(Error::InvalidConfig(
                "centerline_points must be >= 2".into(),
            ));
        }
        let t = &self.thickness;
        if [t.start, t.middle, t.end]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(Error::InvalidConfig(
                "thickness values must be finite and >= 0".into(),
            ));
        }
        if !(self.rules.river_margin >= 0.0 && self.rules.forbidden_distance >= 0.0) {
            return Err(Error::InvalidConfig(
                "river_margin and forbidden_distance must be >= 0".into(),
            ));
        }
        if self.station_spawn_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "station_spawn_interval must be > 0".into(),
            ));
        }

        Ok(())
    }
}
