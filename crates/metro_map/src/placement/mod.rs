//! Station placement: validity rules, the candidate pool, and the placement engine.
//!
//! Data flows from [`crate::river::RiverPolygon`] through [`validator`] into [`engine`], which
//! owns no state of its own beyond its [`PlacementRules`]. The caller owns the
//! [`GridCandidates`] and the station list and passes them in on every call.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::river::RiverPolygon;
use crate::station::Station;

pub mod engine;
pub mod events;
pub mod grid;
pub mod validator;

pub use engine::{InitialPlacement, PlacementEngine, PlacementOutcome, INITIAL_SHAPES};
pub use events::{EventSink, FnSink, PlacementEvent, PlacementEventKind, VecSink};
pub use grid::{GridCandidates, Lattice};
pub use validator::{classify_grid, is_valid, GridDot};

pub const DEFAULT_RIVER_MARGIN: f32 = 20.0;
pub const DEFAULT_FORBIDDEN_DISTANCE: f32 = 40.0;

/// Minimum clearances a new station must keep.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementRules {
    /// Minimum distance from the river region.
    pub river_margin: f32,
    /// Minimum distance between two station centers.
    pub forbidden_distance: f32,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            river_margin: DEFAULT_RIVER_MARGIN,
            forbidden_distance: DEFAULT_FORBIDDEN_DISTANCE,
        }
    }
}

impl PlacementRules {
    pub fn new(river_margin: f32, forbidden_distance: f32) -> Self {
        Self {
            river_margin,
            forbidden_distance,
        }
    }

    /// [`is_valid`] with these rules.
    #[inline]
    pub fn allows(&self, point: Vec2, river: &RiverPolygon, stations: &[Station]) -> bool {
        is_valid(
            point,
            river,
            stations,
            self.river_margin,
            self.forbidden_distance,
        )
    }
}
