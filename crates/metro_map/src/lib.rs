#![forbid(unsafe_code)]
//! metro_map: river map generation and station placement for a Mini Metro style simulation.
//!
//! Modules:
//! - curve: random river centerlines crossing the map between two distinct borders
//! - river: buffering a centerline into the river obstacle polygon
//! - placement: validity rules, the grid candidate pool, and the placement engine (incl. events)
//! - map / storage: map records and their JSON files
//! - simulation: per-session state that spawns stations as simulated time advances
pub mod config;
pub mod curve;
pub mod error;
pub mod geometry;
pub mod map;
pub mod placement;
pub(crate) mod random;
pub mod river;
pub mod simulation;
pub mod station;
#[cfg(feature = "serde")]
pub mod storage;

/// Convenient re-exports for common types. Import with `use metro_map::prelude::*;`.
pub mod prelude {
    pub use crate::config::GameConfig;
    pub use crate::curve::{generate_centerline, Border, Centerline, CurveType};
    pub use crate::error::{Error, Result};
    pub use crate::map::{MapRecord, RiverRecord};
    pub use crate::placement::{
        classify_grid, is_valid, EventSink, FnSink, GridCandidates, GridDot, InitialPlacement,
        Lattice, PlacementEngine, PlacementEvent, PlacementEventKind, PlacementOutcome,
        PlacementRules, VecSink,
    };
    pub use crate::river::{build_river_polygon, RiverPolygon, ThicknessProfile};
    pub use crate::simulation::Simulation;
    pub use crate::station::{Station, StationShape};
    #[cfg(feature = "serde")]
    pub use crate::storage::{load_map, load_random_map, next_map_filename, save_map};
}
