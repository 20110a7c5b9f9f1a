//! Simulation glue: owns the river, the candidate pool and the stations of one game session,
//! and spawns stations as simulated time advances.
use std::time::Duration;

use rand::RngCore;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::Result;
use crate::map::MapRecord;
use crate::placement::{
    classify_grid, EventSink, GridCandidates, GridDot, PlacementEngine, PlacementOutcome,
};
use crate::river::RiverPolygon;
use crate::station::Station;

/// State of one game session.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: GameConfig,
    engine: PlacementEngine,
    river: RiverPolygon,
    candidates: GridCandidates,
    stations: Vec<Station>,
    last_spawn: Duration,
}

impl Simulation {
    /// Start a session on `map`: rebuild the river and place the initial stations.
    pub fn new<R: RngCore>(map: &MapRecord, config: GameConfig, rng: &mut R) -> Result<Self> {
        Self::new_with_events(map, config, rng, &mut ())
    }

    pub fn new_with_events<R: RngCore>(
        map: &MapRecord,
        config: GameConfig,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<Self> {
        config.validate()?;
        let river = map.river_polygon();
        let engine = PlacementEngine::new(config.rules);
        let initial = engine.initial_placement_with_events(
            &river,
            map.width as f32,
            map.height as f32,
            config.grid_size as f32,
            config.sidebar_width as f32,
            rng,
            sink,
        );
        info!(
            "Simulation started with {} station(s) and {} free candidate(s).",
            initial.stations.len(),
            initial.candidates.len()
        );

        Ok(Self {
            config,
            engine,
            river,
            candidates: initial.candidates,
            stations: initial.stations,
            last_spawn: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn river(&self) -> &RiverPolygon {
        &self.river
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn candidates(&self) -> &GridCandidates {
        &self.candidates
    }

    /// Station under a pointer position, if any.
    pub fn station_at(&self, pos: glam::Vec2) -> Option<&Station> {
        self.stations.iter().find(|s| s.contains(pos))
    }

    /// Advance to `elapsed` simulated time since the session started.
    ///
    /// Once `station_spawn_interval` has passed since the last successful spawn, one
    /// placement is attempted. A failed attempt does not reset the timer, so the next call
    /// tries again.
    pub fn advance<R: RngCore>(&mut self, elapsed: Duration, rng: &mut R) -> Option<Station> {
        self.advance_with_events(elapsed, rng, &mut ())
    }

    pub fn advance_with_events<R: RngCore>(
        &mut self,
        elapsed: Duration,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Option<Station> {
        if elapsed.saturating_sub(self.last_spawn) < self.config.station_spawn_interval {
            return None;
        }
        let station = self.request_station_with_events(rng, sink)?;
        self.last_spawn = elapsed;
        Some(station)
    }

    /// Attempt one placement right now, regardless of the spawn timer.
    pub fn request_station<R: RngCore>(&mut self, rng: &mut R) -> Option<Station> {
        self.request_station_with_events(rng, &mut ())
    }

    pub fn request_station_with_events<R: RngCore>(
        &mut self,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Option<Station> {
        match self.engine.place_one_with_events(
            &self.river,
            &self.stations,
            &mut self.candidates,
            rng,
            sink,
        ) {
            PlacementOutcome::Placed(station) => {
                info!(
                    "New {} station at {}; {} station(s) total.",
                    station.shape(),
                    station.position(),
                    self.stations.len() + 1
                );
                self.stations.push(station);
                Some(station)
            }
            PlacementOutcome::NoCapacity => {
                info!("No space for new station.");
                None
            }
        }
    }

    /// Valid/invalid classification of the map-wide overlay lattice against the current state.
    ///
    /// The lattice spans the whole map, sidebar strip included, so a valid dot only means the
    /// spot is clear. Stations spawn on [`Simulation::candidates`] alone; see
    /// [`Simulation::candidate_overlay`] for that view.
    pub fn grid_overlay(&self) -> Vec<GridDot> {
        let dots = classify_grid(
            &self.config.overlay_lattice(),
            &self.river,
            &self.stations,
            &self.config.rules,
        );
        debug!(
            "Grid overlay: {} of {} dots valid.",
            dots.iter().filter(|d| d.valid).count(),
            dots.len()
        );
        dots
    }

    /// Classification of the unused candidate points: exactly the spots where the next spawn
    /// can land.
    pub fn candidate_overlay(&self) -> Vec<GridDot> {
        self.candidates
            .iter()
            .map(|position| GridDot {
                position,
                valid: self.config.rules.allows(position, &self.river, &self.stations),
            })
            .collect()
    }
}
