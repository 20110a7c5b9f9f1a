//! Placement engine: initial multi-station placement and incremental one-at-a-time placement.
//!
//! The engine is stateless apart from its [`PlacementRules`]. It never tracks time; the
//! simulation loop decides when to call [`PlacementEngine::place_one`].
use glam::Vec2;
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::placement::events::{EventSink, PlacementEvent, PlacementEventKind};
use crate::placement::grid::{GridCandidates, Lattice};
use crate::placement::validator::{clear_of_stations, is_valid};
use crate::placement::PlacementRules;
use crate::random::pick_index;
use crate::river::RiverPolygon;
use crate::station::{Station, StationShape};

/// Shapes of the initial stations, in placement order.
pub const INITIAL_SHAPES: [StationShape; 3] = [
    StationShape::Circle,
    StationShape::Square,
    StationShape::Triangle,
];

/// Result of a single placement attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementOutcome {
    /// A station was created and its point consumed.
    Placed(Station),
    /// No candidate passes validation right now. Try again later.
    NoCapacity,
}

impl PlacementOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed(_))
    }

    pub fn station(&self) -> Option<&Station> {
        match self {
            PlacementOutcome::Placed(station) => Some(station),
            PlacementOutcome::NoCapacity => None,
        }
    }

    pub fn into_station(self) -> Option<Station> {
        match self {
            PlacementOutcome::Placed(station) => Some(station),
            PlacementOutcome::NoCapacity => None,
        }
    }
}

/// Stations from [`PlacementEngine::initial_placement`] and the candidate pool they left behind.
#[derive(Debug, Clone, Default)]
pub struct InitialPlacement {
    pub stations: Vec<Station>,
    pub candidates: GridCandidates,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementEngine {
    pub rules: PlacementRules,
}

impl PlacementEngine {
    pub fn new(rules: PlacementRules) -> Self {
        Self { rules }
    }

    /// Build the candidate pool for a `width` x `height` map and place one station per
    /// [`INITIAL_SHAPES`] entry.
    ///
    /// Candidates are the lattice points in
    /// `[forbidden_distance, width - sidebar_width) x [forbidden_distance, height)` that are
    /// farther than both `forbidden_distance` and `river_margin` from the river. A shape with
    /// no remaining candidate is skipped, so fewer than three stations is a normal result.
    pub fn initial_placement<R: RngCore>(
        &self,
        river: &RiverPolygon,
        width: f32,
        height: f32,
        grid_size: f32,
        sidebar_width: f32,
        rng: &mut R,
    ) -> InitialPlacement {
        self.initial_placement_with_events(
            river,
            width,
            height,
            grid_size,
            sidebar_width,
            rng,
            &mut (),
        )
    }

    pub fn initial_placement_with_events<R: RngCore>(
        &self,
        river: &RiverPolygon,
        width: f32,
        height: f32,
        grid_size: f32,
        sidebar_width: f32,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> InitialPlacement {
        let forbidden = self.rules.forbidden_distance;
        let lattice = Lattice::new(
            Vec2::splat(forbidden),
            Vec2::new(width - sidebar_width, height),
            grid_size,
        );
        let mut candidates = GridCandidates::from_lattice(&lattice);
        let lattice_points = candidates.len();
        if river.is_empty() {
            warn!("River polygon is empty; candidates are not filtered by river distance.");
            if sink.wants(PlacementEventKind::Warning) {
                sink.send(PlacementEvent::Warning {
                    context: "initial_placement".into(),
                    message: "empty river polygon".into(),
                });
            }
        } else {
            let clearance = forbidden.max(self.rules.river_margin);
            candidates.retain(|p| river.distance(p) > clearance);
        }
        debug!(
            "Initial candidates: {} of {} lattice points clear of the river.",
            candidates.len(),
            lattice_points
        );
        if sink.wants(PlacementEventKind::CandidatesBuilt) {
            sink.send(PlacementEvent::CandidatesBuilt {
                lattice_points,
                candidates: candidates.len(),
            });
        }

        let mut stations: Vec<Station> = Vec::with_capacity(INITIAL_SHAPES.len());
        for shape in INITIAL_SHAPES {
            let valid: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|(_, p)| clear_of_stations(*p, &stations, forbidden))
                .map(|(i, _)| i)
                .collect();

            if valid.is_empty() {
                warn!("No candidate left for the initial {shape} station; skipping.");
                if sink.wants(PlacementEventKind::ShapeSkipped) {
                    sink.send(PlacementEvent::ShapeSkipped { shape });
                }
                continue;
            }

            let index = valid[pick_index(rng, valid.len())];
            let station = Station::new(candidates.take(index), shape);
            info!("Initial {shape} station at {}.", station.position());
            if sink.wants(PlacementEventKind::StationPlaced) {
                sink.send(PlacementEvent::StationPlaced {
                    station,
                    remaining: candidates.len(),
                });
            }
            stations.push(station);
        }

        InitialPlacement {
            stations,
            candidates,
        }
    }

    /// Try to place one more station on a candidate that passes [`is_valid`] against
    /// `existing`. On success the chosen point is removed from `candidates` and the new
    /// station gets a random shape; otherwise `candidates` is left untouched.
    pub fn place_one<R: RngCore>(
        &self,
        river: &RiverPolygon,
        existing: &[Station],
        candidates: &mut GridCandidates,
        rng: &mut R,
    ) -> PlacementOutcome {
        self.place_one_with_events(river, existing, candidates, rng, &mut ())
    }

    pub fn place_one_with_events<R: RngCore>(
        &self,
        river: &RiverPolygon,
        existing: &[Station],
        candidates: &mut GridCandidates,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> PlacementOutcome {
        let valid: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                is_valid(
                    *p,
                    river,
                    existing,
                    self.rules.river_margin,
                    self.rules.forbidden_distance,
                )
            })
            .map(|(i, _)| i)
            .collect();

        if valid.is_empty() {
            debug!(
                "No valid placement among {} remaining candidates.",
                candidates.len()
            );
            if sink.wants(PlacementEventKind::NoCapacity) {
                sink.send(PlacementEvent::NoCapacity {
                    remaining: candidates.len(),
                });
            }
            return PlacementOutcome::NoCapacity;
        }

        let index = valid[pick_index(rng, valid.len())];
        let position = candidates.take(index);
        let station = Station::new(position, StationShape::random(rng));
        debug!(
            "Placed {} station at {position}; {} of {} candidates were valid.",
            station.shape(),
            valid.len(),
            candidates.len() + 1
        );
        if sink.wants(PlacementEventKind::StationPlaced) {
            sink.send(PlacementEvent::StationPlaced {
                station,
                remaining: candidates.len(),
            });
        }
        PlacementOutcome::Placed(station)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::curve::{generate_centerline, CurveType};
    use crate::placement::events::VecSink;
    use crate::river::{build_river_polygon, ThicknessProfile};

    fn engine() -> PlacementEngine {
        PlacementEngine::new(PlacementRules::new(20.0, 40.0))
    }

    fn generated_river(seed: u64) -> RiverPolygon {
        let mut rng = StdRng::seed_from_u64(seed);
        let curve = CurveType::random(&mut rng);
        let line = generate_centerline(800, 400, 50, curve, 100, &mut rng).unwrap();
        build_river_polygon(&line.points, &ThicknessProfile::default())
    }

    fn assert_spacing(stations: &[Station], min: f32) {
        for (i, a) in stations.iter().enumerate() {
            for b in &stations[i + 1..] {
                assert!(a.position().distance(b.position()) > min);
            }
        }
    }

    #[test]
    fn initial_placement_places_one_station_per_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let river = generated_river(1);
        let result = engine().initial_placement(&river, 800.0, 400.0, 50.0, 200.0, &mut rng);

        let shapes: Vec<StationShape> = result.stations.iter().map(|s| s.shape()).collect();
        assert_eq!(shapes, INITIAL_SHAPES.to_vec());
        assert_spacing(&result.stations, 40.0);
        for s in &result.stations {
            let p = s.position();
            assert!(p.x >= 40.0 && p.x < 600.0 && p.y >= 40.0 && p.y < 400.0);
            assert!(river.distance(p) > 40.0);
            assert!(!result.candidates.contains(p));
        }
    }

    #[test]
    fn initial_placement_consumes_one_candidate_per_station() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sink = VecSink::new();
        let result = engine().initial_placement_with_events(
            &RiverPolygon::empty(),
            800.0,
            400.0,
            50.0,
            200.0,
            &mut rng,
            &mut sink,
        );
        let built = sink
            .as_slice()
            .iter()
            .find_map(|e| match e {
                PlacementEvent::CandidatesBuilt { candidates, .. } => Some(*candidates),
                _ => None,
            })
            .expect("candidates event");
        assert_eq!(built, 12 * 8);
        assert_eq!(result.candidates.len(), built - result.stations.len());
        assert_eq!(sink.count(PlacementEventKind::Warning), 1);

        let remaining: Vec<usize> = sink
            .as_slice()
            .iter()
            .filter_map(|e| match e {
                PlacementEvent::StationPlaced { remaining, .. } => Some(*remaining),
                _ => None,
            })
            .collect();
        assert_eq!(remaining, vec![built - 1, built - 2, built - 3]);
    }

    #[test]
    fn initial_placement_skips_shapes_without_room() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sink = VecSink::new();
        // A 60 x 100 playable area holds two lattice points 50 apart.
        let result = PlacementEngine::new(PlacementRules::new(20.0, 40.0))
            .initial_placement_with_events(
                &RiverPolygon::empty(),
                260.0,
                100.0,
                50.0,
                200.0,
                &mut rng,
                &mut sink,
            );
        assert_eq!(result.stations.len(), 2);
        assert!(result.candidates.is_empty());
        assert_eq!(sink.count(PlacementEventKind::ShapeSkipped), 1);
        assert_eq!(result.stations[0].shape(), StationShape::Circle);
        assert_eq!(result.stations[1].shape(), StationShape::Square);
    }

    #[test]
    fn initial_stations_keep_river_margin_wider_than_spacing() {
        let engine = PlacementEngine::new(PlacementRules::new(30.0, 10.0));
        let river = RiverPolygon::buffer(&[Vec2::new(0.0, 200.0), Vec2::new(800.0, 200.0)], 20.0);
        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = engine.initial_placement(&river, 800.0, 400.0, 10.0, 200.0, &mut rng);
            assert_eq!(result.stations.len(), 3);
            for s in &result.stations {
                assert!(
                    river.distance(s.position()) > 30.0,
                    "seed {seed}: station at {} is {} from the river",
                    s.position(),
                    river.distance(s.position())
                );
            }
            assert!(result.candidates.iter().all(|p| river.distance(p) > 30.0));
        }
    }

    #[test]
    fn place_one_respects_rules_and_shrinks_pool() {
        let mut rng = StdRng::seed_from_u64(4);
        let river = generated_river(4);
        let engine = engine();
        let InitialPlacement {
            mut stations,
            mut candidates,
        } = engine.initial_placement(&river, 800.0, 400.0, 50.0, 200.0, &mut rng);

        loop {
            let before = candidates.len();
            match engine.place_one(&river, &stations, &mut candidates, &mut rng) {
                PlacementOutcome::Placed(station) => {
                    assert_eq!(candidates.len(), before - 1);
                    assert!(river.distance(station.position()) > 20.0);
                    assert!(stations
                        .iter()
                        .all(|s| s.position().distance(station.position()) > 40.0));
                    stations.push(station);
                }
                PlacementOutcome::NoCapacity => {
                    assert_eq!(candidates.len(), before);
                    break;
                }
            }
        }
        assert!(stations.len() > 3);
        assert_spacing(&stations, 40.0);
    }

    #[test]
    fn place_one_is_reproducible_for_same_seed() {
        let river = generated_river(5);
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(5);
        let initial = engine.initial_placement(&river, 800.0, 400.0, 50.0, 200.0, &mut rng);

        let mut pool_a = initial.candidates.clone();
        let mut pool_b = initial.candidates.clone();
        let a = engine.place_one(
            &river,
            &initial.stations,
            &mut pool_a,
            &mut StdRng::seed_from_u64(77),
        );
        let b = engine.place_one(
            &river,
            &initial.stations,
            &mut pool_b,
            &mut StdRng::seed_from_u64(77),
        );
        assert_eq!(a, b);
        assert_eq!(pool_a, pool_b);
    }

    #[test]
    fn close_pair_allows_only_one_station() {
        let engine = engine();
        let river = RiverPolygon::empty();
        let mut candidates =
            GridCandidates::from_points(vec![Vec2::new(100.0, 100.0), Vec2::new(110.0, 100.0)]);
        let mut rng = StdRng::seed_from_u64(6);
        let mut stations = Vec::new();

        let first = engine.place_one(&river, &stations, &mut candidates, &mut rng);
        stations.push(first.into_station().expect("first placement"));
        assert_eq!(candidates.len(), 1);

        let mut sink = VecSink::new();
        let second =
            engine.place_one_with_events(&river, &stations, &mut candidates, &mut rng, &mut sink);
        assert_eq!(second, PlacementOutcome::NoCapacity);
        assert_eq!(candidates.len(), 1);
        assert!(matches!(
            sink.as_slice(),
            [PlacementEvent::NoCapacity { remaining: 1 }]
        ));
    }

    #[test]
    fn selection_is_uniform_over_valid_candidates() {
        let engine = engine();
        let river = RiverPolygon::empty();
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(200.0, 0.0),
            Vec2::new(300.0, 0.0),
        ];
        // The station blocks the first point only.
        let stations = [Station::new(Vec2::new(-10.0, 0.0), StationShape::Circle)];
        let mut counts = [0usize; 4];
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..3_000 {
            let mut pool = GridCandidates::from_points(points.clone());
            let station = engine
                .place_one(&river, &stations, &mut pool, &mut rng)
                .into_station()
                .expect("placement");
            let idx = points
                .iter()
                .position(|p| *p == station.position())
                .expect("known point");
            counts[idx] += 1;
        }
        assert_eq!(counts[0], 0);
        for c in &counts[1..] {
            // Expected 1000 each.
            assert!((850..=1150).contains(c), "{counts:?}");
        }
    }
}
