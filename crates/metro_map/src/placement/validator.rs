//! Station placement validity checks.
use glam::Vec2;

use crate::placement::grid::Lattice;
use crate::placement::PlacementRules;
use crate::river::RiverPolygon;
use crate::station::Station;

/// Whether a new station may occupy `point`.
///
/// The point must be farther than `river_margin` from the river region (an empty river never
/// blocks) and farther than `forbidden_distance` from every existing station.
pub fn is_valid(
    point: Vec2,
    river: &RiverPolygon,
    existing_stations: &[Station],
    river_margin: f32,
    forbidden_distance: f32,
) -> bool {
    clear_of_river(point, river, river_margin)
        && clear_of_stations(point, existing_stations, forbidden_distance)
}

/// Whether `point` is farther than `margin` from the river region.
#[inline]
pub fn clear_of_river(point: Vec2, river: &RiverPolygon, margin: f32) -> bool {
    river.is_empty() || river.distance(point) > margin
}

/// Whether `point` is farther than `forbidden_distance` from every station.
#[inline]
pub fn clear_of_stations(point: Vec2, stations: &[Station], forbidden_distance: f32) -> bool {
    stations
        .iter()
        .all(|s| s.position().distance(point) > forbidden_distance)
}

/// A lattice point tagged with whether a station could be placed there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDot {
    pub position: Vec2,
    pub valid: bool,
}

/// Classify every point of `lattice` against the current river and stations, for debug overlays.
pub fn classify_grid(
    lattice: &Lattice,
    river: &RiverPolygon,
    stations: &[Station],
    rules: &PlacementRules,
) -> Vec<GridDot> {
    lattice
        .points()
        .into_iter()
        .map(|position| GridDot {
            position,
            valid: rules.allows(position, river, stations),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::random::pick_index;
    use crate::station::StationShape;

    fn horizontal_river() -> RiverPolygon {
        RiverPolygon::buffer(&[Vec2::new(0.0, 200.0), Vec2::new(800.0, 200.0)], 30.0)
    }

    fn station(x: f32, y: f32) -> Station {
        Station::new(Vec2::new(x, y), StationShape::Circle)
    }

    #[test]
    fn rejects_points_near_the_river() {
        let river = horizontal_river();
        // Region edge at y = 170; margin 20 puts the limit at y = 150.
        assert!(!is_valid(Vec2::new(400.0, 200.0), &river, &[], 20.0, 40.0));
        assert!(!is_valid(Vec2::new(400.0, 150.0), &river, &[], 20.0, 40.0));
        assert!(is_valid(Vec2::new(400.0, 149.0), &river, &[], 20.0, 40.0));
    }

    #[test]
    fn rejects_points_near_stations() {
        let river = RiverPolygon::empty();
        let stations = [station(100.0, 100.0)];
        assert!(!is_valid(Vec2::new(140.0, 100.0), &river, &stations, 20.0, 40.0));
        assert!(is_valid(Vec2::new(141.0, 100.0), &river, &stations, 20.0, 40.0));
    }

    #[test]
    fn empty_river_only_checks_stations() {
        let river = RiverPolygon::buffer(&[Vec2::ONE], 30.0);
        assert!(river.is_empty());
        for p in [Vec2::ZERO, Vec2::ONE, Vec2::new(-1e4, 1e4)] {
            assert!(is_valid(p, &river, &[], 20.0, 40.0));
        }
        assert!(!is_valid(Vec2::ONE, &river, &[station(1.0, 1.0)], 20.0, 40.0));
    }

    #[test]
    fn result_ignores_station_order() {
        let river = horizontal_river();
        let mut stations: Vec<Station> = (0..8)
            .map(|i| station(60.0 + 90.0 * i as f32, 60.0 + (i % 3) as f32 * 280.0))
            .collect();
        let probes: Vec<Vec2> = (0..60)
            .map(|i| Vec2::new((i * 37 % 800) as f32, (i * 53 % 400) as f32))
            .collect();
        let before: Vec<bool> = probes
            .iter()
            .map(|p| is_valid(*p, &river, &stations, 20.0, 40.0))
            .collect();

        let mut rng = StdRng::seed_from_u64(9);
        for i in (1..stations.len()).rev() {
            let j = pick_index(&mut rng, i + 1);
            stations.swap(i, j);
        }
        let after: Vec<bool> = probes
            .iter()
            .map(|p| is_valid(*p, &river, &stations, 20.0, 40.0))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn classify_grid_marks_river_band_invalid() {
        let lattice = Lattice::new(Vec2::new(20.0, 20.0), Vec2::new(781.0, 381.0), 50.0);
        let dots = classify_grid(
            &lattice,
            &horizontal_river(),
            &[],
            &PlacementRules::default(),
        );
        assert_eq!(dots.len(), lattice.points().len());
        for dot in dots {
            let near_river = (dot.position.y - 200.0).abs() <= 50.0;
            assert_eq!(dot.valid, !near_river, "dot at {}", dot.position);
        }
    }
}
