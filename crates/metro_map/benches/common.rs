use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;
use metro_map::prelude::{generate_centerline, CurveType};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Centerline of `points` samples across an 800 x 400 map.
#[allow(dead_code)]
pub fn centerline(curve: CurveType, points: usize, seed: u64) -> Vec<Vec2> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_centerline(800, 400, 50, curve, points, &mut rng)
        .expect("valid centerline parameters")
        .points
}
