use std::path::Path;
use std::time::Duration;

use metro_map::prelude::*;
use metro_map_examples::{init_tracing, render_scene_to_png, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(7);

    // Use a saved map when there is one, otherwise generate a fresh one.
    let map = match load_random_map(Path::new("maps/generated"), &mut rng) {
        Ok((path, map)) => {
            info!("Playing on {}.", path.display());
            map
        }
        Err(Error::NotFound { path }) => {
            info!("No saved maps in {}; generating one.", path.display());
            MapRecord::generate_random(&config, &mut rng)?
        }
        Err(e) => return Err(e.into()),
    };

    let mut sink = FnSink::new(|event| {
        if let PlacementEvent::NoCapacity { remaining } = event {
            info!("Map is full; {remaining} candidate(s) remain blocked.");
        }
    });
    let mut sim = Simulation::new_with_events(&map, config, &mut rng, &mut sink)?;

    // Two simulated minutes in one-second ticks.
    for second in 1..=120 {
        sim.advance_with_events(Duration::from_secs(second), &mut rng, &mut sink);
    }

    for station in sim.stations() {
        info!("{} station at {}.", station.shape(), station.position());
    }

    let overlay = sim.candidate_overlay();
    let scene = Scene {
        width: map.width,
        height: map.height,
        river: sim.river(),
        stations: sim.stations(),
        overlay: &overlay,
    };
    render_scene_to_png(&scene, &RenderConfig::default(), "simulation-headless.png")?;

    Ok(())
}
