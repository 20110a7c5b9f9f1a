use std::path::Path;

use metro_map::prelude::*;
use metro_map_examples::{init_tracing, render_scene_to_png, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = GameConfig::default();
    let dir = Path::new("maps/generated");

    // One map per curve family, saved as map_NNN.json with a matching preview image.
    let mut rng = StdRng::seed_from_u64(2024);
    for curve_type in CurveType::ALL {
        let map = MapRecord::generate(&config, curve_type, &mut rng)?;
        let path = save_map(dir, &map)?;

        let river = map.river_polygon();
        let scene = Scene {
            width: map.width,
            height: map.height,
            river: &river,
            stations: &[],
            overlay: &[],
        };
        render_scene_to_png(&scene, &RenderConfig::default(), path.with_extension("png"))?;
    }

    Ok(())
}
