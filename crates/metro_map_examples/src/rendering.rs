//! Minimal PNG preview of a map: land, river, optional grid overlay and stations.
use std::path::Path;

use glam::Vec2;
use image::{Rgb, RgbImage};
use metro_map::prelude::{GridDot, RiverPolygon, Station, StationShape};

/// What to draw.
pub struct Scene<'a> {
    pub width: u32,
    pub height: u32,
    pub river: &'a RiverPolygon,
    pub stations: &'a [Station],
    pub overlay: &'a [GridDot],
}

pub struct RenderConfig {
    pub land: [u8; 3],
    pub water: [u8; 3],
    pub station_fill: [u8; 3],
    pub station_outline: [u8; 3],
    pub valid_dot: [u8; 3],
    pub invalid_dot: [u8; 3],
    pub station_size: f32,
    pub dot_radius: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            land: [245, 245, 220],
            water: [173, 216, 230],
            station_fill: [255, 255, 255],
            station_outline: [0, 0, 0],
            valid_dot: [0, 200, 0],
            invalid_dot: [220, 0, 0],
            station_size: 30.0,
            dot_radius: 3.0,
        }
    }
}

pub fn render_scene_to_png(
    scene: &Scene<'_>,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut img = RgbImage::from_pixel(scene.width, scene.height, Rgb(config.land));

    for (x, y, px) in img.enumerate_pixels_mut() {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        if scene.river.contains(p) {
            *px = Rgb(config.water);
        }
    }

    for dot in scene.overlay {
        let color = if dot.valid {
            config.valid_dot
        } else {
            config.invalid_dot
        };
        fill(&mut img, dot.position, config.dot_radius, color, |d, r| {
            d.length() <= r
        });
    }

    let half = config.station_size / 2.0;
    for station in scene.stations {
        let inside: fn(Vec2, f32) -> bool = match station.shape() {
            StationShape::Circle => |d, r| d.length() <= r,
            StationShape::Square => |d, r| d.x.abs() <= r && d.y.abs() <= r,
            StationShape::Triangle => |d, r| {
                let h = r * 3f32.sqrt();
                let top = -h / 2.0;
                let t = (d.y - top) / h;
                (0.0..=1.0).contains(&t) && d.x.abs() <= r * t
            },
        };
        fill(&mut img, station.position(), half, config.station_outline, inside);
        fill(&mut img, station.position(), half - 3.0, config.station_fill, inside);
    }

    img.save(path)?;
    Ok(())
}

fn fill(
    img: &mut RgbImage,
    center: Vec2,
    radius: f32,
    color: [u8; 3],
    inside: impl Fn(Vec2, f32) -> bool,
) {
    let (w, h) = img.dimensions();
    let min = (center - Vec2::splat(radius + 1.0)).max(Vec2::ZERO);
    let max = (center + Vec2::splat(radius + 1.0)).min(Vec2::new(w as f32, h as f32));
    for y in min.y as u32..max.y as u32 {
        for x in min.x as u32..max.x as u32 {
            let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
            if inside(d, radius) {
                img.put_pixel(x, y, Rgb(color));
            }
        }
    }
}
