//! JSON persistence for [`MapRecord`]s.
//!
//! Maps live one per file in a directory, named `map_001.json`, `map_002.json`, and so on.
//! Saving picks the number after the highest one present; loading picks any `.json` file
//! in the directory at random.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::map::MapRecord;
use crate::random::pick_index;

pub const MAP_FILE_PREFIX: &str = "map_";
pub const MAP_FILE_EXTENSION: &str = "json";

/// Sequence number of a `map_NNN.json` file name, if it has one.
fn map_number(file_name: &str) -> Option<u32> {
    let stem = file_name
        .strip_prefix(MAP_FILE_PREFIX)?
        .strip_suffix(MAP_FILE_EXTENSION)?
        .strip_suffix('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Next free file name in `dir`. A missing directory counts as empty.
pub fn next_map_filename(dir: &Path) -> Result<String> {
    let highest = if dir.is_dir() {
        fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().and_then(map_number))
            .max()
            .unwrap_or(0)
    } else {
        0
    };
    Ok(format!(
        "{MAP_FILE_PREFIX}{:03}.{MAP_FILE_EXTENSION}",
        highest + 1
    ))
}

/// Write `map` to the next free file in `dir`, creating the directory if needed.
pub fn save_map(dir: &Path, map: &MapRecord) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(next_map_filename(dir)?);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, map)?;
    writer.flush()?;
    info!("Map saved as {}.", path.display());
    Ok(path)
}

/// Read a single map file.
pub fn load_map(path: &Path) -> Result<MapRecord> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// All `.json` files in `dir`, sorted by name.
///
/// Fails with [`Error::NotFound`] when the directory does not exist.
pub fn list_maps(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == MAP_FILE_EXTENSION)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Load a uniformly random map from `dir`.
///
/// Fails with [`Error::NotFound`] when the directory is missing or holds no map files.
pub fn load_random_map(dir: &Path, rng: &mut dyn RngCore) -> Result<(PathBuf, MapRecord)> {
    let files = list_maps(dir)?;
    if files.is_empty() {
        return Err(Error::NotFound {
            path: dir.to_path_buf(),
        });
    }
    let path = files[pick_index(rng, files.len())].clone();
    debug!("Loading map {} of {} from {}.", path.display(), files.len(), dir.display());
    let map = load_map(&path)?;
    Ok((path, map))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::GameConfig;
    use crate::curve::CurveType;

    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Fresh, not yet created directory under the system temp dir.
    fn scratch_dir(tag: &str) -> PathBuf {
        let n = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "metro_map_{tag}_{}_{n}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample_map(seed: u64) -> MapRecord {
        let mut rng = StdRng::seed_from_u64(seed);
        MapRecord::generate(&GameConfig::default(), CurveType::Sine, &mut rng).unwrap()
    }

    #[test]
    fn map_number_parses_only_sequence_names() {
        assert_eq!(map_number("map_001.json"), Some(1));
        assert_eq!(map_number("map_120.json"), Some(120));
        assert_eq!(map_number("map_abc.json"), None);
        assert_eq!(map_number("map_.json"), None);
        assert_eq!(map_number("river_001.json"), None);
        assert_eq!(map_number("map_001.ron"), None);
    }

    #[test]
    fn saves_use_increasing_numbers() {
        let dir = scratch_dir("save");
        assert_eq!(next_map_filename(&dir).unwrap(), "map_001.json");

        let first = save_map(&dir, &sample_map(1)).unwrap();
        let second = save_map(&dir, &sample_map(2)).unwrap();
        assert_eq!(first.file_name().unwrap(), "map_001.json");
        assert_eq!(second.file_name().unwrap(), "map_002.json");

        fs::write(dir.join("map_041.json"), "{}").unwrap();
        assert_eq!(next_map_filename(&dir).unwrap(), "map_042.json");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn saved_map_loads_back() {
        let dir = scratch_dir("load");
        let map = sample_map(3);
        let path = save_map(&dir, &map).unwrap();
        assert_eq!(load_map(&path).unwrap(), map);

        let mut rng = StdRng::seed_from_u64(0);
        let (picked, loaded) = load_random_map(&dir, &mut rng).unwrap();
        assert_eq!(picked, path);
        assert_eq!(loaded, map);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reads_the_documented_json_layout() {
        let json = r#"{
            "width": 800,
            "height": 400,
            "river": {
                "path": [[-50, 10.5], [400.0, 200.0], [850, 390]],
                "thickness": { "start": 10, "middle": 30, "end": 15 },
                "curve_type": "linear"
            }
        }"#;
        let map: MapRecord = serde_json::from_str(json).unwrap();
        assert_eq!(map.river.path[0], [-50.0, 10.5]);
        assert_eq!(map.river.curve_type, CurveType::Linear);
        assert_eq!(map.river_polygon().radius(), 30.0);
    }

    #[test]
    fn unknown_curve_type_fails_to_load() {
        let json = r#"{"width": 1, "height": 1, "river": {"path": [],
            "thickness": {"start": 1, "middle": 1, "end": 1}, "curve_type": "spiral"}}"#;
        assert!(serde_json::from_str::<MapRecord>(json).is_err());
    }

    #[test]
    fn missing_or_empty_directory_is_not_found() {
        let dir = scratch_dir("missing");
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            load_random_map(&dir, &mut rng),
            Err(Error::NotFound { .. })
        ));

        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("notes.txt"), "not a map").unwrap();
        assert!(matches!(
            load_random_map(&dir, &mut rng),
            Err(Error::NotFound { .. })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }
}
