//! Loading map and event tables from JSON files.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::{Event, MapPoint};

/// Failure to load a data table. Always fatal at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed data in {path} at {location}: {source}")]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} at position {position} has id {found}; ids must match their position")]
    IdMismatch {
        table: &'static str,
        position: usize,
        found: usize,
    },
}

/// Load the map point table.
pub fn load_map_points(path: &Path) -> Result<Vec<MapPoint>, DataLoadError> {
    let points: Vec<MapPoint> = read_table(path)?;
    check_dense_ids("map point", points.iter().map(|point| point.id.index()))?;
    debug!(path = %path.display(), count = points.len(), "loaded map points");
    Ok(points)
}

/// Load the event table.
pub fn load_events(path: &Path) -> Result<Vec<Event>, DataLoadError> {
    let events: Vec<Event> = read_table(path)?;
    check_dense_ids("event", events.iter().map(|event| event.id.index()))?;
    debug!(path = %path.display(), count = events.len(), "loaded events");
    Ok(events)
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DataLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let location = error.path().to_string();
        let location = if location.is_empty() || location == "." {
            "document root".to_string()
        } else {
            location
        };
        DataLoadError::Parse {
            path: path.to_path_buf(),
            location,
            source: error.into_inner(),
        }
    })
}

fn check_dense_ids(
    table: &'static str,
    ids: impl Iterator<Item = usize>,
) -> Result<(), DataLoadError> {
    for (position, found) in ids.enumerate() {
        if position != found {
            return Err(DataLoadError::IdMismatch {
                table,
                position,
                found,
            });
        }
    }
    Ok(())
}
