//! The world data store - map points and events, loaded once and then read
//! only.

mod event;
mod integrity;
pub mod legacy;
mod loader;
mod map;

pub use event::*;
pub use integrity::*;
pub use loader::*;
pub use map::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::entities::{EventId, MapPointId};

/// Immutable tables of map points and events.
///
/// Built once at startup and shared by reference with everything that reads
/// world data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldData {
    map_points: Vec<MapPoint>,
    events: Vec<Event>,
}

impl WorldData {
    /// Create a store from already-built tables.
    pub fn new(map_points: Vec<MapPoint>, events: Vec<Event>) -> Self {
        Self { map_points, events }
    }

    /// Load both tables from their JSON files.
    pub fn load(map_points_path: &Path, events_path: &Path) -> Result<Self, DataLoadError> {
        let map_points = load_map_points(map_points_path)?;
        let events = load_events(events_path)?;
        info!(
            map_points = map_points.len(),
            events = events.len(),
            "world data loaded"
        );
        Ok(Self::new(map_points, events))
    }

    /// Get a map point by ID.
    pub fn map_point(&self, id: MapPointId) -> Option<&MapPoint> {
        self.map_points
            .get(id.index())
            .filter(|point| point.id == id)
    }

    /// Get an event by ID.
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.index()).filter(|event| event.id == id)
    }

    pub fn map_points(&self) -> &[MapPoint] {
        &self.map_points
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
