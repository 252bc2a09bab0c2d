//! Map points - the nodes of the traversable location graph.

use serde::{Deserialize, Serialize};

use super::legacy;
use crate::entities::{EventId, MapPointId};
use crate::mechanics::Direction;

/// Neighbouring map points, indexed by [`Direction`]. `None` blocks a
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Directions([Option<MapPointId>; 4]);

impl Directions {
    pub fn new(targets: [Option<MapPointId>; 4]) -> Self {
        Self(targets)
    }

    /// Target in the given direction, if the direction is open.
    pub fn get(&self, direction: Direction) -> Option<MapPointId> {
        self.0[direction.index()]
    }

    /// Open directions with their targets, in data order.
    pub fn open(&self) -> impl Iterator<Item = (Direction, MapPointId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.get(direction).map(|target| (direction, target)))
    }

    pub fn is_dead_end(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

/// A location on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPoint {
    #[serde(alias = "ID")]
    pub id: MapPointId,

    /// Pixel position on the background map. Only the renderer reads it.
    #[serde(
        default,
        alias = "Center",
        deserialize_with = "legacy::deserialize_center"
    )]
    pub center: (i32, i32),

    /// Event presented whenever the player arrives here.
    #[serde(
        default,
        alias = "SpecialEvent",
        deserialize_with = "legacy::deserialize_special_event"
    )]
    pub special_event: Option<EventId>,

    #[serde(
        alias = "DirectionsToMove",
        deserialize_with = "legacy::deserialize_directions"
    )]
    pub directions: Directions,
}

impl MapPoint {
    /// Create a map point with no event attached.
    pub fn new(id: MapPointId, center: (i32, i32), directions: Directions) -> Self {
        Self {
            id,
            center,
            special_event: None,
            directions,
        }
    }

    pub fn with_special_event(mut self, event: EventId) -> Self {
        self.special_event = Some(event);
        self
    }

    /// Neighbour in the given direction, if the direction is open.
    pub fn neighbour(&self, direction: Direction) -> Option<MapPointId> {
        self.directions.get(direction)
    }
}
