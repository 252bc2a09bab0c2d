//! Entity definitions for the game world.

mod player;

pub use player::*;

use serde::{Deserialize, Serialize};

/// Identifier of a map point. Map point ids are dense: the id is also the
/// point's index in the map table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapPointId(pub usize);

impl MapPointId {
    /// Position of this point in the map table.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for MapPointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "map:{}", self.0)
    }
}

/// Identifier of a story event, dense like [`MapPointId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub usize);

impl EventId {
    /// Position of this event in the event table.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event:{}", self.0)
    }
}
