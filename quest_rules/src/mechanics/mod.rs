//! Game mechanics: movement directions, item checks and choice outcomes.

use serde::{Deserialize, Serialize};

use crate::entities::{EventId, Inventory};

/// The four movement directions, in the positional order used by map data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    /// Forward on the map.
    Up,
    Down,
}

impl Direction {
    /// All directions in data order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Position of this direction inside a map point's direction table.
    pub const fn index(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Down => "Down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Damage reduction granted by holding an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCheck {
    pub item: String,
    /// Amount of damage the item absorbs.
    pub reduction: i32,
}

impl ItemCheck {
    pub fn new(item: impl Into<String>, reduction: i32) -> Self {
        Self {
            item: item.into(),
            reduction,
        }
    }

    /// Adjust a raw health delta against the inventory.
    ///
    /// A held item lessens the damage: a raw delta of -10 with a reduction of
    /// 3 becomes -7. Without the item the delta is returned unchanged.
    pub fn adjust(&self, health_delta: i32, inventory: &Inventory) -> i32 {
        if inventory.contains(&self.item) {
            health_delta.saturating_add(self.reduction)
        } else {
            health_delta
        }
    }
}

/// Where a chosen option leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextStep {
    /// Present another event.
    Continue(EventId),
    /// The event chain is over, go back to moving on the map.
    ReturnToMap,
    /// The game ends; the option carries the end message.
    End,
}

/// The resolved effect of a player's choice in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub next: NextStep,
    /// Health delta, already adjusted by any item check.
    pub health_delta: i32,
    pub inventory_toggle: Option<String>,
    pub end_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_indices_follow_data_order() {
        for (position, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(direction.index(), position);
        }
        assert_eq!(Direction::Up.to_string(), "Up");
    }

    #[test]
    fn test_item_check_reduces_damage_when_held() {
        let check = ItemCheck::new("Coat", 3);
        let inventory: Inventory = ["Coat"].into_iter().collect();

        assert_eq!(check.adjust(-10, &inventory), -7);
    }

    #[test]
    fn test_item_check_ignored_without_item() {
        let check = ItemCheck::new("Coat", 3);

        assert_eq!(check.adjust(-10, &Inventory::new()), -10);
    }
}
