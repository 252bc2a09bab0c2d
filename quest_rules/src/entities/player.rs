//! Player state: health and the toggle-style inventory.

use serde::{Deserialize, Serialize};

/// Health a new player starts with when nothing else is configured.
pub const DEFAULT_PLAYER_HEALTH: i32 = 10;

/// Ordered list of item names.
///
/// Insertion order is preserved and an item appears at most once: adding an
/// item that is already held removes it instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<String>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the item if absent, remove it if present.
    ///
    /// Returns `true` when the item is held after the call.
    pub fn toggle(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if let Some(pos) = self.items.iter().position(|held| *held == item) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(item);
            true
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|held| held == item)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Inventory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for item in iter {
            let item = item.into();
            if !inventory.contains(&item) {
                inventory.items.push(item);
            }
        }
        inventory
    }
}

/// Health and inventory of the player character.
///
/// Created once when a run starts and mutated only by the traversal engine.
/// Health is kept wider than the deltas applied to it, so any `i32` change
/// can be undone exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    health: i64,
    inventory: Inventory,
}

impl PlayerState {
    /// Create a player with the given starting health and an empty inventory.
    pub fn new(health: i32) -> Self {
        Self {
            health: i64::from(health),
            inventory: Inventory::new(),
        }
    }

    pub fn health(&self) -> i64 {
        self.health
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Check if the player is alive. Zero health counts as dead.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Add `delta` to health (negative values are damage).
    ///
    /// Returns whether the player is still alive afterwards.
    pub fn update_health(&mut self, delta: i32) -> bool {
        self.health = self.health.saturating_add(i64::from(delta));
        self.is_alive()
    }

    /// Toggle an item in the inventory.
    pub fn update_inventory(&mut self, item: impl Into<String>) -> bool {
        self.inventory.toggle(item)
    }

    pub fn in_inventory(&self, item: &str) -> bool {
        self.inventory.contains(item)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_HEALTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_inventory() {
        let mut player = PlayerState::default();

        player.update_inventory("item1");
        player.update_inventory("item2");

        assert_eq!(player.inventory().items(), ["item1", "item2"]);
    }

    #[test]
    fn test_remove_inventory() {
        let mut player = PlayerState::default();

        player.update_inventory("item1");
        player.update_inventory("item2");
        // Adding an item already held removes it
        assert!(!player.update_inventory("item1"));

        assert_eq!(player.inventory().items(), ["item2"]);
    }

    #[test]
    fn test_toggle_twice_restores_inventory() {
        let mut player = PlayerState::default();
        player.update_inventory("Coat");
        let before = player.inventory().clone();

        for item in ["Coat", "Flashlight"] {
            player.update_inventory(item);
            player.update_inventory(item);
            assert_eq!(player.inventory(), &before);
        }
    }

    #[test]
    fn test_subtract_health() {
        let mut player = PlayerState::default();

        assert!(player.update_health(-(DEFAULT_PLAYER_HEALTH / 2)));
        assert_eq!(player.health(), 5);
    }

    #[test]
    fn test_kill_player() {
        let mut player = PlayerState::default();
        assert!(!player.update_health(-DEFAULT_PLAYER_HEALTH * 10));
        assert!(!player.is_alive());
    }

    #[test]
    fn test_zero_health_is_dead() {
        let mut player = PlayerState::new(5);
        assert!(!player.update_health(-5));
        assert_eq!(player.health(), 0);
    }

    #[test]
    fn test_add_health() {
        let mut player = PlayerState::default();

        assert!(player.update_health(5));
        assert_eq!(player.health(), 15);
    }

    #[test]
    fn test_extreme_health_update_is_reversible() {
        let mut player = PlayerState::default();

        assert!(player.update_health(i32::MAX));
        assert!(player.update_health(-i32::MAX));
        assert_eq!(player.health(), 10);

        assert!(!player.update_health(i32::MIN));
        assert_eq!(player.health(), 10 + i64::from(i32::MIN));
    }

    #[test]
    fn test_item_in_inventory() {
        let mut player = PlayerState::default();

        for item in ["item1", "item2", "item3"] {
            player.update_inventory(item);
        }

        assert!(player.in_inventory("item1"));
        assert!(player.in_inventory("item3"));
        assert!(!player.in_inventory("item4"));
    }

    #[test]
    fn test_inventory_from_iter_drops_duplicates() {
        let inventory: Inventory = ["Coat", "Coat", "Flashlight"].into_iter().collect();
        assert_eq!(inventory.items(), ["Coat", "Flashlight"]);
        assert_eq!(inventory.len(), 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_items() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[A-Za-z ]{1,12}", 0..6)
    }

    proptest! {
        #[test]
        fn health_update_round_trips(start in any::<i32>(), delta in any::<i32>()) {
            let mut player = PlayerState::new(start);
            let alive = player.update_health(delta);
            prop_assert_eq!(alive, i64::from(start) + i64::from(delta) > 0);

            // Negating i32::MIN does not fit in an i32; undo it in two steps
            match delta.checked_neg() {
                Some(undo) => {
                    player.update_health(undo);
                }
                None => {
                    player.update_health(i32::MAX);
                    player.update_health(1);
                }
            }
            prop_assert_eq!(player.health(), i64::from(start));
            prop_assert_eq!(player.is_alive(), start > 0);
        }

        #[test]
        fn toggle_twice_restores_inventory(held in arb_items(), item in "[A-Za-z ]{1,12}") {
            let mut player = PlayerState::default();
            for name in &held {
                player.update_inventory(name.as_str());
            }
            let before = player.inventory().clone();
            let was_held = before.contains(&item);

            player.update_inventory(item.as_str());
            player.update_inventory(item.as_str());

            if was_held {
                // Re-adding a held item appends it, so only membership survives
                let mut after = player.inventory().items().to_vec();
                let mut expected = before.items().to_vec();
                after.sort();
                expected.sort();
                prop_assert_eq!(after, expected);
            } else {
                prop_assert_eq!(player.inventory(), &before);
            }
        }
    }
}
