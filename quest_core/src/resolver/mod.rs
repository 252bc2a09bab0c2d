//! Decision Resolver - interprets a player's choice against map and event data.
//!
//! The resolver never mutates anything. It turns a direction into the next
//! map point, and an option index into an [`Outcome`] the traversal engine
//! applies to the player.
//!
//! Option indices are always relative to the *effective* option list, the
//! one actually shown to the player. An event with exactly three options hides
//! its first option unless the player carries the flag item.

use quest_rules::{
    Direction, Event, EventId, EventOption, Inventory, MapPoint, MapPointId, Outcome, WorldData,
};
use thiserror::Error;
use tracing::warn;

/// Option count at which the first option is gated behind the flag item.
pub const GATED_OPTION_COUNT: usize = 3;

/// The chosen option index is outside the options shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{event} has no option {index}; {available} options are available")]
pub struct InvalidChoiceError {
    pub event: EventId,
    pub index: usize,
    pub available: usize,
}

/// Resolves player choices against the world data.
#[derive(Debug, Clone)]
pub struct DecisionResolver<'w> {
    world: &'w WorldData,
    flag_item: String,
}

impl<'w> DecisionResolver<'w> {
    /// Create a resolver over `world`, gating three-option events on `flag_item`.
    pub fn new(world: &'w WorldData, flag_item: impl Into<String>) -> Self {
        Self {
            world,
            flag_item: flag_item.into(),
        }
    }

    pub fn flag_item(&self) -> &str {
        &self.flag_item
    }

    /// Neighbour of `point` in `direction`, or `None` when the move is not legal.
    ///
    /// A direction pointing at a map point that does not exist is treated as
    /// blocked.
    pub fn resolve_map_choice(&self, point: &MapPoint, direction: Direction) -> Option<MapPointId> {
        let target = point.neighbour(direction)?;
        if self.world.map_point(target).is_none() {
            warn!(from = %point.id, %direction, %target, "direction leads to a missing map point");
            return None;
        }
        Some(target)
    }

    /// The options shown to the player for `event`.
    pub fn effective_options<'e>(
        &self,
        event: &'e Event,
        inventory: &Inventory,
    ) -> &'e [EventOption] {
        if event.options.len() == GATED_OPTION_COUNT && !inventory.contains(&self.flag_item) {
            &event.options[1..]
        } else {
            &event.options
        }
    }

    /// Resolve the option at `option_index` of the effective option list.
    pub fn resolve_event_choice(
        &self,
        event: &Event,
        option_index: usize,
        inventory: &Inventory,
    ) -> Result<Outcome, InvalidChoiceError> {
        let options = self.effective_options(event, inventory);
        let option = options.get(option_index).ok_or(InvalidChoiceError {
            event: event.id,
            index: option_index,
            available: options.len(),
        })?;

        let health_delta = match &option.item_check {
            Some(check) => check.adjust(option.health_change, inventory),
            None => option.health_change,
        };

        Ok(Outcome {
            next: option.next,
            health_delta,
            inventory_toggle: option.add_inventory_item.clone(),
            end_message: option.game_end_message.clone(),
        })
    }
}
