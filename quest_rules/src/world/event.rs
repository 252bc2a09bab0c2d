//! Story events - branching nodes with player-selectable options.

use serde::{Deserialize, Serialize};

use super::legacy;
use crate::entities::EventId;
use crate::mechanics::{ItemCheck, NextStep};

/// Events carry between 2 and 4 options.
pub const MIN_EVENT_OPTIONS: usize = 2;
pub const MAX_EVENT_OPTIONS: usize = 4;

/// One choice inside an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOption {
    pub label: String,

    #[serde(
        rename = "result_event_id",
        deserialize_with = "legacy::deserialize_next_step",
        serialize_with = "legacy::serialize_next_step"
    )]
    pub next: NextStep,

    /// Signed delta added to health; negative values are damage.
    #[serde(default)]
    pub health_change: i32,

    /// Item toggled in the inventory when this option is taken.
    #[serde(default)]
    pub add_inventory_item: Option<String>,

    /// Presence marks the option as ending the game.
    #[serde(default)]
    pub game_end_message: Option<String>,

    #[serde(
        default,
        deserialize_with = "legacy::deserialize_item_check"
    )]
    pub item_check: Option<ItemCheck>,
}

impl EventOption {
    /// Create an option that leads to `next` with no side effects.
    pub fn new(label: impl Into<String>, next: NextStep) -> Self {
        Self {
            label: label.into(),
            next,
            health_change: 0,
            add_inventory_item: None,
            game_end_message: None,
            item_check: None,
        }
    }

    pub fn with_health_change(mut self, delta: i32) -> Self {
        self.health_change = delta;
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.add_inventory_item = Some(item.into());
        self
    }

    pub fn with_end_message(mut self, message: impl Into<String>) -> Self {
        self.game_end_message = Some(message.into());
        self
    }

    pub fn with_item_check(mut self, check: ItemCheck) -> Self {
        self.item_check = Some(check);
        self
    }
}

/// A story node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(alias = "ID")]
    pub id: EventId,

    pub text_prompt: String,

    pub options: Vec<EventOption>,
}

impl Event {
    pub fn new(id: EventId, text_prompt: impl Into<String>) -> Self {
        Self {
            id,
            text_prompt: text_prompt.into(),
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: EventOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = Event::new(EventId(1), "A beetle blocks the path.")
            .with_option(EventOption::new("Fight", NextStep::End).with_end_message("Squashed."))
            .with_option(EventOption::new("Flee", NextStep::ReturnToMap).with_health_change(-2));

        assert_eq!(event.option_count(), 2);
        assert_eq!(event.options[1].health_change, -2);
    }

    #[test]
    fn test_option_record_defaults() {
        let option: EventOption =
            serde_json::from_str(r#"{"label": "Wait", "result_event_id": 4}"#).unwrap();

        assert_eq!(option.next, NextStep::Continue(EventId(4)));
        assert_eq!(option.health_change, 0);
        assert!(option.add_inventory_item.is_none());
        assert!(option.game_end_message.is_none());
        assert!(option.item_check.is_none());
    }

    #[test]
    fn test_option_serializes_back_to_readable_form() {
        let option = EventOption::new("Go home", NextStep::ReturnToMap)
            .with_item_check(ItemCheck::new("Coat", 3));

        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["result_event_id"], "map");

        let back: EventOption = serde_json::from_value(json).unwrap();
        assert_eq!(back, option);
    }

    #[test]
    fn test_event_record_accepts_legacy_id_key() {
        let event: Event = serde_json::from_str(
            r#"{"ID": 2, "text_prompt": "Rain.", "options": [
                {"label": "Wait", "result_event_id": -100, "item_check": "('Coat', 3)"},
                {"label": "Run", "result_event_id": null, "game_end_message": "Soaked."}
            ]}"#,
        )
        .unwrap();

        assert_eq!(event.id, EventId(2));
        assert_eq!(event.options[0].next, NextStep::ReturnToMap);
        assert_eq!(event.options[0].item_check, Some(ItemCheck::new("Coat", 3)));
        assert_eq!(event.options[1].next, NextStep::End);
    }

    #[test]
    fn test_option_keys_are_snake_case_only() {
        let result = serde_json::from_str::<EventOption>(
            r#"{"Label": "Wait", "ResultEventId": 4, "HealthChange": -1}"#,
        );
        assert!(result.is_err());
    }
}
