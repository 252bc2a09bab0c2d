//! Referential integrity checks over the map and event tables.
//!
//! A violation is a data-authoring defect. The engine never fails on one; it
//! falls back to map movement and logs a warning.

use thiserror::Error;

use super::{WorldData, MAX_EVENT_OPTIONS, MIN_EVENT_OPTIONS};
use crate::entities::{EventId, MapPointId};
use crate::mechanics::{Direction, NextStep};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    #[error("{point} has special event {event}, which does not exist")]
    MissingSpecialEvent { point: MapPointId, event: EventId },

    #[error("{point} leads {direction} to {target}, which does not exist")]
    MissingDirectionTarget {
        point: MapPointId,
        direction: Direction,
        target: MapPointId,
    },

    #[error("{point} has no exits; a player arriving there can only quit")]
    DeadEnd { point: MapPointId },

    #[error("{event} option {option} continues to {target}, which does not exist")]
    MissingNextEvent {
        event: EventId,
        option: usize,
        target: EventId,
    },

    #[error("{event} option {option} ends the game without an end message")]
    EndWithoutMessage { event: EventId, option: usize },

    #[error(
        "{event} has {count} options, expected {} to {}",
        MIN_EVENT_OPTIONS,
        MAX_EVENT_OPTIONS
    )]
    OptionCount { event: EventId, count: usize },
}

impl WorldData {
    /// Collect every dangling reference and malformed event in the tables.
    pub fn integrity_violations(&self) -> Vec<IntegrityViolation> {
        let mut violations = Vec::new();

        for point in self.map_points() {
            if let Some(event) = point.special_event {
                if self.event(event).is_none() {
                    violations.push(IntegrityViolation::MissingSpecialEvent {
                        point: point.id,
                        event,
                    });
                }
            }

            for (direction, target) in point.directions.open() {
                if self.map_point(target).is_none() {
                    violations.push(IntegrityViolation::MissingDirectionTarget {
                        point: point.id,
                        direction,
                        target,
                    });
                }
            }

            if point.directions.is_dead_end() {
                violations.push(IntegrityViolation::DeadEnd { point: point.id });
            }
        }

        for event in self.events() {
            let count = event.option_count();
            if !(MIN_EVENT_OPTIONS..=MAX_EVENT_OPTIONS).contains(&count) {
                violations.push(IntegrityViolation::OptionCount {
                    event: event.id,
                    count,
                });
            }

            for (option, choice) in event.options.iter().enumerate() {
                match choice.next {
                    NextStep::Continue(target) if self.event(target).is_none() => {
                        violations.push(IntegrityViolation::MissingNextEvent {
                            event: event.id,
                            option,
                            target,
                        });
                    }
                    NextStep::End if choice.game_end_message.is_none() => {
                        violations.push(IntegrityViolation::EndWithoutMessage {
                            event: event.id,
                            option,
                        });
                    }
                    _ => {}
                }
            }
        }

        violations
    }
}
