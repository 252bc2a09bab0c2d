//! Front-end capabilities the traversal engine talks to.
//!
//! - **InputSource**: blocks until the player picks a direction, an option, or quits
//! - **Renderer**: draws scenes; it never feeds control flow back to the engine
//!
//! The terminal implementations live in [`terminal`].

pub mod layout;
pub mod terminal;

use quest_rules::{Direction, Event, EventOption, MapPoint, PlayerState};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Answer to a prompt: a recognised choice, or a request to stop playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<T> {
    Chosen(T),
    Quit,
}

/// Source of player decisions.
///
/// Both methods block until a recognised key arrives. Unrecognised keys are
/// ignored rather than reported.
pub trait InputSource {
    fn await_direction(&mut self) -> Result<Prompt<Direction>, FrontendError>;

    /// Wait for an option index in `0..max_options`.
    fn await_option_index(&mut self, max_options: usize) -> Result<Prompt<usize>, FrontendError>;
}

/// Draws whatever the engine asks for.
pub trait Renderer {
    fn show_map_scene(&mut self, point: &MapPoint, player: &PlayerState)
        -> Result<(), FrontendError>;

    /// `options` is the effective option list, already gated on inventory.
    fn show_event_scene(
        &mut self,
        event: &Event,
        player: &PlayerState,
        options: &[EventOption],
    ) -> Result<(), FrontendError>;

    fn show_death_scene(&mut self, message: &str) -> Result<(), FrontendError>;

    fn show_win_scene(&mut self, message: &str) -> Result<(), FrontendError>;
}
