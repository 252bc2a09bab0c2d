//! Traversal Engine - the state machine that walks the map and event graph.
//!
//! Each call to [`TraversalEngine::step`] advances past at most one prompt:
//! 1. **Arrived**: a map point with an attached event presents it before
//!    any movement
//! 2. **InEvent**: show the event, take a choice, apply the outcome
//! 3. **OnMap**: show the map, take a direction, move
//! 4. **Terminal**: show the win or death scene, hold it, stop
//!
//! A quit request at any prompt stops the run before anything from that
//! prompt is applied.

use quest_rules::{
    EventId, GameConfig, MapPointId, NextStep, Outcome, PlayerState, WorldData,
};
use serde::{Deserialize, Serialize};
use std::thread;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::frontend::{FrontendError, InputSource, Prompt, Renderer};
use crate::resolver::DecisionResolver;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("start point {0} does not exist")]
    UnknownStartPoint(MapPointId),
    #[error("map point {0} does not exist")]
    UnknownMapPoint(MapPointId),
    #[error("reading player input failed: {0}")]
    Input(#[source] FrontendError),
    #[error("drawing a scene failed: {0}")]
    Render(#[source] FrontendError),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub won: bool,
    pub message: String,
}

impl Ending {
    pub fn won(message: impl Into<String>) -> Self {
        Self {
            won: true,
            message: message.into(),
        }
    }

    pub fn lost(message: impl Into<String>) -> Self {
        Self {
            won: false,
            message: message.into(),
        }
    }
}

/// Where the player currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalState {
    /// Just reached a map point; its special event has not fired yet.
    Arrived(MapPointId),
    /// On a map point, waiting for a direction.
    OnMap(MapPointId),
    /// Inside an event reached from `point`.
    InEvent { point: MapPointId, event: EventId },
    /// The game is over. Absorbing.
    Terminal(Ending),
}

impl TraversalState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TraversalState::Terminal(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Finished(Ending),
    Quit,
}

/// Drives a single play session.
pub struct TraversalEngine<'w, I, R> {
    world: &'w WorldData,
    resolver: DecisionResolver<'w>,
    config: GameConfig,
    input: I,
    renderer: R,
    player: PlayerState,
    state: TraversalState,
    session: Uuid,
}

impl<'w, I, R> TraversalEngine<'w, I, R>
where
    I: InputSource,
    R: Renderer,
{
    /// Create an engine positioned at the configured start point.
    pub fn new(
        world: &'w WorldData,
        config: &GameConfig,
        input: I,
        renderer: R,
    ) -> Result<Self, EngineError> {
        if world.map_point(config.start_point).is_none() {
            return Err(EngineError::UnknownStartPoint(config.start_point));
        }

        Ok(Self {
            world,
            resolver: DecisionResolver::new(world, config.flag_item.clone()),
            config: config.clone(),
            input,
            renderer,
            player: PlayerState::new(config.default_health),
            state: TraversalState::Arrived(config.start_point),
            session: Uuid::new_v4(),
        })
    }

    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    /// Play until the game ends or the player quits.
    pub fn run(&mut self) -> Result<RunOutcome, EngineError> {
        let span = info_span!("run", session = %self.session);
        let _entered = span.enter();
        info!(state = ?self.state, health = self.player.health(), "run started");

        loop {
            if let Some(outcome) = self.step()? {
                return Ok(outcome);
            }
        }
    }

    /// Advance the state machine by one prompt boundary.
    ///
    /// Returns `Some` once the run is over.
    pub fn step(&mut self) -> Result<Option<RunOutcome>, EngineError> {
        match self.state.clone() {
            TraversalState::Arrived(point) => {
                self.state = self.arrive(point);
                Ok(None)
            }
            TraversalState::OnMap(point) => self.step_on_map(point),
            TraversalState::InEvent { point, event } => self.step_in_event(point, event),
            TraversalState::Terminal(ending) => {
                self.finish(&ending)?;
                Ok(Some(RunOutcome::Finished(ending)))
            }
        }
    }

    fn arrive(&self, point: MapPointId) -> TraversalState {
        let special_event = self
            .world
            .map_point(point)
            .and_then(|map_point| map_point.special_event);

        match special_event {
            Some(event) if self.world.event(event).is_some() => {
                debug!(%point, %event, "special event triggered");
                TraversalState::InEvent { point, event }
            }
            Some(event) => {
                warn!(%point, %event, "special event does not exist, skipping");
                TraversalState::OnMap(point)
            }
            None => TraversalState::OnMap(point),
        }
    }

    fn step_on_map(&mut self, point: MapPointId) -> Result<Option<RunOutcome>, EngineError> {
        let world = self.world;
        let map_point = world
            .map_point(point)
            .ok_or(EngineError::UnknownMapPoint(point))?;

        self.renderer
            .show_map_scene(map_point, &self.player)
            .map_err(EngineError::Render)?;

        loop {
            let direction = match self.input.await_direction().map_err(EngineError::Input)? {
                Prompt::Chosen(direction) => direction,
                Prompt::Quit => {
                    info!(%point, "player quit on the map");
                    return Ok(Some(RunOutcome::Quit));
                }
            };

            match self.resolver.resolve_map_choice(map_point, direction) {
                Some(next) => {
                    debug!(from = %point, to = %next, %direction, "moved");
                    self.state = TraversalState::Arrived(next);
                    return Ok(None);
                }
                None => debug!(%point, %direction, "direction blocked"),
            }
        }
    }

    fn step_in_event(
        &mut self,
        point: MapPointId,
        event_id: EventId,
    ) -> Result<Option<RunOutcome>, EngineError> {
        let world = self.world;
        let Some(event) = world.event(event_id) else {
            warn!(%point, event = %event_id, "event does not exist, returning to map");
            self.state = TraversalState::OnMap(point);
            return Ok(None);
        };

        let options = self.resolver.effective_options(event, self.player.inventory());
        if options.len() < event.options.len() {
            debug!(
                event = %event_id,
                flag_item = self.resolver.flag_item(),
                "first option hidden without the flag item"
            );
        }
        self.renderer
            .show_event_scene(event, &self.player, options)
            .map_err(EngineError::Render)?;

        let outcome = loop {
            let index = match self
                .input
                .await_option_index(options.len())
                .map_err(EngineError::Input)?
            {
                Prompt::Chosen(index) => index,
                Prompt::Quit => {
                    info!(event = %event_id, "player quit during an event");
                    return Ok(Some(RunOutcome::Quit));
                }
            };

            match self
                .resolver
                .resolve_event_choice(event, index, self.player.inventory())
            {
                Ok(outcome) => break outcome,
                Err(error) => debug!(%error, "invalid choice"),
            }
        };

        self.state = self.apply_outcome(point, outcome);
        Ok(None)
    }

    /// Apply an outcome to the player and pick the next state.
    ///
    /// Health at or below zero always loses. Surviving an option with an end
    /// message always wins.
    fn apply_outcome(&mut self, point: MapPointId, outcome: Outcome) -> TraversalState {
        let alive = self.player.update_health(outcome.health_delta);
        debug!(
            delta = outcome.health_delta,
            health = self.player.health(),
            "health updated"
        );

        if !alive {
            let message = outcome
                .end_message
                .unwrap_or_else(|| self.config.default_death_message.clone());
            return TraversalState::Terminal(Ending::lost(message));
        }
        if let Some(message) = outcome.end_message {
            return TraversalState::Terminal(Ending::won(message));
        }

        if let Some(item) = outcome.inventory_toggle {
            let held = self.player.update_inventory(item.as_str());
            debug!(%item, held, "inventory toggled");
        }

        match outcome.next {
            NextStep::Continue(next) if self.world.event(next).is_some() => {
                TraversalState::InEvent { point, event: next }
            }
            NextStep::Continue(next) => {
                warn!(event = %next, "next event does not exist, returning to map");
                TraversalState::OnMap(point)
            }
            NextStep::ReturnToMap => TraversalState::OnMap(point),
            NextStep::End => {
                warn!(%point, "option ends the game without a message, returning to map");
                TraversalState::OnMap(point)
            }
        }
    }

    fn finish(&mut self, ending: &Ending) -> Result<(), EngineError> {
        let (shown, dwell) = if ending.won {
            (
                self.renderer.show_win_scene(&ending.message),
                self.config.win_dwell(),
            )
        } else {
            (
                self.renderer.show_death_scene(&ending.message),
                self.config.death_dwell(),
            )
        };
        shown.map_err(EngineError::Render)?;

        info!(
            won = ending.won,
            health = self.player.health(),
            message = %ending.message,
            "game over"
        );
        thread::sleep(dwell);
        Ok(())
    }
}
