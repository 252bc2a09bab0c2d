//! # Quest Rules
//!
//! The "World Bible" crate for Beetle Quest - player state, the map and event
//! tables, the rules for reading them and the game configuration.
//! This crate holds data and state mutation only; it does not run the game loop.

pub mod config;
pub mod entities;
pub mod mechanics;
pub mod world;

pub use config::*;
pub use entities::*;
pub use mechanics::*;
pub use world::*;
