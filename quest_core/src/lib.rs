//! # Quest Core
//!
//! The playable half of Beetle Quest. This crate reads the world from
//! `quest_rules`, resolves player decisions against it, and walks the player
//! through the map and event graph until the game ends.
//!
//! ## Core Components
//!
//! - **resolver**: Turns a direction or option pick into a move or an outcome
//! - **traversal**: The state machine that owns the player and the game loop
//! - **frontend**: Input and rendering traits plus the terminal implementation
//!
//! ## Design Philosophy
//!
//! - **Data-Driven**: Every branch of the story comes from the loaded world data
//! - **Front-end Agnostic**: The engine only sees the `InputSource` and `Renderer` traits

pub mod frontend;
pub mod resolver;
pub mod traversal;

pub use frontend::{FrontendError, InputSource, Prompt, Renderer};
pub use resolver::*;
pub use traversal::*;
