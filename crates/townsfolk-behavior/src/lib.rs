//! # Townsfolk Behavior
//!
//! NPC behavior for Townsfolk: idling, patrolling a waypoint route and
//! talking with the player.
//!
//! This crate provides:
//! - A table-driven Idle/Walking/Interacting state machine ([`Npc`])
//! - Straight-line waypoint patrol in loop or ping-pong mode
//! - A proximity-gated interaction trigger
//! - Bounded dialogue sessions over immutable scripts
//! - Collaborator traits for animation, movement, proximity and UI
//! - Content loading (RON, JSON, TOML), an event bus and an NPC roster
//!
//! The core is single-threaded and tick-driven. Nothing here fails at
//! runtime: bad input is rejected at load time and every runtime edge case
//! has a defined fallback.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod collaborators;
pub mod dialogue;
pub mod events;
pub mod interaction;
pub mod loader;
pub mod npc;
pub mod patrol;
pub mod profile;
pub mod roster;
pub mod route;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collaborators::*;
    pub use crate::dialogue::*;
    pub use crate::events::*;
    pub use crate::interaction::*;
    pub use crate::loader::*;
    pub use crate::npc::*;
    pub use crate::patrol::*;
    pub use crate::profile::*;
    pub use crate::roster::*;
    pub use crate::route::*;
    pub use crate::state::*;
}

pub use prelude::*;
