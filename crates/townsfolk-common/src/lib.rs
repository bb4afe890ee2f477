//! # Townsfolk Common
//!
//! Common types, utilities, and shared abstractions for Townsfolk.
//!
//! This crate provides foundational types used across the Townsfolk crates:
//! - ID types (NpcId, ScriptId, ActorTag)
//! - Heading and distance helpers on top of `glam`
//! - Version information for content schemas
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod spatial;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::spatial::*;
    pub use crate::version::*;
}

pub use prelude::*;
