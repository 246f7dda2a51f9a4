//! Grid primitives and world-query seam shared across the workspace.
//!
//! `game-core` defines the vocabulary the AI engine reasons in (entities,
//! positions, directions, intents) and the read-only [`WorldQuery`] trait that
//! host simulations implement. It performs no decision making and never
//! mutates host state.
pub mod env;
pub mod error;
pub mod intent;
pub mod state;

pub use env::{BlockReason, Hazard, WorldQuery, bresenham_line, has_line_of_sight};
pub use error::{ErrorSeverity, GameError};
pub use intent::Intent;
pub use state::{
    ActorFlags, ActorView, Direction, EntityId, GridWorld, MAX_OCCUPANTS_PER_TILE, MapDimensions,
    Position, ResourceMeter, TileKind,
};
