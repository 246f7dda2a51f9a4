//! Grid vocabulary: identifiers, positions, actor snapshots and the
//! in-memory [`GridWorld`].

pub mod actor;
pub mod common;
pub mod grid;

pub use actor::{ActorFlags, ActorView};
pub use common::{Direction, EntityId, Position, ResourceMeter};
pub use grid::{GridWorld, MAX_OCCUPANTS_PER_TILE, MapDimensions, TileKind};
