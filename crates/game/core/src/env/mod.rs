//! World query seam between the decision engine and the host simulation.
//!
//! The engine never mutates the world. Everything it needs to know about the
//! map and the actors on it flows through [`WorldQuery`], which hosts
//! implement over their own state. [`crate::GridWorld`] is the in-memory
//! implementation used by tests and the sandbox.

pub mod los;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActorView, EntityId, Position};

pub use los::{bresenham_line, has_line_of_sight};

/// Reason a tile cannot be entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockReason {
    #[error("position is outside the map")]
    OutOfBounds,

    #[error("tile is a wall")]
    Wall,

    #[error("tile is a closed door")]
    ClosedDoor,

    #[error("tile is occupied by actor {0}")]
    Actor(EntityId),

    #[error("tile holds a container")]
    Container,
}

impl GameError for BlockReason {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BlockReason::OutOfBounds | BlockReason::Wall => ErrorSeverity::Validation,
            BlockReason::ClosedDoor | BlockReason::Actor(_) | BlockReason::Container => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            BlockReason::OutOfBounds => "BLOCK_OUT_OF_BOUNDS",
            BlockReason::Wall => "BLOCK_WALL",
            BlockReason::ClosedDoor => "BLOCK_CLOSED_DOOR",
            BlockReason::Actor(_) => "BLOCK_ACTOR",
            BlockReason::Container => "BLOCK_CONTAINER",
        }
    }
}

/// Environmental hazard lying on a tile (fire, spikes, poison gas).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hazard {
    pub damage_per_turn: u32,
}

impl Hazard {
    pub const fn new(damage_per_turn: u32) -> Self {
        Self { damage_per_turn }
    }
}

/// Read-only view of the world used by every AI query.
///
/// Out-of-range coordinates must never fault: they are reported as
/// [`BlockReason::OutOfBounds`] and as opaque.
pub trait WorldQuery {
    /// Actors whose Chebyshev distance from `center` is at most `radius`.
    fn actors_within(&self, center: Position, radius: u32) -> Vec<ActorView>;

    /// Looks up an actor by its stable id.
    fn actor(&self, id: EntityId) -> Option<ActorView>;

    /// Hazard lying on the tile, if any.
    fn hazard_at(&self, position: Position) -> Option<Hazard>;

    /// Probes whether an actor could step onto `position`.
    ///
    /// `opens_doors` lets door-capable actors treat closed doors as passable.
    fn check_walkable(&self, position: Position, opens_doors: bool) -> Result<(), BlockReason>;

    /// True if the tile blocks sight. Out-of-range tiles are opaque.
    fn is_opaque(&self, position: Position) -> bool;

    /// Actors standing on `position`, blocking or not.
    fn actors_at(&self, position: Position) -> Vec<ActorView> {
        self.actors_within(position, 0)
    }

    fn is_hazardous(&self, position: Position) -> bool {
        self.hazard_at(position).is_some()
    }

    fn is_walkable(&self, position: Position, opens_doors: bool) -> bool {
        self.check_walkable(position, opens_doors).is_ok()
    }

    /// Bresenham line of sight between two tiles, ignoring both endpoints.
    fn line_of_sight(&self, from: Position, to: Position) -> bool {
        has_line_of_sight(from, to, |p| self.is_opaque(p))
    }
}
