use std::fmt;

use crate::state::{Direction, EntityId, Position};

/// The single thing an agent wants to do this tick.
///
/// Intents are pure values: the host's executor validates and applies them,
/// and later ticks observe the effect only through the updated world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Step one tile in the given direction.
    Move(Direction),
    /// Strike the given actor.
    Attack { target: EntityId },
}

impl Intent {
    /// Convenience constructor for a step from `from` to an adjacent `to`.
    ///
    /// Returns `None` when the tiles are equal or not adjacent.
    pub fn step_between(from: Position, to: Position) -> Option<Intent> {
        if from.chebyshev(to) != 1 {
            return None;
        }
        Direction::from_delta(to.x - from.x, to.y - from.y).map(Intent::Move)
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Intent::Move(direction) => Some(*direction),
            Intent::Attack { .. } => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Move(direction) => write!(f, "move {direction}"),
            Intent::Attack { target } => write!(f, "attack {target}"),
        }
    }
}
