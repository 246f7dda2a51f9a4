//! Read-only actor snapshots handed out by [`crate::WorldQuery`].

use bitflags::bitflags;

use super::{EntityId, Position, ResourceMeter};

bitflags! {
    /// Capability and lifecycle bits for an actor snapshot.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActorFlags: u8 {
        /// Actor is alive. Dead actors stay queryable until the host removes them.
        const ALIVE = 1 << 0;
        /// Actor takes part in combat. Props, clouds and critters do not.
        const COMBATANT = 1 << 1;
        /// Actor occupies its tile exclusively.
        const BLOCKS_MOVEMENT = 1 << 2;
        /// Actor may walk through closed doors (opening them on the way).
        const OPENS_DOORS = 1 << 3;
    }
}

impl Default for ActorFlags {
    fn default() -> Self {
        ActorFlags::ALIVE | ActorFlags::COMBATANT | ActorFlags::BLOCKS_MOVEMENT
    }
}

/// Snapshot of a single actor as seen by the decision engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorView {
    pub id: EntityId,
    pub position: Position,
    pub health: ResourceMeter,
    pub flags: ActorFlags,
    /// Radius within which this actor notices others.
    pub awareness_radius: u32,
    /// Damage dealt each turn to anything sharing or entering this actor's tile
    /// (burning oil, acid pools). Zero for ordinary creatures.
    pub damage_per_turn: u32,
}

impl ActorView {
    pub fn new(id: EntityId, position: Position) -> Self {
        Self {
            id,
            position,
            health: ResourceMeter::full(100),
            flags: ActorFlags::default(),
            awareness_radius: 8,
            damage_per_turn: 0,
        }
    }

    #[must_use]
    pub fn with_health(mut self, health: ResourceMeter) -> Self {
        self.health = health;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ActorFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_awareness_radius(mut self, radius: u32) -> Self {
        self.awareness_radius = radius;
        self
    }

    #[must_use]
    pub fn with_damage_per_turn(mut self, damage: u32) -> Self {
        self.damage_per_turn = damage;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.flags.contains(ActorFlags::ALIVE)
    }

    pub fn is_combatant(&self) -> bool {
        self.flags.contains(ActorFlags::COMBATANT)
    }

    pub fn blocks_movement(&self) -> bool {
        self.flags.contains(ActorFlags::BLOCKS_MOVEMENT)
    }

    pub fn opens_doors(&self) -> bool {
        self.flags.contains(ActorFlags::OPENS_DOORS)
    }
}
