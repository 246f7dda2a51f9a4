//! In-memory tile grid implementing [`WorldQuery`].

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::env::{BlockReason, Hazard, WorldQuery};

use super::{ActorFlags, ActorView, EntityId, Position, ResourceMeter};

/// Maximum number of actors that may share one tile (one blocker plus clouds).
pub const MAX_OCCUPANTS_PER_TILE: usize = 4;

type OccupantSlots = ArrayVec<EntityId, MAX_OCCUPANTS_PER_TILE>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Canonical tile classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
    ClosedDoor,
    OpenDoor,
    Container,
}

impl TileKind {
    /// Parses the ASCII map glyphs used by scenario files.
    pub fn from_glyph(glyph: char) -> Option<TileKind> {
        match glyph {
            '.' | '^' | '@' => Some(TileKind::Floor),
            '#' => Some(TileKind::Wall),
            '+' => Some(TileKind::ClosedDoor),
            '\'' => Some(TileKind::OpenDoor),
            '=' => Some(TileKind::Container),
            _ => None,
        }
    }

    pub fn is_opaque(self) -> bool {
        matches!(self, TileKind::Wall | TileKind::ClosedDoor)
    }

    fn block_reason(self, opens_doors: bool) -> Option<BlockReason> {
        match self {
            TileKind::Floor | TileKind::OpenDoor => None,
            TileKind::Wall => Some(BlockReason::Wall),
            TileKind::ClosedDoor if opens_doors => None,
            TileKind::ClosedDoor => Some(BlockReason::ClosedDoor),
            TileKind::Container => Some(BlockReason::Container),
        }
    }
}

/// Hazard damage applied to `^` tiles by [`GridWorld::from_rows`].
pub const DEFAULT_GLYPH_HAZARD: Hazard = Hazard::new(5);

/// Mutable grid world: static tiles, hazards and actor snapshots.
#[derive(Clone, Debug)]
pub struct GridWorld {
    dimensions: MapDimensions,
    tiles: Vec<TileKind>,
    hazards: BTreeMap<Position, Hazard>,
    actors: BTreeMap<EntityId, ActorView>,
    occupancy: BTreeMap<Position, OccupantSlots>,
}

impl GridWorld {
    /// Creates an all-floor world.
    pub fn new(width: u32, height: u32) -> Self {
        let dimensions = MapDimensions::new(width, height);
        Self {
            dimensions,
            tiles: vec![TileKind::Floor; (width * height) as usize],
            hazards: BTreeMap::new(),
            actors: BTreeMap::new(),
            occupancy: BTreeMap::new(),
        }
    }

    /// Builds a world from ASCII rows. Row 0 is the top of the map (highest y).
    ///
    /// Unknown glyphs read as floor; `^` places [`DEFAULT_GLYPH_HAZARD`].
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as u32;
        let mut world = Self::new(width, height);

        for (row_index, row) in rows.iter().enumerate() {
            let y = height as i32 - 1 - row_index as i32;
            for (x, glyph) in row.chars().enumerate() {
                let position = Position::new(x as i32, y);
                world.set_tile(position, TileKind::from_glyph(glyph).unwrap_or_default());
                if glyph == '^' {
                    world.set_hazard(position, DEFAULT_GLYPH_HAZARD);
                }
            }
        }

        world
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions
            .contains(position)
            .then(|| (position.y as u32 * self.dimensions.width + position.x as u32) as usize)
    }

    pub fn tile(&self, position: Position) -> Option<TileKind> {
        self.index(position).map(|index| self.tiles[index])
    }

    pub fn set_tile(&mut self, position: Position, kind: TileKind) -> bool {
        match self.index(position) {
            Some(index) => {
                self.tiles[index] = kind;
                true
            }
            None => false,
        }
    }

    pub fn set_hazard(&mut self, position: Position, hazard: Hazard) {
        if self.dimensions.contains(position) {
            self.hazards.insert(position, hazard);
        }
    }

    pub fn clear_hazard(&mut self, position: Position) {
        self.hazards.remove(&position);
    }

    /// Places an actor, replacing any previous snapshot with the same id.
    pub fn spawn(&mut self, actor: ActorView) -> bool {
        if let Some(previous) = self.actors.remove(&actor.id) {
            self.remove_occupant(previous.position, previous.id);
        }
        let slot = self.occupancy.entry(actor.position).or_default();
        if slot.try_push(actor.id).is_err() {
            return false;
        }
        self.actors.insert(actor.id, actor);
        true
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<ActorView> {
        let actor = self.actors.remove(&id)?;
        self.remove_occupant(actor.position, id);
        Some(actor)
    }

    /// Teleports an actor without validation. The host's executor is expected
    /// to have called [`WorldQuery::check_walkable`] first.
    pub fn move_actor(&mut self, id: EntityId, to: Position) -> bool {
        let Some(from) = self.actors.get(&id).map(|actor| actor.position) else {
            return false;
        };
        let slot = self.occupancy.entry(to).or_default();
        if slot.try_push(id).is_err() {
            return false;
        }
        self.remove_occupant(from, id);
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.position = to;
        }
        true
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorView> {
        self.actors.get_mut(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorView> {
        self.actors.values()
    }

    pub fn set_health(&mut self, id: EntityId, health: ResourceMeter) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.health = health;
            if health.is_depleted() {
                actor.flags.remove(ActorFlags::ALIVE);
            }
        }
    }

    pub fn kill(&mut self, id: EntityId) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.health.current = 0;
            actor.flags.remove(ActorFlags::ALIVE);
        }
    }

    fn remove_occupant(&mut self, position: Position, id: EntityId) {
        if let Some(slot) = self.occupancy.get_mut(&position) {
            if let Some(index) = slot.iter().position(|occupant| *occupant == id) {
                slot.swap_remove(index);
            }
            if slot.is_empty() {
                self.occupancy.remove(&position);
            }
        }
    }
}

impl WorldQuery for GridWorld {
    fn actors_within(&self, center: Position, radius: u32) -> Vec<ActorView> {
        self.actors
            .values()
            .filter(|actor| actor.position.chebyshev(center) <= radius)
            .cloned()
            .collect()
    }

    fn actor(&self, id: EntityId) -> Option<ActorView> {
        self.actors.get(&id).cloned()
    }

    fn hazard_at(&self, position: Position) -> Option<Hazard> {
        self.hazards.get(&position).copied()
    }

    fn check_walkable(&self, position: Position, opens_doors: bool) -> Result<(), BlockReason> {
        let tile = self.tile(position).ok_or(BlockReason::OutOfBounds)?;
        if let Some(reason) = tile.block_reason(opens_doors) {
            return Err(reason);
        }

        let blocker = self
            .occupancy
            .get(&position)
            .into_iter()
            .flatten()
            .filter_map(|id| self.actors.get(id))
            .find(|actor| actor.is_alive() && actor.blocks_movement());
        match blocker {
            Some(actor) => Err(BlockReason::Actor(actor.id)),
            None => Ok(()),
        }
    }

    fn is_opaque(&self, position: Position) -> bool {
        self.tile(position).is_none_or(TileKind::is_opaque)
    }

    fn actors_at(&self, position: Position) -> Vec<ActorView> {
        self.occupancy
            .get(&position)
            .into_iter()
            .flatten()
            .filter_map(|id| self.actors.get(id).cloned())
            .collect()
    }
}
