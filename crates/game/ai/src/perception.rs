//! Line-of-sight perception bounded by an awareness radius.

use game_core::{ActorView, EntityId, Position, WorldQuery};

/// An actor the agent can currently see.
#[derive(Clone, Debug, PartialEq)]
pub struct PerceivedActor {
    pub actor: ActorView,
    pub distance: u32,
    /// `1 − distance/radius`, always in (0, 1].
    pub strength: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerceptionComponent {
    awareness_radius: u32,
}

impl PerceptionComponent {
    pub fn new(awareness_radius: u32) -> Self {
        Self { awareness_radius }
    }

    pub fn awareness_radius(&self) -> u32 {
        self.awareness_radius
    }

    /// Filters `candidates` down to living combatants other than `observer`
    /// that lie strictly inside the radius and in line of sight of `origin`.
    ///
    /// Results are ordered nearest first, ties broken by id.
    pub fn get_perceived(
        &self,
        observer: EntityId,
        origin: Position,
        candidates: &[ActorView],
        world: &dyn WorldQuery,
    ) -> Vec<PerceivedActor> {
        let mut perceived: Vec<PerceivedActor> = candidates
            .iter()
            .filter(|actor| actor.id != observer && actor.is_alive() && actor.is_combatant())
            .filter_map(|actor| {
                let distance = origin.chebyshev(actor.position);
                if distance >= self.awareness_radius {
                    return None;
                }
                if !world.line_of_sight(origin, actor.position) {
                    return None;
                }
                Some(PerceivedActor {
                    actor: actor.clone(),
                    distance,
                    strength: self.strength_at(distance),
                })
            })
            .collect();

        perceived.sort_by_key(|entry| (entry.distance, entry.actor.id));
        perceived
    }

    /// Queries the world for candidates around `origin` and filters them.
    pub fn scan(
        &self,
        observer: EntityId,
        origin: Position,
        world: &dyn WorldQuery,
    ) -> Vec<PerceivedActor> {
        let candidates = world.actors_within(origin, self.awareness_radius);
        self.get_perceived(observer, origin, &candidates, world)
    }

    pub fn strength_at(&self, distance: u32) -> f32 {
        if self.awareness_radius == 0 {
            return if distance == 0 { 1.0 } else { 0.0 };
        }
        (1.0 - distance as f32 / self.awareness_radius as f32).clamp(0.0, 1.0)
    }
}
