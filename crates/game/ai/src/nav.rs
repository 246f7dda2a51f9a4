//! Navigation seam used by goals that walk somewhere.
//!
//! Goals only ask for a plan and read back the next step; the host decides
//! how plans are computed. [`GreedyNavigator`] is a minimal in-memory planner
//! for tests and the sandbox.

use std::collections::BTreeMap;

use game_core::{Direction, EntityId, Position, WorldQuery};

use crate::config::AiTuning;
use crate::movement;

/// Where a navigation plan leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkTarget {
    Position(Position),
    /// Follow an actor wherever it goes.
    Actor(EntityId),
}

pub trait Navigator {
    /// Requests a plan for `agent`, replacing any existing one.
    ///
    /// Returns false if the request was refused.
    fn walk_to(&mut self, agent: EntityId, target: WalkTarget, stop_distance: u32) -> bool;

    /// True when the agent's active plan leads to `position`.
    fn is_targeting(&self, agent: EntityId, position: Position) -> bool;

    fn stop(&mut self, agent: EntityId);

    /// Next step along the agent's plan, or `None` when there is no plan, the
    /// agent has arrived, or no step makes progress.
    fn next_step(
        &mut self,
        agent: EntityId,
        from: Position,
        opens_doors: bool,
        world: &dyn WorldQuery,
    ) -> Option<Direction>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Plan {
    target: WalkTarget,
    stop_distance: u32,
}

/// Steps to whichever walkable neighbor is closest to the goal.
///
/// No search, so it gets stuck behind concave obstacles. Ties break toward
/// cheaper steps, then neighbor order.
#[derive(Clone, Debug, Default)]
pub struct GreedyNavigator {
    plans: BTreeMap<EntityId, Plan>,
    tuning: AiTuning,
    requests: u32,
}

impl GreedyNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tuning(tuning: AiTuning) -> Self {
        Self {
            tuning,
            ..Self::default()
        }
    }

    pub fn has_plan(&self, agent: EntityId) -> bool {
        self.plans.contains_key(&agent)
    }

    /// Number of plans requested so far.
    pub fn requests(&self) -> u32 {
        self.requests
    }

    fn resolve(target: WalkTarget, world: &dyn WorldQuery) -> Option<Position> {
        match target {
            WalkTarget::Position(position) => Some(position),
            WalkTarget::Actor(id) => world
                .actor(id)
                .filter(|actor| actor.is_alive())
                .map(|actor| actor.position),
        }
    }
}

impl Navigator for GreedyNavigator {
    fn walk_to(&mut self, agent: EntityId, target: WalkTarget, stop_distance: u32) -> bool {
        self.requests += 1;
        self.plans.insert(
            agent,
            Plan {
                target,
                stop_distance,
            },
        );
        true
    }

    fn is_targeting(&self, agent: EntityId, position: Position) -> bool {
        matches!(
            self.plans.get(&agent),
            Some(Plan { target: WalkTarget::Position(goal), .. }) if *goal == position
        )
    }

    fn stop(&mut self, agent: EntityId) {
        self.plans.remove(&agent);
    }

    fn next_step(
        &mut self,
        agent: EntityId,
        from: Position,
        opens_doors: bool,
        world: &dyn WorldQuery,
    ) -> Option<Direction> {
        let plan = *self.plans.get(&agent)?;
        let Some(goal) = Self::resolve(plan.target, world) else {
            tracing::debug!(%agent, "navigation target vanished; dropping plan");
            self.plans.remove(&agent);
            return None;
        };

        let current = from.chebyshev(goal);
        if current <= plan.stop_distance {
            return None;
        }

        from.neighbors()
            .filter(|(_, position)| world.is_walkable(*position, opens_doors))
            .map(|(direction, position)| {
                let cost = movement::step_cost(direction, &self.tuning)
                    .saturating_add(movement::hazard_cost(world, position, &self.tuning));
                (direction, position.chebyshev(goal), cost)
            })
            .filter(|(_, distance, _)| *distance < current)
            .min_by_key(|(_, distance, cost)| (*distance, *cost))
            .map(|(direction, _, _)| direction)
    }
}
