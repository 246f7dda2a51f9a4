//! Tile costing and single-step movement helpers.
//!
//! These are the shared building blocks behind hazard escape, flee steps and
//! attack positioning. All of them are pure reads of a [`WorldQuery`].

use game_core::{Direction, Position, WorldQuery};

use crate::config::AiTuning;

/// Cost of taking one step in `direction`.
pub fn step_cost(direction: Direction, tuning: &AiTuning) -> u32 {
    if direction.is_diagonal() {
        tuning.diagonal_step_cost
    } else {
        tuning.orthogonal_step_cost
    }
}

/// Cost of standing on `position` because of hazards.
///
/// Tile hazards cost a flat base plus their damage. Occupants that deal damage
/// (burning oil, acid) add their damage again with an extra boost.
pub fn hazard_cost(world: &dyn WorldQuery, position: Position, tuning: &AiTuning) -> u32 {
    let tile = world
        .hazard_at(position)
        .map(|hazard| {
            tuning
                .hazard_base_cost
                .saturating_add(hazard.damage_per_turn.saturating_mul(tuning.damage_cost_multiplier))
        })
        .unwrap_or(0);

    let occupants = world
        .actors_at(position)
        .iter()
        .filter(|actor| actor.damage_per_turn > 0)
        .map(|actor| {
            actor
                .damage_per_turn
                .saturating_mul(tuning.damage_cost_multiplier)
                .saturating_mul(tuning.occupant_damage_boost)
        })
        .fold(0u32, u32::saturating_add);

    tile.saturating_add(occupants)
}

/// One walkable neighbor considered for a retreat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepCandidate {
    pub direction: Direction,
    pub position: Position,
    /// Distance from the threat after taking the step.
    pub distance: u32,
    /// Step cost plus hazard cost of the destination.
    pub cost: u32,
}

/// Walkable neighbor that is not hazardous, preferring orthogonal steps.
///
/// Returns `None` when `from` is not hazardous or no safe neighbor exists.
pub fn hazard_escape(world: &dyn WorldQuery, from: Position, opens_doors: bool) -> Option<Direction> {
    if !world.is_hazardous(from) {
        return None;
    }

    let mut diagonal = None;
    for (direction, position) in from.neighbors() {
        if !world.is_walkable(position, opens_doors) || world.is_hazardous(position) {
            continue;
        }
        if direction.is_orthogonal() {
            return Some(direction);
        }
        diagonal.get_or_insert(direction);
    }
    diagonal
}

/// Walkable neighbors of `from` that do not bring the agent closer to
/// `threat`, ranked farthest first then cheapest.
pub fn flee_candidates(
    world: &dyn WorldQuery,
    from: Position,
    threat: Position,
    opens_doors: bool,
    tuning: &AiTuning,
) -> Vec<StepCandidate> {
    let current = from.chebyshev(threat);
    let mut candidates: Vec<StepCandidate> = from
        .neighbors()
        .filter(|(_, position)| world.is_walkable(*position, opens_doors))
        .map(|(direction, position)| StepCandidate {
            direction,
            position,
            distance: position.chebyshev(threat),
            cost: step_cost(direction, tuning).saturating_add(hazard_cost(world, position, tuning)),
        })
        .filter(|candidate| candidate.distance >= current)
        .collect();

    // Stable sort keeps neighbor order as the final tiebreak.
    candidates.sort_by(|a, b| b.distance.cmp(&a.distance).then(a.cost.cmp(&b.cost)));
    candidates
}

/// Best retreat step away from `threat`: a strictly increasing step if any
/// exists, otherwise a sideways one.
pub fn best_flee_step(
    world: &dyn WorldQuery,
    from: Position,
    threat: Position,
    opens_doors: bool,
    tuning: &AiTuning,
) -> Option<Direction> {
    flee_candidates(world, from, threat, opens_doors, tuning)
        .first()
        .map(|candidate| candidate.direction)
}

/// Cheapest tile adjacent to `target` that the agent can stand on.
///
/// Scored by the agent's distance to the tile (in orthogonal step units) plus
/// the tile's hazard cost. The agent's own tile counts as reachable.
pub fn best_attack_destination(
    world: &dyn WorldQuery,
    agent: Position,
    target: Position,
    opens_doors: bool,
    tuning: &AiTuning,
) -> Option<Position> {
    target
        .neighbors()
        .map(|(_, tile)| tile)
        .filter(|tile| *tile == agent || world.is_walkable(*tile, opens_doors))
        .min_by_key(|tile| {
            let travel = agent.chebyshev(*tile).saturating_mul(tuning.orthogonal_step_cost);
            travel.saturating_add(hazard_cost(world, *tile, tuning))
        })
}
