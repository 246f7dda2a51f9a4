use game_core::{Direction, Intent, Position};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{Goal, GoalCore, GoalEnv, GoalState};
use crate::agent::AgentBody;
use crate::movement::hazard_cost;
use crate::scoring::ActionConfig;

/// Knobs for aimless roaming.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderParams {
    /// Chance per step of picking a fresh random heading.
    pub direction_change_chance: f32,
    /// Chance per step of nudging the heading 45° either way.
    pub jitter_chance: f32,
    /// Chance per step of stopping to linger.
    pub linger_chance: f32,
    pub min_linger_ticks: u32,
    pub max_linger_ticks: u32,
    /// Consecutive ticks without moving before a fresh heading is picked.
    pub max_stuck_ticks: u32,
    /// Applied to the agent's speed while wandering.
    pub speed_multiplier: f32,
    /// Ticks before the goal completes on its own. Zero means no limit.
    pub duration: u32,
}

impl Default for WanderParams {
    fn default() -> Self {
        Self {
            direction_change_chance: 0.2,
            jitter_chance: 0.1,
            linger_chance: 0.1,
            min_linger_ticks: 1,
            max_linger_ticks: 3,
            max_stuck_ticks: 3,
            speed_multiplier: 0.5,
            duration: 30,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WanderGoal {
    core: GoalCore,
    params: WanderParams,
    heading: Option<Direction>,
    linger_remaining: u32,
    stuck_ticks: u32,
    /// Position the last step was issued from, checked on the next tick.
    pending_from: Option<Position>,
    saved_speed: Option<f32>,
}

impl WanderGoal {
    pub fn new(config: &ActionConfig, params: WanderParams) -> Self {
        let mut core = GoalCore::from_config(config);
        if params.duration > 0 {
            core = core.with_max_age(params.duration);
        }
        Self {
            core,
            params,
            heading: None,
            linger_remaining: 0,
            stuck_ticks: 0,
            pending_from: None,
            saved_speed: None,
        }
    }

    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    pub fn stuck_ticks(&self) -> u32 {
        self.stuck_ticks
    }

    pub fn is_lingering(&self) -> bool {
        self.linger_remaining > 0
    }

    /// Random walkable neighbor, non-hazardous ones first.
    fn pick_heading(env: &mut GoalEnv<'_>) -> Option<Direction> {
        let here = env.body.position;
        let walkable: Vec<(Direction, bool)> = here
            .neighbors()
            .filter(|(_, next)| env.world.is_walkable(*next, env.body.opens_doors))
            .map(|(direction, next)| (direction, env.world.is_hazardous(next)))
            .collect();
        let safe: Vec<Direction> = walkable
            .iter()
            .filter(|(_, hazardous)| !hazardous)
            .map(|(direction, _)| *direction)
            .collect();
        let pool: Vec<Direction> = if safe.is_empty() {
            walkable.into_iter().map(|(direction, _)| direction).collect()
        } else {
            safe
        };
        if pool.is_empty() {
            return None;
        }
        Some(pool[env.rng.gen_range(0..pool.len())])
    }

    /// Forward, then sidesteps, then 45° turns, then the wide turns, then
    /// straight back. Each pair is tried in random order.
    fn step_tiers(heading: Direction, rng: &mut dyn RngCore) -> [Vec<Direction>; 5] {
        let mut pair = |turn: i32| {
            if rng.gen_bool(0.5) {
                vec![heading.rotate(-turn), heading.rotate(turn)]
            } else {
                vec![heading.rotate(turn), heading.rotate(-turn)]
            }
        };
        let sidesteps = pair(2);
        let turns = pair(1);
        let wide = pair(3);
        [vec![heading], sidesteps, turns, wide, vec![heading.opposite()]]
    }

    /// Cheapest walkable step within the first tier that has one.
    fn choose_step(heading: Direction, env: &mut GoalEnv<'_>) -> Option<Direction> {
        let here = env.body.position;
        let tiers = Self::step_tiers(heading, env.rng);
        tiers.iter().find_map(|tier| {
            tier.iter()
                .copied()
                .filter(|direction| {
                    env.world
                        .is_walkable(here.step(*direction), env.body.opens_doors)
                })
                .min_by_key(|direction| {
                    hazard_cost(env.world, here.step(*direction), env.tuning)
                })
        })
    }
}

fn roll(rng: &mut dyn RngCore, chance: f32) -> bool {
    if chance.is_nan() || chance <= 0.0 {
        return false;
    }
    if chance >= 1.0 {
        return true;
    }
    rng.gen_bool(chance as f64)
}

impl Goal for WanderGoal {
    fn core(&self) -> &GoalCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut GoalCore {
        &mut self.core
    }

    fn progress(&self) -> f32 {
        if self.params.duration == 0 {
            return 0.0;
        }
        (self.core.age() as f32 / self.params.duration as f32).clamp(0.0, 1.0)
    }

    fn activate(&mut self, env: &mut GoalEnv<'_>) {
        self.saved_speed = Some(env.body.speed);
        env.body.speed *= self.params.speed_multiplier;
    }

    fn on_state_change(&mut self, _from: GoalState, to: GoalState, body: &mut AgentBody) {
        if !to.is_terminal() {
            return;
        }
        if let Some(speed) = self.saved_speed.take() {
            body.speed = speed;
        }
    }

    /// Wandering only ends by age or by being outscored.
    fn evaluate_completion(&mut self, _env: &mut GoalEnv<'_>) {}

    fn next_action(&mut self, env: &mut GoalEnv<'_>) -> Option<Intent> {
        if let Some(from) = self.pending_from.take() {
            if env.body.position == from {
                self.stuck_ticks = self.stuck_ticks.saturating_add(1);
            } else {
                self.stuck_ticks = 0;
            }
        }

        if self.linger_remaining > 0 {
            self.linger_remaining -= 1;
            return None;
        }

        if roll(env.rng, self.params.linger_chance) {
            let low = self.params.min_linger_ticks.max(1);
            let high = self.params.max_linger_ticks.max(low);
            // This tick is the first lingering one.
            self.linger_remaining = env.rng.gen_range(low..=high) - 1;
            return None;
        }

        let stuck =
            self.params.max_stuck_ticks > 0 && self.stuck_ticks >= self.params.max_stuck_ticks;
        if stuck {
            tracing::debug!(agent = %env.body.id, ticks = self.stuck_ticks, "wander stuck");
            self.stuck_ticks = 0;
        }
        let mut heading = match self.heading {
            Some(heading) if !stuck && !roll(env.rng, self.params.direction_change_chance) => {
                heading
            }
            _ => match Self::pick_heading(env) {
                Some(heading) => heading,
                None => {
                    self.heading = None;
                    return None;
                }
            },
        };

        if roll(env.rng, self.params.jitter_chance) {
            heading = heading.rotate(if env.rng.gen_bool(0.5) { 1 } else { -1 });
        }

        let step = Self::choose_step(heading, env)?;
        self.heading = Some(step);
        self.pending_from = Some(env.body.position);
        Some(Intent::Move(step))
    }
}

#[cfg(test)]
mod tests {
    use game_core::{EntityId, GridWorld, WorldQuery};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::AiTuning;
    use crate::nav::GreedyNavigator;
    use crate::scoring::ActionId;

    fn config() -> ActionConfig {
        ActionConfig::new(ActionId::Wander, 0.25)
    }

    fn restless() -> WanderParams {
        WanderParams {
            linger_chance: 0.0,
            ..WanderParams::default()
        }
    }

    /// No pauses and no random heading changes.
    fn steady() -> WanderParams {
        WanderParams {
            direction_change_chance: 0.0,
            jitter_chance: 0.0,
            ..restless()
        }
    }

    fn heading_north(params: WanderParams) -> WanderGoal {
        let mut goal = WanderGoal::new(&config(), params);
        goal.heading = Some(Direction::North);
        goal
    }

    #[test]
    fn speed_is_restored_on_any_terminal_state() {
        for terminal in [GoalState::Completed, GoalState::Failed, GoalState::Abandoned] {
            let world = GridWorld::new(5, 5);
            let tuning = AiTuning::default();
            let mut body = AgentBody::new(EntityId(1), Position::new(2, 2));
            let mut nav = GreedyNavigator::new();
            let mut rng = SmallRng::seed_from_u64(11);
            let mut goal = WanderGoal::new(&config(), WanderParams::default());
            {
                let mut env = GoalEnv {
                    body: &mut body,
                    world: &world,
                    nav: &mut nav,
                    rng: &mut rng,
                    tuning: &tuning,
                };
                goal.activate(&mut env);
            }
            assert_eq!(body.speed, 0.5);
            goal.set_state(terminal, &mut body);
            assert_eq!(body.speed, AgentBody::BASE_SPEED);
        }
    }

    #[test]
    fn steps_only_onto_walkable_tiles() {
        let world = GridWorld::from_rows(&["#####", "#...#", "#.^.#", "#...#", "#####"]);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(1, 2));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut goal = WanderGoal::new(&config(), restless());

        for _ in 0..20 {
            let mut env = GoalEnv {
                body: &mut body,
                world: &world,
                nav: &mut nav,
                rng: &mut rng,
                tuning: &tuning,
            };
            let Some(Intent::Move(direction)) = goal.next_action(&mut env) else {
                panic!("open room should always offer a step");
            };
            let next = body.position.step(direction);
            assert!(world.is_walkable(next, false));
            body.position = next;
        }
    }

    #[test]
    fn fresh_heading_avoids_hazards_when_it_can() {
        // Every neighbor but the one to the west burns.
        let world = GridWorld::from_rows(&["^^^", ".@^", "^^^"]);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(1, 1));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(21);
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };
        let mut goal = WanderGoal::new(&config(), steady());
        assert_eq!(goal.next_action(&mut env), Some(Intent::Move(Direction::West)));
    }

    #[test]
    fn boxed_in_agent_clears_heading() {
        let world = GridWorld::from_rows(&["###", "#.#", "###"]);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(1, 1));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };
        let mut goal = heading_north(steady());
        goal.stuck_ticks = goal.params.max_stuck_ticks;

        assert_eq!(goal.next_action(&mut env), None);
        assert_eq!(goal.heading(), None);
        assert_eq!(goal.state(), GoalState::Active);
    }

    #[test]
    fn stuck_limit_picks_a_fresh_heading() {
        let world = GridWorld::new(5, 5);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(2, 2));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut goal = WanderGoal::new(&config(), restless());
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };

        // The host never applies the steps, so the agent never moves.
        for _ in 0..3 {
            assert!(goal.next_action(&mut env).is_some());
        }
        assert_eq!(goal.stuck_ticks(), 2);
        assert!(goal.next_action(&mut env).is_some());
        assert_eq!(goal.stuck_ticks(), 0);
        assert_eq!(goal.state(), GoalState::Active);
    }

    #[test]
    fn moving_resets_the_stuck_count() {
        let world = GridWorld::new(9, 9);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(4, 4));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut goal = heading_north(steady());

        for _ in 0..2 {
            let mut env = GoalEnv {
                body: &mut body,
                world: &world,
                nav: &mut nav,
                rng: &mut rng,
                tuning: &tuning,
            };
            assert!(goal.next_action(&mut env).is_some());
        }
        assert_eq!(goal.stuck_ticks(), 1);

        body.position = body.position.step(Direction::North);
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };
        assert!(goal.next_action(&mut env).is_some());
        assert_eq!(goal.stuck_ticks(), 0);
    }

    #[test]
    fn jitter_turns_the_heading_by_45_degrees() {
        let world = GridWorld::new(5, 5);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(2, 2));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(13);
        let mut goal = heading_north(WanderParams {
            jitter_chance: 1.0,
            ..steady()
        });
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };

        let intent = goal.next_action(&mut env);
        assert!(
            matches!(
                intent,
                Some(Intent::Move(Direction::NorthEast | Direction::NorthWest))
            ),
            "{intent:?}"
        );
    }

    #[test]
    fn blocked_forward_falls_back_to_the_safer_sidestep() {
        // Wall ahead, fire to the east, open diagonals.
        let world = GridWorld::from_rows(&[".....", "..#..", "...^.", ".....", "....."]);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(2, 2));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(17);
        let mut goal = heading_north(steady());
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };

        assert_eq!(goal.next_action(&mut env), Some(Intent::Move(Direction::West)));
        assert_eq!(goal.heading(), Some(Direction::West));
    }

    #[test]
    fn sidesteps_come_before_diagonal_turns() {
        let world = GridWorld::from_rows(&[".....", "..#..", ".....", ".....", "....."]);
        let tuning = AiTuning::default();
        let mut nav = GreedyNavigator::new();

        for seed in 0..8 {
            let mut body = AgentBody::new(EntityId(1), Position::new(2, 2));
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut goal = heading_north(steady());
            let mut env = GoalEnv {
                body: &mut body,
                world: &world,
                nav: &mut nav,
                rng: &mut rng,
                tuning: &tuning,
            };
            let intent = goal.next_action(&mut env);
            assert!(
                matches!(intent, Some(Intent::Move(Direction::East | Direction::West))),
                "{intent:?}"
            );
        }
    }

    #[test]
    fn reverse_is_the_last_resort() {
        // Only the tile behind is open.
        let world = GridWorld::from_rows(&["###", "#.#", "#.#"]);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(1, 1));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut goal = heading_north(steady());
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };
        assert_eq!(goal.next_action(&mut env), Some(Intent::Move(Direction::South)));
    }

    #[test]
    fn progress_follows_age() {
        let mut goal = WanderGoal::new(
            &config(),
            WanderParams {
                duration: 4,
                ..WanderParams::default()
            },
        );
        let mut body = AgentBody::new(EntityId(1), Position::ORIGIN);
        goal.tick(&mut body);
        assert_eq!(goal.progress(), 0.25);
        for _ in 0..3 {
            goal.tick(&mut body);
        }
        assert_eq!(goal.state(), GoalState::Completed);
    }
}
