use game_core::{EntityId, Intent};

use super::{Goal, GoalCore, GoalEnv, GoalState};
use crate::movement;
use crate::scoring::ActionConfig;

/// Run from one threat until a safe distance is reached.
#[derive(Clone, Debug)]
pub struct FleeGoal {
    core: GoalCore,
    threat: EntityId,
    safe_distance: u32,
    start_distance: Option<u32>,
    current_distance: Option<u32>,
}

impl FleeGoal {
    pub fn new(config: &ActionConfig, threat: EntityId, safe_distance: u32) -> Self {
        Self {
            core: GoalCore::from_config(config),
            threat,
            safe_distance,
            start_distance: None,
            current_distance: None,
        }
    }

    pub fn threat(&self) -> EntityId {
        self.threat
    }

    pub fn safe_distance(&self) -> u32 {
        self.safe_distance
    }

    pub fn start_distance(&self) -> Option<u32> {
        self.start_distance
    }
}

impl Goal for FleeGoal {
    fn core(&self) -> &GoalCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut GoalCore {
        &mut self.core
    }

    /// Fraction of the gap between the start distance and the safe distance
    /// covered so far. Zero until the first evaluation.
    fn progress(&self) -> f32 {
        let (Some(start), Some(current)) = (self.start_distance, self.current_distance) else {
            return 0.0;
        };
        if start >= self.safe_distance {
            return 1.0;
        }
        let covered = current as f32 - start as f32;
        let span = (self.safe_distance - start) as f32;
        (covered / span).clamp(0.0, 1.0)
    }

    fn evaluate_completion(&mut self, env: &mut GoalEnv<'_>) {
        let threat = env.world.actor(self.threat).filter(|actor| actor.is_alive());
        let Some(threat) = threat else {
            self.set_state(GoalState::Completed, env.body);
            return;
        };

        let distance = env.body.position.chebyshev(threat.position);
        self.start_distance.get_or_insert(distance);
        self.current_distance = Some(distance);

        if distance >= self.safe_distance {
            self.set_state(GoalState::Completed, env.body);
        }
    }

    fn next_action(&mut self, env: &mut GoalEnv<'_>) -> Option<Intent> {
        let threat = env.world.actor(self.threat)?;
        let step = movement::best_flee_step(
            env.world,
            env.body.position,
            threat.position,
            env.body.opens_doors,
            env.tuning,
        );

        match step {
            Some(direction) => Some(Intent::Move(direction)),
            None => {
                tracing::debug!(agent = %env.body.id, threat = %self.threat, "cornered");
                self.set_state(GoalState::Failed, env.body);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use game_core::{ActorView, GridWorld, Position};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::agent::AgentBody;
    use crate::config::AiTuning;
    use crate::nav::GreedyNavigator;
    use crate::scoring::ActionId;

    fn config() -> ActionConfig {
        ActionConfig::new(ActionId::Flee, 1.0)
    }

    #[test]
    fn progress_tracks_distance_gained() {
        let mut world = GridWorld::new(20, 3);
        let threat = EntityId(2);
        world.spawn(ActorView::new(threat, Position::new(0, 1)));

        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(2, 1));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut goal = FleeGoal::new(&config(), threat, 8);
        assert_eq!(goal.progress(), 0.0);

        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };
        goal.evaluate_completion(&mut env);
        assert_eq!(goal.start_distance(), Some(2));
        assert_eq!(goal.progress(), 0.0);
        assert_eq!(goal.next_action(&mut env), Some(Intent::Move(game_core::Direction::East)));

        env.body.position = Position::new(5, 1);
        goal.evaluate_completion(&mut env);
        assert!((goal.progress() - 0.5).abs() < 1e-6);

        env.body.position = Position::new(8, 1);
        goal.evaluate_completion(&mut env);
        assert_eq!(goal.state(), GoalState::Completed);
    }

    #[test]
    fn already_safe_reads_as_done() {
        let mut goal = FleeGoal::new(&config(), EntityId(2), 4);
        goal.start_distance = Some(6);
        goal.current_distance = Some(6);
        assert_eq!(goal.progress(), 1.0);
    }

    #[test]
    fn vanished_threat_completes() {
        let world = GridWorld::new(4, 4);
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(1, 1));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut goal = FleeGoal::new(&config(), EntityId(2), 8);
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };
        goal.evaluate_completion(&mut env);
        assert_eq!(goal.state(), GoalState::Completed);
    }

    #[test]
    fn boxed_in_fails() {
        let mut world = GridWorld::from_rows(&["###", "#.#", "###"]);
        let threat = EntityId(2);
        world.spawn(ActorView::new(threat, Position::new(0, 0)).with_flags(game_core::ActorFlags::ALIVE));
        let tuning = AiTuning::default();
        let mut body = AgentBody::new(EntityId(1), Position::new(1, 1));
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut goal = FleeGoal::new(&config(), threat, 8);
        let mut env = GoalEnv {
            body: &mut body,
            world: &world,
            nav: &mut nav,
            rng: &mut rng,
            tuning: &tuning,
        };
        goal.evaluate_completion(&mut env);
        assert_eq!(goal.next_action(&mut env), None);
        assert_eq!(goal.state(), GoalState::Failed);
    }
}
