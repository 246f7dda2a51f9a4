//! Peacetime movement goals.

use game_core::Intent;

use crate::context::UtilityContext;
use crate::goal::{Goal, GoalEnv, WanderGoal, WanderParams, WaypointRouteGoal};
use crate::scoring::{ActionConfig, ActionId, Precondition, UtilityAction};

/// Roam aimlessly while nothing is threatening.
#[derive(Clone, Debug)]
pub struct WanderAction {
    config: ActionConfig,
    params: WanderParams,
}

impl WanderAction {
    pub fn new(config: ActionConfig, params: WanderParams) -> Self {
        Self { config, params }
    }

    pub fn default_config() -> ActionConfig {
        ActionConfig::new(ActionId::Wander, 0.25).with_precondition(Precondition::NoThreat)
    }

    pub fn params(&self) -> &WanderParams {
        &self.params
    }
}

impl Default for WanderAction {
    fn default() -> Self {
        Self::new(Self::default_config(), WanderParams::default())
    }
}

impl UtilityAction for WanderAction {
    fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn intent(&self, _ctx: &UtilityContext, _env: &mut GoalEnv<'_>) -> Option<Intent> {
        None
    }

    fn create_goal(&self, _ctx: &UtilityContext, _env: &GoalEnv<'_>) -> Option<Box<dyn Goal>> {
        Some(Box::new(WanderGoal::new(&self.config, self.params.clone())))
    }
}

/// Walk the agent's patrol route while nothing is threatening.
#[derive(Clone, Debug)]
pub struct PatrolAction {
    config: ActionConfig,
}

impl PatrolAction {
    pub fn new(config: ActionConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> ActionConfig {
        ActionConfig::new(ActionId::Patrol, 0.35)
            .with_precondition(Precondition::HasPatrolRoute)
            .with_precondition(Precondition::NoThreat)
    }
}

impl Default for PatrolAction {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl UtilityAction for PatrolAction {
    fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn intent(&self, _ctx: &UtilityContext, _env: &mut GoalEnv<'_>) -> Option<Intent> {
        None
    }

    fn create_goal(&self, _ctx: &UtilityContext, env: &GoalEnv<'_>) -> Option<Box<dyn Goal>> {
        let route = env.body.patrol_route().to_vec();
        match WaypointRouteGoal::new(&self.config, route, env.body.patrol_mode()) {
            Ok(goal) => Some(Box::new(match env.body.patrol_max_laps() {
                Some(laps) => goal.with_max_laps(laps),
                None => goal,
            })),
            Err(error) => {
                tracing::warn!(agent = %env.body.id, %error, "cannot start patrol");
                None
            }
        }
    }
}
