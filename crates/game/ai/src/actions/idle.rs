//! Low-stakes fallbacks: stand around, keep an eye on someone.

use game_core::Intent;

use crate::context::{Input, UtilityContext};
use crate::goal::GoalEnv;
use crate::scoring::{
    ActionConfig, ActionId, Consideration, Precondition, ResponseCurve, UtilityAction,
};

/// Do nothing. Always available at a low score so there is a floor.
#[derive(Clone, Debug)]
pub struct IdleAction {
    config: ActionConfig,
}

impl IdleAction {
    pub fn new(config: ActionConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> ActionConfig {
        ActionConfig::new(ActionId::Idle, 0.1)
    }
}

impl Default for IdleAction {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl UtilityAction for IdleAction {
    fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn intent(&self, _ctx: &UtilityContext, _env: &mut GoalEnv<'_>) -> Option<Intent> {
        None
    }
}

/// Stay put and watch the current target. Stronger the closer it is.
#[derive(Clone, Debug)]
pub struct WatchAction {
    config: ActionConfig,
}

impl WatchAction {
    pub fn new(config: ActionConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> ActionConfig {
        Self::config_with_base(0.3)
    }

    /// Watch tuned for guards and lookouts.
    pub fn vigilant() -> Self {
        Self::new(Self::config_with_base(0.5))
    }

    fn config_with_base(base: f32) -> ActionConfig {
        ActionConfig::new(ActionId::Watch, base)
            .with_precondition(Precondition::HasTarget)
            .with_consideration(Consideration::new(Input::Distance, ResponseCurve::Inverse))
    }
}

impl Default for WatchAction {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl UtilityAction for WatchAction {
    fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn intent(&self, _ctx: &UtilityContext, _env: &mut GoalEnv<'_>) -> Option<Intent> {
        None
    }
}
