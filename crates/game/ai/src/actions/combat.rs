//! Actions taken in the presence of another actor: fight, back off, run.

use game_core::Intent;

use crate::context::{Input, UtilityContext};
use crate::goal::{FleeGoal, Goal, GoalEnv};
use crate::nav::WalkTarget;
use crate::scoring::{
    ActionConfig, ActionId, Consideration, Precondition, ResponseCurve, UtilityAction,
};

// ============================================================================
// Attack
// ============================================================================

/// Close in on a hostile target and strike it.
#[derive(Clone, Debug)]
pub struct AttackAction {
    config: ActionConfig,
}

impl AttackAction {
    pub fn new(config: ActionConfig) -> Self {
        Self { config }
    }

    /// Near targets and good health favor attacking.
    pub fn default_config() -> ActionConfig {
        ActionConfig::new(ActionId::Attack, 1.0)
            .with_precondition(Precondition::HasTarget)
            .with_precondition(Precondition::TargetHostile)
            .with_consideration(Consideration::new(Input::Distance, ResponseCurve::Inverse))
            .with_consideration(
                Consideration::new(Input::HealthPercent, ResponseCurve::Linear).with_weight(0.5),
            )
    }
}

impl Default for AttackAction {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl UtilityAction for AttackAction {
    fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn intent(&self, ctx: &UtilityContext, env: &mut GoalEnv<'_>) -> Option<Intent> {
        let target = ctx.target?;
        if target.distance <= 1 {
            return Some(Intent::Attack { target: target.id });
        }

        let destination = ctx.best_attack_destination?;
        let agent = env.body.id;
        if !env.nav.is_targeting(agent, destination) {
            env.nav.walk_to(agent, WalkTarget::Position(destination), 0);
        }
        env.nav
            .next_step(agent, env.body.position, env.body.opens_doors, env.world)
            .map(Intent::Move)
    }
}

// ============================================================================
// Avoid
// ============================================================================

/// Keep distance from someone disliked but not worth fighting.
///
/// Peaks for unfriendly dispositions and fades toward both hostility and
/// friendship.
#[derive(Clone, Debug)]
pub struct AvoidAction {
    config: ActionConfig,
}

impl AvoidAction {
    pub fn new(config: ActionConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> ActionConfig {
        ActionConfig::new(ActionId::Avoid, 0.6)
            .with_precondition(Precondition::HasTarget)
            .with_precondition(Precondition::HasEscapeRoute)
            .with_consideration(Consideration::new(
                Input::Disposition,
                ResponseCurve::Bell {
                    peak: 0.3,
                    width: 0.3,
                },
            ))
            .with_consideration(Consideration::new(Input::Distance, ResponseCurve::Inverse))
    }
}

impl Default for AvoidAction {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl UtilityAction for AvoidAction {
    fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn intent(&self, ctx: &UtilityContext, _env: &mut GoalEnv<'_>) -> Option<Intent> {
        ctx.best_flee_step.map(Intent::Move)
    }
}

// ============================================================================
// Flee
// ============================================================================

/// Run from danger until a safe distance is reached.
///
/// Spawns a [`FleeGoal`] against whoever the context says to flee from.
#[derive(Clone, Debug)]
pub struct FleeAction {
    config: ActionConfig,
}

impl FleeAction {
    pub fn new(config: ActionConfig) -> Self {
        Self { config }
    }

    /// Fight-or-flight flee: driven by low health and the target's threat.
    pub fn default_config() -> ActionConfig {
        ActionConfig::new(ActionId::Flee, 1.0)
            .with_precondition(Precondition::HasEscapeRoute)
            .with_precondition(Precondition::ThreatPresent)
            .with_consideration(Consideration::new(Input::HealthPercent, ResponseCurve::Inverse))
            .with_consideration(
                Consideration::new(Input::ThreatLevel, ResponseCurve::Linear).with_weight(0.5),
            )
    }

    /// Flee for actors that never fight: any threat, outgoing or incoming,
    /// is enough. Health only modulates eagerness.
    pub fn reactive_config() -> ActionConfig {
        ActionConfig::new(ActionId::Flee, 1.0)
            .with_precondition(Precondition::HasEscapeRoute)
            .with_precondition(Precondition::AnyThreat)
            .with_consideration(
                Consideration::new(Input::PeakThreat, ResponseCurve::Linear).with_weight(0.5),
            )
            .with_consideration(Consideration::new(Input::HealthPercent, panic_curve()))
    }

    /// Flee for cowards: runs well before health gets low.
    pub fn cowardly_config() -> ActionConfig {
        ActionConfig::new(ActionId::Flee, 1.3)
            .with_precondition(Precondition::HasEscapeRoute)
            .with_precondition(Precondition::AnyThreat)
            .with_consideration(
                Consideration::new(Input::PeakThreat, ResponseCurve::Linear).with_weight(0.5),
            )
            .with_consideration(Consideration::new(Input::HealthPercent, panic_curve()))
    }

    pub fn reactive() -> Self {
        Self::new(Self::reactive_config())
    }

    pub fn cowardly() -> Self {
        Self::new(Self::cowardly_config())
    }
}

/// 1.0 at zero health falling to 0.5 at full health.
fn panic_curve() -> ResponseCurve {
    ResponseCurve::Bell {
        peak: 0.0,
        width: 2.0,
    }
}

impl Default for FleeAction {
    fn default() -> Self {
        Self::new(Self::default_config())
    }
}

impl UtilityAction for FleeAction {
    fn config(&self) -> &ActionConfig {
        &self.config
    }

    fn intent(&self, ctx: &UtilityContext, _env: &mut GoalEnv<'_>) -> Option<Intent> {
        ctx.best_flee_step.map(Intent::Move)
    }

    fn create_goal(&self, ctx: &UtilityContext, env: &GoalEnv<'_>) -> Option<Box<dyn Goal>> {
        let threat = ctx.flee_from?;
        Some(Box::new(FleeGoal::new(
            &self.config,
            threat,
            env.tuning.flee_safe_distance,
        )))
    }
}
