use std::fmt;

use game_core::Intent;
use serde::{Deserialize, Serialize};

use super::{Consideration, Precondition};
use crate::context::UtilityContext;
use crate::goal::{Goal, GoalEnv};

/// Stable identity of an action kind.
///
/// Composition overrides by id, diagnostics report by id, and a goal carries
/// the id of the action that spawned it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionId {
    Attack,
    Flee,
    Avoid,
    Watch,
    Idle,
    Wander,
    Patrol,
}

/// Static scoring profile of an action: base score, considerations,
/// preconditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub id: ActionId,
    pub base_score: f32,
    #[serde(default)]
    pub considerations: Vec<Consideration>,
    #[serde(default)]
    pub preconditions: Vec<Precondition>,
}

impl ActionConfig {
    pub fn new(id: ActionId, base_score: f32) -> Self {
        Self {
            id,
            base_score,
            considerations: Vec::new(),
            preconditions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_consideration(mut self, consideration: Consideration) -> Self {
        self.considerations.push(consideration);
        self
    }

    #[must_use]
    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    pub fn preconditions_hold(&self, ctx: &UtilityContext) -> bool {
        Precondition::all_hold(&self.preconditions, ctx)
    }

    /// Base score times every consideration, ignoring preconditions.
    pub fn raw_score(&self, ctx: &UtilityContext) -> f32 {
        raw_score(self.base_score, &self.considerations, ctx)
    }

    /// Zero when any precondition fails, else [`Self::raw_score`].
    pub fn score(&self, ctx: &UtilityContext) -> f32 {
        if !self.preconditions_hold(ctx) {
            return 0.0;
        }
        self.raw_score(ctx)
    }
}

pub(crate) fn raw_score(base: f32, considerations: &[Consideration], ctx: &UtilityContext) -> f32 {
    let product = considerations
        .iter()
        .map(|consideration| consideration.evaluate(ctx))
        .product::<f32>();
    (base * product).max(0.0)
}

/// A scoreable behavior.
///
/// Atomic actions produce an intent directly. Actions that need several ticks
/// to play out return a [`Goal`] from [`UtilityAction::create_goal`] instead;
/// the brain then keeps the goal alive through its continuation score.
pub trait UtilityAction: fmt::Debug + Send + Sync {
    fn config(&self) -> &ActionConfig;

    fn id(&self) -> ActionId {
        self.config().id
    }

    fn score(&self, ctx: &UtilityContext) -> f32 {
        self.config().score(ctx)
    }

    /// Intent for this tick when the action runs atomically.
    fn intent(&self, ctx: &UtilityContext, env: &mut GoalEnv<'_>) -> Option<Intent>;

    /// Multi-tick goal for this action, if it has one.
    ///
    /// Returning `None` makes the component fall back to [`Self::intent`].
    fn create_goal(&self, _ctx: &UtilityContext, _env: &GoalEnv<'_>) -> Option<Box<dyn Goal>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Input;
    use crate::scoring::ResponseCurve;

    #[test]
    fn failing_precondition_zeroes_score() {
        let config = ActionConfig::new(ActionId::Attack, 1.0)
            .with_precondition(Precondition::HasTarget)
            .with_consideration(Consideration::new(Input::HealthPercent, ResponseCurve::Linear));
        let ctx = UtilityContext {
            health_percent: 1.0,
            ..UtilityContext::default()
        };
        assert_eq!(config.raw_score(&ctx), 1.0);
        assert_eq!(config.score(&ctx), 0.0);
    }

    #[test]
    fn score_is_base_times_product() {
        let config = ActionConfig::new(ActionId::Flee, 0.8)
            .with_consideration(Consideration::new(Input::HealthPercent, ResponseCurve::Inverse))
            .with_consideration(Consideration::new(Input::ThreatLevel, ResponseCurve::Linear));
        let ctx = UtilityContext {
            health_percent: 0.5,
            threat_level: 0.5,
            ..UtilityContext::default()
        };
        assert!((config.score(&ctx) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn action_ids_parse_case_insensitively() {
        assert_eq!("Patrol".parse::<ActionId>().unwrap(), ActionId::Patrol);
        assert_eq!(ActionId::Wander.to_string(), "wander");
    }
}
