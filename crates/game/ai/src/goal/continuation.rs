use super::Goal;
use crate::config::AiTuning;
use crate::context::UtilityContext;
use crate::scoring::{ActionId, Precondition, raw_score};

/// Scores "keep doing the active goal" against fresh alternatives.
///
/// `score = raw + minimum + progress × weight`, where `raw` is the goal's own
/// base score times its considerations. Zero if any of the goal's
/// preconditions fail, so a goal that no longer makes sense gets no bonus.
#[derive(Debug)]
pub struct ContinueGoalAction<'g> {
    goal: &'g dyn Goal,
    minimum: f32,
    weight: f32,
}

impl<'g> ContinueGoalAction<'g> {
    pub fn new(goal: &'g dyn Goal, tuning: &AiTuning) -> Self {
        Self {
            goal,
            minimum: tuning.persistence_minimum,
            weight: tuning.persistence_weight,
        }
    }

    pub fn action_id(&self) -> ActionId {
        self.goal.action_id()
    }

    pub fn score(&self, ctx: &UtilityContext) -> f32 {
        let core = self.goal.core();
        if !Precondition::all_hold(core.preconditions(), ctx) {
            return 0.0;
        }
        let raw = raw_score(core.base_score(), core.considerations(), ctx);
        let progress = self.goal.progress();
        let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
        raw + self.minimum + progress * self.weight
    }
}

#[cfg(test)]
mod tests {
    use game_core::Intent;

    use super::*;
    use crate::context::Input;
    use crate::goal::{GoalCore, GoalEnv};
    use crate::scoring::{ActionConfig, Consideration, ResponseCurve};

    #[derive(Debug)]
    struct Fixed {
        core: GoalCore,
        progress: f32,
    }

    impl Goal for Fixed {
        fn core(&self) -> &GoalCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut GoalCore {
            &mut self.core
        }

        fn progress(&self) -> f32 {
            self.progress
        }

        fn evaluate_completion(&mut self, _env: &mut GoalEnv<'_>) {}

        fn next_action(&mut self, _env: &mut GoalEnv<'_>) -> Option<Intent> {
            None
        }
    }

    fn flee_config() -> ActionConfig {
        ActionConfig::new(ActionId::Flee, 1.0)
            .with_precondition(Precondition::ThreatPresent)
            .with_consideration(Consideration::new(Input::HealthPercent, ResponseCurve::Inverse))
    }

    #[test]
    fn bonus_is_minimum_plus_weighted_progress() {
        let config = flee_config();
        let tuning = AiTuning::default();
        let ctx = UtilityContext {
            health_percent: 0.4,
            threat_level: 0.5,
            ..UtilityContext::default()
        };
        let raw = config.score(&ctx);

        for progress in [0.0, 0.5, 1.0] {
            let goal = Fixed {
                core: GoalCore::from_config(&config),
                progress,
            };
            let score = ContinueGoalAction::new(&goal, &tuning).score(&ctx);
            let expected = tuning.persistence_minimum + progress * tuning.persistence_weight;
            assert!(
                ((score - raw) - expected).abs() < 1e-6,
                "progress {progress}: bonus {} != {expected}",
                score - raw
            );
        }
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let config = flee_config();
        let tuning = AiTuning::default();
        let ctx = UtilityContext {
            health_percent: 0.4,
            threat_level: 0.5,
            ..UtilityContext::default()
        };
        let raw = config.score(&ctx);

        for (progress, clamped) in [(7.0, 1.0), (-2.0, 0.0), (f32::NAN, 0.0)] {
            let goal = Fixed {
                core: GoalCore::from_config(&config),
                progress,
            };
            let score = ContinueGoalAction::new(&goal, &tuning).score(&ctx);
            let expected = raw + tuning.persistence_minimum + clamped * tuning.persistence_weight;
            assert!((score - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn failed_precondition_drops_the_bonus() {
        let config = flee_config();
        let goal = Fixed {
            core: GoalCore::from_config(&config),
            progress: 1.0,
        };
        let ctx = UtilityContext::default();
        assert_eq!(ContinueGoalAction::new(&goal, &AiTuning::default()).score(&ctx), 0.0);
    }
}
