//! Action selection.
//!
//! The brain scores every registered action plus, when a goal is running,
//! the goal's continuation, and picks the single best. Selection is a pure
//! function of the context and the goal: no randomness, no I/O.

use std::sync::Arc;

use crate::config::AiTuning;
use crate::context::UtilityContext;
use crate::goal::{ContinueGoalAction, Goal};
use crate::scoring::{ActionId, ActionScore, UtilityAction};

/// What won a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Index into [`UtilityBrain::actions`].
    Action(usize),
    /// Keep running the active goal.
    ContinueGoal,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub winner: Option<Choice>,
    pub winner_id: Option<ActionId>,
    pub best_score: f32,
    /// Every scored row, in evaluation order.
    pub scores: Vec<ActionScore>,
}

/// An ordered set of actions. Order only matters for breaking ties.
#[derive(Clone, Debug, Default)]
pub struct UtilityBrain {
    actions: Vec<Arc<dyn UtilityAction>>,
}

impl UtilityBrain {
    pub fn new(actions: Vec<Arc<dyn UtilityAction>>) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &[Arc<dyn UtilityAction>] {
        &self.actions
    }

    pub fn action(&self, index: usize) -> Option<&Arc<dyn UtilityAction>> {
        self.actions.get(index)
    }

    /// Picks the highest-scoring option.
    ///
    /// Every action is scored in order, then a non-terminal `current_goal`
    /// through its continuation. A candidate replaces the incumbent only with
    /// a strictly greater score, so ties go to the earliest action and a
    /// continuation must outscore all of them. Nothing wins if every score is
    /// zero.
    pub fn select_action(
        &self,
        ctx: &UtilityContext,
        current_goal: Option<&dyn Goal>,
        tuning: &AiTuning,
    ) -> Selection {
        let mut selection = Selection {
            scores: Vec::with_capacity(self.actions.len() + 1),
            ..Selection::default()
        };

        for (index, action) in self.actions.iter().enumerate() {
            let score = action.score(ctx);
            selection.scores.push(ActionScore {
                id: action.id(),
                score,
                continuation: false,
            });

            // In case of tie, the earlier candidate wins.
            if score > selection.best_score {
                selection.best_score = score;
                selection.winner = Some(Choice::Action(index));
                selection.winner_id = Some(action.id());
            }
        }

        if let Some(goal) = current_goal.filter(|goal| !goal.is_terminal()) {
            let continuation = ContinueGoalAction::new(goal, tuning);
            let score = continuation.score(ctx);
            selection.scores.push(ActionScore {
                id: continuation.action_id(),
                score,
                continuation: true,
            });
            // Must strictly beat every registered action.
            if score > selection.best_score {
                selection.best_score = score;
                selection.winner = Some(Choice::ContinueGoal);
                selection.winner_id = Some(continuation.action_id());
            }
        }

        tracing::debug!(
            winner = ?selection.winner_id,
            score = selection.best_score,
            candidates = selection.scores.len(),
            "action selected"
        );
        for row in &selection.scores {
            tracing::trace!(action = %row.id, score = row.score, continuation = row.continuation);
        }

        selection
    }
}

#[cfg(test)]
mod tests {
    use game_core::Intent;

    use super::*;
    use crate::actions::{FleeAction, IdleAction, WatchAction};
    use crate::goal::{FleeGoal, GoalEnv, GoalState};
    use crate::scoring::ActionConfig;

    #[derive(Debug)]
    struct Constant(ActionConfig);

    impl UtilityAction for Constant {
        fn config(&self) -> &ActionConfig {
            &self.0
        }

        fn intent(&self, _ctx: &UtilityContext, _env: &mut GoalEnv<'_>) -> Option<Intent> {
            None
        }
    }

    fn constant(id: ActionId, base: f32) -> Arc<dyn UtilityAction> {
        Arc::new(Constant(ActionConfig::new(id, base)))
    }

    #[test]
    fn ties_go_to_the_earliest_action() {
        let brain = UtilityBrain::new(vec![
            constant(ActionId::Watch, 0.4),
            constant(ActionId::Idle, 0.4),
        ]);
        let selection = brain.select_action(&UtilityContext::default(), None, &AiTuning::default());
        assert_eq!(selection.winner, Some(Choice::Action(0)));
        assert_eq!(selection.winner_id, Some(ActionId::Watch));
    }

    #[test]
    fn all_zero_selects_nothing() {
        let brain = UtilityBrain::new(vec![Arc::new(WatchAction::default())]);
        let selection = brain.select_action(&UtilityContext::default(), None, &AiTuning::default());
        assert_eq!(selection.winner, None);
        assert_eq!(selection.scores.len(), 1);
    }

    #[test]
    fn running_goal_is_kept_over_its_own_fresh_score() {
        let flee = FleeAction::default();
        let brain = UtilityBrain::new(vec![
            Arc::new(FleeAction::default()),
            Arc::new(IdleAction::default()),
        ]);
        let ctx = UtilityContext {
            health_percent: 0.3,
            threat_level: 0.6,
            has_escape_route: true,
            ..UtilityContext::default()
        };
        let goal = FleeGoal::new(flee.config(), game_core::EntityId(2), 8);

        let selection = brain.select_action(&ctx, Some(&goal as &dyn Goal), &AiTuning::default());
        assert_eq!(selection.winner, Some(Choice::ContinueGoal));
        assert_eq!(selection.winner_id, Some(ActionId::Flee));
        assert!(selection.scores.last().is_some_and(|row| row.continuation));
    }

    #[test]
    fn action_beats_an_equal_continuation() {
        // Wander's continuation adds the 0.1 minimum to a bare 0.5 base.
        let goal = crate::goal::WanderGoal::new(
            &ActionConfig::new(ActionId::Wander, 0.5),
            crate::goal::WanderParams {
                duration: 0,
                ..crate::goal::WanderParams::default()
            },
        );
        let tuning = AiTuning::default();
        let continuation = ContinueGoalAction::new(&goal, &tuning).score(&UtilityContext::default());
        assert!((continuation - 0.6).abs() < 1e-6);

        let brain = UtilityBrain::new(vec![constant(ActionId::Idle, continuation)]);
        let selection =
            brain.select_action(&UtilityContext::default(), Some(&goal as &dyn Goal), &tuning);
        assert_eq!(selection.winner, Some(Choice::Action(0)));
        assert_eq!(selection.winner_id, Some(ActionId::Idle));
        assert_eq!(selection.scores.len(), 2);
    }

    #[test]
    fn terminal_goal_is_not_continued() {
        let flee = FleeAction::default();
        let brain = UtilityBrain::new(vec![Arc::new(IdleAction::default())]);
        let mut goal = FleeGoal::new(flee.config(), game_core::EntityId(2), 8);
        let mut body =
            crate::agent::AgentBody::new(game_core::EntityId(1), game_core::Position::ORIGIN);
        goal.set_state(GoalState::Completed, &mut body);

        let selection = brain.select_action(
            &UtilityContext::default(),
            Some(&goal as &dyn Goal),
            &AiTuning::default(),
        );
        assert_eq!(selection.winner, Some(Choice::Action(0)));
        assert!(selection.scores.iter().all(|row| !row.continuation));
    }
}
