//! Multi-tick goals and their persistence scoring.
//!
//! A goal is spawned by a goal-creating action, then competes every tick
//! against fresh action scores through [`ContinueGoalAction`], which adds a
//! persistence bonus so that agents do not flip-flop between near-equal
//! options.
//!
//! # Lifecycle
//!
//! ```text
//! Active ──► Completed
//!        ├─► Failed
//!        └─► Abandoned
//! ```
//!
//! Terminal states are final. Every transition goes through
//! [`Goal::set_state`], which fires [`Goal::on_state_change`] exactly once.

mod continuation;
mod flee;
mod route;
mod wander;

pub use continuation::ContinueGoalAction;
pub use flee::FleeGoal;
pub use route::{RouteMode, WaypointRouteGoal};
pub use wander::{WanderGoal, WanderParams};

use std::fmt;

use game_core::{Intent, WorldQuery};
use rand::RngCore;
use serde::Serialize;

use crate::agent::AgentBody;
use crate::config::AiTuning;
use crate::nav::Navigator;
use crate::scoring::{ActionConfig, ActionId, Consideration, Precondition};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum GoalState {
    Active,
    Completed,
    Failed,
    Abandoned,
}

impl GoalState {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GoalState::Active)
    }
}

/// Everything a goal may touch while it runs.
pub struct GoalEnv<'a> {
    pub body: &'a mut AgentBody,
    pub world: &'a dyn WorldQuery,
    pub nav: &'a mut dyn Navigator,
    pub rng: &'a mut dyn RngCore,
    pub tuning: &'a AiTuning,
}

/// State shared by every goal: identity, lifecycle and scoring profile.
#[derive(Clone, Debug, PartialEq)]
pub struct GoalCore {
    action_id: ActionId,
    state: GoalState,
    base_score: f32,
    considerations: Vec<Consideration>,
    preconditions: Vec<Precondition>,
    age: u32,
    max_age: Option<u32>,
}

impl GoalCore {
    /// Copies the scoring profile of the action that spawns the goal.
    pub fn from_config(config: &ActionConfig) -> Self {
        Self {
            action_id: config.id,
            state: GoalState::Active,
            base_score: config.base_score,
            considerations: config.considerations.clone(),
            preconditions: config.preconditions.clone(),
            age: 0,
            max_age: None,
        }
    }

    /// Completes the goal after this many ticks.
    #[must_use]
    pub fn with_max_age(mut self, ticks: u32) -> Self {
        self.max_age = Some(ticks);
        self
    }

    pub fn action_id(&self) -> ActionId {
        self.action_id
    }

    pub fn state(&self) -> GoalState {
        self.state
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    pub fn considerations(&self) -> &[Consideration] {
        &self.considerations
    }

    pub fn preconditions(&self) -> &[Precondition] {
        &self.preconditions
    }
}

pub trait Goal: fmt::Debug + Send {
    fn core(&self) -> &GoalCore;

    fn core_mut(&mut self) -> &mut GoalCore;

    /// Completion estimate in [0, 1].
    fn progress(&self) -> f32;

    /// Checks whether the goal has succeeded or become impossible and
    /// transitions accordingly.
    fn evaluate_completion(&mut self, env: &mut GoalEnv<'_>);

    /// Intent for this tick. Called only while the goal is active.
    fn next_action(&mut self, env: &mut GoalEnv<'_>) -> Option<Intent>;

    /// Called once when the goal starts, before its first evaluation.
    fn activate(&mut self, _env: &mut GoalEnv<'_>) {}

    /// Hook fired on every state transition.
    fn on_state_change(&mut self, _from: GoalState, _to: GoalState, _body: &mut AgentBody) {}

    fn action_id(&self) -> ActionId {
        self.core().action_id
    }

    fn state(&self) -> GoalState {
        self.core().state
    }

    fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Moves to `next`, firing the hook. Leaving a terminal state is ignored.
    fn set_state(&mut self, next: GoalState, body: &mut AgentBody) {
        let from = self.core().state;
        if from == next || from.is_terminal() {
            return;
        }
        self.core_mut().state = next;
        tracing::debug!(
            agent = %body.id,
            goal = %self.core().action_id,
            %from,
            to = %next,
            "goal transition"
        );
        self.on_state_change(from, next, body);
    }

    /// Advances the goal's age, completing it once the age limit is reached.
    fn tick(&mut self, body: &mut AgentBody) {
        let core = self.core_mut();
        core.age = core.age.saturating_add(1);
        let expired = core.max_age.is_some_and(|limit| core.age >= limit);
        if expired {
            self.set_state(GoalState::Completed, body);
        }
    }

    fn abandon(&mut self, body: &mut AgentBody) {
        if !self.is_terminal() {
            self.set_state(GoalState::Abandoned, body);
        }
    }
}
