use game_core::{Intent, Position};
use serde::{Deserialize, Serialize};

use super::{Goal, GoalCore, GoalEnv, GoalState};
use crate::agent::{AgentBody, MIN_ROUTE_WAYPOINTS};
use crate::error::{AiError, Result};
use crate::nav::WalkTarget;
use crate::scoring::ActionConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteMode {
    /// Wrap back to the first waypoint after the last, counting laps.
    #[default]
    Loop,
    /// Complete on reaching the last waypoint.
    Once,
}

/// Walks an ordered list of waypoints through the navigator.
///
/// Patrols are the looping form of this goal.
#[derive(Clone, Debug)]
pub struct WaypointRouteGoal {
    core: GoalCore,
    waypoints: Vec<Position>,
    mode: RouteMode,
    index: usize,
    laps: u32,
    max_laps: Option<u32>,
    leg_start_distance: Option<u32>,
    leg_distance: Option<u32>,
}

impl WaypointRouteGoal {
    pub fn new(config: &ActionConfig, waypoints: Vec<Position>, mode: RouteMode) -> Result<Self> {
        if waypoints.len() < MIN_ROUTE_WAYPOINTS {
            return Err(AiError::RouteTooShort {
                required: MIN_ROUTE_WAYPOINTS,
                provided: waypoints.len(),
            });
        }
        Ok(Self {
            core: GoalCore::from_config(config),
            waypoints,
            mode,
            index: 0,
            laps: 0,
            max_laps: None,
            leg_start_distance: None,
            leg_distance: None,
        })
    }

    pub fn patrol(config: &ActionConfig, waypoints: Vec<Position>) -> Result<Self> {
        Self::new(config, waypoints, RouteMode::Loop)
    }

    /// Completes a looping route after this many laps.
    #[must_use]
    pub fn with_max_laps(mut self, laps: u32) -> Self {
        self.max_laps = Some(laps);
        self
    }

    pub fn current_waypoint(&self) -> Position {
        self.waypoints[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// Moves to the next waypoint. Returns false when a one-shot route has
    /// run out.
    fn advance(&mut self) -> bool {
        self.leg_start_distance = None;
        self.leg_distance = None;
        if self.index + 1 < self.waypoints.len() {
            self.index += 1;
            return true;
        }
        match self.mode {
            RouteMode::Loop => {
                self.index = 0;
                self.laps = self.laps.saturating_add(1);
                true
            }
            RouteMode::Once => false,
        }
    }

    fn leg_progress(&self) -> f32 {
        match (self.leg_start_distance, self.leg_distance) {
            (Some(start), Some(current)) if start > 0 => {
                (1.0 - current as f32 / start as f32).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

impl Goal for WaypointRouteGoal {
    fn core(&self) -> &GoalCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut GoalCore {
        &mut self.core
    }

    /// `(index + leg progress) / waypoint count`.
    fn progress(&self) -> f32 {
        let total = self.waypoints.len() as f32;
        ((self.index as f32 + self.leg_progress()) / total).clamp(0.0, 1.0)
    }

    /// A finished route stays finished until the agent gets a new one.
    fn on_state_change(&mut self, _from: GoalState, to: GoalState, body: &mut AgentBody) {
        if to == GoalState::Completed {
            body.finish_patrol();
        }
    }

    fn evaluate_completion(&mut self, env: &mut GoalEnv<'_>) {
        if self.max_laps.is_some_and(|limit| self.laps >= limit) {
            self.set_state(GoalState::Completed, env.body);
        }
    }

    fn next_action(&mut self, env: &mut GoalEnv<'_>) -> Option<Intent> {
        let here = env.body.position;

        if here == self.current_waypoint() {
            if !self.advance() {
                env.nav.stop(env.body.id);
                self.set_state(GoalState::Completed, env.body);
                return None;
            }
            if self.max_laps.is_some_and(|limit| self.laps >= limit) {
                env.nav.stop(env.body.id);
                self.set_state(GoalState::Completed, env.body);
                return None;
            }
        }

        let waypoint = self.current_waypoint();
        let distance = here.chebyshev(waypoint);
        self.leg_start_distance.get_or_insert(distance);
        self.leg_distance = Some(distance);

        if !env.nav.is_targeting(env.body.id, waypoint) {
            env.nav.walk_to(env.body.id, WalkTarget::Position(waypoint), 0);
        }

        env.nav
            .next_step(env.body.id, here, env.body.opens_doors, env.world)
            .map(Intent::Move)
    }
}
