use game_core::{EntityId, Position};

use crate::error::{AiError, Result};
use crate::goal::RouteMode;

/// Minimum waypoints a route needs.
pub const MIN_ROUTE_WAYPOINTS: usize = 2;

/// The parts of an agent that goals may read and adjust.
///
/// Position is refreshed from the world at the start of every decision.
/// Speed is owned here so that goals can temporarily change it and restore it
/// when they end.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentBody {
    pub id: EntityId,
    pub position: Position,
    pub opens_doors: bool,
    pub speed: f32,
    patrol_route: Vec<Position>,
    patrol_mode: RouteMode,
    patrol_max_laps: Option<u32>,
    /// Set once a one-shot or lap-limited patrol has run to completion.
    patrol_finished: bool,
}

impl AgentBody {
    pub const BASE_SPEED: f32 = 1.0;

    pub fn new(id: EntityId, position: Position) -> Self {
        Self {
            id,
            position,
            opens_doors: false,
            speed: Self::BASE_SPEED,
            patrol_route: Vec::new(),
            patrol_mode: RouteMode::Loop,
            patrol_max_laps: None,
            patrol_finished: false,
        }
    }

    pub fn patrol_route(&self) -> &[Position] {
        &self.patrol_route
    }

    pub fn patrol_mode(&self) -> RouteMode {
        self.patrol_mode
    }

    pub fn patrol_max_laps(&self) -> Option<u32> {
        self.patrol_max_laps
    }

    /// True while there is a route left to walk.
    pub fn has_patrol_route(&self) -> bool {
        !self.patrol_route.is_empty() && !self.patrol_finished
    }

    /// Assigns a route. Routes shorter than [`MIN_ROUTE_WAYPOINTS`] are
    /// rejected; an empty route clears it.
    pub fn set_patrol_route(&mut self, route: Vec<Position>) -> Result<()> {
        validate_route(&route)?;
        self.patrol_route = route;
        self.patrol_finished = false;
        Ok(())
    }

    /// How the route is walked. `max_laps` only applies to looping routes.
    pub fn set_patrol_mode(&mut self, mode: RouteMode, max_laps: Option<u32>) {
        self.patrol_mode = mode;
        self.patrol_max_laps = max_laps;
        self.patrol_finished = false;
    }

    pub(crate) fn finish_patrol(&mut self) {
        self.patrol_finished = true;
    }

    pub fn clear_patrol_route(&mut self) {
        self.patrol_route.clear();
        self.patrol_finished = false;
    }
}

pub(crate) fn validate_route(route: &[Position]) -> Result<()> {
    if route.is_empty() || route.len() >= MIN_ROUTE_WAYPOINTS {
        return Ok(());
    }
    Err(AiError::RouteTooShort {
        required: MIN_ROUTE_WAYPOINTS,
        provided: route.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_waypoint_route_is_rejected() {
        let mut body = AgentBody::new(EntityId(1), Position::ORIGIN);
        assert!(body.set_patrol_route(vec![Position::new(1, 1)]).is_err());
        assert!(body.set_patrol_route(Vec::new()).is_ok());
        assert!(!body.has_patrol_route());
    }

    #[test]
    fn finished_patrol_is_restored_by_a_new_route() {
        let mut body = AgentBody::new(EntityId(1), Position::ORIGIN);
        let route = vec![Position::ORIGIN, Position::new(3, 0)];
        body.set_patrol_route(route.clone()).unwrap();
        body.set_patrol_mode(RouteMode::Once, None);
        body.finish_patrol();
        assert!(!body.has_patrol_route());
        assert_eq!(body.patrol_route(), route.as_slice());

        body.set_patrol_route(route).unwrap();
        assert!(body.has_patrol_route());
        assert_eq!(body.patrol_mode(), RouteMode::Once);
    }
}
