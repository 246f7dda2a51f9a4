//! Utility-AI decision making for turn-based NPCs.
//!
//! `game-ai` turns a read-only view of the world into at most one [`Intent`]
//! per agent per tick. Actions are scored from a per-tick
//! [`UtilityContext`]; multi-turn behaviors run as [`Goal`]s that compete
//! with fresh actions through a persistence bonus. [`AiComponent`] ties
//! perception, targeting, threat estimation and the [`UtilityBrain`]
//! together, and archetypes compose action sets from behavior tags.
//!
//! [`Intent`]: game_core::Intent
pub mod actions;
pub mod agent;
pub mod archetype;
pub mod brain;
pub mod component;
pub mod config;
pub mod context;
pub mod disposition;
pub mod error;
pub mod goal;
pub mod movement;
pub mod nav;
pub mod perception;
pub mod scoring;
pub mod threat;

pub use actions::{
    AttackAction, AvoidAction, FleeAction, IdleAction, PatrolAction, WanderAction, WatchAction,
};
pub use agent::{AgentBody, MIN_ROUTE_WAYPOINTS};
pub use archetype::{ArchetypeProfile, BehaviorTag, TargetingMode, compose, compose_sets};
pub use brain::{Choice, Selection, UtilityBrain};
pub use component::{AiComponent, AiEvent, Decision, SkipReason, TickDiagnostics, TickEnv};
pub use config::{AiTuning, TickOptions};
pub use context::{Input, TargetInfo, TargetSource, UtilityContext};
pub use disposition::{Disposition, DispositionBand, DispositionMap, RelationLookup, RelationTable};
pub use error::{AiError, Result};
pub use goal::{
    ContinueGoalAction, FleeGoal, Goal, GoalCore, GoalEnv, GoalState, RouteMode,
    WaypointRouteGoal, WanderGoal, WanderParams,
};
pub use nav::{GreedyNavigator, Navigator, WalkTarget};
pub use perception::{PerceivedActor, PerceptionComponent};
pub use scoring::{
    ActionConfig, ActionId, ActionScore, Consideration, Precondition, ResponseCurve, UtilityAction,
};
