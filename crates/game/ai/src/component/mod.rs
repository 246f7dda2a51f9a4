//! Per-agent decision orchestrator.
//!
//! [`AiComponent::decide`] runs one decision:
//!
//! 1. Skip if AI is disabled or the agent is gone or dead.
//! 2. Step off a hazardous tile if standing on one, ignoring everything else.
//! 3. Perceive, pick a target, estimate threats, build the context.
//! 4. Let the active goal re-check completion; drop it if it ended.
//! 5. Score every action plus the goal's continuation and take the best.
//! 6. Continue the goal, start a new one, or run an atomic action.
//!
//! The component never mutates the world. It only returns an [`Intent`]
//! that the host validates and applies.

mod targeting;

use std::collections::BTreeSet;
use std::sync::Arc;

use game_core::{EntityId, Intent, Position, WorldQuery};
use rand::RngCore;
use serde::Serialize;

use crate::agent::AgentBody;
use crate::archetype::ArchetypeProfile;
use crate::brain::{Choice, UtilityBrain};
use crate::config::{AiTuning, TickOptions};
use crate::context::TargetSource;
use crate::disposition::{Disposition, DispositionMap, RelationLookup};
use crate::error::Result;
use crate::goal::{Goal, GoalEnv, GoalState, RouteMode};
use crate::movement;
use crate::nav::Navigator;
use crate::perception::PerceptionComponent;
use crate::scoring::{ActionId, ActionScore};

/// Host services borrowed for the duration of one decision.
pub struct TickEnv<'a> {
    pub world: &'a dyn WorldQuery,
    pub relations: &'a dyn RelationLookup,
    pub nav: &'a mut dyn Navigator,
    pub rng: &'a mut dyn RngCore,
    pub options: TickOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    Disabled,
    /// The agent is not present in the world.
    Missing,
    Dead,
}

/// Why a decision came out the way it did.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TickDiagnostics {
    pub agent: Option<EntityId>,
    pub skipped: Option<SkipReason>,
    pub hazard_escape: bool,
    pub target: Option<EntityId>,
    pub target_source: Option<TargetSource>,
    pub threat_level: f32,
    pub incoming_threat: f32,
    pub scores: Vec<ActionScore>,
    pub chosen: Option<ActionId>,
    /// True when the winner was the active goal's continuation.
    pub continued_goal: bool,
    pub previous: Option<ActionId>,
    pub changed: bool,
    /// State of the goal held after this decision, if any.
    pub goal_state: Option<GoalState>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Decision {
    pub intent: Option<Intent>,
    pub diagnostics: TickDiagnostics,
}

impl Decision {
    fn skipped(agent: EntityId, reason: SkipReason) -> Self {
        Self {
            intent: None,
            diagnostics: TickDiagnostics {
                agent: Some(agent),
                skipped: Some(reason),
                ..TickDiagnostics::default()
            },
        }
    }
}

/// Notable state changes reported back to the host.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum AiEvent {
    /// The defender turned hostile toward an attacker for the first time.
    TurnedHostile {
        defender: EntityId,
        attacker: EntityId,
        disposition: Disposition,
    },
}

#[derive(Debug)]
pub struct AiComponent {
    profile: ArchetypeProfile,
    brain: UtilityBrain,
    perception: PerceptionComponent,
    dispositions: DispositionMap,
    tuning: AiTuning,
    body: AgentBody,
    goal: Option<Box<dyn Goal>>,
    last_attacker: Option<EntityId>,
    /// Attackers this agent has already escalated against.
    grudges: BTreeSet<EntityId>,
    last_action: Option<ActionId>,
}

impl AiComponent {
    pub fn new(
        id: EntityId,
        position: Position,
        profile: ArchetypeProfile,
        tuning: AiTuning,
    ) -> Result<Self> {
        profile.validate()?;
        let mut body = AgentBody::new(id, position);
        body.opens_doors = profile.opens_doors;
        Ok(Self {
            brain: UtilityBrain::new(profile.actions()),
            perception: PerceptionComponent::new(profile.perception_radius),
            dispositions: DispositionMap::new(profile.neutral_disposition),
            profile,
            tuning,
            body,
            goal: None,
            last_attacker: None,
            grudges: BTreeSet::new(),
            last_action: None,
        })
    }

    pub fn with_patrol_route(mut self, route: Vec<Position>) -> Result<Self> {
        self.body.set_patrol_route(route)?;
        Ok(self)
    }

    /// Walks the patrol route once, or loops it up to `max_laps` times.
    #[must_use]
    pub fn with_patrol_mode(mut self, mode: RouteMode, max_laps: Option<u32>) -> Self {
        self.body.set_patrol_mode(mode, max_laps);
        self
    }

    /// Replaces the composed action set.
    #[must_use]
    pub fn with_brain(mut self, brain: UtilityBrain) -> Self {
        self.brain = brain;
        self
    }

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn profile(&self) -> &ArchetypeProfile {
        &self.profile
    }

    pub fn brain(&self) -> &UtilityBrain {
        &self.brain
    }

    pub fn body(&self) -> &AgentBody {
        &self.body
    }

    pub fn speed(&self) -> f32 {
        self.body.speed
    }

    pub fn goal(&self) -> Option<&dyn Goal> {
        self.goal.as_deref()
    }

    pub fn last_attacker(&self) -> Option<EntityId> {
        self.last_attacker
    }

    pub fn last_action(&self) -> Option<ActionId> {
        self.last_action
    }

    pub fn dispositions(&self) -> &DispositionMap {
        &self.dispositions
    }

    pub fn disposition_toward(&self, subject: EntityId) -> Disposition {
        self.dispositions.get(subject)
    }

    pub fn set_disposition(&mut self, subject: EntityId, value: Disposition) {
        self.dispositions.set(subject, value);
    }

    pub fn adjust_disposition(&mut self, subject: EntityId, delta: i32) -> Disposition {
        self.dispositions.adjust(subject, delta)
    }

    /// Produces at most one intent for this tick.
    pub fn decide(&mut self, env: &mut TickEnv<'_>) -> Decision {
        let id = self.body.id;
        let span = tracing::debug_span!("decide", agent = %id, archetype = %self.profile.name);
        let _guard = span.enter();

        if !env.options.ai_enabled {
            return Decision::skipped(id, SkipReason::Disabled);
        }
        let Some(me) = env.world.actor(id) else {
            return Decision::skipped(id, SkipReason::Missing);
        };
        if !me.is_alive() {
            self.on_death();
            return Decision::skipped(id, SkipReason::Dead);
        }
        self.body.position = me.position;
        self.body.opens_doors = self.profile.opens_doors || me.opens_doors();

        let mut diagnostics = TickDiagnostics {
            agent: Some(id),
            previous: self.last_action,
            ..TickDiagnostics::default()
        };

        if let Some(direction) =
            movement::hazard_escape(env.world, self.body.position, self.body.opens_doors)
        {
            tracing::debug!(%direction, "escaping hazard");
            diagnostics.hazard_escape = true;
            diagnostics.goal_state = self.goal.as_ref().map(|goal| goal.state());
            return Decision {
                intent: Some(Intent::Move(direction)),
                diagnostics,
            };
        }

        let perceived = self.perception.scan(id, self.body.position, env.world);
        let ctx = self.build_context(&me, &perceived, env);
        diagnostics.target = ctx.target_id();
        diagnostics.target_source = ctx.target.map(|target| target.source);
        diagnostics.threat_level = ctx.threat_level;
        diagnostics.incoming_threat = ctx.incoming_threat;

        let mut goal_env = GoalEnv {
            body: &mut self.body,
            world: env.world,
            nav: &mut *env.nav,
            rng: &mut *env.rng,
            tuning: &self.tuning,
        };

        let ended = match self.goal.as_mut() {
            Some(goal) => {
                goal.evaluate_completion(&mut goal_env);
                goal.is_terminal().then(|| goal.state())
            }
            None => None,
        };
        if let Some(state) = ended {
            tracing::debug!(%state, "goal ended");
            goal_env.nav.stop(id);
            self.goal = None;
        }

        let selection = self
            .brain
            .select_action(&ctx, self.goal.as_deref(), &self.tuning);

        let intent = match selection.winner {
            None => {
                if let Some(mut goal) = self.goal.take() {
                    goal.abandon(goal_env.body);
                    goal_env.nav.stop(id);
                }
                None
            }
            Some(Choice::ContinueGoal) => match self.goal.as_mut() {
                Some(goal) => {
                    diagnostics.continued_goal = true;
                    goal.tick(goal_env.body);
                    if goal.is_terminal() {
                        None
                    } else {
                        goal.next_action(&mut goal_env)
                    }
                }
                None => None,
            },
            Some(Choice::Action(index)) => {
                if let Some(mut previous) = self.goal.take() {
                    tracing::debug!(goal = %previous.action_id(), "abandoning goal");
                    previous.abandon(goal_env.body);
                    goal_env.nav.stop(id);
                }

                match self.brain.action(index).map(Arc::clone) {
                    Some(action) => match action.create_goal(&ctx, &goal_env) {
                        Some(mut goal) => {
                            tracing::debug!(goal = %goal.action_id(), "starting goal");
                            goal.activate(&mut goal_env);
                            goal.evaluate_completion(&mut goal_env);
                            goal.tick(goal_env.body);
                            let intent = if goal.is_terminal() {
                                None
                            } else {
                                goal.next_action(&mut goal_env)
                            };
                            self.goal = Some(goal);
                            intent
                        }
                        None => action.intent(&ctx, &mut goal_env),
                    },
                    None => None,
                }
            }
        };

        if self.goal.as_ref().is_some_and(|goal| goal.is_terminal()) {
            goal_env.nav.stop(id);
            self.goal = None;
        }

        let chosen = selection.winner_id;
        diagnostics.scores = selection.scores;
        diagnostics.chosen = chosen;
        diagnostics.changed = chosen != self.last_action;
        diagnostics.goal_state = self.goal.as_ref().map(|goal| goal.state());
        if diagnostics.changed {
            tracing::debug!(from = ?self.last_action, to = ?chosen, "behavior changed");
        }
        self.last_action = chosen;

        Decision {
            intent,
            diagnostics,
        }
    }

    /// Records an attack and, the first time this attacker strikes, sets the
    /// disposition toward it to the hostile baseline.
    pub fn escalate_hostility(&mut self, attacker: EntityId) -> Option<AiEvent> {
        if attacker == self.body.id {
            return None;
        }
        self.last_attacker = Some(attacker);
        if !self.grudges.insert(attacker) {
            return None;
        }

        let disposition = Disposition::from(self.tuning.hostile_baseline);
        self.dispositions.set(attacker, disposition);
        tracing::info!(
            defender = %self.body.id,
            %attacker,
            disposition = disposition.value(),
            "turned hostile"
        );
        Some(AiEvent::TurnedHostile {
            defender: self.body.id,
            attacker,
            disposition,
        })
    }

    /// Remembers the attacker without touching disposition.
    pub fn notify_attacked(&mut self, attacker: EntityId) {
        if attacker != self.body.id {
            self.last_attacker = Some(attacker);
        }
    }

    /// Ends any active goal. Called when the host reports the agent died,
    /// and by [`Self::decide`] when it finds the agent dead.
    pub fn on_death(&mut self) {
        if let Some(mut goal) = self.goal.take() {
            goal.abandon(&mut self.body);
        }
        self.last_action = None;
    }

    /// Returns the component to its freshly-spawned state, keeping profile,
    /// brain and patrol route.
    pub fn reset(&mut self) {
        self.on_death();
        self.body.speed = AgentBody::BASE_SPEED;
        let (mode, max_laps) = (self.body.patrol_mode(), self.body.patrol_max_laps());
        self.body.set_patrol_mode(mode, max_laps);
        self.dispositions.clear();
        self.grudges.clear();
        self.last_attacker = None;
    }
}

#[cfg(test)]
mod tests {
    use game_core::{ActorView, GridWorld, Hazard, ResourceMeter};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::disposition::RelationTable;
    use crate::nav::GreedyNavigator;

    struct Harness {
        world: GridWorld,
        relations: RelationTable,
        nav: GreedyNavigator,
        rng: SmallRng,
        options: TickOptions,
    }

    impl Harness {
        fn new(world: GridWorld) -> Self {
            Self {
                world,
                relations: RelationTable::new(),
                nav: GreedyNavigator::new(),
                rng: SmallRng::seed_from_u64(42),
                options: TickOptions::default(),
            }
        }

        fn decide(&mut self, agent: &mut AiComponent) -> Decision {
            let mut env = TickEnv {
                world: &self.world,
                relations: &self.relations,
                nav: &mut self.nav,
                rng: &mut self.rng,
                options: self.options,
            };
            agent.decide(&mut env)
        }
    }

    fn brute(id: u32, position: Position) -> AiComponent {
        AiComponent::new(
            EntityId(id),
            position,
            ArchetypeProfile::brute(),
            AiTuning::default(),
        )
        .unwrap()
    }

    #[test]
    fn disabled_ai_returns_nothing() {
        let mut world = GridWorld::new(5, 5);
        world.spawn(ActorView::new(EntityId(1), Position::new(2, 2)));
        let mut harness = Harness::new(world);
        harness.options = TickOptions::disabled();
        let mut agent = brute(1, Position::new(2, 2));

        let decision = harness.decide(&mut agent);
        assert_eq!(decision.intent, None);
        assert_eq!(decision.diagnostics.skipped, Some(SkipReason::Disabled));
    }

    #[test]
    fn dead_agent_clears_goal() {
        let mut world = GridWorld::new(8, 8);
        world.spawn(ActorView::new(EntityId(1), Position::new(4, 4)));
        let mut harness = Harness::new(world);
        let mut agent = brute(1, Position::new(4, 4));

        harness.decide(&mut agent);
        assert_eq!(agent.goal().map(|goal| goal.action_id()), Some(ActionId::Wander));
        assert!(agent.speed() < AgentBody::BASE_SPEED);

        harness.world.kill(EntityId(1));
        let decision = harness.decide(&mut agent);
        assert_eq!(decision.diagnostics.skipped, Some(SkipReason::Dead));
        assert!(agent.goal().is_none());
        assert_eq!(agent.speed(), AgentBody::BASE_SPEED);
    }

    #[test]
    fn hazard_overrides_adjacent_enemy() {
        let mut world = GridWorld::new(5, 5);
        let me = EntityId(1);
        let enemy = EntityId(2);
        world.spawn(ActorView::new(me, Position::new(2, 2)));
        world.spawn(ActorView::new(enemy, Position::new(2, 3)));
        world.set_hazard(Position::new(2, 2), Hazard::new(4));
        let mut harness = Harness::new(world);
        let mut agent = brute(1, Position::new(2, 2));
        agent.set_disposition(enemy, Disposition::MIN);

        let decision = harness.decide(&mut agent);
        assert!(decision.diagnostics.hazard_escape);
        // North holds the enemy, so the first safe orthogonal step is east.
        assert_eq!(decision.intent, Some(Intent::Move(game_core::Direction::East)));
    }

    #[test]
    fn escalation_fires_once_per_attacker() {
        let mut agent = brute(1, Position::ORIGIN);
        let attacker = EntityId(9);

        let first = agent.escalate_hostility(attacker);
        assert!(matches!(first, Some(AiEvent::TurnedHostile { .. })));
        assert_eq!(agent.disposition_toward(attacker).value(), -75);

        agent.set_disposition(attacker, Disposition::new(-20));
        assert_eq!(agent.escalate_hostility(attacker), None);
        assert_eq!(agent.disposition_toward(attacker).value(), -20);
        assert_eq!(agent.last_attacker(), Some(attacker));
        assert_eq!(agent.escalate_hostility(EntityId(1)), None);
    }

    #[test]
    fn notify_only_remembers() {
        let mut agent = brute(1, Position::ORIGIN);
        agent.notify_attacked(EntityId(5));
        assert_eq!(agent.last_attacker(), Some(EntityId(5)));
        assert_eq!(agent.disposition_toward(EntityId(5)), Disposition::NEUTRAL);
    }

    #[test]
    fn force_hostile_is_per_tick() {
        let mut world = GridWorld::new(6, 6);
        let me = EntityId(1);
        world.spawn(ActorView::new(me, Position::new(2, 2)));
        world.spawn(ActorView::new(EntityId(2), Position::new(3, 2)));
        let mut harness = Harness::new(world);
        let mut agent = brute(1, Position::new(2, 2));

        harness.options = TickOptions::default().with_force_hostile(true);
        let forced = harness.decide(&mut agent);
        assert_eq!(forced.diagnostics.chosen, Some(ActionId::Attack));
        assert_eq!(forced.intent, Some(Intent::Attack { target: EntityId(2) }));
        assert_eq!(agent.disposition_toward(EntityId(2)), Disposition::NEUTRAL);

        harness.options = TickOptions::default();
        let calm = harness.decide(&mut agent);
        assert_ne!(calm.diagnostics.chosen, Some(ActionId::Attack));
    }

    #[test]
    fn wounded_health_reads_into_context() {
        let mut world = GridWorld::new(6, 6);
        world.spawn(
            ActorView::new(EntityId(1), Position::new(2, 2)).with_health(ResourceMeter::new(3, 10)),
        );
        let harness = Harness::new(world);
        let agent = brute(1, Position::new(2, 2));
        let me = harness.world.actor(EntityId(1)).unwrap();
        let mut nav = GreedyNavigator::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let env = TickEnv {
            world: &harness.world,
            relations: &harness.relations,
            nav: &mut nav,
            rng: &mut rng,
            options: TickOptions::default(),
        };
        let ctx = agent.build_context(&me, &[], &env);
        assert!((ctx.health_percent - 0.3).abs() < 1e-6);
        assert!(ctx.target.is_none());
    }
}
