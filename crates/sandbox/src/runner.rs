//! Tick loop with a minimal intent applier.
//!
//! Moves go through the same walkability check the agents plan with. Attacks
//! deal a flat amount of damage to an adjacent target and report the hit to
//! it. Hazards burn whoever stands on them at the start of each tick.

use game_ai::{AiEvent, Decision, GreedyNavigator, TickEnv};
use game_content::Scenario;
use game_core::{BlockReason, EntityId, Intent, Position, ResourceMeter, WorldQuery};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;

/// Damage dealt by one attack.
pub const ATTACK_DAMAGE: u32 = 3;

/// What the host did with an intent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Outcome {
    Idle,
    Moved { from: Position, to: Position },
    Blocked { reason: BlockReason },
    Hit { target: EntityId, remaining: u32 },
    Missed { target: EntityId },
}

/// One agent's decision and its outcome.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickRecord {
    pub tick: u32,
    pub agent: EntityId,
    pub decision: Decision,
    pub outcome: Outcome,
}

pub struct Sandbox {
    scenario: Scenario,
    nav: GreedyNavigator,
    rng: SmallRng,
    tick: u32,
    events: Vec<AiEvent>,
}

impl Sandbox {
    pub fn new(scenario: Scenario, seed: u64) -> Self {
        Self {
            scenario,
            nav: GreedyNavigator::new(),
            rng: SmallRng::seed_from_u64(seed),
            tick: 0,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ai_enabled(mut self, enabled: bool) -> Self {
        self.scenario.options.ai_enabled = enabled;
        self
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Hostility events raised so far.
    pub fn events(&self) -> &[AiEvent] {
        &self.events
    }

    /// Runs `ticks` ticks and returns every record.
    pub fn run(&mut self, ticks: u32) -> Vec<TickRecord> {
        let mut records = Vec::new();
        for _ in 0..ticks {
            records.extend(self.step());
        }
        records
    }

    /// Runs one tick: hazards, scripted attacks, then each agent in order.
    pub fn step(&mut self) -> Vec<TickRecord> {
        let tick = self.tick;
        let span = tracing::info_span!("tick", tick);
        let _guard = span.enter();

        self.burn_hazards();
        let scripted: Vec<(EntityId, EntityId)> = self
            .scenario
            .attacks_at(tick)
            .map(|attack| (EntityId(attack.attacker), EntityId(attack.defender)))
            .collect();
        for (attacker, defender) in scripted {
            self.report_attack(attacker, defender);
        }

        let mut records = Vec::with_capacity(self.scenario.agents.len());
        for index in 0..self.scenario.agents.len() {
            self.refresh_relations();

            let decision = {
                let Scenario {
                    world,
                    agents,
                    relations,
                    options,
                    ..
                } = &mut self.scenario;
                let mut env = TickEnv {
                    world: &*world,
                    relations: &*relations,
                    nav: &mut self.nav,
                    rng: &mut self.rng,
                    options: *options,
                };
                agents[index].decide(&mut env)
            };

            let agent = self.scenario.agents[index].id();
            let outcome = self.apply(agent, decision.intent);
            tracing::info!(
                %agent,
                chosen = ?decision.diagnostics.chosen,
                intent = ?decision.intent,
                outcome = ?outcome,
                "decision"
            );
            records.push(TickRecord {
                tick,
                agent,
                decision,
                outcome,
            });
        }

        self.tick += 1;
        records
    }

    /// Publishes each agent's dispositions so others can read incoming threat.
    fn refresh_relations(&mut self) {
        let Scenario {
            agents, relations, ..
        } = &mut self.scenario;
        for agent in agents.iter() {
            relations.record(agent.id(), agent.dispositions());
        }
    }

    fn apply(&mut self, agent: EntityId, intent: Option<Intent>) -> Outcome {
        let Some(intent) = intent else {
            return Outcome::Idle;
        };
        let Some(me) = self.scenario.world.actor(agent) else {
            return Outcome::Idle;
        };

        match intent {
            Intent::Move(direction) => {
                let to = me.position.step(direction);
                let opens_doors = me.opens_doors()
                    || self
                        .scenario
                        .agents
                        .iter()
                        .any(|a| a.id() == agent && a.body().opens_doors);
                match self.scenario.world.check_walkable(to, opens_doors) {
                    Ok(()) => {
                        self.scenario.world.move_actor(agent, to);
                        Outcome::Moved {
                            from: me.position,
                            to,
                        }
                    }
                    Err(reason) => Outcome::Blocked { reason },
                }
            }
            Intent::Attack { target } => {
                let Some(victim) = self.scenario.world.actor(target) else {
                    return Outcome::Missed { target };
                };
                if !victim.is_alive() || victim.position.chebyshev(me.position) > 1 {
                    return Outcome::Missed { target };
                }
                let remaining = victim.health.current.saturating_sub(ATTACK_DAMAGE);
                self.scenario.world.set_health(
                    target,
                    ResourceMeter::new(remaining, victim.health.maximum),
                );
                self.report_attack(agent, target);
                Outcome::Hit { target, remaining }
            }
        }
    }

    fn report_attack(&mut self, attacker: EntityId, defender: EntityId) {
        let Some(agent) = self
            .scenario
            .agents
            .iter_mut()
            .find(|agent| agent.id() == defender)
        else {
            return;
        };
        if let Some(event) = agent.escalate_hostility(attacker) {
            self.events.push(event);
        }
    }

    fn burn_hazards(&mut self) {
        let burns: Vec<(EntityId, ResourceMeter, u32)> = self
            .scenario
            .world
            .actors()
            .filter(|actor| actor.is_alive())
            .filter_map(|actor| {
                self.scenario
                    .world
                    .hazard_at(actor.position)
                    .map(|hazard| (actor.id, actor.health, hazard.damage_per_turn))
            })
            .collect();
        for (id, health, damage) in burns {
            let remaining = health.current.saturating_sub(damage);
            tracing::debug!(actor = %id, damage, remaining, "hazard burn");
            self.scenario
                .world
                .set_health(id, ResourceMeter::new(remaining, health.maximum));
        }
    }
}

#[cfg(test)]
mod tests {
    use game_ai::{AiTuning, SkipReason};
    use game_content::{ArchetypeCatalog, ScenarioLoader};

    use super::*;

    fn sandbox(content: &str) -> Sandbox {
        let scenario = ScenarioLoader::parse(content)
            .unwrap()
            .build(&ArchetypeCatalog::builtin(), &AiTuning::default())
            .unwrap();
        Sandbox::new(scenario, 3)
    }

    #[test]
    fn brute_hits_adjacent_enemy_and_victim_escalates() {
        let mut sandbox = sandbox(
            r#"(
                name: "duel",
                map: ["......"],
                agents: [
                    (id: 1, archetype: "brute", at: (1, 0), dispositions: [(2, -90)]),
                    (id: 2, archetype: "brute", at: (2, 0)),
                ],
            )"#,
        );

        let records = sandbox.step();
        assert_eq!(
            records[0].outcome,
            Outcome::Hit {
                target: EntityId(2),
                remaining: 100 - ATTACK_DAMAGE
            }
        );
        assert!(matches!(
            sandbox.events().first(),
            Some(AiEvent::TurnedHostile {
                defender: EntityId(2),
                attacker: EntityId(1),
                ..
            })
        ));
        // The victim answers in the same tick.
        assert_eq!(
            records[1].outcome,
            Outcome::Hit {
                target: EntityId(1),
                remaining: 100 - ATTACK_DAMAGE
            }
        );
        assert_eq!(
            sandbox.scenario().agents[1]
                .disposition_toward(EntityId(1))
                .value(),
            -75
        );
    }

    #[test]
    fn scripted_attack_fires_on_its_tick() {
        let mut sandbox = sandbox(
            r#"(
                name: "script",
                map: ["........"],
                actors: [(id: 0, at: (7, 0))],
                agents: [(id: 1, archetype: "guard", at: (0, 0))],
                attacks: [(tick: 1, attacker: 0, defender: 1)],
            )"#,
        );
        sandbox.step();
        assert!(sandbox.events().is_empty());
        sandbox.step();
        assert_eq!(sandbox.events().len(), 1);
        assert_eq!(sandbox.tick(), 2);
    }

    #[test]
    fn hazards_burn_at_tick_start() {
        let mut sandbox = sandbox(
            r#"(
                name: "fire",
                map: ["^..."],
                actors: [(id: 0, at: (0, 0), health: Some((4, 10)))],
            )"#,
        );
        sandbox.step();
        let victim = sandbox.scenario().world.actor(EntityId(0)).unwrap();
        assert!(!victim.is_alive());
    }

    #[test]
    fn disabled_ai_only_idles() {
        let mut sandbox = sandbox(
            r#"(name: "off", map: ["...."], agents: [(id: 1, archetype: "brute", at: (0, 0))])"#,
        )
        .with_ai_enabled(false);
        let records = sandbox.run(3);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|record| record.outcome == Outcome::Idle
            && record.decision.diagnostics.skipped == Some(SkipReason::Disabled)));
    }
}
