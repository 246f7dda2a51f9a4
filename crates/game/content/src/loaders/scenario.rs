//! Scenario loader.
//!
//! A scenario is an ASCII map plus the actors standing on it: plain actors
//! (players, bystanders) and AI agents built from archetypes. Relations seed
//! how actors feel about each other, and scripted attacks let a run exercise
//! hostility escalation without a combat system.

use std::collections::BTreeSet;
use std::path::Path;

use game_ai::{AiComponent, AiTuning, Disposition, RelationTable, RouteMode, TickOptions};
use game_core::{ActorView, EntityId, GridWorld, Position, ResourceMeter, WorldQuery};
use serde::{Deserialize, Serialize};

use crate::catalog::ArchetypeCatalog;
use crate::loaders::{LoadResult, read_file};

/// Non-AI actor placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpec {
    pub id: u32,
    pub at: (i32, i32),
    /// `(current, maximum)`.
    #[serde(default)]
    pub health: Option<(u32, u32)>,
    #[serde(default)]
    pub awareness_radius: Option<u32>,
}

/// AI agent placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: u32,
    pub archetype: String,
    pub at: (i32, i32),
    #[serde(default)]
    pub health: Option<(u32, u32)>,
    #[serde(default)]
    pub patrol: Vec<(i32, i32)>,
    /// `Loop` (default) or `Once`.
    #[serde(default)]
    pub patrol_mode: RouteMode,
    /// Stops a looping patrol after this many laps.
    #[serde(default)]
    pub patrol_laps: Option<u32>,
    /// Initial dispositions of this agent toward others, `(subject, value)`.
    #[serde(default)]
    pub dispositions: Vec<(u32, i32)>,
}

/// How a non-AI observer feels about a subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationSpec {
    pub observer: u32,
    pub subject: u32,
    pub value: i32,
}

/// An attack reported to the defender before the given tick's decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub tick: u32,
    pub attacker: u32,
    pub defender: u32,
}

/// Scenario file contents.
///
/// ```ron
/// (
///     name: "ambush",
///     map: [
///         "#######",
///         "#.....#",
///         "#..^..#",
///         "#######",
///     ],
///     ticks: Some(20),
///     actors: [(id: 0, at: (1, 2))],
///     agents: [(id: 1, archetype: "brute", at: (5, 1), dispositions: [(0, -80)])],
///     attacks: [(tick: 3, attacker: 0, defender: 1)],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    /// Rows from the top of the map down.
    pub map: Vec<String>,
    #[serde(default)]
    pub ticks: Option<u32>,
    #[serde(default)]
    pub force_hostile: bool,
    #[serde(default)]
    pub actors: Vec<ActorSpec>,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
    #[serde(default)]
    pub relations: Vec<RelationSpec>,
    #[serde(default)]
    pub attacks: Vec<AttackSpec>,
}

/// A scenario resolved into a world and ready-to-run agents.
pub struct Scenario {
    pub name: String,
    pub world: GridWorld,
    pub agents: Vec<AiComponent>,
    pub relations: RelationTable,
    pub attacks: Vec<AttackSpec>,
    pub ticks: Option<u32>,
    pub options: TickOptions,
}

impl Scenario {
    /// Attacks scheduled for `tick`, in file order.
    pub fn attacks_at(&self, tick: u32) -> impl Iterator<Item = &AttackSpec> + '_ {
        self.attacks.iter().filter(move |attack| attack.tick == tick)
    }
}

fn meter(health: Option<(u32, u32)>) -> Option<ResourceMeter> {
    health.map(|(current, maximum)| ResourceMeter::new(current.min(maximum), maximum))
}

impl ScenarioSpec {
    pub fn build(&self, catalog: &ArchetypeCatalog, tuning: &AiTuning) -> LoadResult<Scenario> {
        if self.map.is_empty() {
            anyhow::bail!("scenario '{}' has an empty map", self.name);
        }
        let rows: Vec<&str> = self.map.iter().map(String::as_str).collect();
        let mut world = GridWorld::from_rows(&rows);
        let mut seen = BTreeSet::new();

        for actor in &self.actors {
            let id = EntityId(actor.id);
            if !seen.insert(id) {
                anyhow::bail!("duplicate actor id {}", id);
            }
            let mut view = ActorView::new(id, Position::new(actor.at.0, actor.at.1));
            if let Some(health) = meter(actor.health) {
                view = view.with_health(health);
            }
            if let Some(radius) = actor.awareness_radius {
                view = view.with_awareness_radius(radius);
            }
            place(&mut world, view)?;
        }

        let mut agents = Vec::with_capacity(self.agents.len());
        for spec in &self.agents {
            let id = EntityId(spec.id);
            if !seen.insert(id) {
                anyhow::bail!("duplicate actor id {}", id);
            }
            let profile = catalog.get(&spec.archetype)?.clone();
            let position = Position::new(spec.at.0, spec.at.1);

            let mut view = ActorView::new(id, position).with_awareness_radius(profile.aggro_radius);
            if let Some(health) = meter(spec.health) {
                view = view.with_health(health);
            }
            place(&mut world, view)?;

            let mut agent = AiComponent::new(id, position, profile, tuning.clone())?;
            if !spec.patrol.is_empty() {
                let route = spec
                    .patrol
                    .iter()
                    .map(|&(x, y)| Position::new(x, y))
                    .collect();
                agent = agent
                    .with_patrol_route(route)
                    .map_err(|e| anyhow::anyhow!("agent {}: {}", id, e))?
                    .with_patrol_mode(spec.patrol_mode, spec.patrol_laps);
            }
            for &(subject, value) in &spec.dispositions {
                agent.set_disposition(EntityId(subject), Disposition::new(value));
            }
            agents.push(agent);
        }

        let mut relations = RelationTable::new();
        for relation in &self.relations {
            relations.set(
                EntityId(relation.observer),
                EntityId(relation.subject),
                Disposition::new(relation.value),
            );
        }

        for attack in &self.attacks {
            for id in [attack.attacker, attack.defender] {
                if !seen.contains(&EntityId(id)) {
                    anyhow::bail!("attack at tick {} names unknown actor {}", attack.tick, id);
                }
            }
        }

        Ok(Scenario {
            name: self.name.clone(),
            world,
            agents,
            relations,
            attacks: self.attacks.clone(),
            ticks: self.ticks,
            options: TickOptions::default().with_force_hostile(self.force_hostile),
        })
    }
}

fn place(world: &mut GridWorld, view: ActorView) -> LoadResult<()> {
    let (id, position) = (view.id, view.position);
    world
        .check_walkable(position, true)
        .map_err(|reason| anyhow::anyhow!("cannot place actor {} at {}: {}", id, position, reason))?;
    if !world.spawn(view) {
        anyhow::bail!("cannot place actor {} at {}: tile is full", id, position);
    }
    Ok(())
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        Ok(ron::from_str(content)?)
    }

    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse scenario RON at {}: {}", path.display(), e)
        })
    }
}
