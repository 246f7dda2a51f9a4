//! Per-tick snapshot that every consideration reads from.
//!
//! The component builds one [`UtilityContext`] per decision and hands it out
//! by shared reference, so scoring can never mutate it.

use std::collections::BTreeMap;

use game_core::{Direction, EntityId, Position};
use serde::{Deserialize, Serialize};

use crate::config::AiTuning;
use crate::disposition::Disposition;

/// Named context value a consideration can read.
///
/// Every input resolves to [0, 1]. Booleans read as 0 or 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    /// Distance to the target over the distance scale. 1.0 without a target.
    Distance,
    HealthPercent,
    /// Outgoing threat toward the current target.
    ThreatLevel,
    /// Strongest threat other perceived actors pose to this agent.
    IncomingThreat,
    /// Larger of outgoing and incoming threat.
    PeakThreat,
    /// Normalized disposition toward the target.
    Disposition,
    CanAttack,
    HasEscapeRoute,
    HasTarget,
    /// Host-supplied extra; reads 0 when absent.
    Named(String),
}

/// How the current target was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TargetSource {
    /// Perceived actor with the highest relationship threat.
    Threat,
    /// Remembered attacker that is still alive.
    Attacker,
    /// Nearest perceived actor.
    Proximity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub id: EntityId,
    pub position: Position,
    pub distance: u32,
    pub source: TargetSource,
}

/// Everything a decision needs to know, computed once per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct UtilityContext {
    pub target: Option<TargetInfo>,
    pub health_percent: f32,
    /// Outgoing threat toward the target, including combat awareness.
    pub threat_level: f32,
    pub incoming_threat: f32,
    pub incoming_source: Option<EntityId>,
    /// Effective disposition toward the target; neutral without one.
    pub disposition: Disposition,
    pub can_attack: bool,
    pub has_escape_route: bool,
    pub best_attack_destination: Option<Position>,
    pub best_flee_step: Option<Direction>,
    /// Actor a flee or avoid action should move away from.
    pub flee_from: Option<EntityId>,
    pub has_patrol_route: bool,
    pub distance_scale: f32,
    pub extras: BTreeMap<String, f32>,
}

impl UtilityContext {
    pub fn new(tuning: &AiTuning) -> Self {
        Self {
            distance_scale: tuning.distance_scale,
            ..Self::default()
        }
    }

    pub fn target_id(&self) -> Option<EntityId> {
        self.target.map(|target| target.id)
    }

    pub fn distance(&self) -> Option<u32> {
        self.target.map(|target| target.distance)
    }

    pub fn distance_normalized(&self) -> f32 {
        match self.distance() {
            None => 1.0,
            Some(distance) if self.distance_scale > 0.0 => {
                (distance as f32 / self.distance_scale).clamp(0.0, 1.0)
            }
            Some(0) => 0.0,
            Some(_) => 1.0,
        }
    }

    pub fn peak_threat(&self) -> f32 {
        self.threat_level.max(self.incoming_threat)
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: f32) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    pub fn get(&self, input: &Input) -> f32 {
        let value = match input {
            Input::Distance => self.distance_normalized(),
            Input::HealthPercent => self.health_percent,
            Input::ThreatLevel => self.threat_level,
            Input::IncomingThreat => self.incoming_threat,
            Input::PeakThreat => self.peak_threat(),
            Input::Disposition => self.disposition.normalized(),
            Input::CanAttack => flag(self.can_attack),
            Input::HasEscapeRoute => flag(self.has_escape_route),
            Input::HasTarget => flag(self.target.is_some()),
            Input::Named(key) => self.extras.get(key).copied().unwrap_or(0.0),
        };
        if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 }
    }
}

impl Default for UtilityContext {
    fn default() -> Self {
        Self {
            target: None,
            health_percent: 1.0,
            threat_level: 0.0,
            incoming_threat: 0.0,
            incoming_source: None,
            disposition: Disposition::NEUTRAL,
            can_attack: false,
            has_escape_route: false,
            best_attack_destination: None,
            best_flee_step: None,
            flee_from: None,
            has_patrol_route: false,
            distance_scale: AiTuning::DEFAULT_DISTANCE_SCALE,
            extras: BTreeMap::new(),
        }
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}
