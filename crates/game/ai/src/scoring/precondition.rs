use serde::{Deserialize, Serialize};

use crate::context::UtilityContext;

/// Boolean gate over a context. Any failing precondition zeroes a score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Precondition {
    HasTarget,
    /// Effective disposition toward the target is hostile.
    TargetHostile,
    CanAttack,
    HasEscapeRoute,
    /// Outgoing threat toward the target is nonzero.
    ThreatPresent,
    /// Outgoing or incoming threat is nonzero.
    AnyThreat,
    NoThreat,
    HealthBelow(f32),
    HealthAbove(f32),
    HasPatrolRoute,
}

impl Precondition {
    pub fn check(&self, ctx: &UtilityContext) -> bool {
        match *self {
            Precondition::HasTarget => ctx.target.is_some(),
            Precondition::TargetHostile => ctx.target.is_some() && ctx.disposition.is_hostile(),
            Precondition::CanAttack => ctx.can_attack,
            Precondition::HasEscapeRoute => ctx.has_escape_route,
            Precondition::ThreatPresent => ctx.threat_level > 0.0,
            Precondition::AnyThreat => ctx.peak_threat() > 0.0,
            Precondition::NoThreat => ctx.peak_threat() <= 0.0,
            Precondition::HealthBelow(limit) => ctx.health_percent < limit,
            Precondition::HealthAbove(limit) => ctx.health_percent > limit,
            Precondition::HasPatrolRoute => ctx.has_patrol_route,
        }
    }

    pub fn all_hold(preconditions: &[Precondition], ctx: &UtilityContext) -> bool {
        preconditions.iter().all(|precondition| precondition.check(ctx))
    }
}
