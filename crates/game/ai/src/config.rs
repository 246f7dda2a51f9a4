//! Tunable AI parameters and per-tick options.

use serde::{Deserialize, Serialize};

/// Numeric tuning shared by every agent that uses the same [`AiTuning`].
///
/// All costs are expressed in the same integer unit so that hazard and step
/// costs can be summed directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Flat bonus added to a goal continuation whose preconditions hold.
    pub persistence_minimum: f32,
    /// Additional continuation bonus scaled by goal progress.
    pub persistence_weight: f32,
    /// Tile distance that normalizes to 1.0 for the `Distance` input.
    pub distance_scale: f32,
    /// Radius within which a remembered attacker still registers as a threat.
    pub combat_awareness_radius: u32,
    /// Distance from the threat at which fleeing counts as done.
    pub flee_safe_distance: u32,
    /// Flat cost of standing on any hazard tile.
    pub hazard_base_cost: u32,
    /// Cost per point of hazard damage-per-turn.
    pub damage_cost_multiplier: u32,
    /// Extra factor applied to damage imposed by tile occupants (burning oil,
    /// acid pools) on top of `damage_cost_multiplier`.
    pub occupant_damage_boost: u32,
    pub orthogonal_step_cost: u32,
    pub diagonal_step_cost: u32,
    /// Disposition set toward an attacker the first time it strikes.
    pub hostile_baseline: i16,
}

impl AiTuning {
    pub const DEFAULT_PERSISTENCE_MINIMUM: f32 = 0.1;
    pub const DEFAULT_PERSISTENCE_WEIGHT: f32 = 0.3;
    pub const DEFAULT_DISTANCE_SCALE: f32 = 10.0;
    pub const DEFAULT_COMBAT_AWARENESS_RADIUS: u32 = 16;
    pub const DEFAULT_FLEE_SAFE_DISTANCE: u32 = 8;
    pub const DEFAULT_HAZARD_BASE_COST: u32 = 50;
    pub const DEFAULT_DAMAGE_COST_MULTIPLIER: u32 = 10;
    pub const DEFAULT_OCCUPANT_DAMAGE_BOOST: u32 = 2;
    pub const DEFAULT_ORTHOGONAL_STEP_COST: u32 = 10;
    pub const DEFAULT_DIAGONAL_STEP_COST: u32 = 14;
    pub const DEFAULT_HOSTILE_BASELINE: i16 = -75;

    pub fn new() -> Self {
        Self {
            persistence_minimum: Self::DEFAULT_PERSISTENCE_MINIMUM,
            persistence_weight: Self::DEFAULT_PERSISTENCE_WEIGHT,
            distance_scale: Self::DEFAULT_DISTANCE_SCALE,
            combat_awareness_radius: Self::DEFAULT_COMBAT_AWARENESS_RADIUS,
            flee_safe_distance: Self::DEFAULT_FLEE_SAFE_DISTANCE,
            hazard_base_cost: Self::DEFAULT_HAZARD_BASE_COST,
            damage_cost_multiplier: Self::DEFAULT_DAMAGE_COST_MULTIPLIER,
            occupant_damage_boost: Self::DEFAULT_OCCUPANT_DAMAGE_BOOST,
            orthogonal_step_cost: Self::DEFAULT_ORTHOGONAL_STEP_COST,
            diagonal_step_cost: Self::DEFAULT_DIAGONAL_STEP_COST,
            hostile_baseline: Self::DEFAULT_HOSTILE_BASELINE,
        }
    }
}

impl Default for AiTuning {
    fn default() -> Self {
        Self::new()
    }
}

/// Switches supplied by the caller on every decision.
///
/// These replace process-wide toggles so that two agents (or two tests) can
/// run with different settings side by side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOptions {
    /// When false every decision returns no intent.
    pub ai_enabled: bool,
    /// Treat every relationship as maximally hostile for this tick only.
    pub force_hostile: bool,
}

impl TickOptions {
    pub const fn new() -> Self {
        Self {
            ai_enabled: true,
            force_hostile: false,
        }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            ai_enabled: false,
            force_hostile: false,
        }
    }

    #[must_use]
    pub const fn with_force_hostile(mut self, force_hostile: bool) -> Self {
        self.force_hostile = force_hostile;
        self
    }
}

impl Default for TickOptions {
    fn default() -> Self {
        Self::new()
    }
}
