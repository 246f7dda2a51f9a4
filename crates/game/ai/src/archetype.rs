//! Behavior tags and archetype profiles.
//!
//! An archetype is an ordered list of behavior tags. Each tag contributes a
//! set of actions; composing the tags folds their sets left to right, so a
//! later tag replaces any earlier action with the same [`ActionId`] in place
//! and appends new ones at the end.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::actions::{
    AttackAction, AvoidAction, FleeAction, IdleAction, PatrolAction, WanderAction, WatchAction,
};
use crate::disposition::Disposition;
use crate::error::{AiError, Result};
use crate::scoring::{ActionConfig, UtilityAction};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BehaviorTag {
    /// Idle and watch fallbacks.
    Base,
    /// Attack, fight-or-flight flee, avoid.
    Combatant,
    /// Weaker attack, early flee.
    Coward,
    /// Flee on any threat, avoid. No attack.
    Social,
    Wanderer,
    Patroller,
    /// Stronger watch.
    Sentinel,
}

impl BehaviorTag {
    /// Parses a tag name, ignoring ASCII case.
    pub fn parse(name: &str) -> Result<Self> {
        name.trim()
            .parse()
            .map_err(|_| AiError::UnknownTag(name.to_string()))
    }

    pub fn actions(self) -> Vec<Arc<dyn UtilityAction>> {
        match self {
            BehaviorTag::Base => vec![
                Arc::new(IdleAction::default()),
                Arc::new(WatchAction::default()),
            ],
            BehaviorTag::Combatant => vec![
                Arc::new(AttackAction::default()),
                Arc::new(FleeAction::default()),
                Arc::new(AvoidAction::default()),
            ],
            BehaviorTag::Coward => {
                let timid = AttackAction::default_config();
                vec![
                    Arc::new(AttackAction::new(ActionConfig {
                        base_score: 0.5,
                        ..timid
                    })),
                    Arc::new(FleeAction::cowardly()),
                ]
            }
            BehaviorTag::Social => vec![
                Arc::new(FleeAction::reactive()),
                Arc::new(AvoidAction::default()),
            ],
            BehaviorTag::Wanderer => vec![Arc::new(WanderAction::default())],
            BehaviorTag::Patroller => vec![Arc::new(PatrolAction::default())],
            BehaviorTag::Sentinel => vec![Arc::new(WatchAction::vigilant())],
        }
    }
}

/// Left fold of action sets with override-by-id.
pub fn compose_sets<I>(sets: I) -> Vec<Arc<dyn UtilityAction>>
where
    I: IntoIterator<Item = Vec<Arc<dyn UtilityAction>>>,
{
    let mut composed: Vec<Arc<dyn UtilityAction>> = Vec::new();
    for set in sets {
        for action in set {
            match composed.iter_mut().find(|existing| existing.id() == action.id()) {
                Some(slot) => *slot = action,
                None => composed.push(action),
            }
        }
    }
    composed
}

pub fn compose(tags: &[BehaviorTag]) -> Vec<Arc<dyn UtilityAction>> {
    compose_sets(tags.iter().map(|tag| tag.actions()))
}

/// How an agent picks a target when no perceived actor is threatening.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TargetingMode {
    /// Only threats and remembered attackers become targets.
    #[default]
    Threat,
    /// Fall back to the nearest perceived actor.
    Proximity,
}

/// Static description of a kind of NPC.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeProfile {
    pub name: String,
    pub tags: Vec<BehaviorTag>,
    /// Disposition toward anyone not explicitly recorded.
    #[serde(default)]
    pub neutral_disposition: Disposition,
    #[serde(default)]
    pub targeting: TargetingMode,
    #[serde(default = "ArchetypeProfile::default_perception_radius")]
    pub perception_radius: u32,
    /// Radius within which hostile relationships become threatening.
    #[serde(default = "ArchetypeProfile::default_aggro_radius")]
    pub aggro_radius: u32,
    #[serde(default)]
    pub opens_doors: bool,
}

impl ArchetypeProfile {
    pub const BUILTIN_NAMES: [&'static str; 5] = ["brute", "coward", "guard", "townsfolk", "beast"];

    fn default_perception_radius() -> u32 {
        8
    }

    fn default_aggro_radius() -> u32 {
        8
    }

    pub fn new(name: impl Into<String>, tags: Vec<BehaviorTag>) -> Self {
        Self {
            name: name.into(),
            tags,
            neutral_disposition: Disposition::NEUTRAL,
            targeting: TargetingMode::Threat,
            perception_radius: Self::default_perception_radius(),
            aggro_radius: Self::default_aggro_radius(),
            opens_doors: false,
        }
    }

    #[must_use]
    pub fn with_neutral_disposition(mut self, value: i32) -> Self {
        self.neutral_disposition = Disposition::new(value);
        self
    }

    #[must_use]
    pub fn with_targeting(mut self, targeting: TargetingMode) -> Self {
        self.targeting = targeting;
        self
    }

    #[must_use]
    pub fn with_radii(mut self, perception: u32, aggro: u32) -> Self {
        self.perception_radius = perception;
        self.aggro_radius = aggro;
        self
    }

    #[must_use]
    pub fn with_doors(mut self, opens_doors: bool) -> Self {
        self.opens_doors = opens_doors;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tags.is_empty() {
            return Err(AiError::EmptyArchetype(self.name.clone()));
        }
        Ok(())
    }

    pub fn actions(&self) -> Vec<Arc<dyn UtilityAction>> {
        compose(&self.tags)
    }

    pub fn brute() -> Self {
        Self::new(
            "brute",
            vec![BehaviorTag::Base, BehaviorTag::Combatant, BehaviorTag::Wanderer],
        )
        .with_doors(true)
    }

    pub fn coward() -> Self {
        Self::new(
            "coward",
            vec![
                BehaviorTag::Base,
                BehaviorTag::Combatant,
                BehaviorTag::Coward,
                BehaviorTag::Wanderer,
            ],
        )
        .with_doors(true)
    }

    pub fn guard() -> Self {
        Self::new(
            "guard",
            vec![
                BehaviorTag::Base,
                BehaviorTag::Combatant,
                BehaviorTag::Patroller,
                BehaviorTag::Sentinel,
            ],
        )
        .with_radii(10, 8)
        .with_doors(true)
    }

    pub fn townsfolk() -> Self {
        Self::new(
            "townsfolk",
            vec![BehaviorTag::Base, BehaviorTag::Social, BehaviorTag::Wanderer],
        )
        .with_neutral_disposition(10)
        .with_targeting(TargetingMode::Proximity)
        .with_doors(true)
    }

    pub fn beast() -> Self {
        Self::new(
            "beast",
            vec![BehaviorTag::Base, BehaviorTag::Combatant, BehaviorTag::Wanderer],
        )
        .with_neutral_disposition(-20)
        .with_targeting(TargetingMode::Proximity)
        .with_radii(6, 6)
    }

    pub fn builtin(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "brute" => Ok(Self::brute()),
            "coward" => Ok(Self::coward()),
            "guard" => Ok(Self::guard()),
            "townsfolk" => Ok(Self::townsfolk()),
            "beast" => Ok(Self::beast()),
            _ => Err(AiError::UnknownArchetype(name.to_string())),
        }
    }
}
