//! Per-relationship disposition values.
//!
//! A disposition is how one actor feels about another, from −100 (most
//! hostile) to +100 (most allied). It never gates behavior directly except
//! through the explicit hostility precondition; everything else flows through
//! response curves over [`Disposition::normalized`].

use std::collections::BTreeMap;

use game_core::EntityId;
use serde::{Deserialize, Serialize};

/// Signed disposition clamped to [`Disposition::MIN`, `Disposition::MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i16", into = "i16")]
pub struct Disposition(i16);

impl Disposition {
    pub const MIN: Disposition = Disposition(-100);
    pub const MAX: Disposition = Disposition(100);
    pub const NEUTRAL: Disposition = Disposition(0);

    /// Values at or below this are hostile.
    pub const HOSTILE_THRESHOLD: i16 = -51;

    /// Builds a disposition, clamping any input into range.
    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN.0 as i32, Self::MAX.0 as i32) as i16)
    }

    pub const fn value(self) -> i16 {
        self.0
    }

    /// Applies a delta of any magnitude and clamps the result.
    #[must_use]
    pub fn adjusted(self, delta: i32) -> Self {
        let sum = (self.0 as i64 + delta as i64).clamp(Self::MIN.0 as i64, Self::MAX.0 as i64);
        Self(sum as i16)
    }

    pub const fn is_hostile(self) -> bool {
        self.0 <= Self::HOSTILE_THRESHOLD
    }

    /// Hostility used by relationship threat: `−value/100` once the value is
    /// hostile, zero otherwise.
    pub fn hostility(self) -> f32 {
        if self.is_hostile() {
            self.hostility_signal()
        } else {
            0.0
        }
    }

    /// Any negativity mapped to [0, 1], without the hostile cutoff.
    pub fn hostility_signal(self) -> f32 {
        (-(self.0 as f32) / 100.0).clamp(0.0, 1.0)
    }

    /// 0.0 = most hostile, 1.0 = most allied.
    pub fn normalized(self) -> f32 {
        (self.0 as f32 + 100.0) / 200.0
    }

    pub fn band(self) -> DispositionBand {
        match self.0 {
            i16::MIN..=-51 => DispositionBand::Hostile,
            -50..=-11 => DispositionBand::Unfriendly,
            -10..=10 => DispositionBand::Neutral,
            11..=50 => DispositionBand::Friendly,
            _ => DispositionBand::Allied,
        }
    }
}

impl Default for Disposition {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<i16> for Disposition {
    fn from(value: i16) -> Self {
        Self::new(value as i32)
    }
}

impl From<Disposition> for i16 {
    fn from(value: Disposition) -> Self {
        value.0
    }
}

/// Display label for a disposition range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DispositionBand {
    Hostile,
    Unfriendly,
    Neutral,
    Friendly,
    Allied,
}

/// One agent's dispositions toward everyone it has an opinion about.
///
/// Unknown actors read as the archetype's neutral value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispositionMap {
    neutral: Disposition,
    values: BTreeMap<EntityId, Disposition>,
}

impl DispositionMap {
    pub fn new(neutral: Disposition) -> Self {
        Self {
            neutral,
            values: BTreeMap::new(),
        }
    }

    pub fn neutral(&self) -> Disposition {
        self.neutral
    }

    pub fn get(&self, subject: EntityId) -> Disposition {
        self.values.get(&subject).copied().unwrap_or(self.neutral)
    }

    pub fn is_known(&self, subject: EntityId) -> bool {
        self.values.contains_key(&subject)
    }

    pub fn set(&mut self, subject: EntityId, value: Disposition) {
        self.values.insert(subject, value);
    }

    /// Adjusts the stored value (starting from neutral) and returns the
    /// clamped result.
    pub fn adjust(&mut self, subject: EntityId, delta: i32) -> Disposition {
        let next = self.get(subject).adjusted(delta);
        self.values.insert(subject, next);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Disposition)> + '_ {
        self.values.iter().map(|(id, value)| (*id, *value))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Read access to how *other* actors feel about a subject.
///
/// Incoming threat needs the dispositions of the actors an agent perceives,
/// which live in their own components. Hosts expose them through this seam.
pub trait RelationLookup {
    fn disposition(&self, observer: EntityId, subject: EntityId) -> Option<Disposition>;
}

/// Flat (observer, subject) → disposition table.
#[derive(Clone, Debug, Default)]
pub struct RelationTable {
    entries: BTreeMap<(EntityId, EntityId), Disposition>,
}

impl RelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, observer: EntityId, subject: EntityId, value: Disposition) {
        self.entries.insert((observer, subject), value);
    }

    #[must_use]
    pub fn with(mut self, observer: EntityId, subject: EntityId, value: i32) -> Self {
        self.set(observer, subject, Disposition::new(value));
        self
    }

    /// Copies every explicit entry of an agent's map into the table.
    pub fn record(&mut self, observer: EntityId, map: &DispositionMap) {
        for (subject, value) in map.iter() {
            self.set(observer, subject, value);
        }
    }
}

impl RelationLookup for RelationTable {
    fn disposition(&self, observer: EntityId, subject: EntityId) -> Option<Disposition> {
        self.entries.get(&(observer, subject)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_clamps_any_magnitude() {
        assert_eq!(Disposition::new(i32::MAX), Disposition::MAX);
        assert_eq!(Disposition::new(i32::MIN), Disposition::MIN);
        assert_eq!(Disposition::new(-100).adjusted(i32::MIN), Disposition::MIN);
        assert_eq!(Disposition::new(100).adjusted(i32::MAX), Disposition::MAX);
        assert_eq!(Disposition::new(10).adjusted(-25).value(), -15);
    }

    #[test]
    fn map_adjustments_stay_in_range() {
        let mut map = DispositionMap::new(Disposition::new(-20));
        let subject = EntityId(4);
        for delta in [500, -1_000_000, 37, i32::MAX, -3] {
            let value = map.adjust(subject, delta);
            assert!((-100..=100).contains(&value.value()));
        }
        assert_eq!(map.get(EntityId(9)).value(), -20);
    }

    #[test]
    fn hostile_boundary_is_inclusive() {
        assert!(Disposition::new(-51).is_hostile());
        assert!(!Disposition::new(-50).is_hostile());
        assert_eq!(Disposition::new(-51).band(), DispositionBand::Hostile);
        assert_eq!(Disposition::new(-50).band(), DispositionBand::Unfriendly);
    }

    #[test]
    fn hostility_only_counts_hostile_values() {
        assert_eq!(Disposition::new(-50).hostility(), 0.0);
        assert!((Disposition::new(-80).hostility() - 0.8).abs() < 1e-6);
        assert!((Disposition::new(-30).hostility_signal() - 0.3).abs() < 1e-6);
        assert_eq!(Disposition::new(40).hostility_signal(), 0.0);
    }

    #[test]
    fn normalization_spans_unit_range() {
        assert_eq!(Disposition::MIN.normalized(), 0.0);
        assert_eq!(Disposition::NEUTRAL.normalized(), 0.5);
        assert_eq!(Disposition::MAX.normalized(), 1.0);
    }

    #[test]
    fn deserialization_clamps() {
        let value: Disposition = serde_json::from_str("-300").unwrap();
        assert_eq!(value, Disposition::MIN);
    }
}
