//! Named archetype profiles.

use std::collections::BTreeMap;

use game_ai::{AiError, ArchetypeProfile, Result};

/// Archetype profiles keyed by lowercase name.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchetypeCatalog {
    profiles: BTreeMap<String, ArchetypeProfile>,
}

impl ArchetypeCatalog {
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Catalog holding every built-in archetype.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for name in ArchetypeProfile::BUILTIN_NAMES {
            if let Ok(profile) = ArchetypeProfile::builtin(name) {
                catalog.profiles.insert(name.to_string(), profile);
            }
        }
        catalog
    }

    /// Adds or replaces a profile. Returns the one it replaced.
    pub fn insert(&mut self, profile: ArchetypeProfile) -> Result<Option<ArchetypeProfile>> {
        profile.validate()?;
        Ok(self.profiles.insert(profile.name.to_ascii_lowercase(), profile))
    }

    pub fn get(&self, name: &str) -> Result<&ArchetypeProfile> {
        self.profiles
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| AiError::UnknownArchetype(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(&name.to_ascii_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ArchetypeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use game_ai::BehaviorTag;

    use super::*;

    #[test]
    fn builtin_catalog_has_every_builtin() {
        let catalog = ArchetypeCatalog::builtin();
        assert_eq!(catalog.len(), ArchetypeProfile::BUILTIN_NAMES.len());
        assert_eq!(catalog.get("Guard").unwrap().name, "guard");
    }

    #[test]
    fn insert_validates_and_overrides() {
        let mut catalog = ArchetypeCatalog::builtin();
        let empty = ArchetypeProfile::new("hollow", Vec::new());
        assert_eq!(
            catalog.insert(empty),
            Err(AiError::EmptyArchetype("hollow".into()))
        );

        let brute = ArchetypeProfile::new("brute", vec![BehaviorTag::Base]);
        let replaced = catalog.insert(brute).unwrap();
        assert!(replaced.is_some());
        assert_eq!(catalog.get("brute").unwrap().tags, vec![BehaviorTag::Base]);
    }

    #[test]
    fn unknown_names_error() {
        let catalog = ArchetypeCatalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(
            catalog.get("lich"),
            Err(AiError::UnknownArchetype("lich".into()))
        );
    }
}
