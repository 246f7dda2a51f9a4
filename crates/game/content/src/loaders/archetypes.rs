//! Archetype definition loader.
//!
//! Loads archetype definitions from RON files into an [`ArchetypeCatalog`].
//! A definition may extend an existing profile (a built-in or one defined
//! earlier in the same file); its tags are then appended to the parent's, so
//! they override the parent's actions with the same id.

use std::path::Path;

use game_ai::{ArchetypeProfile, BehaviorTag, Disposition, TargetingMode};
use serde::{Deserialize, Serialize};

use crate::catalog::ArchetypeCatalog;
use crate::loaders::{LoadResult, read_file};

/// One archetype entry in a RON file.
///
/// ```ron
/// (
///     archetypes: [
///         (name: "raider", extends: Some("brute"), tags: ["sentinel"]),
///         (name: "hermit", tags: ["base", "social"], neutral_disposition: Some(-10)),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub neutral_disposition: Option<i32>,
    #[serde(default)]
    pub targeting: Option<TargetingMode>,
    #[serde(default)]
    pub perception_radius: Option<u32>,
    #[serde(default)]
    pub aggro_radius: Option<u32>,
    #[serde(default)]
    pub opens_doors: Option<bool>,
}

impl ArchetypeSpec {
    /// Builds the profile, resolving `extends` against `catalog`.
    pub fn resolve(&self, catalog: &ArchetypeCatalog) -> LoadResult<ArchetypeProfile> {
        let mut profile = match &self.extends {
            Some(parent) => {
                let mut inherited = catalog.get(parent)?.clone();
                inherited.name = self.name.clone();
                inherited
            }
            None => ArchetypeProfile::new(self.name.clone(), Vec::new()),
        };

        for tag in &self.tags {
            profile.tags.push(BehaviorTag::parse(tag)?);
        }
        if let Some(value) = self.neutral_disposition {
            profile.neutral_disposition = Disposition::new(value);
        }
        if let Some(targeting) = self.targeting {
            profile.targeting = targeting;
        }
        if let Some(radius) = self.perception_radius {
            profile.perception_radius = radius;
        }
        if let Some(radius) = self.aggro_radius {
            profile.aggro_radius = radius;
        }
        if let Some(opens_doors) = self.opens_doors {
            profile.opens_doors = opens_doors;
        }

        profile.validate()?;
        Ok(profile)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArchetypeFile {
    archetypes: Vec<ArchetypeSpec>,
}

/// Loader for archetype definitions from RON files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    pub fn parse(content: &str) -> LoadResult<Vec<ArchetypeSpec>> {
        let file: ArchetypeFile = ron::from_str(content)?;
        Ok(file.archetypes)
    }

    /// Resolves every definition in order and adds it to `catalog`.
    ///
    /// Returns the names that were added or replaced.
    pub fn load_into(path: &Path, catalog: &mut ArchetypeCatalog) -> LoadResult<Vec<String>> {
        let content = read_file(path)?;
        let specs = Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse archetype RON at {}: {}", path.display(), e)
        })?;

        let mut names = Vec::with_capacity(specs.len());
        for spec in specs {
            let profile = spec
                .resolve(catalog)
                .map_err(|e| anyhow::anyhow!("Invalid archetype '{}': {}", spec.name, e))?;
            names.push(profile.name.clone());
            catalog.insert(profile)?;
        }
        Ok(names)
    }

    /// Loads a file on top of the built-in archetypes.
    pub fn load(path: &Path) -> LoadResult<ArchetypeCatalog> {
        let mut catalog = ArchetypeCatalog::builtin();
        Self::load_into(path, &mut catalog)?;
        Ok(catalog)
    }
}
