//! Content factory for loading AI data from a directory.

use std::path::{Path, PathBuf};

use game_ai::AiTuning;

use crate::catalog::ArchetypeCatalog;
use crate::loaders::{ArchetypeLoader, LoadResult, Scenario, ScenarioLoader, TuningLoader};

/// Content factory that loads all AI content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── tuning.toml        (optional)
/// ├── archetypes.ron     (optional)
/// └── scenarios/
///     ├── ambush.ron
///     └── market.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads `tuning.toml`, or the defaults when the file is absent.
    pub fn load_tuning(&self) -> LoadResult<AiTuning> {
        let path = self.data_dir.join("tuning.toml");
        if !path.exists() {
            return Ok(AiTuning::default());
        }
        TuningLoader::load(&path)
    }

    /// Built-in archetypes plus `archetypes.ron` when present.
    pub fn load_archetypes(&self) -> LoadResult<ArchetypeCatalog> {
        let path = self.data_dir.join("archetypes.ron");
        if !path.exists() {
            return Ok(ArchetypeCatalog::builtin());
        }
        ArchetypeLoader::load(&path)
    }

    /// Path of `scenarios/{name}.ron`.
    pub fn scenario_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("scenarios").join(format!("{}.ron", name))
    }

    /// Loads and builds `scenarios/{name}.ron` against this directory's
    /// tuning and archetypes.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let tuning = self.load_tuning()?;
        let catalog = self.load_archetypes()?;
        let path = self.scenario_path(name);
        ScenarioLoader::load(&path)?
            .build(&catalog, &tuning)
            .map_err(|e| anyhow::anyhow!("Failed to build scenario {}: {}", path.display(), e))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.scenario_path("ambush"),
            Path::new("/tmp/data/scenarios/ambush.ron")
        );
    }

    #[test]
    fn missing_optional_files_fall_back() {
        let temp_dir = TempDir::new().unwrap();
        let factory = ContentFactory::new(temp_dir.path());
        assert_eq!(factory.load_tuning().unwrap(), AiTuning::default());
        assert_eq!(factory.load_archetypes().unwrap(), ArchetypeCatalog::builtin());
        assert!(factory.load_scenario("nowhere").is_err());
    }

    #[test]
    fn scenario_uses_directory_content() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("scenarios")).unwrap();
        fs::write(root.join("tuning.toml"), "hostile_baseline = -95\n").unwrap();
        fs::write(
            root.join("archetypes.ron"),
            r#"(archetypes: [(name: "bandit", extends: Some("brute"))])"#,
        )
        .unwrap();
        fs::write(
            root.join("scenarios/road.ron"),
            r#"(name: "road", map: ["....."], agents: [(id: 1, archetype: "bandit", at: (0, 0))])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(root);
        let mut scenario = factory.load_scenario("road").unwrap();
        let bandit = &mut scenario.agents[0];
        assert_eq!(bandit.profile().name, "bandit");
        bandit.escalate_hostility(game_core::EntityId(7));
        assert_eq!(bandit.disposition_toward(game_core::EntityId(7)).value(), -95);
    }
}
