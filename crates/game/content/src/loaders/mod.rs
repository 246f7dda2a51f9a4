//! Content loaders for reading AI data from files.
//!
//! This module provides loaders that convert RON/TOML files into `game-ai`
//! types. Every loader reports failures with the offending path.

pub mod archetypes;
pub mod factory;
pub mod scenario;
pub mod tuning;

pub use archetypes::{ArchetypeLoader, ArchetypeSpec};
pub use factory::ContentFactory;
pub use scenario::{
    ActorSpec, AgentSpec, AttackSpec, RelationSpec, Scenario, ScenarioLoader, ScenarioSpec,
};
pub use tuning::TuningLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
