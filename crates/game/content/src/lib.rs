//! Data-driven content for the AI engine.
//!
//! This crate houses the archetype catalog and provides loaders for RON/TOML
//! data files:
//! - AI tuning constants (TOML)
//! - Archetype definitions layered on the built-in profiles (RON)
//! - Sandbox scenarios: map, actors, agents, relations, scripted attacks (RON)
//!
//! Content is resolved into `game-ai` types before any agent runs.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::ArchetypeCatalog;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorSpec, AgentSpec, ArchetypeLoader, ArchetypeSpec, AttackSpec, ContentFactory,
    LoadResult, RelationSpec, Scenario, ScenarioLoader, ScenarioSpec, TuningLoader,
};
