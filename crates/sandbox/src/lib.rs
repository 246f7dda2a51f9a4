//! Scenario runner for the utility-AI engine.
//!
//! Loads a scenario through `game-content`, drives every agent for a number of
//! ticks against an in-memory [`game_core::GridWorld`], and reports each
//! decision with its diagnostics.
pub mod config;
pub mod runner;

pub use config::SandboxConfig;
pub use runner::{ATTACK_DAMAGE, Outcome, Sandbox, TickRecord};
