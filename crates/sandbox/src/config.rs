//! Sandbox configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Runner settings.
///
/// Environment variables:
/// - `SANDBOX_DATA_DIR` - Content directory (default: this crate's `data/`)
/// - `SANDBOX_SCENARIO` - Scenario name under `scenarios/` (default: `ambush`)
/// - `SANDBOX_TICKS` - Ticks to run; overrides the scenario's own count
/// - `SANDBOX_SEED` - Seed for the shared RNG (default: 0)
/// - `SANDBOX_TUNING` - TOML file replacing the directory's `tuning.toml`
/// - `SANDBOX_AI_ENABLED` - Set to `false` to run with AI switched off
/// - `SANDBOX_JSON` - Print one JSON record per decision to stdout
#[derive(Clone, Debug, PartialEq)]
pub struct SandboxConfig {
    pub data_dir: PathBuf,
    pub scenario: String,
    pub ticks: Option<u32>,
    pub seed: u64,
    pub tuning: Option<PathBuf>,
    pub ai_enabled: bool,
    pub json: bool,
}

impl SandboxConfig {
    pub const DEFAULT_SCENARIO: &'static str = "ambush";
    pub const DEFAULT_TICKS: u32 = 20;

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("SANDBOX_DATA_DIR") {
            config.data_dir = dir;
        }
        if let Ok(name) = env::var("SANDBOX_SCENARIO") {
            if !name.trim().is_empty() {
                config.scenario = name.trim().to_string();
            }
        }
        if let Some(ticks) = read_env::<u32>("SANDBOX_TICKS") {
            config.ticks = Some(ticks);
        }
        if let Some(seed) = read_env::<u64>("SANDBOX_SEED") {
            config.seed = seed;
        }
        if let Some(path) = read_env::<PathBuf>("SANDBOX_TUNING") {
            config.tuning = Some(path);
        }
        if let Some(enabled) = read_env_bool("SANDBOX_AI_ENABLED") {
            config.ai_enabled = enabled;
        }
        if let Some(json) = read_env_bool("SANDBOX_JSON") {
            config.json = json;
        }

        config
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
            scenario: Self::DEFAULT_SCENARIO.to_string(),
            ticks: None,
            seed: 0,
            tuning: None,
            ai_enabled: true,
            json: false,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    parse_bool(&value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
