//! AI sandbox binary.
//!
//! Loads a scenario, runs its agents and logs every decision.
//!
//! ```bash
//! SANDBOX_SCENARIO=market SANDBOX_TICKS=40 RUST_LOG=game_ai=debug cargo run -p ai-sandbox
//! ```

use ai_sandbox::{Sandbox, SandboxConfig};
use anyhow::Result;
use game_content::{ContentFactory, ScenarioLoader, TuningLoader};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SandboxConfig::from_env();
    tracing::info!(
        scenario = %config.scenario,
        seed = config.seed,
        data_dir = %config.data_dir.display(),
        "Starting AI sandbox"
    );

    let factory = ContentFactory::new(&config.data_dir);
    let tuning = match &config.tuning {
        Some(path) => TuningLoader::load(path)?,
        None => factory.load_tuning()?,
    };
    let catalog = factory.load_archetypes()?;
    let scenario = ScenarioLoader::load(&factory.scenario_path(&config.scenario))?
        .build(&catalog, &tuning)?;

    let ticks = config
        .ticks
        .or(scenario.ticks)
        .unwrap_or(SandboxConfig::DEFAULT_TICKS);
    tracing::info!(
        name = %scenario.name,
        agents = scenario.agents.len(),
        ticks,
        "Scenario loaded"
    );

    let mut sandbox = Sandbox::new(scenario, config.seed).with_ai_enabled(config.ai_enabled);
    for _ in 0..ticks {
        for record in sandbox.step() {
            if config.json {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
    }

    for event in sandbox.events() {
        tracing::info!(?event, "hostility event");
    }
    tracing::info!(ticks = sandbox.tick(), "Sandbox finished");
    Ok(())
}
