use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kingdom_app::config::AppConfig;
use kingdom_app::script;
use kingdom_app::state::AppError;
use kingdom_sim::engine::SimulationEngine;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kingdom_sim=info,kingdom_app=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn run(config_path: Option<PathBuf>) -> Result<(), AppError> {
    let config = match config_path {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    };

    let catalog = config.catalog();
    let mut book = config.profile_book()?;
    let profile = config.resolve_profile(&mut book, &catalog);

    let mut engine = SimulationEngine::new(config.sim_config(catalog, profile));
    let summary = script::play_defense_round(&mut engine, config.duration_secs);
    info!(
        outcome = ?summary.outcome,
        ticks = summary.ticks,
        cards_played = summary.cards_played,
        enemy_spawns = summary.enemy_spawns,
        minion_deaths = summary.minion_deaths,
        gold = summary.gold,
        level = summary.level,
        hub_health = summary.hub_health_ratio,
        "session summary"
    );

    book.upsert(engine.profile());
    match &config.profiles_path {
        Some(path) => {
            book.save_to_file(path)?;
            info!(path = %path.display(), "profiles saved");
        }
        None => warn!("no profiles_path configured; progress not saved"),
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    match run(config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "kingdom failed");
            ExitCode::FAILURE
        }
    }
}
