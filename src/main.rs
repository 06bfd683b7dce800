use clap::Parser;

use mocovelha::agent::Hyperparameters;
use mocovelha::persistence::ModelStore;
use mocovelha::servers::{ApiConfig, ApiServer};
use mocovelha::services::LevelManager;

#[derive(Parser, Debug)]
#[command(name = "mocovelha", version, about = "Tic-tac-toe backend with a Q-learning opponent")]
struct Config {
    /// Host to bind the HTTP API on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port for the HTTP API
    #[arg(short = 'p', long, default_value_t = 8000)]
    port: u16,

    /// Directory holding the per-level model files
    #[arg(long, default_value = "models")]
    model_dir: String,

    /// Level activated at startup
    #[arg(long, default_value = "level_0")]
    default_level: String,

    /// Learning rate of the Q-update
    #[arg(long, default_value_t = 0.5)]
    alpha: f64,

    /// Discount factor of the Q-update
    #[arg(long, default_value_t = 0.9)]
    gamma: f64,

    /// Exploration rate during self-play training
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,

    /// Seed for reproducible training runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to rotating files in this directory instead of the console
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    match &config.log_dir {
        Some(dir) => mocovelha::logging::setup_file_logging(dir)?,
        None => mocovelha::logging::setup_console_logging()?,
    }

    let hyperparameters = Hyperparameters {
        alpha: config.alpha,
        gamma: config.gamma,
        epsilon: config.epsilon,
    };
    hyperparameters.validate()?;

    let store = ModelStore::new(&config.model_dir);
    let manager = LevelManager::new(store, hyperparameters, config.seed, &config.default_level);

    let stats = manager.activate(&config.default_level).await?;
    log::info!(
        "level '{}' ready: {} episodes, {} known states (model_loaded={})",
        stats.level,
        stats.total_episodes,
        stats.known_states,
        stats.model_loaded
    );

    let server = ApiServer::new(
        ApiConfig {
            host: config.host,
            port: config.port,
        },
        manager,
    );
    server.start().await?;
    Ok(())
}
