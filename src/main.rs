//! rewear - Community Clothing Exchange
//!
//! Entry point: load config, set up logging, connect PostgreSQL, serve the
//! gateway.

use std::sync::Arc;

use rewear::config::AppConfig;
use rewear::db::Database;
use rewear::gateway;
use rewear::logging::init_logging;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env)?;

    let _log_guard = init_logging(&config);
    tracing::info!(env = %env, version = env!("GIT_HASH"), "Starting rewear");

    let db = Arc::new(Database::connect(&config.postgres_url).await?);

    gateway::run_server(&config, db).await
}
