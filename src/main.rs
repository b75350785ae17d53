use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use settings::Settings;
use storage::Store;

mod catalog;
mod cli;
mod commands;
mod db;
mod models;
mod progress;
mod session;
mod settings;
mod storage;
mod suggestions;
mod timer;
mod types;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let db_path = std::env::var("GYMSPROUT_DB").unwrap_or_else(|_| "./gymsprout.db".to_string());
    let pool = db::open(&db_path).await?;
    let store = Store::new(pool);
    catalog::seed_exercises(&store).await?;

    let settings = Settings::load(&Settings::default_path()?)?;

    match cli.cmd {
        Commands::Onboard(args) => commands::onboard::handle(args, &store).await?,
        Commands::Workout(cmd) => commands::workout::handle(cmd, &store, &settings).await?,
        Commands::Exercise(cmd) => commands::exercise::handle(cmd, &store).await?,
        Commands::Status => commands::status::handle(&store).await?,
        Commands::Config(cmd) => commands::config::handle(cmd)?,
        Commands::Db(cmd) => commands::db::handle(cmd, &store).await?,
    }

    Ok(())
}
