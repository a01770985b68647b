mod cli;
mod config;
mod db;
mod engine;
mod models;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;
use std::rc::Rc;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::{SharedStore, SqliteStore};
use engine::ProgressionCoordinator;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    let store: SharedStore = Rc::new(SqliteStore::new(conn));
    let mut coord = ProgressionCoordinator::new(store, config).context("Loading progress")?;

    let today = utils::dates::today();
    coord.start_day(today)?;

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => handlers::handle_status(&coord, today)?,
        Commands::Habit { action } => handlers::handle_habit(&mut coord, &action, today)?,
        Commands::Quests => handlers::handle_quests(&coord)?,
        Commands::Claim { id } => handlers::handle_claim(&mut coord, &id)?,
        Commands::Trophies => handlers::handle_trophies(&coord)?,
        Commands::Inventory { action } => {
            handlers::handle_inventory(&mut coord, action.as_ref())?
        }
        Commands::Chest => handlers::handle_chest(&mut coord)?,
        Commands::Buff { action } => handlers::handle_buff(&mut coord, &action)?,
    }

    Ok(())
}
