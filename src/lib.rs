//! kinematic library root.
//! Exposes the CLI parser, the high-level run() function and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands::{self, Context};
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use utils::time::resolve_now;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let ctx = Context {
        cfg,
        token: cli.token.as_deref(),
        now: resolve_now(cli.now.as_deref())?,
        storage_dir: cli.storage.clone().unwrap_or_else(|| cfg.storage_dir.clone()),
    };

    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Provision { action } => commands::provision::handle(action, &ctx),
        Commands::Auth { action } => commands::auth::handle(action, &ctx),
        Commands::Attendance { action } => commands::attendance::handle(action, &ctx),
        Commands::Stock { action } => commands::stock::handle(action, &ctx),
        Commands::Leaderboard { action } => commands::leaderboard::handle(action, &ctx),
        Commands::Sos { action } => commands::sos::handle(action, &ctx),
        Commands::Grievance { action } => commands::grievance::handle(action, &ctx),
        Commands::Broadcast { action } => commands::broadcast::handle(action, &ctx),
        Commands::Learning { action } => commands::learning::handle(action, &ctx),
        Commands::Notify { action } => commands::notify::handle(action, &ctx),
        Commands::Forms { action } => commands::forms::handle(action, &ctx),
        Commands::Visits { action } => commands::visits::handle(action, &ctx),
        Commands::Analytics { action } => commands::analytics::handle(action, &ctx),
        Commands::Users { action } => commands::users::handle(action, &ctx),
        Commands::Zones { action } => commands::zones::handle(action, &ctx),
        Commands::Upload { kind, file } => commands::upload::handle(kind, file, &ctx),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    // --db overrides the configured database for this invocation
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
