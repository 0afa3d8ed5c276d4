use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{field, info, success};

/// Handle the `init` command: config directory, config file (skipped in
/// test mode) and an up-to-date database.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    info("Initializing kinematic…");
    if !cli.test {
        field("Config file", Config::config_file().display());
    }
    field("Database", &db_path);

    let pool = DbPool::new(&db_path)?;
    audit(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    );

    success(format!("Database initialized at {}", &db_path));
    Ok(())
}
