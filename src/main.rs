mod config;
mod credentials;
mod db;
mod error;
mod export;
mod ledger;
mod models;
mod report;
mod run;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    config::init_logging();
    let config = config::Config::load(std::env::args().skip(1).collect())?;
    let mut db = db::Database::open(&config.db_path)?;

    if config.command.is_empty() {
        return run::as_interactive(db);
    }
    let result = run::as_cli(&config.command, &mut db, &mut run::ConsoleSurface::new());
    db.close()?;
    result
}
