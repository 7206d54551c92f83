use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Overrides the database location when `--db` is not given.
pub(crate) const DB_ENV: &str = "FINLEDGER_DB";
/// Log filter directives, e.g. `info` or `finledger=debug`.
pub(crate) const LOG_ENV: &str = "FINLEDGER_LOG";

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    /// Whatever follows the global flags; empty means interactive mode.
    pub(crate) command: Vec<String>,
}

impl Config {
    /// Build from the process arguments (binary name already stripped) and
    /// environment.
    pub(crate) fn load(args: Vec<String>) -> Result<Self> {
        resolve(args, std::env::var_os(DB_ENV), default_db_path)
    }
}

/// `--db` beats the environment, which beats the platform data directory.
/// The default is only computed when nothing else names a path.
pub(crate) fn resolve(
    args: Vec<String>,
    env_db: Option<OsString>,
    default: impl FnOnce() -> Result<PathBuf>,
) -> Result<Config> {
    let mut flag_db: Option<PathBuf> = None;
    let mut command = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if !command.is_empty() {
            command.push(arg);
        } else if arg == "--db" {
            let path = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("--db requires a path"))?;
            flag_db = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--db=") {
            if path.is_empty() {
                anyhow::bail!("--db requires a path");
            }
            flag_db = Some(PathBuf::from(path));
        } else {
            command.push(arg);
        }
    }

    let db_path = match (flag_db, env_db.filter(|v| !v.is_empty())) {
        (Some(path), _) => path,
        (None, Some(env)) => PathBuf::from(env),
        (None, None) => default()?,
    };
    Ok(Config { db_path, command })
}

pub(crate) fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "finledger", "finledger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("finledger.db"))
}

/// Log to stderr so nothing interleaves with the menu on stdout.
pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
