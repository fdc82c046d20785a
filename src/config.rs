use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Overrides the database location when `--db` is not given.
pub(crate) const DB_ENV: &str = "BUDGETLEDGER_DB";
/// Tracing filter directives, e.g. `budgetledger=debug`.
pub(crate) const LOG_ENV: &str = "BUDGETLEDGER_LOG";
pub(crate) const DEFAULT_LOG_FILTER: &str = "budgetledger=info";

const DB_FILE: &str = "budgetledger.db";
const LOG_FILE: &str = "budgetledger.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) log_filter: String,
}

impl Config {
    /// Resolves the config from the process arguments and environment.
    /// Returns the arguments with the global flags removed.
    pub(crate) fn load(args: Vec<String>) -> Result<(Self, Vec<String>)> {
        let (db_flag, rest) = split_db_flag(args)?;
        let db_path = match db_flag.or_else(|| std::env::var(DB_ENV).ok()) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(expand_home(&path)),
            _ => default_db_path()?,
        };
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        let log_filter =
            std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
        Ok((
            Self {
                log_path: log_path_for(&db_path),
                db_path,
                log_filter,
            },
            rest,
        ))
    }
}

/// Pulls `--db <path>` or `--db=<path>` out of the argument list. The program
/// name in `args[0]` is kept.
fn split_db_flag(args: Vec<String>) -> Result<(Option<String>, Vec<String>)> {
    let mut db = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--db" {
            match iter.next() {
                Some(path) => db = Some(path),
                None => bail!("--db requires a path"),
            }
        } else if let Some(path) = arg.strip_prefix("--db=") {
            db = Some(path.to_string());
        } else {
            rest.push(arg);
        }
    }
    Ok((db, rest))
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgetledger", "BudgetLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join(DB_FILE))
}

/// The log file sits next to the database.
fn log_path_for(db_path: &Path) -> PathBuf {
    db_path.with_file_name(LOG_FILE)
}

pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
