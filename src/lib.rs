pub mod accounts;
pub mod cli;
pub mod constants;
pub mod db;
pub mod error;
pub mod manager;
pub mod models;
pub mod prompt;
pub mod store;
#[cfg(test)]
mod test_utils;
pub mod validation;

use crate::constants::DB_FILE_NAME;
use crate::db::{migrations, Database};
use directories::ProjectDirs;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Error type for drt initialization failures
#[derive(Debug)]
pub enum InitError {
    NoProjectDirs,
    DataDirCreation(std::io::Error),
    DatabaseOpen(rusqlite::Error),
    Migration(rusqlite::Error),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::NoProjectDirs => write!(f, "Could not determine project directories"),
            InitError::DataDirCreation(e) => write!(f, "Could not create data directory: {e}"),
            InitError::DatabaseOpen(e) => write!(f, "Failed to open database: {e}"),
            InitError::Migration(e) => write!(f, "Failed to run database migrations: {e}"),
        }
    }
}

impl std::error::Error for InitError {}

/// Resolve the database file: an explicit path wins, otherwise the platform data directory.
pub fn get_db_path(explicit: Option<&Path>) -> Result<PathBuf, InitError> {
    if let Some(path) = explicit {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(InitError::DataDirCreation)?;
        }
        return Ok(path.to_path_buf());
    }

    let proj_dirs = ProjectDirs::from("com", "drt", "Drt").ok_or(InitError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(InitError::DataDirCreation)?;
    Ok(data_dir.join(DB_FILE_NAME))
}

/// Open the database, create the schema and wrap it for sharing between the store and accounts.
pub fn open_database(path: &Path) -> Result<Arc<Mutex<Database>>, InitError> {
    let db = Database::open(path).map_err(|e| {
        error!("Failed to open database at {}: {e}", path.display());
        InitError::DatabaseOpen(e)
    })?;

    migrations::run(db.connection()).map_err(|e| {
        error!("Failed to run migrations: {e}");
        InitError::Migration(e)
    })?;

    info!("Opened database at {}", path.display());
    Ok(Arc::new(Mutex::new(db)))
}
