use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "WORKOUT_LOG_DIR";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".workout-log";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "workouts.sqlite";
const LOG_FILE_NAME: &str = "workout-log.log";

/// Where the application keeps its files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the data directory from the environment or the home directory.
    pub fn resolve() -> Result<Self> {
        let data_dir = match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let base_dirs =
                    BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
                base_dirs.home_dir().join(DATA_DIR_NAME)
            }
        };
        Ok(Self { data_dir })
    }

    /// Use `data_dir` as-is, bypassing environment and home lookup.
    pub fn in_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Create the data directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "failed to create data directory {}",
                self.data_dir.display()
            )
        })
    }

    /// Location of the SQLite database.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Location of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}
