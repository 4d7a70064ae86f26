use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-catalog";
/// Catalog file name stored inside the application data directory.
const DATA_FILE_NAME: &str = "books.json";

#[derive(Debug, Parser)]
#[command(name = "library-catalog", version, about = "Keep track of a personal book collection")]
pub struct Cli {
    /// Catalog file to open. Created on the first change if it does not exist.
    #[arg(short, long, env = "LIBRARY_CATALOG_FILE")]
    pub file: Option<PathBuf>,

    /// Directory for log files. Defaults to the catalog file's directory.
    #[arg(long, env = "LIBRARY_CATALOG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "LIBRARY_CATALOG_LOG", default_value = "info")]
    pub log_level: String,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Cli {
    /// Fill in defaults that depend on the user's home directory.
    pub fn resolve(self) -> Result<Settings> {
        let data_file = match self.file {
            Some(path) => path,
            None => default_data_file()?,
        };
        let log_dir = match self.log_dir {
            Some(dir) => dir,
            None => data_file
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        Ok(Settings {
            data_file,
            log_dir,
            log_level: self.log_level,
        })
    }
}

/// Resolve the absolute path to the catalog file inside the user's home.
fn default_data_file() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DATA_FILE_NAME))
}
