use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "saldo.toml";
pub const CATEGORIES_FILE: &str = "categories.json";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "saldo", "Saldo")
}

/// Default config file location, `None` when no home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn default_categories_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CATEGORIES_FILE)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub categories_path: PathBuf,
    pub log_filter: String,
    pub csv_delimiter: String,
    /// Weeks shown in the weekly spending trend.
    pub weekly_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories_path: default_categories_path(),
            log_filter: "info".to_string(),
            csv_delimiter: ",".to_string(),
            weekly_window: 12,
        }
    }
}

impl Config {
    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location means defaults; a missing file
    /// the user named explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                bail!("Config file not found: {}", path.display());
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.delimiter()?;
        Ok(config)
    }

    /// The CSV delimiter as a single byte.
    pub fn delimiter(&self) -> Result<u8> {
        match self.csv_delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => bail!(
                "csv_delimiter must be a single ASCII character, got {:?}",
                self.csv_delimiter
            ),
        }
    }
}
