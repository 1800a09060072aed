use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::{Result, SessionError};
use crate::session::{SessionConfig, TestMode};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModeKind {
    Time,
    Words,
}

/// Defaults remembered between runs. Command-line flags win over these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: ModeKind,
    pub seconds: u64,
    pub words: usize,
    pub wordlist: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ModeKind::Time,
            seconds: 60,
            words: 50,
            wordlist: None,
        }
    }
}

impl Config {
    pub fn test_mode(&self) -> TestMode {
        match self.mode {
            ModeKind::Time => TestMode::Time {
                seconds: self.seconds,
            },
            ModeKind::Words => TestMode::Words { count: self.words },
        }
    }

    /// Session settings for one run; the seed is never remembered
    pub fn session_config(&self, seed: Option<u64>) -> SessionConfig {
        SessionConfig {
            mode: self.test_mode(),
            wordlist: self.wordlist.clone(),
            seed,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typeterm_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!(
                    "ignoring unreadable settings in {}: {err}",
                    self.path.display()
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        let data = serde_json::to_vec_pretty(cfg)?;
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, data)
        };
        write().map_err(|source| SessionError::ConfigWrite {
            path: self.path.clone(),
            source,
        })
    }
}
