use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{
    drawer::DEFAULT_WIDTH_RATIO,
    error::{KioskError, Result},
};

const APP_DIR: &str = "jobsite-kiosk";
const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "kiosk.db";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Hosted,
    Local,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

/// Settings from `config.toml`, environment and command line, in rising
/// order of precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub backend: BackendKind,
    pub hosted: HostedConfig,
    /// Local SQLite file. Also stores the session for the hosted backend.
    pub database: Option<PathBuf>,
    pub drawer_width_ratio: f32,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            hosted: HostedConfig::default(),
            database: None,
            drawer_width_ratio: DEFAULT_WIDTH_RATIO,
        }
    }
}

impl KioskConfig {
    /// `$CONFIG_DIR/jobsite-kiosk/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Read `explicit` if given (it must exist), otherwise the default file if
    /// there is one, otherwise defaults. Environment overrides are applied on
    /// top.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// `KIOSK_URL`, `KIOSK_ANON_KEY` and `KIOSK_DB` win over the file.
    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(url) = lookup("KIOSK_URL") {
            self.hosted.url = Some(url);
        }
        if let Some(anon_key) = lookup("KIOSK_ANON_KEY") {
            self.hosted.anon_key = Some(anon_key);
        }
        if let Some(db) = lookup("KIOSK_DB") {
            self.database = Some(PathBuf::from(db));
        }
    }

    /// Configured database file, or `$DATA_DIR/jobsite-kiosk/kiosk.db`.
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join(DB_FILE)
        })
    }

    /// URL and anon key of the hosted service. Both are required.
    pub fn hosted_endpoint(&self) -> Result<(&str, &str)> {
        let url = self
            .hosted
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| KioskError::config("hosted.url is not set (or KIOSK_URL)"))?;
        let anon_key = self
            .hosted
            .anon_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| KioskError::config("hosted.anon_key is not set (or KIOSK_ANON_KEY)"))?;
        Ok((url, anon_key))
    }

    /// Drawer width for a window `window_width` wide.
    pub fn drawer_width(&self, window_width: f32) -> f32 {
        let ratio = if self.drawer_width_ratio > 0.0 && self.drawer_width_ratio <= 1.0 {
            self.drawer_width_ratio
        } else {
            DEFAULT_WIDTH_RATIO
        };
        (window_width * ratio).max(0.0)
    }
}
