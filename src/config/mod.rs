use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::infrastructure::abi::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

/// Signature database settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignaturesConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for SignaturesConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SignaturesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Vanity search settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VanityConfig {
    /// Worker threads; 0 means one per available core
    pub workers: usize,
    /// Attempts per worker before giving up; absent means unlimited
    pub max_tries: Option<u64>,
}

impl Default for VanityConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            max_tries: Some(10_000_000),
        }
    }
}

impl VanityConfig {
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub signatures: SignaturesConfig,

    #[serde(default)]
    pub vanity: VanityConfig,
}

/// Load the config file, falling back to defaults when it is missing or invalid
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "ignoring invalid config file");
        Config::default()
    })
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("DAPPTOOLS_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("dapptools").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("dapptools").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "dapptools", "dapptools")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
