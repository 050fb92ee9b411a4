use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = ".strategist/config.toml";

/// Environment variable that overrides `base_url`.
pub const SERVER_ENV: &str = "STRATEGIST_SERVER";

/// Backend location and transport settings, from `.strategist/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_strategy_path")]
    pub strategy_path: String,
    #[serde(default = "default_industries_path")]
    pub industries_path: String,
    /// Connect timeout for the HTTP client. No read timeout is applied; a
    /// strategy can take minutes to generate.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_strategy_path() -> String {
    "/api/strategy".to_string()
}

fn default_industries_path() -> String {
    "/api/industries".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            strategy_path: default_strategy_path(),
            industries_path: default_industries_path(),
            connect_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn strategy_url(&self) -> String {
        join_url(&self.base_url, &self.strategy_path)
    }

    pub fn industries_url(&self) -> String {
        join_url(&self.base_url, &self.industries_path)
    }

    /// Apply the server override. `cli` wins over `env`.
    #[must_use]
    pub fn with_server(mut self, env: Option<String>, cli: Option<String>) -> Self {
        if let Some(url) = cli.or(env).filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Load configuration from `explicit`, or from `.strategist/config.toml`
/// under `dir`.
///
/// Falls back to defaults if the default file is missing. An explicit path
/// must exist.
pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Config> {
    let path: PathBuf = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = dir.join(CONFIG_PATH);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}
