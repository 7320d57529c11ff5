use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Runner configuration, loaded from an optional `qfix.toml` at the project
/// root. Absent file means defaults; no config is required.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Hard timeout for fallback upgrade commands, in seconds.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Directory names excluded from snapshots.
    #[serde(default = "qfix_core::snapshot::default_excluded_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout_secs(),
            exclude_dirs: qfix_core::snapshot::default_excluded_dirs(),
        }
    }
}

fn default_command_timeout_secs() -> u64 {
    120
}

impl Config {
    pub fn config_path(root: &Path) -> PathBuf {
        root.join("qfix.toml")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parse qfix.toml")?;
        Ok(cfg)
    }

    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }
}
