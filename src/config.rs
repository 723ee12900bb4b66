use crate::error::{Result, SemvError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete configuration for git-semv.
///
/// Everything has a sensible default; a config file is only needed to
/// deviate from the `v`-prefixed tags, the auto-scope threshold or the
/// origin remote.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub auto: AutoConfig,

    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Tag naming configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    /// Prefix applied to tag names (e.g. "v" gives "v1.2.3")
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    "v".to_string()
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            prefix: default_prefix(),
        }
    }
}

/// Auto-scope heuristic configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AutoConfig {
    /// Changed-line percentage above which `auto` selects a minor bump;
    /// at or below it, a patch bump
    #[serde(default = "default_minor_threshold_pct")]
    pub minor_threshold_pct: f64,
}

fn default_minor_threshold_pct() -> f64 {
    20.0
}

impl Default for AutoConfig {
    fn default() -> Self {
        AutoConfig {
            minor_threshold_pct: default_minor_threshold_pct(),
        }
    }
}

/// Remote configuration for pushing tags
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Remote to push created tags to
    #[serde(default = "default_remote_name")]
    pub name: String,

    /// Whether tagging commands push by default
    #[serde(default = "default_push")]
    pub push: bool,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_push() -> bool {
    true
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
            push: default_push(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitsemv.toml` in current directory
/// 3. `.gitsemv.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitsemv.toml").exists() {
        fs::read_to_string("./gitsemv.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitsemv.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| SemvError::config(format!("Invalid config: {}", e)))
}
