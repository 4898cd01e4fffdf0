//! Configuration for the Cribra CLI.
//!
//! Provides the [`CribraConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `CRIBRA_CONFIG` environment variable
//! 3. XDG default: `~/.config/cribra/config.toml`
//! 4. Built-in defaults

use confyg::{env, Confygery};
use cribra_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the Cribra CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CribraConfig {
    /// Project name, used for env var prefixes and default paths.
    pub project_name: String,

    /// Ranking defaults.
    pub rank: RankConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Defaults applied to rank commands when flags are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Default result limit.
    pub limit: Option<usize>,

    /// Default bounded top-K selection.
    pub top_k: Option<usize>,
}

/// Output rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for CribraConfig {
    fn default() -> Self {
        Self {
            project_name: "cribra".to_string(),
            rank: RankConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl CribraConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// Loading priority:
    /// 1. Explicit `config_path` (from `--config` flag)
    /// 2. `CRIBRA_CONFIG` env var
    /// 3. XDG default: `~/.config/cribra/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("CRIBRA");
        env_opts.add_section("rank");
        env_opts.add_section("output");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        // 1. Explicit --config flag
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        // 2. CRIBRA_CONFIG env var
        if let Ok(path) = std::env::var("CRIBRA_CONFIG") {
            return Some(PathBuf::from(path));
        }

        // 3. XDG default
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cribra").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
