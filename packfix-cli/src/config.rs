//! Configuration file loading for packfix.
//!
//! Discovers and loads `packfix.toml` from the working-tree root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "packfix.toml";

/// Top-level configuration from packfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackfixConfig {
    /// Always run the fix pass, as if --fix were given.
    pub fix: bool,

    /// Policy settings (allow/deny lists for fixable codes).
    pub policy: PolicyConfig,
}

/// Policy section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Allowlist patterns for finding codes.
    /// If non-empty, only allowlisted codes are eligible for fixing.
    pub allow: Vec<String>,

    /// Denylist patterns for finding codes.
    pub deny: Vec<String>,
}

/// Discover the packfix.toml config file.
///
/// Searches the working-tree root directory only. Returns `None` if
/// no config file is found.
pub fn discover_config(work_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = work_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a packfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<PackfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<PackfixConfig> {
    let config: PackfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the working-tree root, or return default if not found.
pub fn load_or_default(work_dir: &Utf8Path) -> anyhow::Result<PackfixConfig> {
    match discover_config(work_dir) {
        Some(path) => load_config(&path),
        None => Ok(PackfixConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    /// Whether to run the fix pass.
    pub fix: bool,

    /// Allow patterns (from config file, extended by CLI).
    pub allow: Vec<String>,

    /// Deny patterns (from config file, extended by CLI).
    pub deny: Vec<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: PackfixConfig,
}

impl ConfigMerger {
    /// Create a new merger from a loaded config.
    pub fn new(config: PackfixConfig) -> Self {
        Self { config }
    }

    /// Merge with validate command CLI arguments.
    ///
    /// CLI `allow` and `deny` lists extend the config file lists; the
    /// `--fix` flag turns fixing on but cannot turn it off.
    pub fn merge_validate_args(
        self,
        cli_fix: bool,
        cli_allow: &[String],
        cli_deny: &[String],
    ) -> MergedConfig {
        let mut allow = self.config.policy.allow.clone();
        let mut deny = self.config.policy.deny.clone();

        // CLI extends the config file lists
        for pattern in cli_allow {
            if !allow.contains(pattern) {
                allow.push(pattern.clone());
            }
        }
        for pattern in cli_deny {
            if !deny.contains(pattern) {
                deny.push(pattern.clone());
            }
        }

        MergedConfig {
            fix: cli_fix || self.config.fix,
            allow,
            deny,
        }
    }
}
