use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::invocation::PluginName;

/// File name looked up in the working directory for project-level settings.
pub const PROJECT_CONFIG_FILE: &str = "plugin-guard.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: HostConfig,
    pub check: CheckConfig,
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub program: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            program: "vagrant".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// When false, every invocation is checked, even one with no arguments.
    pub enabled: bool,
    pub exempt: Vec<String>,
    pub reexec: ReExecMode,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exempt: vec!["help".into(), "plugin".into(), "version".into()],
            reexec: ReExecMode::default(),
        }
    }
}

/// Which part of the original argument vector is handed back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReExecMode {
    #[default]
    FullArgs,
    FirstArgOnly,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    pub required: Vec<PluginName>,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config → project config.
    pub fn load() -> Result<Self> {
        let mut layers = Vec::new();
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "plugin-guard") {
            layers.push(proj_dirs.config_dir().join("config.toml"));
        }
        layers.push(PathBuf::from(PROJECT_CONFIG_FILE));

        Self::load_layers(&layers)
    }

    /// Each existing layer replaces the one before it; missing files are skipped.
    pub fn load_layers(layers: &[PathBuf]) -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        let mut config: AppConfig =
            toml::from_str(defaults).context("embedded default config is invalid")?;

        for path in layers {
            if path.exists() {
                config = Self::read_file(path)?;
                tracing::debug!("loaded config layer {}", path.display());
            }
        }

        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}
