/// Configuration module for shortvec.
///
/// Handles loading, validating, and providing default configuration
/// values. Declares either a local model file or a remote embedding
/// service as the lookup source.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ── Default value functions ──────────────────────────────────────────

fn default_remote_port() -> u16 {
    5000
}

fn default_dimensions() -> usize {
    300
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    /// Remote service settings; takes precedence over `model` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    /// Path of the pre-trained model file. Empty means unconfigured.
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub kind: ModelKind,

    /// Whether the file is in binary word2vec format.
    #[serde(default)]
    pub binary: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Word2vec,
    Fasttext,
    Poincare,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RemoteConfig {
    pub url: String,

    #[serde(default = "default_remote_port")]
    pub port: u16,

    /// Dimensionality of the vectors the service returns. The wire
    /// contract has no introspection endpoint, so it must be declared.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            remote: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            kind: ModelKind::default(),
            binary: false,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            port: default_remote_port(),
            dimensions: default_dimensions(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to `"config.json"`.
    /// If the file does not exist, returns a default config and optionally
    /// generates a template file.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            "config.json"
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            // Generate template only for the default path
            if path == "config.json" {
                match cfg.save(path) {
                    Ok(()) => info!("Generated config template: {path}"),
                    Err(e) => warn!("Failed to generate config template: {e}"),
                }
            }

            return Ok(cfg);
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {path}"))?;

        let cfg: Config = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {path}: {e}");
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {path}");
        Ok(cfg)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if let Some(remote) = &self.remote {
            anyhow::ensure!(!remote.url.is_empty(), "remote.url must not be empty");
            anyhow::ensure!(
                remote.dimensions > 0,
                "remote.dimensions must be positive"
            );
        } else {
            anyhow::ensure!(
                !self.model.path.is_empty(),
                "either model.path or a remote endpoint must be configured"
            );
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
