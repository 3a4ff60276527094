/// Configuration module for ig-chunker.
///
/// Handles loading, validating, and providing default configuration values.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::NaiveBayesParams;
use crate::features::DEFAULT_SEPARATOR;

/// Config file looked up when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "ig-chunker.json";

// ── Default value functions ──────────────────────────────────────────

fn default_vocab_size() -> usize {
    500
}

fn default_window_size() -> usize {
    2
}

fn default_train_fraction() -> f64 {
    0.8
}

fn default_seed() -> u64 {
    42
}

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

fn default_output_dir() -> String {
    "./output".to_string()
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Number of distinct words kept before mapping to the OOV marker.
    #[serde(default = "default_vocab_size")]
    pub vocab_size: usize,

    /// Tokens of context on each side.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Reserved character placed between fragments; must not occur in input.
    #[serde(default = "default_separator")]
    pub separator: char,

    #[serde(default)]
    pub classifier: NaiveBayesParams,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            vocab_size: default_vocab_size(),
            window_size: default_window_size(),
            train_fraction: default_train_fraction(),
            seed: default_seed(),
            separator: default_separator(),
            classifier: NaiveBayesParams::default(),
            output_dir: default_output_dir(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// If `config_path` is empty, defaults to [`DEFAULT_CONFIG_PATH`].
    /// If the file does not exist, returns a default config and, for the
    /// default path only, writes a template next to it.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = if config_path.is_empty() {
            DEFAULT_CONFIG_PATH
        } else {
            config_path
        };

        if !Path::new(path).exists() {
            info!("{path} not found, using defaults");
            let cfg = Self::default();

            if path == DEFAULT_CONFIG_PATH {
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
        anyhow::ensure!(self.vocab_size > 0, "vocab_size must be positive");
        anyhow::ensure!(
            self.train_fraction > 0.0 && self.train_fraction <= 1.0,
            "train_fraction must be in (0, 1]"
        );
        anyhow::ensure!(
            self.classifier.smoothing.is_finite() && self.classifier.smoothing > 0.0,
            "classifier.smoothing must be positive"
        );
        anyhow::ensure!(
            !self.separator.is_whitespace(),
            "separator must not be whitespace"
        );
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
