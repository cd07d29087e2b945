use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReflexConfig {
    pub storage: StorageConfig,
    pub scoring: ScoringConfig,
    pub lifecycle: LifecycleConfig,
    pub merge: MergeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub state_path: String,
    pub catalog_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringConfig {
    /// Domain component when exactly one keyword matches.
    pub domain_match_weight: f64,
    /// Added on top of `domain_match_weight` when two or more distinct
    /// keywords match.
    pub domain_multi_bonus: f64,
    /// Tool component when any trigger matches a detected intent.
    pub tool_trigger_weight: f64,
    /// Minimum score for a rule to activate.
    pub activation_threshold: f64,
    /// Maximum rules activated per invocation.
    pub budget: usize,
    /// Maximum rules actually surfaced to the caller. Always <= budget.
    pub injection_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Spike decay applied to each non-dormant rule per advanced day.
    pub decay_per_day: f64,
    /// Days of inactivity after which a non-pinned rule goes dormant.
    pub dormancy_days: u64,
    /// Saturation ceiling for violation spikes under normal conditions.
    pub spike_ceiling: f64,
    /// Spike applied when a dormant rule is violated (immune reactivation).
    pub reactivation_spike: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MergeConfig {
    /// Minimum joint activations before a pair is considered at all.
    pub min_joint_activations: u64,
    /// Co-activation ratio above which a pair is a merge candidate.
    pub co_activation_ratio: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl Default for ReflexConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            scoring: ScoringConfig::default(),
            lifecycle: LifecycleConfig::default(),
            merge: MergeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let state_path = default_reflex_dir()
            .join("state.json")
            .to_string_lossy()
            .into_owned();
        let catalog_path = default_reflex_dir()
            .join("rules.toml")
            .to_string_lossy()
            .into_owned();
        Self {
            state_path,
            catalog_path,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            domain_match_weight: 0.35,
            domain_multi_bonus: 0.05,
            tool_trigger_weight: 0.15,
            activation_threshold: 0.5,
            budget: 5,
            injection_limit: 3,
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            decay_per_day: 0.01,
            dormancy_days: 60,
            spike_ceiling: 0.15,
            reactivation_spike: 0.20,
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            min_joint_activations: 10,
            co_activation_ratio: 0.9,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

/// Returns `~/.reflex/`
pub fn default_reflex_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".reflex")
}

/// Returns the default config file path: `~/.reflex/config.toml`
pub fn default_config_path() -> PathBuf {
    default_reflex_dir().join("config.toml")
}

impl ReflexConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ReflexConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (REFLEX_STATE, REFLEX_CATALOG,
    /// REFLEX_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("REFLEX_STATE") {
            self.storage.state_path = val;
        }
        if let Ok(val) = std::env::var("REFLEX_CATALOG") {
            self.storage.catalog_path = val;
        }
        if let Ok(val) = std::env::var("REFLEX_LOG_LEVEL") {
            self.logging.log_level = val;
        }
    }

    /// Resolve the state file path, expanding `~` if needed.
    pub fn resolved_state_path(&self) -> PathBuf {
        expand_tilde(&self.storage.state_path)
    }

    /// Resolve the rule catalog path, expanding `~` if needed.
    pub fn resolved_catalog_path(&self) -> PathBuf {
        expand_tilde(&self.storage.catalog_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
