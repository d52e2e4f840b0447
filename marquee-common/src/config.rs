//! Configuration loading and config-file resolution
//!
//! Bootstrap configuration is a single TOML file. Every key has a built-in
//! default, so an empty (or absent) file yields a fully usable configuration.
//!
//! # Resolution priority
//!
//! 1. Command-line argument (`--config`)
//! 2. Environment variable (`MARQUEE_CONFIG`)
//! 3. Platform config directory (`<config_dir>/marquee/config.toml`)
//! 4. Built-in defaults
//!
//! A missing file found through steps 2-3 is a warning, not an error. A file named
//! explicitly on the command line must exist. A file that exists but does not
//! parse is always an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "MARQUEE_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    pub logging: LoggingConfig,
    pub analysis: AnalysisSettings,
    pub gate: GateSettings,
    pub learning: LearningSettings,
    pub cache: CacheSettings,
    pub concepts: ConceptSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Per-candidate analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Per-analyzer call timeout in milliseconds
    pub timeout_ms: u64,
    /// Concurrent candidates in flight; `None` means one per CPU core
    pub max_concurrency: Option<usize>,
    /// Largest batch accepted at the request boundary
    pub max_batch_size: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 2_000,
            max_concurrency: None,
            max_batch_size: 50,
        }
    }
}

/// Quality gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    /// Minimum qualified candidates before emergency fallback kicks in
    pub minimum_results: usize,
    /// Whether emergency fallback may relax the gate at all
    pub fallback_enabled: bool,
    /// Threshold decrement per fallback step
    pub fallback_step: f64,
    /// Hard floor the fallback never crosses
    pub fallback_floor: f64,
    /// Upper bound on fallback iterations
    pub max_fallback_steps: usize,
    /// Candidates admitted when gate computation itself fails
    pub emergency_result_count: usize,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            minimum_results: 3,
            fallback_enabled: true,
            fallback_step: 0.05,
            fallback_floor: 0.30,
            max_fallback_steps: 12,
            emergency_result_count: 3,
        }
    }
}

/// Adaptive threshold learning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningSettings {
    /// Records older than this are ignored for threshold computation
    pub feedback_window_hours: u64,
    /// Most recent records considered per context key
    pub max_records: usize,
    /// Weight of the base threshold when blending with the learned one (0.0-1.0)
    pub stability_factor: f64,
    /// SQLite file for persistent history; in-memory history when absent
    pub database_path: Option<PathBuf>,
}

impl Default for LearningSettings {
    fn default() -> Self {
        Self {
            feedback_window_hours: 168,
            max_records: 50,
            stability_factor: 0.7,
            database_path: None,
        }
    }
}

/// Analysis cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3_600,
        }
    }
}

/// Which concept/word-association backend feeds the semantic analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptSourceKind {
    /// Built-in offline lexicon
    Lexicon,
    /// ConceptNet HTTP API
    ConceptNet,
}

/// Concept source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptSettings {
    pub source: ConceptSourceKind,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Minimum spacing between outbound requests
    pub rate_limit_ms: u64,
}

impl Default for ConceptSettings {
    fn default() -> Self {
        Self {
            source: ConceptSourceKind::Lexicon,
            base_url: "https://api.conceptnet.io".to_string(),
            timeout_ms: 3_000,
            rate_limit_ms: 200,
        }
    }
}

impl MarqueeConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MarqueeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express
    pub fn validate(&self) -> Result<()> {
        let gate = &self.gate;
        if !(0.20..=0.95).contains(&gate.fallback_floor) {
            return Err(Error::Config(format!(
                "gate.fallback_floor must be within [0.20, 0.95], got {}",
                gate.fallback_floor
            )));
        }
        if !(gate.fallback_step > 0.0 && gate.fallback_step <= 0.5) {
            return Err(Error::Config(format!(
                "gate.fallback_step must be within (0, 0.5], got {}",
                gate.fallback_step
            )));
        }
        if !(0.0..=1.0).contains(&self.learning.stability_factor) {
            return Err(Error::Config(format!(
                "learning.stability_factor must be within [0, 1], got {}",
                self.learning.stability_factor
            )));
        }
        if self.learning.max_records == 0 {
            return Err(Error::Config("learning.max_records must be positive".to_string()));
        }
        if self.analysis.max_batch_size == 0 {
            return Err(Error::Config(
                "analysis.max_batch_size must be positive".to_string(),
            ));
        }
        if self.analysis.max_concurrency == Some(0) {
            return Err(Error::Config(
                "analysis.max_concurrency must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolves which configuration file (if any) should be read
pub struct ConfigResolver {
    env_var_name: String,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self {
            env_var_name: CONFIG_ENV_VAR.to_string(),
        }
    }

    /// Use a different environment variable (tests)
    pub fn with_env_var(env_var_name: impl Into<String>) -> Self {
        Self {
            env_var_name: env_var_name.into(),
        }
    }

    /// Resolve the configuration file path following the priority order
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_arg {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_path().filter(|p| p.exists())
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform default configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("marquee").join("config.toml"))
}

/// Load configuration following the resolution priority
pub fn load_config(cli_arg: Option<&Path>) -> Result<MarqueeConfig> {
    load_config_with(&ConfigResolver::new(), cli_arg)
}

/// Load configuration with an explicit resolver
pub fn load_config_with(resolver: &ConfigResolver, cli_arg: Option<&Path>) -> Result<MarqueeConfig> {
    let Some(path) = resolver.resolve(cli_arg) else {
        info!("No configuration file found, using built-in defaults");
        return Ok(MarqueeConfig::default());
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let config = MarqueeConfig::from_toml_str(&content)?;
            info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && cli_arg.is_none() => {
            warn!(
                path = %path.display(),
                "Configuration file not found, using built-in defaults"
            );
            Ok(MarqueeConfig::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        ))),
        Err(e) => Err(Error::Io(e)),
    }
}
