//! Shared configuration for the bedwatch CLI and TUI.
//!
//! TOML file plus `BEDWATCH_*` environment overrides, layered over
//! built-in defaults, and translation to `bedwatch_core::MonitorConfig`.
//! Both binaries depend on this crate.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bedwatch_core::{CoreError, MonitorConfig};

/// Prefix for environment overrides; nested keys are split on `__`.
pub const ENV_PREFIX: &str = "BEDWATCH_";

const OUTPUT_FORMATS: [&str; 5] = ["table", "json", "json-compact", "yaml", "plain"];
const COLOR_MODES: [&str; 3] = ["auto", "always", "never"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Producer behaviour.
    #[serde(default)]
    pub monitor: MonitorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// `[monitor]` section. Every field falls back to the built-in default.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub log_capacity: usize,
    pub security_event_capacity: usize,
    pub chat_capacity: usize,
    pub tick_min_ms: u64,
    pub tick_max_ms: u64,
    pub log_probability: f64,
    pub security_event_probability: f64,
    pub initial_logs: usize,
    pub initial_events: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        MonitorConfig::default().into()
    }
}

impl From<MonitorConfig> for MonitorSettings {
    fn from(c: MonitorConfig) -> Self {
        Self {
            log_capacity: c.log_capacity,
            security_event_capacity: c.security_event_capacity,
            chat_capacity: c.chat_capacity,
            tick_min_ms: c.tick_min_ms,
            tick_max_ms: c.tick_max_ms,
            log_probability: c.log_probability,
            security_event_probability: c.security_event_probability,
            initial_logs: c.initial_logs,
            initial_events: c.initial_events,
            seed: c.seed,
        }
    }
}

impl MonitorSettings {
    /// Translate to the core runtime config, validating it on the way.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let config = MonitorConfig {
            log_capacity: self.log_capacity,
            security_event_capacity: self.security_event_capacity,
            chat_capacity: self.chat_capacity,
            tick_min_ms: self.tick_min_ms,
            tick_max_ms: self.tick_max_ms,
            log_probability: self.log_probability,
            security_event_probability: self.security_event_probability,
            initial_logs: self.initial_logs,
            initial_events: self.initial_events,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Check the presentation defaults and the monitor section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !OUTPUT_FORMATS.contains(&self.defaults.output.as_str()) {
            return Err(ConfigError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    OUTPUT_FORMATS.join(", "),
                    self.defaults.output
                ),
            });
        }
        if !COLOR_MODES.contains(&self.defaults.color.as_str()) {
            return Err(ConfigError::Validation {
                field: "defaults.color".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    COLOR_MODES.join(", "),
                    self.defaults.color
                ),
            });
        }
        self.monitor.to_monitor_config()?;
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "bedwatch", "bedwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bedwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
