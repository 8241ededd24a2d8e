//! CLI error types with miette diagnostics.
//!
//! Maps config and core failures into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use bedwatch_config::ConfigError;
use bedwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bedwatch::validation))]
    Validation { field: String, reason: String },

    #[error("Refusing to overwrite {path} without confirmation")]
    #[diagnostic(
        code(bedwatch::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { path: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration")]
    #[diagnostic(
        code(bedwatch::config),
        help(
            "Check {path} and any BEDWATCH_* environment variables.\n\
             Run: bedwatch config init --yes to write a fresh default file."
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── Core ─────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(bedwatch::core))]
    Core(#[from] CoreError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    #[diagnostic(code(bedwatch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode YAML: {0}")]
    #[diagnostic(code(bedwatch::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to encode TOML: {0}")]
    #[diagnostic(code(bedwatch::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Wrap a config failure with the file it came from.
    pub fn config(path: impl std::fmt::Display, source: ConfigError) -> Self {
        Self::Config {
            path: path.to_string(),
            source,
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Config { .. } | Self::Core(CoreError::Config { .. }) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        let usage = CliError::Validation {
            field: "count".into(),
            reason: "too large".into(),
        };
        assert_eq!(usage.exit_code(), 2);

        let config = CliError::config(
            "/tmp/x.toml",
            ConfigError::Validation {
                field: "defaults.output".into(),
                reason: "bad".into(),
            },
        );
        assert_eq!(config.exit_code(), 3);

        let core_config = CliError::Core(CoreError::Config {
            message: "tick_min_ms must be below tick_max_ms".into(),
        });
        assert_eq!(core_config.exit_code(), 3);

        assert_eq!(CliError::Core(CoreError::AlreadyRunning).exit_code(), 1);
    }
}
