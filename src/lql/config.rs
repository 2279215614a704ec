//! Layered configuration for the lql console.
//!
//! `defaults/lql.default.toml` is embedded into the binary so the documented
//! defaults and runtime behavior stay in sync. Callers layer user files and
//! command line overrides on top via [Loader] before deserializing into
//! [LqlConfig].

use super::normalize::ArtifactFormat;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../../defaults/lql.default.toml");

/// Name of the optional per-project configuration file
pub const PROJECT_FILE: &str = "lql.toml";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LqlConfig {
    pub service: ServiceConfig,
    pub display: DisplayConfig,
    pub editor: EditorConfig,
    pub logging: LoggingConfig,
}

/// Where the compilation service lives
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub artifact_format: ArtifactFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    pub tab_width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

/// Layers user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<LqlConfig, ConfigError> {
        let config: LqlConfig = self.builder.build()?.try_deserialize()?;
        log::debug!("configuration loaded: {:?}", config);
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LqlConfig, ConfigError> {
    Loader::new().build()
}
