//! Configuration types and loading for the application.

use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, Environment, File, FileFormat};
use log::LevelFilter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::paths::{expand_str_path, write_default_config};
use crate::profile::Profile;
use crate::registry::{AUTO_PROFILE, ProfileRegistry};
use crate::{AppPaths, env_prefix};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
#[schemars(
    title = "classgen Configuration",
    description = "Profiles and defaults for resolving scaffolding paths"
)]
pub struct AppConfig {
    /// JSON Schema reference for editor support.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub schema: Option<String>,

    /// Active profile, or `auto` to pick it from the qualified name.
    #[schemars(default = "default_profile")]
    pub profile: String,

    /// Default root directory of the project checkout. Supports ~ and
    /// environment variables.
    #[schemars(default = "default_root")]
    pub root: String,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Additional profiles. A profile named like a built-in replaces it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,
}

fn default_profile() -> String {
    AUTO_PROFILE.to_string()
}

fn default_root() -> String {
    ".".to_string()
}

impl AppConfig {
    /// Override the profile if a value is provided.
    #[must_use]
    pub fn with_profile_override(mut self, profile: Option<String>) -> Self {
        if let Some(profile) = profile {
            self.profile = profile;
        }
        self
    }

    /// Requested profile name; `None` means automatic selection.
    #[must_use]
    pub fn requested_profile(&self) -> Option<&str> {
        Some(self.profile.as_str()).filter(|p| *p != AUTO_PROFILE)
    }

    /// Root directory used when none is given on the command line.
    #[must_use]
    pub fn root_dir(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    /// Built-in profiles merged with the configured ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured profile is invalid.
    pub fn registry(&self) -> crate::Result<ProfileRegistry> {
        ProfileRegistry::with_custom(self.profiles.iter().cloned())
    }

    /// Load configuration from file and environment, creating defaults if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed, or written.
    pub fn load(paths: &AppPaths, dry_run: bool) -> Result<Self> {
        if !paths.config_file.exists() {
            if dry_run {
                log::info!(
                    "dry-run: would create default config at {}",
                    paths.config_file.display()
                );
            } else {
                write_default_config(&paths.config_file)?;
            }
        }

        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load_from_path(config_file: &Path) -> Result<Self> {
        let env_prefix = env_prefix();
        let built = Config::builder()
            .set_default("profile", AUTO_PROFILE)?
            .set_default("root", ".")?
            .set_default("logging.level", "info")?
            .add_source(
                File::from(config_file)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(env_prefix.as_str()).separator("__"))
            .build()?;

        let mut config: Self = built.try_deserialize()?;

        let expanded = expand_str_path(&config.root)?;
        config.root = expanded.display().to_string();

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            schema: None,
            profile: default_profile(),
            root: default_root(),
            logging: LoggingConfig::default(),
            profiles: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
#[schemars(description = "Logging configuration")]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given.
    #[schemars(default = "default_log_level")]
    pub level: LogLevel,
}

/// Log level enumeration for schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only emit error-level messages.
    Error,
    /// Emit warnings and errors.
    Warn,
    /// Emit informational messages and above (default).
    #[default]
    Info,
    /// Emit debug diagnostics and above.
    Debug,
    /// Emit all messages including fine-grained traces.
    Trace,
}

impl LogLevel {
    /// Matching `log` filter.
    #[must_use]
    pub const fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

const fn default_log_level() -> LogLevel {
    LogLevel::Info
}
