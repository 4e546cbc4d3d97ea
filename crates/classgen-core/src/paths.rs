//! XDG-compliant location of the configuration file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use crate::profile::Profile;
use crate::schema::example_profile;
use crate::{APP_NAME, AppConfig};

/// Configuration file name inside the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Application paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Configuration file, which may not exist yet.
    pub config_file: PathBuf,
}

impl AppPaths {
    /// Discover application paths, optionally overriding the config file location.
    ///
    /// # Errors
    ///
    /// Returns an error if the override cannot be expanded or no config
    /// directory can be determined.
    pub fn discover(override_path: Option<PathBuf>) -> Result<Self> {
        let config_file = match override_path {
            Some(path) => {
                let expanded = expand_path(path)?;
                if expanded.is_dir() {
                    expanded.join(CONFIG_FILENAME)
                } else {
                    expanded
                }
            }
            None => default_config_dir()?.join(CONFIG_FILENAME),
        };

        if config_file.parent().is_none() {
            return Err(anyhow!("invalid config file path: {config_file:?}"));
        }

        Ok(Self { config_file })
    }
}

impl std::fmt::Display for AppPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "config: {}", self.config_file.display())
    }
}

/// Expand a `PathBuf`, resolving ~ and environment variables.
///
/// # Errors
///
/// Returns an error if a referenced variable is undefined.
pub fn expand_path(path: PathBuf) -> Result<PathBuf> {
    if let Some(text) = path.to_str() {
        expand_str_path(text)
    } else {
        Ok(path)
    }
}

/// Expand a string path, resolving ~ and environment variables.
///
/// # Errors
///
/// Returns an error if a referenced variable is undefined.
pub fn expand_str_path(text: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(text).context("expanding path")?;
    Ok(PathBuf::from(expanded.to_string()))
}

/// Get the default configuration directory (`XDG_CONFIG_HOME` or fallback).
///
/// # Errors
///
/// Returns an error if neither XDG variables nor a home directory are available.
pub fn default_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        let mut path = PathBuf::from(dir);
        path.push(APP_NAME);
        return Ok(path);
    }

    if let Some(mut dir) = dirs::config_dir() {
        dir.push(APP_NAME);
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_NAME))
        .ok_or_else(|| anyhow!("unable to determine configuration directory"))
}

/// Write the default configuration file to the specified path.
///
/// The active settings are written as TOML, followed by a commented-out
/// `[[profiles]]` sample that can be enabled to describe another project.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {parent:?}"))?;
    }

    let settings =
        toml::to_string_pretty(&AppConfig::default()).context("serializing default config")?;
    let body = format!(
        "# Configuration for {APP_NAME}\n# File: {}\n\n{settings}\n{}",
        path.display(),
        profile_sample()?
    );
    fs::write(path, body).with_context(|| format!("writing config file to {}", path.display()))
}

/// Commented-out custom profile appended to a fresh config file.
fn profile_sample() -> Result<String> {
    #[derive(Serialize)]
    struct Sample<'a> {
        profiles: &'a [Profile],
    }

    let profiles = [example_profile()];
    let toml_body = toml::to_string_pretty(&Sample {
        profiles: &profiles,
    })
    .context("serializing sample profile")?;

    let mut sample = String::from(
        "# Built-in profiles: broker, caf, tenzir. Uncomment and adapt the\n\
         # table below to describe another project.\n",
    );
    for line in toml_body.lines() {
        if line.is_empty() {
            sample.push_str("#\n");
        } else {
            sample.push_str("# ");
            sample.push_str(line);
            sample.push('\n');
        }
    }
    Ok(sample)
}
