//! Scaffolding support for C++ code generators.
//!
//! Given a qualified class name such as `caf::io::basp::header`, this crate
//! computes where the generated header, implementation and unit test belong,
//! how to register them in `CMakeLists.txt`, and which template replacements
//! to apply. Project layouts are described by [`Profile`]s.
//!
//! This crate provides:
//! - Qualified-name validation
//! - Profile-driven path and replacement resolution
//! - Configuration loading and schema generation
//! - Common error types

pub mod clock;
pub mod config;
pub mod error;
pub mod name;
pub mod paths;
pub mod profile;
pub mod registry;
pub mod resolve;
pub mod schema;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, LogLevel, LoggingConfig};
pub use error::{CoreError, Result};
pub use name::QualifiedName;
pub use paths::AppPaths;
pub use profile::{ComponentDescriptor, ComponentSelector, Profile, ReplacementOptions, TestLayout};
pub use registry::{AUTO_PROFILE, ProfileRegistry};
pub use resolve::{CmakeDescriptor, PathSet, ReplacementMap, ReplacementValue, Resolver};
pub use schema::{generate_example_config, generate_schema};

/// Application name used for config directories and environment prefix.
pub const APP_NAME: &str = "classgen";

/// Returns the environment variable prefix for this application.
#[must_use]
pub fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
