//! Lookup of built-in and user-defined profiles.

use crate::error::{CoreError, Result};
use crate::name::{SEPARATOR, root_segment};
use crate::profile::Profile;

/// Profile name that picks the profile from the qualified name's root namespace.
pub const AUTO_PROFILE: &str = "auto";

/// The set of profiles available to a run.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<Profile>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// Registry holding only the built-in profiles.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            profiles: Profile::builtins(),
        }
    }

    /// Built-in profiles plus `custom`. A custom profile replaces a built-in
    /// of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProfile`] if a custom profile is
    /// inconsistent or uses the reserved name `auto`.
    pub fn with_custom(custom: impl IntoIterator<Item = Profile>) -> Result<Self> {
        let mut registry = Self::builtin();
        for profile in custom {
            if profile.name == AUTO_PROFILE {
                return Err(CoreError::invalid_profile(
                    AUTO_PROFILE,
                    "the name is reserved for automatic selection",
                ));
            }
            profile.validate()?;
            if let Some(slot) = registry.profiles.iter_mut().find(|p| p.name == profile.name) {
                log::debug!("custom profile `{}` replaces the built-in", profile.name);
                *slot = profile;
            } else {
                log::debug!("registered custom profile `{}`", profile.name);
                registry.profiles.push(profile);
            }
        }
        Ok(registry)
    }

    /// Profile named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProfile`] if no such profile exists.
    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| CoreError::UnknownProfile(name.to_string()))
    }

    /// First profile whose root namespace matches the first segment of `raw`.
    #[must_use]
    pub fn for_qualified_name(&self, raw: &str) -> Option<&Profile> {
        let root = root_segment(raw)?;
        self.profiles.iter().find(|p| p.root_namespace == root)
    }

    /// Resolve a requested profile name, where `auto` (or no name) infers
    /// the profile from `qualified_name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownProfile`] for unknown names and
    /// [`CoreError::InvalidQualifiedName`] if the name has no class segment
    /// or no profile owns its root namespace.
    pub fn select(&self, requested: Option<&str>, qualified_name: &str) -> Result<&Profile> {
        match requested {
            Some(name) if name != AUTO_PROFILE => self.get(name),
            _ if !qualified_name.contains(SEPARATOR) => Err(CoreError::invalid_name(
                qualified_name,
                "qualified name does not contain a valid class name",
            )),
            _ => self.for_qualified_name(qualified_name).ok_or_else(|| {
                CoreError::invalid_name(
                    qualified_name,
                    format!(
                        "no profile handles this root namespace (known: {})",
                        self.root_namespaces().join(", ")
                    ),
                )
            }),
        }
    }

    /// All profiles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    fn root_namespaces(&self) -> Vec<&str> {
        self.profiles
            .iter()
            .map(|p| p.root_namespace.as_str())
            .collect()
    }
}
