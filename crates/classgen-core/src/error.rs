//! Error types for the core library.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The qualified name is missing the required root namespace, has fewer
    /// than two segments, or contains a segment that is not an identifier.
    #[error("invalid qualified name `{name}`: {reason}")]
    InvalidQualifiedName {
        /// The rejected input.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An explicitly requested component is not part of the profile.
    #[error("profile `{profile}` has no component named `{component}`")]
    UnknownComponent {
        /// Profile that was searched.
        profile: String,
        /// Requested component name.
        component: String,
    },

    /// No profile with the requested name is registered.
    #[error("unknown profile `{0}`")]
    UnknownProfile(String),

    /// A profile definition is internally inconsistent.
    #[error("invalid profile `{profile}`: {reason}")]
    InvalidProfile {
        /// Name of the offending profile.
        profile: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl CoreError {
    /// Create an `InvalidQualifiedName` error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQualifiedName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an `InvalidProfile` error.
    pub fn invalid_profile(profile: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            profile: profile.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;
