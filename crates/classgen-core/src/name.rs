//! Parsing and validation of `::`-separated C++ qualified names.

use std::fmt;

use crate::error::{CoreError, Result};

/// Separator between namespace segments.
pub const SEPARATOR: &str = "::";

/// A validated qualified name such as `caf::io::basp::header`.
///
/// Holds at least two segments, each a C++ identifier. The first segment is the project's
/// root namespace and the last one is the class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Parse `raw`, requiring it to live inside the `root` namespace.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQualifiedName`] if `raw` does not start with
    /// `<root>::`, has fewer than two segments, or contains a segment that is
    /// empty or not an identifier.
    pub fn parse(raw: &str, root: &str) -> Result<Self> {
        let required = format!("{root}{SEPARATOR}");
        if !raw.starts_with(&required) {
            return Err(CoreError::invalid_name(
                raw,
                format!("qualified name must start with \"{required}\""),
            ));
        }

        let segments: Vec<String> = raw.split(SEPARATOR).map(str::to_string).collect();
        if segments.len() < 2 {
            return Err(CoreError::invalid_name(
                raw,
                "qualified name does not contain a valid class name",
            ));
        }
        if let Some(pos) = segments.iter().position(String::is_empty) {
            let reason = if pos + 1 == segments.len() {
                "qualified name does not contain a valid class name".to_string()
            } else {
                format!("segment {} is empty", pos + 1)
            };
            return Err(CoreError::invalid_name(raw, reason));
        }
        if let Some(pos) = segments.iter().position(|s| !is_identifier(s)) {
            return Err(CoreError::invalid_name(
                raw,
                format!("segment {} (\"{}\") is not an identifier", pos + 1, segments[pos]),
            ));
        }

        Ok(Self { segments })
    }

    /// First segment, e.g. `caf`.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Unqualified class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// All namespace segments, outermost first, including the root.
    #[must_use]
    pub fn namespace(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Namespace segments below the root namespace.
    #[must_use]
    pub fn inner_namespace(&self) -> &[String] {
        &self.segments[1..self.segments.len() - 1]
    }

    /// Every segment, class name included.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Inner namespace and class joined with dots, e.g. `io.basp.header`.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.segments[1..].join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(SEPARATOR))
    }
}

/// Whether `segment` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Return the root namespace of `raw` without validating the rest.
///
/// Used to pick a profile before the name is checked against it.
#[must_use]
pub fn root_segment(raw: &str) -> Option<&str> {
    raw.split_once(SEPARATOR)
        .map(|(root, _)| root)
        .filter(|root| !root.is_empty())
}
