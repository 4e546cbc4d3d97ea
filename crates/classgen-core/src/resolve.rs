//! Output locations and template replacements for a qualified class name.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result};
use crate::name::{QualifiedName, SEPARATOR};
use crate::profile::{ComponentDescriptor, Profile};

/// Name of the build file inside a component or test directory.
pub const BUILD_FILE: &str = "CMakeLists.txt";

/// Placeholder names of the replacement map.
pub mod keys {
    /// Unqualified class name.
    pub const CLASS: &str = "class";
    /// Namespace path joined with `::`.
    pub const NAMESPACE: &str = "namespace";
    /// One `namespace <seg> {` line per segment.
    pub const NAMESPACE_OPEN: &str = "namespace-open";
    /// One `} // namespace <seg>` line per segment, innermost first.
    pub const NAMESPACE_CLOSE: &str = "namespace-close";
    /// Include path of the header.
    pub const HEADER: &str = "hpp";
    /// Dotted name below the root namespace.
    pub const QUALIFIED_CLASS: &str = "qualified-class";
    /// Current calendar year.
    pub const YEAR: &str = "year";
    /// Include guard token.
    pub const HEADER_GUARD: &str = "header-guard";
}

/// Where the build-file editor registers the new files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmakeDescriptor {
    /// Build file listing the component's sources.
    pub file: PathBuf,
    /// Source-list variable, e.g. `CAF_IO_SOURCES`.
    pub source_var: String,
    /// Line prefix opening the source list, e.g. `set(CAF_IO_SOURCES`.
    pub source_marker: String,
    /// Source path relative to the component directory.
    pub source_path: PathBuf,
    /// Build file listing the unit tests.
    pub test_file: PathBuf,
    /// Test-list variable.
    pub test_var: String,
    /// Line prefix opening the test list.
    pub test_marker: String,
    /// Test path relative to the directory of `test_file`.
    pub test_path: PathBuf,
    /// Test-suite entry, for profiles that register suites separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_suite: Option<PathBuf>,
}

/// Absolute locations of the files generated for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSet {
    /// Component the class belongs to.
    pub component: String,
    /// Header file.
    pub header: PathBuf,
    /// Implementation file.
    pub source: PathBuf,
    /// Unit test file.
    pub test: PathBuf,
    /// Build-file registration details.
    pub cmake: CmakeDescriptor,
}

/// Value substituted for a template placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplacementValue {
    /// Verbatim text.
    Text(String),
    /// Integer such as the year.
    Integer(i64),
}

impl ReplacementValue {
    /// The text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Integer(_) => None,
        }
    }
}

impl fmt::Display for ReplacementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for ReplacementValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ReplacementValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<i32> for ReplacementValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// Placeholder name to substitution value, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReplacementMap(BTreeMap<String, ReplacementValue>);

impl ReplacementMap {
    fn insert(&mut self, key: &str, value: impl Into<ReplacementValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ReplacementValue> {
        self.0.get(key)
    }

    /// Text value for `key`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ReplacementValue::as_text)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReplacementValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves qualified names against one [`Profile`].
#[derive(Debug)]
pub struct Resolver {
    profile: Profile,
    clock: Box<dyn Clock>,
}

impl Resolver {
    /// Resolver reading the year from the system clock.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self::with_clock(profile, SystemClock)
    }

    /// Resolver reading the year from `clock`.
    #[must_use]
    pub fn with_clock(profile: Profile, clock: impl Clock + 'static) -> Self {
        Self {
            profile,
            clock: Box::new(clock),
        }
    }

    /// The profile in use.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Validate `raw` against the profile's root namespace.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQualifiedName`] for malformed names.
    pub fn parse(&self, raw: &str) -> Result<QualifiedName> {
        QualifiedName::parse(raw, &self.profile.root_namespace)
    }

    /// Compute where the header, source and test of `qualified_name` go.
    ///
    /// `component` overrides prefix-based component selection.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQualifiedName`] for malformed names and
    /// [`CoreError::UnknownComponent`] if `component` is not in the profile.
    pub fn resolve_paths(
        &self,
        root_dir: &Path,
        qualified_name: &str,
        component: Option<&str>,
    ) -> Result<PathSet> {
        let name = self.parse(qualified_name)?;
        let component = self.component_for(qualified_name, component)?;
        debug!(
            "{name}: component {} in {}",
            component.name, component.dir
        );

        let profile = &self.profile;
        let class = name.class_name();
        let source_file = format!("{class}.{}", profile.source_extension);

        let mut component_dir = root_dir.to_path_buf();
        push_rel(&mut component_dir, &component.dir);

        let mut header = component_dir.clone();
        if let Some(include_dir) = &profile.include_dir {
            push_rel(&mut header, include_dir);
        }
        header.extend(name.namespace());
        header.push(format!("{class}.{}", profile.header_extension));

        let mut source_path = PathBuf::new();
        push_rel(&mut source_path, &profile.source_dir);
        source_path.extend(name.inner_namespace());
        source_path.push(&source_file);

        // Relative to the test directory.
        let mut test_rel = PathBuf::new();
        if let Some(subdir) = &profile.tests.subdir {
            push_rel(&mut test_rel, subdir);
        }
        test_rel.extend(name.inner_namespace());
        test_rel.push(&source_file);

        let mut test_dir = component_dir.clone();
        push_rel(&mut test_dir, &profile.tests.dir);

        let (test_file, test_path) = if profile.tests.separate_build_file {
            (test_dir.join(BUILD_FILE), test_rel.clone())
        } else {
            let mut rel = PathBuf::new();
            push_rel(&mut rel, &profile.tests.dir);
            rel.push(&test_rel);
            (component_dir.join(BUILD_FILE), rel)
        };

        let source_var = profile.source_var(component);
        let test_var = profile.test_var(component);
        let paths = PathSet {
            component: component.name.clone(),
            header,
            source: component_dir.join(&source_path),
            test: test_dir.join(&test_rel),
            cmake: CmakeDescriptor {
                file: component_dir.join(BUILD_FILE),
                source_marker: marker(&source_var),
                source_var,
                source_path,
                test_file,
                test_marker: marker(&test_var),
                test_var,
                test_suite: profile.tests.suite_entry.then(|| test_path.clone()),
                test_path,
            },
        };
        trace!("{name}: {paths:#?}");
        Ok(paths)
    }

    /// Build the template substitutions for `qualified_name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQualifiedName`] for malformed names.
    pub fn resolve_replacements(&self, qualified_name: &str) -> Result<ReplacementMap> {
        let name = self.parse(qualified_name)?;
        let profile = &self.profile;
        let namespace = name.namespace();

        let mut map = ReplacementMap::default();
        map.insert(keys::CLASS, name.class_name());
        map.insert(keys::NAMESPACE, namespace.join(SEPARATOR));
        map.insert(keys::NAMESPACE_OPEN, namespace_open(namespace));
        map.insert(keys::NAMESPACE_CLOSE, namespace_close(namespace));
        map.insert(
            keys::HEADER,
            format!("{}.{}", name.segments().join("/"), profile.header_extension),
        );

        let options = &profile.replacements;
        if options.qualified_class {
            map.insert(keys::QUALIFIED_CLASS, name.dotted());
        }
        if options.year {
            map.insert(keys::YEAR, self.clock.year());
        }
        if let Some(suffix) = &options.header_guard_suffix {
            map.insert(keys::HEADER_GUARD, header_guard(&name, suffix));
        }

        trace!("{name}: {} replacements", map.len());
        Ok(map)
    }

    fn component_for(
        &self,
        qualified_name: &str,
        explicit: Option<&str>,
    ) -> Result<&ComponentDescriptor> {
        match explicit {
            Some(wanted) => self
                .profile
                .component(wanted)
                .ok_or_else(|| CoreError::UnknownComponent {
                    profile: self.profile.name.clone(),
                    component: wanted.to_string(),
                }),
            None => self.profile.select_component(qualified_name),
        }
    }
}

fn push_rel(path: &mut PathBuf, rel: &str) {
    path.extend(rel.split('/').filter(|part| !part.is_empty()));
}

fn marker(var: &str) -> String {
    format!("set({var}")
}

fn namespace_open(namespace: &[String]) -> String {
    namespace
        .iter()
        .map(|segment| format!("namespace {segment} {{"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn namespace_close(namespace: &[String]) -> String {
    namespace
        .iter()
        .rev()
        .map(|segment| format!("}} // namespace {segment}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn header_guard(name: &QualifiedName, suffix: &str) -> String {
    let token = name
        .segments()
        .iter()
        .map(|segment| segment.to_uppercase())
        .collect::<Vec<_>>()
        .join("_");
    format!("{token}{suffix}")
}
