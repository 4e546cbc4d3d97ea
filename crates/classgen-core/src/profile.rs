//! Per-project layout conventions.
//!
//! Every supported project family is described by a [`Profile`]: where its
//! headers, sources and unit tests live, how its `CMakeLists.txt` names the
//! source lists, and which sub-namespaces map to which component directory.
//! The resolver is generic over this data.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::is_identifier;

/// A buildable sub-project inside a profile, e.g. `libcaf_io`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComponentDescriptor {
    /// Component name, e.g. `libcaf_io`.
    pub name: String,

    /// Directory relative to the root directory, `/`-separated.
    pub dir: String,

    /// Explicit name of the CMake source-list variable. Derived from the
    /// component name and the profile's suffix when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_var: Option<String>,

    /// Explicit name of the CMake unit-test list variable. Derived like
    /// `source_var` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_var: Option<String>,
}

impl ComponentDescriptor {
    /// Component whose CMake variables are derived from its name.
    pub fn new(name: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            source_var: None,
            test_var: None,
        }
    }

    /// Pin both CMake variable names.
    #[must_use]
    pub fn with_vars(mut self, source_var: impl Into<String>, test_var: impl Into<String>) -> Self {
        self.source_var = Some(source_var.into());
        self.test_var = Some(test_var.into());
        self
    }

    /// Upper-cased component name without its `lib` prefix: `libcaf_io` -> `CAF_IO`.
    #[must_use]
    pub fn var_prefix(&self) -> String {
        self.name
            .strip_prefix("lib")
            .unwrap_or(&self.name)
            .to_uppercase()
    }

    fn source_var_or(&self, suffix: &str) -> String {
        self.source_var
            .clone()
            .unwrap_or_else(|| format!("{}{suffix}", self.var_prefix()))
    }

    fn test_var_or(&self, suffix: &str) -> String {
        self.test_var
            .clone()
            .unwrap_or_else(|| format!("{}{suffix}", self.var_prefix()))
    }
}

/// Routes qualified names starting with `prefix` to `component`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComponentSelector {
    /// Raw string prefix of the qualified name, e.g. `caf::io`.
    pub prefix: String,
    /// Name of the component in the profile's component table.
    pub component: String,
}

impl ComponentSelector {
    /// Create a selector.
    pub fn new(prefix: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            component: component.into(),
        }
    }
}

/// Where unit tests live and how they are registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TestLayout {
    /// Test directory inside the component, `test` or `tests`.
    pub dir: String,

    /// Extra directory between the test directory and the inner namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdir: Option<String>,

    /// Tests are listed in `<dir>/CMakeLists.txt` instead of the component's
    /// build file; test paths are then relative to `<dir>`.
    #[serde(default)]
    pub separate_build_file: bool,

    /// Emit a test-suite entry next to the test path.
    #[serde(default)]
    pub suite_entry: bool,
}

/// Optional keys added to the replacement map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReplacementOptions {
    /// Emit `qualified-class` (dotted name below the root namespace).
    pub qualified_class: bool,

    /// Emit `year`.
    pub year: bool,

    /// Emit `header-guard` with this suffix, e.g. `_HPP`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_guard_suffix: Option<String>,
}

/// Layout conventions of one project family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Profile {
    /// Profile name used on the command line and in the config file.
    pub name: String,

    /// Required first segment of every qualified name.
    pub root_namespace: String,

    /// Header file extension without the dot.
    pub header_extension: String,

    /// Source and test file extension without the dot.
    pub source_extension: String,

    /// Directory between the component directory and the header tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_dir: Option<String>,

    /// Directory holding implementation files inside a component.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Unit test layout.
    pub tests: TestLayout,

    /// Suffix for derived source-list variable names.
    #[serde(default = "default_source_var_suffix")]
    pub source_var_suffix: String,

    /// Suffix for derived test-list variable names.
    #[serde(default = "default_test_var_suffix")]
    pub test_var_suffix: String,

    /// Every component of the project.
    pub components: Vec<ComponentDescriptor>,

    /// Component used when no selector matches.
    pub default_component: String,

    /// Selectors in priority order; the first match wins.
    #[serde(default)]
    pub selectors: Vec<ComponentSelector>,

    /// Optional replacement keys.
    #[serde(default)]
    pub replacements: ReplacementOptions,
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_source_var_suffix() -> String {
    "_SOURCES".to_string()
}

fn default_test_var_suffix() -> String {
    "_TEST_SOURCES".to_string()
}

impl Profile {
    /// Layout of the Broker repository.
    #[must_use]
    pub fn broker() -> Self {
        Self {
            name: "broker".to_string(),
            root_namespace: "broker".to_string(),
            header_extension: "hh".to_string(),
            source_extension: "cc".to_string(),
            include_dir: Some("include".to_string()),
            source_dir: default_source_dir(),
            tests: TestLayout {
                dir: "tests".to_string(),
                subdir: Some("cpp".to_string()),
                separate_build_file: true,
                suite_entry: true,
            },
            source_var_suffix: default_source_var_suffix(),
            test_var_suffix: default_test_var_suffix(),
            components: vec![ComponentDescriptor::new("broker", "broker").with_vars("BROKER_SRC", "tests")],
            default_component: "broker".to_string(),
            selectors: Vec::new(),
            replacements: ReplacementOptions {
                qualified_class: true,
                year: true,
                header_guard_suffix: None,
            },
        }
    }

    /// Layout of the C++ Actor Framework repository, incubator included.
    #[must_use]
    pub fn caf() -> Self {
        Self {
            name: "caf".to_string(),
            root_namespace: "caf".to_string(),
            header_extension: "hpp".to_string(),
            source_extension: "cpp".to_string(),
            include_dir: None,
            source_dir: default_source_dir(),
            tests: TestLayout {
                dir: "test".to_string(),
                subdir: None,
                separate_build_file: false,
                suite_entry: false,
            },
            source_var_suffix: default_source_var_suffix(),
            test_var_suffix: default_test_var_suffix(),
            components: vec![
                ComponentDescriptor::new("libcaf_core", "caf/libcaf_core"),
                ComponentDescriptor::new("libcaf_io", "caf/libcaf_io"),
                ComponentDescriptor::new("libcaf_openssl", "caf/libcaf_openssl"),
                ComponentDescriptor::new("libcaf_bb", "incubator/libcaf_bb"),
                ComponentDescriptor::new("libcaf_net", "incubator/libcaf_net"),
            ],
            default_component: "libcaf_core".to_string(),
            selectors: vec![
                ComponentSelector::new("caf::io", "libcaf_io"),
                ComponentSelector::new("caf::openssl", "libcaf_openssl"),
                ComponentSelector::new("caf::bb", "libcaf_bb"),
                ComponentSelector::new("caf::net", "libcaf_net"),
            ],
            replacements: ReplacementOptions {
                qualified_class: true,
                year: true,
                header_guard_suffix: None,
            },
        }
    }

    /// Layout of the Tenzir `core` tree.
    #[must_use]
    pub fn tenzir() -> Self {
        Self {
            name: "tenzir".to_string(),
            root_namespace: "tenzir".to_string(),
            header_extension: "hpp".to_string(),
            source_extension: "cpp".to_string(),
            include_dir: None,
            source_dir: default_source_dir(),
            tests: TestLayout {
                dir: "test".to_string(),
                subdir: None,
                separate_build_file: false,
                suite_entry: false,
            },
            source_var_suffix: default_source_var_suffix(),
            test_var_suffix: default_test_var_suffix(),
            components: vec![
                ComponentDescriptor::new("libtenzir", "core").with_vars("libtenzir_sources", "tests"),
            ],
            default_component: "libtenzir".to_string(),
            selectors: Vec::new(),
            replacements: ReplacementOptions {
                qualified_class: false,
                year: false,
                header_guard_suffix: Some("_HPP".to_string()),
            },
        }
    }

    /// Every built-in profile.
    #[must_use]
    pub fn builtins() -> Vec<Self> {
        vec![Self::broker(), Self::caf(), Self::tenzir()]
    }

    /// Look up a component by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Pick the component for `qualified_name` using the selectors in order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProfile`] if the matched or default
    /// component is missing from the component table.
    pub fn select_component(&self, qualified_name: &str) -> Result<&ComponentDescriptor> {
        let wanted = self
            .selectors
            .iter()
            .find(|s| qualified_name.starts_with(&s.prefix))
            .map_or(self.default_component.as_str(), |s| s.component.as_str());
        self.component(wanted).ok_or_else(|| {
            CoreError::invalid_profile(&self.name, format!("component `{wanted}` is not defined"))
        })
    }

    /// Source-list variable for `component`.
    #[must_use]
    pub fn source_var(&self, component: &ComponentDescriptor) -> String {
        component.source_var_or(&self.source_var_suffix)
    }

    /// Test-list variable for `component`.
    #[must_use]
    pub fn test_var(&self, component: &ComponentDescriptor) -> String {
        component.test_var_or(&self.test_var_suffix)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProfile`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(CoreError::invalid_profile(&self.name, reason));

        if self.name.trim().is_empty() {
            return fail("profile name is empty".to_string());
        }
        if !is_identifier(&self.root_namespace) {
            return fail(format!(
                "root namespace `{}` must be a single identifier",
                self.root_namespace
            ));
        }
        if self.header_extension.is_empty() || self.source_extension.is_empty() {
            return fail("file extensions must not be empty".to_string());
        }
        if self.tests.dir.is_empty() {
            return fail("test directory must not be empty".to_string());
        }
        if self.components.is_empty() {
            return fail("no components defined".to_string());
        }

        let mut seen = HashSet::new();
        for component in &self.components {
            if !seen.insert(component.name.as_str()) {
                return fail(format!("component `{}` is defined twice", component.name));
            }
        }
        if !seen.contains(self.default_component.as_str()) {
            return fail(format!(
                "default component `{}` is not defined",
                self.default_component
            ));
        }
        for selector in &self.selectors {
            if !seen.contains(selector.component.as_str()) {
                return fail(format!(
                    "selector `{}` targets undefined component `{}`",
                    selector.prefix, selector.component
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for profile in Profile::builtins() {
            profile.validate().unwrap();
        }
    }

    #[test]
    fn test_caf_selection_order() {
        let caf = Profile::caf();
        assert_eq!(caf.select_component("caf::io::basp::header").unwrap().name, "libcaf_io");
        assert_eq!(caf.select_component("caf::openssl::manager").unwrap().name, "libcaf_openssl");
        assert_eq!(caf.select_component("caf::bb::stream_reader").unwrap().name, "libcaf_bb");
        assert_eq!(caf.select_component("caf::net::socket").unwrap().name, "libcaf_net");
        assert_eq!(caf.select_component("caf::actor").unwrap().name, "libcaf_core");
    }

    #[test]
    fn test_selection_uses_raw_string_prefix() {
        // `caf::iostream` shares the `caf::io` prefix.
        let caf = Profile::caf();
        assert_eq!(caf.select_component("caf::iostream::Foo").unwrap().name, "libcaf_io");
    }

    #[test]
    fn test_first_declared_selector_wins() {
        let mut profile = Profile::caf();
        profile.selectors = vec![
            ComponentSelector::new("caf::net", "libcaf_net"),
            ComponentSelector::new("caf::net::http", "libcaf_io"),
        ];
        assert_eq!(
            profile.select_component("caf::net::http::server").unwrap().name,
            "libcaf_net"
        );

        profile.selectors.reverse();
        assert_eq!(
            profile.select_component("caf::net::http::server").unwrap().name,
            "libcaf_io"
        );
    }

    #[test]
    fn test_derived_cmake_vars() {
        let caf = Profile::caf();
        let io = caf.component("libcaf_io").unwrap();
        assert_eq!(io.var_prefix(), "CAF_IO");
        assert_eq!(caf.source_var(io), "CAF_IO_SOURCES");
        assert_eq!(caf.test_var(io), "CAF_IO_TEST_SOURCES");
    }

    #[test]
    fn test_explicit_cmake_vars() {
        let tenzir = Profile::tenzir();
        let core = tenzir.component("libtenzir").unwrap();
        assert_eq!(tenzir.source_var(core), "libtenzir_sources");
        assert_eq!(tenzir.test_var(core), "tests");
    }

    #[test]
    fn test_broker_pins_both_cmake_vars() {
        let broker = Profile::broker();
        assert_eq!(broker.source_var_suffix, "_SOURCES");
        let component = broker.component("broker").unwrap();
        assert_eq!(broker.source_var(component), "BROKER_SRC");
        assert_eq!(broker.test_var(component), "tests");
    }

    #[test]
    fn test_validate_rejects_missing_default() {
        let mut profile = Profile::caf();
        profile.default_component = "libcaf_gpu".to_string();
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("default component `libcaf_gpu`"));
    }

    #[test]
    fn test_validate_rejects_dangling_selector() {
        let mut profile = Profile::tenzir();
        profile.selectors.push(ComponentSelector::new("tenzir::plugins", "plugins"));
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("undefined component `plugins`"));
    }

    #[test]
    fn test_validate_rejects_nested_root() {
        let mut profile = Profile::broker();
        profile.root_namespace = "broker::detail".to_string();
        assert!(profile.validate().is_err());

        profile.root_namespace = "broker/detail".to_string();
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("must be a single identifier"));
    }

    #[test]
    fn test_validate_rejects_duplicate_component() {
        let mut profile = Profile::broker();
        profile.components.push(ComponentDescriptor::new("broker", "other"));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_profile_from_toml() {
        let profile: Profile = toml::from_str(
            r#"
            name = "acme"
            root_namespace = "acme"
            header_extension = "h"
            source_extension = "cxx"
            default_component = "libacme"

            [tests]
            dir = "tests"

            [[components]]
            name = "libacme"
            dir = "libacme"
            "#,
        )
        .unwrap();
        profile.validate().unwrap();
        assert_eq!(profile.source_dir, "src");
        assert_eq!(profile.source_var(&profile.components[0]), "ACME_SOURCES");
        assert!(profile.selectors.is_empty());
        assert_eq!(profile.replacements, ReplacementOptions::default());
    }
}
