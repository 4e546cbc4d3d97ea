//! JSON schema and example configuration generation.

use anyhow::{Context, Result};
use schemars::Schema;
use schemars::generate::SchemaSettings;
use serde_json::json;

use crate::profile::{ComponentDescriptor, ComponentSelector, Profile};
use crate::{APP_NAME, AppConfig};

/// Generate the JSON schema for [`AppConfig`].
///
/// # Errors
///
/// Returns an error if the schema cannot be serialized.
pub fn generate_schema(repo_url: &str) -> Result<String> {
    // Draft-07 for TOML editor support.
    let settings = SchemaSettings::draft07();
    let generator = settings.into_generator();
    let mut schema: Schema = generator.into_root_schema_for::<AppConfig>();

    schema.insert(
        "$id".to_string(),
        json!(format!("{repo_url}/schemas/config.schema.json")),
    );
    schema.insert(
        "title".to_string(),
        json!(format!("{APP_NAME} configuration")),
    );

    if let Some(props) = schema.get_mut("properties")
        && let Some(props_obj) = props.as_object_mut()
    {
        props_obj.insert(
            "$schema".to_string(),
            json!({
                "type": "string",
                "description": "JSON Schema reference for editor support"
            }),
        );
    }

    serde_json::to_string_pretty(&schema).context("serializing JSON schema")
}

/// Generate an example TOML configuration with one custom profile.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn generate_example_config() -> Result<String> {
    let config = AppConfig {
        profiles: vec![example_profile()],
        ..AppConfig::default()
    };
    let toml_body =
        toml::to_string_pretty(&config).context("serializing example config to TOML")?;

    let mut output = format!(
        "# Configuration for {APP_NAME}.\n\
         # Copy this file to $XDG_CONFIG_HOME/{APP_NAME}/config.toml and adjust as needed.\n\n"
    );
    output.push_str(&toml_body);
    Ok(output)
}

/// A small two-component project used in generated config samples.
pub(crate) fn example_profile() -> Profile {
    let mut profile = Profile::caf();
    profile.name = "acme".to_string();
    profile.root_namespace = "acme".to_string();
    profile.components = vec![
        ComponentDescriptor::new("libacme_core", "libacme_core"),
        ComponentDescriptor::new("libacme_net", "libacme_net"),
    ];
    profile.default_component = "libacme_core".to_string();
    profile.selectors = vec![ComponentSelector::new("acme::net", "libacme_net")];
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO_URL: &str = "https://github.com/byteowlz/classgen";

    #[test]
    fn test_schema_generation() {
        let schema = generate_schema(REPO_URL).expect("schema generation failed");
        assert!(schema.contains("\"title\""));
        assert!(schema.contains("classgen configuration"));
        assert!(schema.contains("\"$schema\""));
        assert!(schema.contains("root_namespace"));
    }

    #[test]
    fn test_example_config_round_trips() {
        let text = generate_example_config().expect("config generation failed");
        assert!(text.contains("[logging]"));
        assert!(text.contains("[[profiles]]"));

        let parsed: AppConfig = toml::from_str(&text).unwrap();
        let registry = parsed.registry().unwrap();
        assert_eq!(registry.select(None, "acme::net::Socket").unwrap().name, "acme");
    }
}
