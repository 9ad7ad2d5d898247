//! Configuration file (elements.toml).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

/// Framework used to build renderables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    #[default]
    Preact,
    React,
    Vue,
}

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Per-element settings keyed by tag name
    #[serde(default)]
    pub elements: BTreeMap<String, ElementConfig>,
}

/// Settings for one custom element.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ElementConfig {
    /// Adapter used to mount the element
    pub adapter: Option<AdapterKind>,

    /// Component export name (derived from the tag when absent)
    pub component: Option<String>,

    /// Attributes mapped to props
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl Config {
    /// Settings for `tag`, or defaults when it is not configured.
    pub fn element(&self, tag: &str) -> ElementConfig {
        self.elements
            .get(&tag.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    config.elements = config
        .elements
        .into_iter()
        .map(|(tag, element)| (tag.to_lowercase(), element))
        .collect();

    tracing::debug!(
        "Loaded {} element(s) from {}",
        config.elements.len(),
        path.display()
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("elements.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn loads_element_settings() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("elements.toml");
        fs::write(
            &path,
            r#"
[elements.My-Card]
adapter = "vue"
component = "Card"
attributes = ["title", "sub-title"]

[elements.plain-tag]
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(
            config.element("my-card"),
            ElementConfig {
                adapter: Some(AdapterKind::Vue),
                component: Some("Card".to_string()),
                attributes: vec!["title".to_string(), "sub-title".to_string()],
            }
        );
        assert_eq!(config.element("PLAIN-TAG"), ElementConfig::default());
        assert_eq!(config.element("unknown"), ElementConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("elements.toml");
        fs::write(&path, "[elements.card]\nadapter = \"svelte\"\n").unwrap();

        let err = load_config(&path).unwrap_err();

        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
