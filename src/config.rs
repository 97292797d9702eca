use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edges::DEFAULT_EDGE_TYPE;
use crate::error::{Error, Result};

const LIGHT_BACKGROUND: &str = "#f8fafc";
const LIGHT_COMPONENT_FILL: &str = "#ffffff";
const LIGHT_CAPABILITY_FILL: &str = "#ecfdf5";
const LIGHT_ORIGIN_FILL: &str = "#f5f3ff";
const LIGHT_NODE_STROKE: &str = "#94a3b8";
const LIGHT_NODE_TEXT: &str = "#0f172a";

const DARK_BACKGROUND: &str = "#0f172a";
const DARK_COMPONENT_FILL: &str = "#1e293b";
const DARK_CAPABILITY_FILL: &str = "#064e3b";
const DARK_ORIGIN_FILL: &str = "#2e1065";
const DARK_NODE_STROKE: &str = "#475569";
const DARK_NODE_TEXT: &str = "#f1f5f9";

const BUILTIN_PRESETS: &[&str] = &["light", "dark"];

const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: f32 = 14.0;
const PADDING: f32 = 40.0;

/// How derived edges are requested from the builders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_edge_type")]
    pub edge_type: String,
    #[serde(default)]
    pub classic_scheme: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_edge_id: Option<String>,
}

fn default_edge_type() -> String {
    DEFAULT_EDGE_TYPE.to_string()
}

impl RenderSettings {
    /// Apply command-line flags. Flags that were not given keep the
    /// configured value.
    pub fn apply_overrides(
        &mut self,
        edge_type: Option<&str>,
        classic: bool,
        selected: Option<&str>,
    ) {
        if let Some(edge_type) = edge_type {
            self.edge_type = edge_type.to_string();
        }
        if classic {
            self.classic_scheme = true;
        }
        if let Some(selected) = selected {
            self.selected_edge_id = Some(selected.to_string());
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            edge_type: default_edge_type(),
            classic_scheme: false,
            selected_edge_id: None,
        }
    }
}

/// Colors and spacing for the static preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewStyle {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_component_fill")]
    pub component_fill: String,
    #[serde(default = "default_capability_fill")]
    pub capability_fill: String,
    #[serde(default = "default_origin_fill")]
    pub origin_fill: String,
    #[serde(default = "default_node_stroke")]
    pub node_stroke: String,
    #[serde(default = "default_node_text")]
    pub node_text: String,

    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_padding")]
    pub padding: f32,
}

fn default_background() -> String {
    LIGHT_BACKGROUND.to_string()
}
fn default_component_fill() -> String {
    LIGHT_COMPONENT_FILL.to_string()
}
fn default_capability_fill() -> String {
    LIGHT_CAPABILITY_FILL.to_string()
}
fn default_origin_fill() -> String {
    LIGHT_ORIGIN_FILL.to_string()
}
fn default_node_stroke() -> String {
    LIGHT_NODE_STROKE.to_string()
}
fn default_node_text() -> String {
    LIGHT_NODE_TEXT.to_string()
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_font_size() -> f32 {
    FONT_SIZE
}
fn default_padding() -> f32 {
    PADDING
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self::light()
    }
}

impl PreviewStyle {
    pub fn light() -> Self {
        PreviewStyle {
            background: LIGHT_BACKGROUND.to_string(),
            component_fill: LIGHT_COMPONENT_FILL.to_string(),
            capability_fill: LIGHT_CAPABILITY_FILL.to_string(),
            origin_fill: LIGHT_ORIGIN_FILL.to_string(),
            node_stroke: LIGHT_NODE_STROKE.to_string(),
            node_text: LIGHT_NODE_TEXT.to_string(),

            font_family: FONT_FAMILY.to_string(),
            font_size: FONT_SIZE,
            padding: PADDING,
        }
    }

    pub fn dark() -> Self {
        PreviewStyle {
            background: DARK_BACKGROUND.to_string(),
            component_fill: DARK_COMPONENT_FILL.to_string(),
            capability_fill: DARK_CAPABILITY_FILL.to_string(),
            origin_fill: DARK_ORIGIN_FILL.to_string(),
            node_stroke: DARK_NODE_STROKE.to_string(),
            node_text: DARK_NODE_TEXT.to_string(),
            ..Self::light()
        }
    }

    pub fn from_builtin(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "light" => Ok(Self::light()),
            "dark" => Ok(Self::dark()),
            _ => Err(Error::UnknownPreset {
                name: name.to_string(),
                available: Self::list_builtins().join(", "),
            }),
        }
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_PRESETS.to_vec()
    }
}

/// Settings file shared by both command-line tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub preview: PreviewStyle,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read a config file, trying TOML first and then YAML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match Self::from_toml_str(&content) {
            Ok(config) => Ok(config),
            Err(toml_err) => {
                debug!(path = %path.display(), error = %toml_err, "config is not TOML, trying YAML");
                Self::from_yaml_str(&content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_builtin_accepts_case_insensitive_names() {
        let lower = PreviewStyle::from_builtin("dark").expect("lowercase");
        let upper = PreviewStyle::from_builtin(" Dark ").expect("mixed case");
        assert_eq!(lower, upper);
        assert_eq!(lower.background, DARK_BACKGROUND);
    }

    #[test]
    fn unknown_preset_lists_alternatives() {
        let err = PreviewStyle::from_builtin("neon").expect_err("unknown preset");
        assert!(err.to_string().contains("light, dark"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r##"
[render]
edge_type = "smoothstep"

[preview]
background = "#000000"
"##,
        )
        .expect("parse");

        assert_eq!(config.render.edge_type, "smoothstep");
        assert!(!config.render.classic_scheme);
        assert_eq!(config.preview.background, "#000000");
        assert_eq!(config.preview.component_fill, LIGHT_COMPONENT_FILL);
        assert_eq!(config.preview.font_size, FONT_SIZE);
    }

    #[test]
    fn configured_selection_survives_missing_flag() {
        let mut config = Config::from_toml_str(
            "[render]\nselected_edge_id = \"rel-1\"\nclassic_scheme = true\n",
        )
        .expect("parse");

        config.render.apply_overrides(None, false, None);
        assert_eq!(config.render.selected_edge_id.as_deref(), Some("rel-1"));
        assert!(config.render.classic_scheme);
        assert_eq!(config.render.edge_type, "default");

        config.render.apply_overrides(Some("step"), false, Some("rel-2"));
        assert_eq!(config.render.selected_edge_id.as_deref(), Some("rel-2"));
        assert_eq!(config.render.edge_type, "step");
    }

    #[test]
    fn yaml_config_parses() {
        let config = Config::from_yaml_str("render:\n  classic_scheme: true\n").expect("parse");
        assert!(config.render.classic_scheme);
        assert_eq!(config.render.edge_type, "default");
        assert_eq!(config.preview, PreviewStyle::light());
    }
}
