//! Loose panel definitions as they arrive from JSON configuration or from
//! the markup adapter. Everything here is optional; `Panel::new` normalises
//! it into descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::deduce::ControlKind;

/// `type` field of a control definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    Boolean,
    Number,
    Color,
    // Older panel definitions call the select control "array-of-strings".
    #[serde(alias = "array-of-strings")]
    Select,
    Text,
    Separator,
}

impl ConfigKind {
    pub fn from_name(name: &str) -> Option<ConfigKind> {
        match name.to_lowercase().as_str() {
            "boolean" => Some(ConfigKind::Boolean),
            "number" => Some(ConfigKind::Number),
            "color" => Some(ConfigKind::Color),
            "select" | "array-of-strings" => Some(ConfigKind::Select),
            "text" => Some(ConfigKind::Text),
            "separator" => Some(ConfigKind::Separator),
            _ => None,
        }
    }

    pub fn control_kind(&self) -> Option<ControlKind> {
        match self {
            ConfigKind::Boolean => Some(ControlKind::Boolean),
            ConfigKind::Number => Some(ControlKind::Number),
            ConfigKind::Color => Some(ControlKind::Color),
            ConfigKind::Select => Some(ControlKind::Select),
            ConfigKind::Text => Some(ControlKind::Text),
            ConfigKind::Separator => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConfigKind>,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl ControlConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn separator() -> Self {
        Self {
            kind: Some(ConfigKind::Separator),
            ..Default::default()
        }
    }

    pub fn is_separator(&self) -> bool {
        self.kind == Some(ConfigKind::Separator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub collapsible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub controls: Vec<ConfigItem>,
}

impl GroupConfig {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            description: None,
            collapsed: false,
            collapsible: false,
            class_name: None,
            controls: Vec::new(),
        }
    }
}

/// One entry of a panel definition. Groups are recognised by their
/// `group` title and `controls` list; anything else is a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigItem {
    Group(GroupConfig),
    Control(ControlConfig),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Selector naming the target; only the markup adapter resolves it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub controls: Vec<ConfigItem>,
}

impl PanelConfig {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}
