//! Normalised control descriptors.
//!
//! Every control carries a mandatory kind, decided once at construction,
//! and a state cell holding the kind's metadata (range, sticky unit,
//! options, colour parts) together with the value currently shown.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::color::{self, Rgba};
use crate::config::ControlConfig;
use crate::deduce::{self, ControlKind, NumberRange};
use crate::errors::PanelResult;
use crate::path::{Path, get_nested_value};
use crate::value::{NumericValue, display_string, format_number, is_nullish, is_truthy};

/// Select controls switch from a button group to a dropdown past these.
pub const BUTTON_GROUP_MAX_OPTIONS: usize = 3;
pub const BUTTON_GROUP_MAX_CHARS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectPresentation {
    ButtonGroup,
    Dropdown,
}

impl SelectPresentation {
    pub fn for_options(options: &[String]) -> Self {
        let total_chars: usize = options.iter().map(|o| o.chars().count()).sum();
        if options.len() > BUTTON_GROUP_MAX_OPTIONS || total_chars > BUTTON_GROUP_MAX_CHARS {
            SelectPresentation::Dropdown
        } else {
            SelectPresentation::ButtonGroup
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanState {
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberState {
    pub range: NumberRange,
    /// Unit parsed from the initial value; reattached to every write.
    pub unit: String,
    pub current: Option<f64>,
}

impl NumberState {
    /// Where the slider sits; the middle of the range while there is no value.
    pub fn slider_position(&self) -> f64 {
        self.current.unwrap_or_else(|| self.range.midpoint())
    }

    pub fn display(&self) -> String {
        match self.current {
            Some(number) => format!("{}{}", format_number(number), self.unit),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorState {
    /// Base colour as `#rrggbb`, without opacity.
    pub hex: String,
    /// 0 ..= 100
    pub opacity: f64,
    pub label: String,
}

impl ColorState {
    fn placeholder() -> Self {
        Self {
            hex: color::PLACEHOLDER_HEX.to_string(),
            opacity: 100.0,
            label: color::PLACEHOLDER_LABEL.to_string(),
        }
    }

    fn from_rgba(rgba: Rgba) -> Self {
        let hex = rgba.to_hex(false);
        Self {
            label: hex.clone(),
            hex,
            opacity: rgba.opacity_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectState {
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub presentation: SelectPresentation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextState {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlState {
    Boolean(BooleanState),
    Number(NumberState),
    Color(ColorState),
    Select(SelectState),
    Text(TextState),
}

impl ControlState {
    pub fn kind(&self) -> ControlKind {
        match self {
            ControlState::Boolean(_) => ControlKind::Boolean,
            ControlState::Number(_) => ControlKind::Number,
            ControlState::Color(_) => ControlKind::Color,
            ControlState::Select(_) => ControlKind::Select,
            ControlState::Text(_) => ControlKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlDescriptor {
    pub id: Uuid,
    /// Path as written in the panel definition.
    pub path: String,
    #[serde(skip)]
    pub parsed_path: Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Set while the bound value is absent or unusable; cleared by the first
    /// edit.
    pub nullish: bool,
    pub state: ControlState,
}

impl ControlDescriptor {
    /// Build a descriptor from a loose definition. A missing value is read
    /// from the live options first and from the product defaults second; a
    /// missing kind is deduced from that value and the path.
    pub fn from_config(
        config: &ControlConfig,
        live: Option<&Value>,
        defaults: Option<&Value>,
    ) -> PanelResult<Self> {
        let parsed_path = Path::parse(&config.path)?;
        let path = config.path.as_str();

        let value = config
            .value
            .clone()
            .filter(|v| !v.is_null())
            .or_else(|| live.and_then(|root| get_nested_value(root, &parsed_path)).cloned())
            .or_else(|| defaults.and_then(|root| get_nested_value(root, &parsed_path)).cloned());

        let kind = config
            .kind
            .and_then(|k| k.control_kind())
            .unwrap_or_else(|| deduce::deduce_kind(path, value.as_ref(), config.options.is_some()));

        let mut nullish = is_nullish(value.as_ref());

        let state = match kind {
            ControlKind::Boolean => ControlState::Boolean(BooleanState {
                checked: value.as_ref().is_some_and(is_truthy),
            }),
            ControlKind::Number => {
                let numeric = value.as_ref().and_then(NumericValue::parse);
                let unit = numeric.as_ref().map(|n| n.unit.clone()).unwrap_or_default();
                let current = numeric.as_ref().map(|n| n.number);
                ControlState::Number(NumberState {
                    range: NumberRange::deduce(
                        path, config.min, config.max, config.step, current, &unit,
                    ),
                    unit,
                    current,
                })
            }
            ControlKind::Color => {
                let parsed = value.as_ref().and_then(Value::as_str).and_then(Rgba::parse);
                match (&value, parsed) {
                    (Some(_), Some(rgba)) => ControlState::Color(ColorState::from_rgba(rgba)),
                    (Some(invalid), None) => {
                        log::warn!("Invalid color value for path \"{}\": {}", path, invalid);
                        nullish = true;
                        ControlState::Color(ColorState::placeholder())
                    }
                    (None, _) => ControlState::Color(ColorState::placeholder()),
                }
            }
            ControlKind::Select => {
                let mut options = config.options.clone().unwrap_or_else(|| {
                    deduce::suffix_options(path)
                        .map(|table| table.iter().map(|o| o.to_string()).collect())
                        .unwrap_or_default()
                });
                let selected = value.as_ref().map(display_string);
                if let Some(current) = &selected {
                    if !options.contains(current) {
                        options.insert(0, current.clone());
                    }
                }
                let presentation = SelectPresentation::for_options(&options);
                ControlState::Select(SelectState {
                    options,
                    selected,
                    presentation,
                })
            }
            ControlKind::Text => ControlState::Text(TextState {
                text: value
                    .as_ref()
                    .filter(|v| is_truthy(v))
                    .map(display_string)
                    .unwrap_or_default(),
            }),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            path: config.path.clone(),
            parsed_path,
            label: config.label.clone(),
            nullish,
            state,
        })
    }

    pub fn kind(&self) -> ControlKind {
        self.state.kind()
    }

    /// Label shown next to the control; the path when none was given.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDescriptor {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub collapsed: bool,
    pub collapsible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub children: Vec<Descriptor>,
}

impl GroupDescriptor {
    /// Flip the collapsed flag. Groups that are not collapsible stay put.
    pub fn toggle(&mut self) -> bool {
        if self.collapsible {
            self.collapsed = !self.collapsed;
        }
        self.collapsed
    }
}

/// One slot of the panel layout, in definition order. Controls are stored in
/// the panel and referenced here by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Descriptor {
    Control { id: Uuid },
    Separator,
    Group(GroupDescriptor),
}
