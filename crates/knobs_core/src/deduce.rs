//! Control kind, range and step deduction from a raw value and its path.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Boolean,
    Number,
    Color,
    Select,
    Text,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::Boolean => "boolean",
            ControlKind::Number => "number",
            ControlKind::Color => "color",
            ControlKind::Select => "select",
            ControlKind::Text => "text",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ALIGN: &[&str] = &["left", "center", "right"];
const VERTICAL_ALIGN: &[&str] = &["top", "middle", "bottom"];
const FONT_WEIGHT: &[&str] = &["normal", "bold"];
const DASH_STYLE: &[&str] = &[
    "Solid",
    "ShortDash",
    "ShortDot",
    "ShortDashDot",
    "ShortDashDotDot",
    "Dot",
    "Dash",
    "LongDash",
    "DashDot",
    "LongDashDot",
    "LongDashDotDot",
];

/// Candidate options for paths ending in a well-known stylistic property.
pub fn suffix_options(path: &str) -> Option<&'static [&'static str]> {
    if path.ends_with(".align") || path.ends_with(".textAlign") {
        Some(ALIGN)
    } else if path.ends_with(".verticalAlign") {
        Some(VERTICAL_ALIGN)
    } else if path.ends_with(".fontWeight") {
        Some(FONT_WEIGHT)
    } else if path.to_ascii_lowercase().ends_with("dashstyle") {
        Some(DASH_STYLE)
    } else {
        None
    }
}

fn unit_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d*)?\s*(px|em|rem|%)$").expect("unit number pattern"))
}

/// True for numbers and for numeric strings carrying a px/em/rem/% unit.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => unit_number().is_match(s),
        _ => false,
    }
}

/// Pick a control kind when none was given. First match wins:
/// boolean value, numeric value, explicit options, `color` in the path,
/// stylistic suffix, colour-parseable string, then text.
pub fn deduce_kind(path: &str, value: Option<&Value>, has_options: bool) -> ControlKind {
    let kind = match value {
        Some(Value::Bool(_)) => ControlKind::Boolean,
        Some(v) if is_numeric(v) => ControlKind::Number,
        _ if has_options => ControlKind::Select,
        _ if path.to_lowercase().contains("color") => ControlKind::Color,
        _ if suffix_options(path).is_some() => ControlKind::Select,
        Some(Value::String(s)) if color::is_color(s) => ControlKind::Color,
        _ => ControlKind::Text,
    };
    log::trace!("deduced {} control for '{}'", kind, path);
    kind
}

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("range heuristic pattern"))
}

/// Default `[min, max]` for a number control, chosen from the path suffix.
pub fn default_bounds(path: &str) -> (f64, f64) {
    static WIDTH: OnceLock<Regex> = OnceLock::new();
    static RADIUS: OnceLock<Regex> = OnceLock::new();
    static OFFSET: OnceLock<Regex> = OnceLock::new();
    static ROTATION: OnceLock<Regex> = OnceLock::new();

    if pattern(&WIDTH, r"(?i)(lineWidth|borderWidth)$").is_match(path) {
        (0.0, 5.0)
    } else if pattern(&RADIUS, r"(?i)radius$").is_match(path) {
        (0.0, 10.0)
    } else if pattern(&OFFSET, r"(?i)\.(x|y|offsetX|offsetY|offset)$").is_match(path) {
        (-100.0, 100.0)
    } else if pattern(&ROTATION, r"(?i)rotation$").is_match(path) {
        (-90.0, 90.0)
    } else {
        (0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl NumberRange {
    /// Fill in whatever was not given explicitly. Bounds widen to include
    /// `current` so the initial value is never clamped.
    pub fn deduce(
        path: &str,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        current: Option<f64>,
        unit: &str,
    ) -> Self {
        let (default_min, default_max) = default_bounds(path);
        let (mut min, mut max) = match (min, max) {
            (Some(min), Some(max)) if min > max => (max, min),
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, default_max.max(min)),
            (None, Some(max)) => (default_min.min(max), max),
            (None, None) => (default_min, default_max),
        };

        if let Some(current) = current {
            min = min.min(current);
            max = max.max(current);
        }

        let step = match step {
            Some(step) if step != 0.0 => step,
            _ if unit == "em" || unit == "rem" => 0.1,
            _ => 1.0,
        };

        Self { min, max, step }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Inverted bounds are read in order.
    pub fn clamp(&self, value: f64) -> f64 {
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        value.max(low).min(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deduction_order() {
        assert_eq!(deduce_kind("legend.enabled", Some(&json!(true)), false), ControlKind::Boolean);
        assert_eq!(deduce_kind("chart.height", Some(&json!("80%")), false), ControlKind::Number);
        assert_eq!(deduce_kind("chart.marginTop", Some(&json!(12)), true), ControlKind::Number);
        assert_eq!(deduce_kind("chart.type", Some(&json!("line")), true), ControlKind::Select);
        assert_eq!(deduce_kind("chart.backgroundColor", None, false), ControlKind::Color);
        assert_eq!(deduce_kind("legend.align", Some(&json!("left")), false), ControlKind::Select);
        assert_eq!(deduce_kind("series[0].dashStyle", None, false), ControlKind::Select);
        assert_eq!(deduce_kind("plotOptions.fill", Some(&json!("#00ff00")), false), ControlKind::Color);
        assert_eq!(deduce_kind("title.text", Some(&json!("Not a color")), false), ControlKind::Text);
        assert_eq!(deduce_kind("title.text", None, false), ControlKind::Text);
    }

    #[test]
    fn test_unit_strings_are_numbers() {
        for v in ["60px", "1.5em", "2rem", "80%", "-3 px", "10.em"] {
            assert!(is_numeric(&json!(v)), "{v}");
        }
        assert!(!is_numeric(&json!("60pt")));
        assert!(!is_numeric(&json!("10")));
    }

    #[test]
    fn test_suffix_table() {
        assert_eq!(suffix_options("legend.align"), Some(ALIGN));
        assert_eq!(suffix_options("title.verticalAlign"), Some(VERTICAL_ALIGN));
        assert_eq!(suffix_options("title.style.fontWeight"), Some(FONT_WEIGHT));
        assert_eq!(suffix_options("plotOptions.series.DASHSTYLE"), Some(DASH_STYLE));
        assert_eq!(suffix_options("align"), None);
    }

    #[test]
    fn test_default_bounds() {
        assert_eq!(default_bounds("plotOptions.series.lineWidth"), (0.0, 5.0));
        assert_eq!(default_bounds("chart.borderWidth"), (0.0, 5.0));
        assert_eq!(default_bounds("chart.borderRadius"), (0.0, 10.0));
        assert_eq!(default_bounds("title.x"), (-100.0, 100.0));
        assert_eq!(default_bounds("dataLabels.offsetY"), (-100.0, 100.0));
        assert_eq!(default_bounds("xAxis.labels.rotation"), (-90.0, 90.0));
        assert_eq!(default_bounds("chart.marginTop"), (0.0, 100.0));
    }

    #[test]
    fn test_range_widens_and_steps() {
        let range = NumberRange::deduce("chart.height", None, None, None, Some(400.0), "px");
        assert_eq!((range.min, range.max, range.step), (0.0, 400.0, 1.0));

        let range = NumberRange::deduce("title.style.fontSize", None, None, None, Some(1.5), "em");
        assert_eq!(range.step, 0.1);

        let range = NumberRange::deduce("a.b", Some(10.0), None, Some(5.0), Some(-2.0), "");
        assert_eq!((range.min, range.max, range.step), (-2.0, 100.0, 5.0));
    }

    #[test]
    fn test_explicit_bound_past_default_keeps_range_ordered() {
        let range = NumberRange::deduce("chart.height", Some(200.0), None, None, None, "");
        assert_eq!((range.min, range.max), (200.0, 200.0));
        assert_eq!(range.clamp(250.0), 200.0);

        let range = NumberRange::deduce("chart.borderWidth", None, Some(-3.0), None, None, "");
        assert_eq!((range.min, range.max), (-3.0, -3.0));
        assert_eq!(range.clamp(1.0), -3.0);

        let range = NumberRange::deduce("chart.height", Some(50.0), Some(10.0), None, None, "");
        assert_eq!((range.min, range.max), (10.0, 50.0));
        assert_eq!(range.clamp(70.0), 50.0);
    }

    #[test]
    fn test_clamp_tolerates_inverted_bounds() {
        let range = NumberRange { min: 10.0, max: 0.0, step: 1.0 };
        assert_eq!(range.clamp(20.0), 10.0);
        assert_eq!(range.clamp(-5.0), 0.0);
        assert_eq!(range.clamp(4.0), 4.0);
    }
}
