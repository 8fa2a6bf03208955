use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Number, Value};

fn numeric_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([+-]?\d+\.?\d*)\s*(.*)$").expect("numeric prefix pattern"))
}

/// A number split from its unit suffix, e.g. `"60px"` -> `60` + `"px"`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericValue {
    pub number: f64,
    pub unit: String,
}

impl NumericValue {
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(|number| Self {
                number,
                unit: String::new(),
            }),
            Value::String(s) => {
                let caps = numeric_prefix().captures(s)?;
                let number = caps.get(1)?.as_str().parse::<f64>().ok()?;
                let unit = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
                Some(Self { number, unit })
            }
            _ => None,
        }
    }

    /// Attach `unit` to `number`. Unitless numbers stay JSON numbers.
    pub fn with_unit(number: f64, unit: &str) -> Value {
        if unit.is_empty() {
            number_value(number)
        } else {
            Value::String(format!("{}{}", format_number(number), unit))
        }
    }

    pub fn display(&self) -> String {
        format!("{}{}", format_number(self.number), self.unit)
    }
}

/// Integral values print without a fraction: `100`, not `100.0`.
pub fn format_number(number: f64) -> String {
    format!("{}", number)
}

pub fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Value::from(number as i64)
    } else {
        Number::from_f64(number).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Parse a value that arrived as a plain string (markup attributes, CLI
/// arguments): `true`/`false` become booleans, finite numbers become
/// numbers, everything else stays a string.
pub fn parse_loose_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        if let Ok(number) = trimmed.parse::<f64>() {
            if number.is_finite() {
                return number_value(number);
            }
        }
    }
    Value::String(raw.to_string())
}

pub fn is_nullish(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Unquoted text form of a scalar, as a text field or option label shows it.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
