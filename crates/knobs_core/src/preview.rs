//! Read-only view of the target's option tree, refreshed after every write.

use serde_json::{Map, Value};

/// Snapshot of the full option tree, minus top-level entries that are only
/// empty axis placeholders (`[{}]`).
pub fn snapshot(options: Option<Value>) -> Value {
    let mut options = match options {
        Some(Value::Object(map)) => map,
        Some(other) => return other,
        None => Map::new(),
    };
    options.retain(|_, value| !is_empty_axis(value));
    Value::Object(options)
}

fn is_empty_axis(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.len() == 1
        && matches!(&items[0], Value::Object(map) if map.is_empty()))
}

/// JavaScript-like rendering: bare identifier keys, single-quoted strings,
/// `data` arrays and `dataTable` objects collapsed to a count.
pub fn render(options: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, options, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&quote(s)),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                indent(out, depth + 1);
                write_value(out, item, depth + 1);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                indent(out, depth + 1);
                out.push_str(&format_key(key));
                out.push_str(": ");
                match (key.as_str(), item) {
                    ("data", Value::Array(items)) => {
                        out.push_str(&format!("[{} items]", items.len()));
                    }
                    ("dataTable", Value::Object(fields)) => {
                        out.push_str(&format!("{{{} keys}}", fields.len()));
                    }
                    _ => write_value(out, item, depth + 1),
                }
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push('}');
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn format_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_drops_empty_axes() {
        let snap = snapshot(Some(json!({
            "xAxis": [{}],
            "yAxis": [{ "title": { "text": "Y" } }],
            "chart": {}
        })));
        assert_eq!(snap, json!({ "yAxis": [{ "title": { "text": "Y" } }], "chart": {} }));
        assert_eq!(snapshot(None), json!({}));
    }

    #[test]
    fn test_render_js_like() {
        let text = render(&json!({
            "title": { "text": "It's" },
            "series": [{ "data": [1, 2, 3], "dataTable": { "a": 1, "b": 2 } }],
            "my-key": true
        }));
        let expected = "{\n  title: {\n    text: 'It\\'s'\n  },\n  series: [\n    {\n      data: [3 items],\n      dataTable: {2 keys}\n    }\n  ],\n  'my-key': true\n}";
        assert_eq!(text, expected);
    }
}
