//! Minimal update patches.
//!
//! A patch is the smallest nested skeleton that sets one leaf when merged
//! into the target. Arrays on the way keep their primitive entries and turn
//! object/array entries into holes, so the merge leaves unrelated nested
//! entries alone.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::path::{Path, Segment, step};

#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Leaf(Value),
    Object(Vec<(String, Patch)>),
    /// `None` is a hole: the merge must not touch that position.
    Array(Vec<Option<Patch>>),
}

impl Patch {
    /// Render as plain JSON. Holes become `null`, so this is for display
    /// and logging only.
    pub fn to_json(&self) -> Value {
        match self {
            Patch::Leaf(value) => value.clone(),
            Patch::Object(entries) => {
                let mut map = Map::new();
                for (key, patch) in entries {
                    map.insert(key.clone(), patch.to_json());
                }
                Value::Object(map)
            }
            Patch::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.as_ref().map(Patch::to_json).unwrap_or(Value::Null))
                    .collect(),
            ),
        }
    }

    /// Deep-merge this patch into `target`.
    ///
    /// Objects merge key by key. With `one_to_one`, arrays merge by position
    /// and holes keep the existing entry; otherwise the patch array replaces
    /// the existing one wholesale.
    pub fn apply_to(&self, target: &mut Value, one_to_one: bool) {
        match self {
            Patch::Leaf(value) => *target = value.clone(),
            Patch::Object(entries) => {
                if !target.is_object() {
                    *target = Value::Object(Map::new());
                }
                if let Value::Object(map) = target {
                    for (key, patch) in entries {
                        let slot = map.entry(key.clone()).or_insert(Value::Null);
                        patch.apply_to(slot, one_to_one);
                    }
                }
            }
            Patch::Array(items) => {
                if one_to_one {
                    if let Value::Array(existing) = target {
                        for (index, item) in items.iter().enumerate() {
                            let Some(patch) = item else { continue };
                            if existing.len() <= index {
                                existing.resize(index + 1, Value::Null);
                            }
                            patch.apply_to(&mut existing[index], one_to_one);
                        }
                        return;
                    }
                }
                let replaced = items
                    .iter()
                    .map(|item| {
                        let mut slot = Value::Null;
                        if let Some(patch) = item {
                            patch.apply_to(&mut slot, one_to_one);
                        }
                        slot
                    })
                    .collect();
                *target = Value::Array(replaced);
            }
        }
    }
}

impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Build the patch that sets `value` at `path`, reading existing arrays from
/// `current_root` so their primitive entries survive the merge.
pub fn build_update_patch(path: &Path, value: Value, current_root: Option<&Value>) -> Patch {
    let path = path.normalized();
    build_level(path.segments(), value, current_root)
}

fn build_level(segments: &[Segment], value: Value, existing: Option<&Value>) -> Patch {
    let Some((head, rest)) = segments.split_first() else {
        return Patch::Leaf(value);
    };
    let child_existing = existing.and_then(|current| step(current, head));

    match head {
        Segment::Key(key) => Patch::Object(vec![(
            key.clone(),
            build_level(rest, value, child_existing),
        )]),
        Segment::Index(index) => {
            let mut items = match existing {
                Some(Value::Array(current)) => preserve_primitives(current),
                _ => Vec::new(),
            };
            if items.len() <= *index {
                items.resize(index + 1, None);
            }
            items[*index] = Some(build_level(rest, value, child_existing));
            Patch::Array(items)
        }
    }
}

/// Same-length copy: primitives kept verbatim, objects/arrays (and nulls)
/// become holes.
fn preserve_primitives(items: &[Value]) -> Vec<Option<Patch>> {
    items
        .iter()
        .map(|item| match item {
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                Some(Patch::Leaf(item.clone()))
            }
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::get_nested_value;
    use serde_json::json;

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    #[test]
    fn test_plain_object_patch() {
        let patch = build_update_patch(&path("chart.style.fontSize"), json!("2em"), None);
        assert_eq!(patch.to_json(), json!({ "chart": { "style": { "fontSize": "2em" } } }));
    }

    #[test]
    fn test_array_of_primitives_preserved() {
        let root = json!({ "arr": ["A", "B", "C"] });
        let patch = build_update_patch(&path("arr[1]"), json!("X"), Some(&root));
        assert_eq!(
            patch,
            Patch::Object(vec![(
                "arr".into(),
                Patch::Array(vec![
                    Some(Patch::Leaf(json!("A"))),
                    Some(Patch::Leaf(json!("X"))),
                    Some(Patch::Leaf(json!("C"))),
                ])
            )])
        );
    }

    #[test]
    fn test_array_objects_become_holes() {
        let root = json!({ "arr": [{ "a": 1 }, "B", { "c": 3 }] });
        let patch = build_update_patch(&path("arr[1]"), json!("X"), Some(&root));
        assert_eq!(
            patch,
            Patch::Object(vec![(
                "arr".into(),
                Patch::Array(vec![None, Some(Patch::Leaf(json!("X"))), None])
            )])
        );
    }

    #[test]
    fn test_missing_array_is_sparse() {
        let patch = build_update_patch(&path("series[2].name"), json!("S"), Some(&json!({})));
        assert_eq!(
            patch.to_json(),
            json!({ "series": [null, null, { "name": "S" }] })
        );
    }

    #[test]
    fn test_nested_index_carries_existing_values() {
        let root = json!({ "series": [{ "data": [1, 2, 3] }, { "data": [4] }] });
        let patch = build_update_patch(&path("series[0].data[1]"), json!(9), Some(&root));
        assert_eq!(
            patch.to_json(),
            json!({ "series": [{ "data": [1, 9, 3] }, null] })
        );
    }

    #[test]
    fn test_axis_write_matches_axis_read() {
        let mut root = json!({ "xAxis": [{ "title": { "text": "old" }, "min": 0 }] });
        let patch = build_update_patch(&path("xAxis.title.text"), json!("new"), Some(&root));
        patch.apply_to(&mut root, true);
        assert_eq!(get_nested_value(&root, &path("xAxis[0].title.text")), Some(&json!("new")));
        assert_eq!(root["xAxis"][0]["min"], json!(0));
    }

    #[test]
    fn test_one_to_one_merge_keeps_siblings() {
        let mut root = json!({ "series": [{ "name": "A", "type": "line" }, { "name": "B" }] });
        let patch = build_update_patch(&path("series[1].name"), json!("Z"), Some(&root));
        patch.apply_to(&mut root, true);
        assert_eq!(
            root,
            json!({ "series": [{ "name": "A", "type": "line" }, { "name": "Z" }] })
        );
    }

    #[test]
    fn test_wholesale_merge_replaces_array() {
        let mut root = json!({ "series": [{ "name": "A" }, { "name": "B" }] });
        let patch = build_update_patch(&path("series[1].name"), json!("Z"), Some(&root));
        patch.apply_to(&mut root, false);
        assert_eq!(root, json!({ "series": [null, { "name": "Z" }] }));
    }
}
