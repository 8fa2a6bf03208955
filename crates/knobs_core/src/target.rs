//! The option-tree owner a panel is bound to.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::patch::Patch;

/// Top-level keys whose single-object form is shorthand for a one-element
/// array.
const SPLAT_KEYS: &[&str] = &["xAxis", "yAxis"];

/// External collaborator owning the nested options tree. The panel reads
/// through `options`/`get_options` and writes only through `update`.
pub trait Target {
    /// Live user options.
    fn options(&self) -> Option<Value>;

    /// Product-wide defaults, consulted when the live options lack a value.
    fn default_options(&self) -> Option<Value> {
        None
    }

    /// Full current option tree, for previews.
    fn get_options(&self) -> Option<Value> {
        self.options()
    }

    fn update(&mut self, patch: &Patch, redraw: bool, one_to_one: bool, animate: Option<bool>);
}

/// One `update` call as the in-memory target received it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRecord {
    pub patch: Patch,
    pub redraw: bool,
    pub one_to_one: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animate: Option<bool>,
}

/// In-memory target over a JSON options tree.
#[derive(Debug, Clone, Default)]
pub struct JsonTarget {
    options: Value,
    defaults: Option<Value>,
    updates: Vec<UpdateRecord>,
}

impl JsonTarget {
    pub fn new(mut options: Value) -> Self {
        splat_axes(&mut options);
        Self {
            options,
            defaults: None,
            updates: Vec::new(),
        }
    }

    pub fn with_defaults(mut self, mut defaults: Value) -> Self {
        splat_axes(&mut defaults);
        self.defaults = Some(defaults);
        self
    }

    pub fn updates(&self) -> &[UpdateRecord] {
        &self.updates
    }
}

impl Target for JsonTarget {
    fn options(&self) -> Option<Value> {
        Some(self.options.clone())
    }

    fn default_options(&self) -> Option<Value> {
        self.defaults.clone()
    }

    fn get_options(&self) -> Option<Value> {
        let mut merged = self.defaults.clone().unwrap_or(Value::Null);
        merge_values(&mut merged, &self.options);
        Some(merged)
    }

    fn update(&mut self, patch: &Patch, redraw: bool, one_to_one: bool, animate: Option<bool>) {
        patch.apply_to(&mut self.options, one_to_one);
        self.updates.push(UpdateRecord {
            patch: patch.clone(),
            redraw,
            one_to_one,
            animate,
        });
    }
}

/// Handle to a target several panels are bound to at once.
#[derive(Debug, Default)]
pub struct SharedTarget<T>(Rc<RefCell<T>>);

impl<T> SharedTarget<T> {
    pub fn new(target: T) -> Self {
        Self(Rc::new(RefCell::new(target)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Whether both handles point at the same target.
    pub fn same_target(&self, other: &SharedTarget<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for SharedTarget<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Target> Target for SharedTarget<T> {
    fn options(&self) -> Option<Value> {
        self.0.borrow().options()
    }

    fn default_options(&self) -> Option<Value> {
        self.0.borrow().default_options()
    }

    fn get_options(&self) -> Option<Value> {
        self.0.borrow().get_options()
    }

    fn update(&mut self, patch: &Patch, redraw: bool, one_to_one: bool, animate: Option<bool>) {
        self.0.borrow_mut().update(patch, redraw, one_to_one, animate);
    }
}

/// Wrap a single axis object in a one-element array.
fn splat_axes(options: &mut Value) {
    let Value::Object(map) = options else {
        return;
    };
    for key in SPLAT_KEYS {
        if let Some(axis) = map.get_mut(*key) {
            if axis.is_object() {
                *axis = Value::Array(vec![axis.take()]);
            }
        }
    }
}

/// Deep-merge `overlay` onto `base`; objects merge, everything else replaces.
fn merge_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_options_layers_defaults() {
        let target = JsonTarget::new(json!({ "chart": { "type": "bar" } }))
            .with_defaults(json!({ "chart": { "type": "line", "height": 400 }, "credits": { "enabled": true } }));
        assert_eq!(
            target.get_options(),
            Some(json!({
                "chart": { "type": "bar", "height": 400 },
                "credits": { "enabled": true }
            }))
        );
    }

    #[test]
    fn test_update_is_recorded() {
        let mut target = JsonTarget::new(json!({}));
        let patch = Patch::Object(vec![("title".into(), Patch::Leaf(json!("Hi")))]);
        target.update(&patch, true, true, Some(false));
        assert_eq!(target.options(), Some(json!({ "title": "Hi" })));
        assert_eq!(target.updates().len(), 1);
        assert_eq!(target.updates()[0].animate, Some(false));
    }

    #[test]
    fn test_single_axis_object_becomes_array() {
        let target = JsonTarget::new(json!({
            "xAxis": { "min": 0, "title": { "text": "Year" } },
            "yAxis": [{ "title": { "text": "Value" } }, { "opposite": true }],
            "chart": { "type": "bar" }
        }))
        .with_defaults(json!({ "yAxis": { "gridLineWidth": 1 } }));

        assert_eq!(
            target.options(),
            Some(json!({
                "xAxis": [{ "min": 0, "title": { "text": "Year" } }],
                "yAxis": [{ "title": { "text": "Value" } }, { "opposite": true }],
                "chart": { "type": "bar" }
            }))
        );
        assert_eq!(target.default_options(), Some(json!({ "yAxis": [{ "gridLineWidth": 1 }] })));
    }

    #[test]
    fn test_shared_handles_see_each_others_writes() {
        let shared = SharedTarget::new(JsonTarget::new(json!({ "title": { "text": "A" } })));
        let mut first = shared.clone();
        let second = shared.clone();

        let patch = Patch::Object(vec![(
            "title".into(),
            Patch::Object(vec![("text".into(), Patch::Leaf(json!("B")))]),
        )]);
        first.update(&patch, true, true, None);

        assert!(first.same_target(&second));
        assert_eq!(second.options(), Some(json!({ "title": { "text": "B" } })));
        assert_eq!(shared.borrow().updates().len(), 1);
    }
}
