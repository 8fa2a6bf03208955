//! The control panel: builds descriptors against a bound target and turns
//! UI input into minimal update patches.

use serde_json::Value;
use uuid::Uuid;

use crate::color::{self, Rgba};
use crate::config::{ConfigItem, PanelConfig};
use crate::descriptor::{ColorState, ControlDescriptor, ControlState, Descriptor, GroupDescriptor};
use crate::errors::{PanelError, PanelResult};
use crate::patch::build_update_patch;
use crate::path::Path;
use crate::preview;
use crate::target::Target;
use crate::value::NumericValue;

/// Raw input from the view layer, one variant per widget interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum UiInput {
    /// Boolean toggle switched.
    Toggle(bool),
    /// Number slider moved.
    Slide(f64),
    /// Colour swatch picked, e.g. `#ff0000`.
    Pick(String),
    /// Opacity field typed, in percent; parsed leniently.
    Opacity(String),
    /// Select button clicked or dropdown entry chosen.
    Choose(String),
    /// Text field typed.
    Type(String),
}

#[derive(Debug)]
pub struct Panel<T: Target> {
    target: T,
    controls: Vec<ControlDescriptor>,
    layout: Vec<Descriptor>,
    preview: Value,
}

impl<T: Target> Panel<T> {
    /// Build the panel. There is nothing to render without a target, so a
    /// missing one is an error.
    pub fn new(target: Option<T>, config: &PanelConfig) -> PanelResult<Self> {
        let target = target.ok_or(PanelError::NoTarget)?;
        let mut panel = Self {
            target,
            controls: Vec::new(),
            layout: Vec::new(),
            preview: Value::Null,
        };

        let layout = panel.build_items(&config.controls)?;
        panel.layout = layout;
        panel.refresh_preview();
        log::debug!("built panel with {} controls", panel.controls.len());
        Ok(panel)
    }

    fn build_items(&mut self, items: &[ConfigItem]) -> PanelResult<Vec<Descriptor>> {
        let live = self.target.options();
        let defaults = self.target.default_options();
        self.build_level(items, live.as_ref(), defaults.as_ref())
    }

    fn build_level(
        &mut self,
        items: &[ConfigItem],
        live: Option<&Value>,
        defaults: Option<&Value>,
    ) -> PanelResult<Vec<Descriptor>> {
        let mut layout = Vec::with_capacity(items.len());
        for item in items {
            match item {
                ConfigItem::Group(group) => {
                    let children = self.build_level(&group.controls, live, defaults)?;
                    layout.push(Descriptor::Group(GroupDescriptor {
                        title: group.group.clone(),
                        description: group.description.clone(),
                        collapsed: group.collapsed,
                        collapsible: group.collapsible,
                        class_name: group.class_name.clone(),
                        children,
                    }));
                }
                ConfigItem::Control(control) if control.is_separator() => {
                    layout.push(Descriptor::Separator);
                }
                ConfigItem::Control(control) if control.path.is_empty() => {
                    log::debug!("skipping control without a path");
                }
                ConfigItem::Control(control) => {
                    let descriptor = ControlDescriptor::from_config(control, live, defaults)?;
                    layout.push(Descriptor::Control { id: descriptor.id });
                    self.controls.push(descriptor);
                }
            }
        }
        Ok(layout)
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn layout(&self) -> &[Descriptor] {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut [Descriptor] {
        &mut self.layout
    }

    /// Controls in definition order, groups flattened.
    pub fn controls(&self) -> &[ControlDescriptor] {
        &self.controls
    }

    pub fn control(&self, id: Uuid) -> Option<&ControlDescriptor> {
        self.controls.iter().find(|c| c.id == id)
    }

    /// First control bound to `path`. Paths compare in canonical form, so
    /// `xAxis.title.text` finds a control bound to `xAxis[0].title.text`.
    pub fn find_by_path(&self, path: &str) -> Option<&ControlDescriptor> {
        if let Some(exact) = self.controls.iter().find(|c| c.path == path) {
            return Some(exact);
        }
        let wanted = Path::parse(path).ok()?.normalized();
        self.controls
            .iter()
            .find(|c| c.parsed_path.normalized() == wanted)
    }

    /// Apply one UI interaction: update the control's state, clear its
    /// nullish marker, dispatch the patch and refresh the preview.
    pub fn apply_control_change(&mut self, id: Uuid, input: UiInput) -> PanelResult<()> {
        let index = self
            .controls
            .iter()
            .position(|c| c.id == id)
            .ok_or(PanelError::UnknownControl(id))?;

        let control = &mut self.controls[index];
        let (value, animate) = next_value(control, input)?;
        control.nullish = false;

        let live = self.target.options();
        let patch = build_update_patch(&control.parsed_path, value, live.as_ref());
        log::debug!("update {}: {}", control.path, patch.to_json());
        self.target.update(&patch, true, true, animate);
        self.refresh_preview();
        Ok(())
    }

    /// Re-read the whole option tree from the target.
    pub fn refresh_preview(&mut self) {
        self.preview = preview::snapshot(self.target.get_options());
    }

    pub fn preview(&self) -> &Value {
        &self.preview
    }

    pub fn preview_text(&self) -> String {
        preview::render(&self.preview)
    }
}

/// Work out the value to write for `input` and fold it into the control's
/// state. Returns the value and the animation flag for the update call.
fn next_value(control: &mut ControlDescriptor, input: UiInput) -> PanelResult<(Value, Option<bool>)> {
    let kind = control.kind();
    let path = control.path.clone();

    match (&mut control.state, input) {
        (ControlState::Boolean(state), UiInput::Toggle(checked)) => {
            state.checked = checked;
            Ok((Value::Bool(checked), None))
        }
        (ControlState::Number(state), UiInput::Slide(number)) => {
            let number = state.range.clamp(number);
            state.current = Some(number);
            Ok((NumericValue::with_unit(number, &state.unit), Some(false)))
        }
        (ControlState::Color(state), UiInput::Pick(picked)) => {
            let rgba = Rgba::parse(&picked).ok_or(PanelError::InvalidColor(picked))?;
            state.hex = rgba.to_hex(false);
            write_color(state)
        }
        (ControlState::Color(state), UiInput::Opacity(raw)) => {
            state.opacity = color::parse_opacity(&raw);
            write_color(state)
        }
        (ControlState::Select(state), UiInput::Choose(option)) => {
            if !state.options.contains(&option) {
                return Err(PanelError::UnknownOption { option, path });
            }
            state.selected = Some(option.clone());
            Ok((Value::String(option), None))
        }
        (ControlState::Text(state), UiInput::Type(text)) => {
            state.text = text.clone();
            Ok((Value::String(text), Some(false)))
        }
        _ => Err(PanelError::InputMismatch { kind, path }),
    }
}

fn write_color(state: &mut ColorState) -> PanelResult<(Value, Option<bool>)> {
    let combined = color::combine_color(&state.hex, state.opacity)
        .ok_or_else(|| PanelError::InvalidColor(state.hex.clone()))?;
    state.label = state.hex.clone();
    Ok((Value::String(combined), Some(false)))
}
