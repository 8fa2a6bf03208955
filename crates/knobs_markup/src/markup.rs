//! Reads `<highcharts-controls>` markup into panel definitions.
//!
//! ```xml
//! <highcharts-controls target="#container">
//!     <highcharts-control type="boolean" path="legend.enabled" value="true"/>
//!     <highcharts-group header="Title" collapsible="true">
//!         <highcharts-group-description>Chart heading</highcharts-group-description>
//!         <highcharts-control path="title.text" label="Text"/>
//!     </highcharts-group>
//!     <highcharts-separator/>
//!     <highcharts-control path="legend.align" options="left,center,right" value="right"/>
//! </highcharts-controls>
//! ```

use knobs_core::value::parse_loose_value;
use knobs_core::{ConfigItem, ConfigKind, ControlConfig, GroupConfig, PanelConfig};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::Value;

use crate::errors::{MarkupError, MarkupResult};

const ROOT: &[u8] = b"highcharts-controls";
const CONTROL: &[u8] = b"highcharts-control";
const GROUP: &[u8] = b"highcharts-group";
const DESCRIPTION: &[u8] = b"highcharts-group-description";
const SEPARATOR: &[u8] = b"highcharts-separator";

/// Attribute values arrive as strings: `true`/`false` become booleans,
/// numbers become numbers, anything else stays text.
pub fn parse_attr_value(raw: &str) -> Value {
    parse_loose_value(raw)
}

/// Comma separated option list, entries trimmed.
pub fn parse_options(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Attributes of one element, keys lowercased.
struct Attrs(Vec<(String, String)>);

impl Attrs {
    fn read(e: &BytesStart) -> MarkupResult<Self> {
        let mut attrs = Vec::new();
        for attr in e.html_attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
            let value = attr.unescape_value()?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self(attrs))
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Present and non-empty.
    fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    fn number(&self, name: &str, fallback: f64) -> Option<f64> {
        self.get(name).map(|raw| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(fallback)
        })
    }
}

fn control_config(attrs: &Attrs) -> MarkupResult<ControlConfig> {
    let kind = match attrs.non_empty("type") {
        Some(name) => Some(
            ConfigKind::from_name(name)
                .ok_or_else(|| MarkupError::UnknownControlType(name.to_string()))?,
        ),
        None => None,
    };

    Ok(ControlConfig {
        kind,
        path: attrs.get("path").unwrap_or_default().to_string(),
        label: attrs.non_empty("label").map(str::to_string),
        value: attrs.get("value").map(parse_attr_value),
        options: attrs.get("options").map(parse_options),
        min: attrs.number("min", 0.0),
        max: attrs.number("max", 100.0),
        step: attrs.number("step", 1.0),
    })
}

fn group_config(attrs: &Attrs) -> GroupConfig {
    let mut group = GroupConfig::new(attrs.non_empty("header").unwrap_or("Group"));
    group.collapsed = attrs.has("collapsed");
    group.collapsible = attrs.get("collapsible") == Some("true");
    group.class_name = attrs.non_empty("class").map(str::to_string);
    group
}

/// Panel and group stack while walking the document.
#[derive(Default)]
struct Builder {
    panels: Vec<PanelConfig>,
    root: Option<PanelConfig>,
    groups: Vec<GroupConfig>,
    description: Option<String>,
    nested_roots: usize,
}

impl Builder {
    fn push(&mut self, item: ConfigItem) {
        if let Some(group) = self.groups.last_mut() {
            group.controls.push(item);
        } else if let Some(root) = self.root.as_mut() {
            root.controls.push(item);
        }
    }

    fn push_control(&mut self, attrs: &Attrs) -> MarkupResult<()> {
        let control = control_config(attrs)?;
        if control.path.is_empty() && !control.is_separator() {
            log::debug!("ignoring <highcharts-control> without a path");
            return Ok(());
        }
        self.push(ConfigItem::Control(control));
        Ok(())
    }

    fn open_root(&mut self, attrs: &Attrs) {
        if self.root.is_some() {
            log::warn!("nested <highcharts-controls> ignored");
            self.nested_roots += 1;
            return;
        }
        self.root = Some(PanelConfig {
            target: attrs.non_empty("target").map(str::to_string),
            controls: Vec::new(),
        });
    }

    fn close_group(&mut self) {
        if let Some(group) = self.groups.pop() {
            self.push(ConfigItem::Group(group));
        }
    }

    fn close_root(&mut self) {
        if self.nested_roots > 0 {
            self.nested_roots -= 1;
            return;
        }
        while !self.groups.is_empty() {
            self.close_group();
        }
        if let Some(root) = self.root.take() {
            self.panels.push(root);
        }
    }

    fn close_description(&mut self) {
        let text = self.description.take().unwrap_or_default();
        let text = text.trim();
        if let Some(group) = self.groups.last_mut() {
            if !text.is_empty() {
                group.description = Some(text.to_string());
            }
        }
    }

    fn in_root(&self) -> bool {
        self.root.is_some()
    }
}

/// Every `<highcharts-controls>` element of `source`, in document order.
pub fn parse_panels(source: &str) -> MarkupResult<Vec<PanelConfig>> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(true);

    let mut builder = Builder::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                match name.as_slice() {
                    ROOT => builder.open_root(&Attrs::read(e)?),
                    _ if !builder.in_root() => {}
                    GROUP => builder.groups.push(group_config(&Attrs::read(e)?)),
                    DESCRIPTION => builder.description = Some(String::new()),
                    CONTROL => builder.push_control(&Attrs::read(e)?)?,
                    SEPARATOR => builder.push(ConfigItem::Control(ControlConfig::separator())),
                    _ => {}
                }
            }
            Event::Empty(ref e) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                match name.as_slice() {
                    ROOT => {
                        builder.open_root(&Attrs::read(e)?);
                        builder.close_root();
                    }
                    _ if !builder.in_root() => {}
                    GROUP => {
                        builder.groups.push(group_config(&Attrs::read(e)?));
                        builder.close_group();
                    }
                    CONTROL => builder.push_control(&Attrs::read(e)?)?,
                    SEPARATOR => builder.push(ConfigItem::Control(ControlConfig::separator())),
                    _ => {}
                }
            }
            Event::Text(e) => {
                if let Some(description) = builder.description.as_mut() {
                    description.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(description) = builder.description.as_mut() {
                    description.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(ref e) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                match name.as_slice() {
                    ROOT => builder.close_root(),
                    GROUP => builder.close_group(),
                    DESCRIPTION => builder.close_description(),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => (),
        }
    }

    builder.close_root();
    log::debug!("parsed {} control panel(s) from markup", builder.panels.len());
    Ok(builder.panels)
}

/// The first `<highcharts-controls>` element of `source`.
pub fn parse_panel(source: &str) -> MarkupResult<PanelConfig> {
    parse_panels(source)?
        .into_iter()
        .next()
        .ok_or(MarkupError::MissingRoot)
}
