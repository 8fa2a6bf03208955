use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use knobs_core::value::{NumericValue, parse_loose_value};
use knobs_core::{
    ControlDescriptor, ControlKind, Descriptor, JsonTarget, Panel, PanelConfig, Target, UiInput,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "knobs")]
#[command(about = "Drive a control panel against a JSON options tree")]
pub struct Cli {
    /// Live options of the target, as JSON
    #[arg(long)]
    pub options: PathBuf,
    /// Product defaults consulted when the live options lack a value
    #[arg(long)]
    pub defaults: Option<PathBuf>,
    /// Panel definition as JSON
    #[arg(long, conflicts_with = "markup", required_unless_present = "markup")]
    pub panel: Option<PathBuf>,
    /// Panel definition as <highcharts-controls> markup
    #[arg(long)]
    pub markup: Option<PathBuf>,
    /// Edit the control bound to PATH, in order
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub set: Vec<String>,
    /// What to print once all edits are applied
    #[arg(long, value_enum, default_value_t = Show::Preview)]
    pub show: Show,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Show {
    Descriptors,
    Patches,
    Preview,
    Options,
}

#[derive(Serialize)]
struct DescriptorReport<'a> {
    layout: &'a [Descriptor],
    controls: &'a [ControlDescriptor],
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(cli: &Cli) -> Result<PanelConfig> {
    if let Some(path) = &cli.markup {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        return knobs_markup::parse_panel(&text)
            .with_context(|| format!("parsing {}", path.display()));
    }
    let path = cli
        .panel
        .as_ref()
        .ok_or_else(|| anyhow!("either --panel or --markup is required"))?;
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    PanelConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Turn a `--set` value into the UI inputs a person would produce for a
/// control of `kind`. Colours accept `#rrggbb@opacity`.
pub fn inputs_for(kind: ControlKind, raw: &str) -> Result<Vec<UiInput>> {
    let inputs = match kind {
        ControlKind::Boolean => match parse_loose_value(raw) {
            Value::Bool(checked) => vec![UiInput::Toggle(checked)],
            _ => bail!("'{}' is not true or false", raw),
        },
        ControlKind::Number => {
            let numeric = NumericValue::parse(&parse_loose_value(raw))
                .ok_or_else(|| anyhow!("'{}' is not a number", raw))?;
            vec![UiInput::Slide(numeric.number)]
        }
        ControlKind::Color => match raw.split_once('@') {
            Some((color, opacity)) => vec![
                UiInput::Pick(color.to_string()),
                UiInput::Opacity(opacity.to_string()),
            ],
            None => vec![UiInput::Pick(raw.to_string())],
        },
        ControlKind::Select => vec![UiInput::Choose(raw.to_string())],
        ControlKind::Text => vec![UiInput::Type(raw.to_string())],
    };
    Ok(inputs)
}

fn apply_set(panel: &mut Panel<JsonTarget>, assignment: &str) -> Result<()> {
    let (path, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PATH=VALUE, got '{}'", assignment))?;
    let control = panel
        .find_by_path(path)
        .ok_or_else(|| anyhow!("no control bound to '{}'", path))?;
    let id = control.id;

    for input in inputs_for(control.kind(), raw)? {
        log::info!("{} <- {:?}", path, input);
        panel
            .apply_control_change(id, input)
            .with_context(|| format!("setting {}", path))?;
    }
    Ok(())
}

/// Build the panel, apply every `--set` and render what `--show` asks for.
pub fn run(cli: &Cli) -> Result<String> {
    let mut target = JsonTarget::new(read_json(&cli.options)?);
    if let Some(path) = &cli.defaults {
        target = target.with_defaults(read_json(path)?);
    }
    let config = load_config(cli)?;
    let mut panel = Panel::new(Some(target), &config)?;

    for assignment in &cli.set {
        apply_set(&mut panel, assignment)?;
    }

    let output = match cli.show {
        Show::Descriptors => serde_json::to_string_pretty(&DescriptorReport {
            layout: panel.layout(),
            controls: panel.controls(),
        })?,
        Show::Patches => serde_json::to_string_pretty(panel.target().updates())?,
        Show::Preview => panel.preview_text(),
        Show::Options => serde_json::to_string_pretty(&panel.target().options())?,
    };
    Ok(output)
}
