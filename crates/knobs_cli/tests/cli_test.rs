use std::fs;
use std::path::Path;

use clap::Parser;
use knobs_cli::{Cli, Show, inputs_for, run};
use knobs_core::{ControlKind, UiInput};
use serde_json::{Value, json};

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write fixture");
    path.to_string_lossy().into_owned()
}

fn fixtures(dir: &Path) -> (String, String) {
    let options = write(
        dir,
        "chart.json",
        r##"{
            "chart": { "marginTop": "60px", "backgroundColor": "#ffffff" },
            "legend": { "enabled": true, "align": "center" },
            "series": [{ "name": "A", "data": [1, 2, 3] }, { "name": "B" }]
        }"##,
    );
    let panel = write(
        dir,
        "panel.json",
        r#"{
            "controls": [
                { "path": "chart.marginTop" },
                { "path": "chart.backgroundColor" },
                { "group": "Legend", "controls": [
                    { "path": "legend.enabled" },
                    { "path": "legend.align" }
                ] },
                { "path": "series[1].name" }
            ]
        }"#,
    );
    (options, panel)
}

#[test]
fn test_set_and_show_options() {
    let dir = tempfile::tempdir().unwrap();
    let (options, panel) = fixtures(dir.path());

    let cli = Cli::try_parse_from([
        "knobs",
        "--options",
        options.as_str(),
        "--panel",
        panel.as_str(),
        "--set",
        "chart.marginTop=100",
        "--set",
        "chart.backgroundColor=#ff0000@50",
        "--set",
        "legend.enabled=false",
        "--set",
        "legend.align=right",
        "--set",
        "series[1].name=Renamed",
        "--show",
        "options",
    ])
    .unwrap();
    assert_eq!(cli.show, Show::Options);

    let output: Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();
    assert_eq!(
        output,
        json!({
            "chart": { "marginTop": "100px", "backgroundColor": "#ff000080" },
            "legend": { "enabled": false, "align": "right" },
            "series": [{ "name": "A", "data": [1, 2, 3] }, { "name": "Renamed" }]
        })
    );
}

#[test]
fn test_show_patches() {
    let dir = tempfile::tempdir().unwrap();
    let (options, panel) = fixtures(dir.path());

    let cli = Cli::try_parse_from([
        "knobs", "--options", options.as_str(), "--panel", panel.as_str(), "--set", "series[1].name=B2", "--show", "patches",
    ])
    .unwrap();
    let output: Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();
    assert_eq!(
        output,
        json!([{
            "patch": { "series": [null, { "name": "B2" }] },
            "redraw": true,
            "one_to_one": true,
            "animate": false
        }])
    );
}

#[test]
fn test_markup_panel_and_preview() {
    let dir = tempfile::tempdir().unwrap();
    let (options, _) = fixtures(dir.path());
    let markup = write(
        dir.path(),
        "panel.html",
        r#"<highcharts-controls><highcharts-control type="text" path="title.text"/></highcharts-controls>"#,
    );

    let cli = Cli::try_parse_from([
        "knobs", "--options", options.as_str(), "--markup", markup.as_str(), "--set", "title.text=Sales",
    ])
    .unwrap();
    assert_eq!(cli.show, Show::Preview);

    let preview = run(&cli).unwrap();
    assert!(preview.contains("title: {\n    text: 'Sales'\n  }"));
    assert!(preview.contains("data: [3 items]"));
}

#[test]
fn test_descriptors_report() {
    let dir = tempfile::tempdir().unwrap();
    let (options, panel) = fixtures(dir.path());

    let cli = Cli::try_parse_from(["knobs", "--options", options.as_str(), "--panel", panel.as_str(), "--show", "descriptors"])
        .unwrap();
    let output: Value = serde_json::from_str(&run(&cli).unwrap()).unwrap();

    assert_eq!(output["layout"].as_array().unwrap().len(), 4);
    assert_eq!(output["layout"][2]["kind"], json!("group"));
    let controls = output["controls"].as_array().unwrap();
    assert_eq!(controls.len(), 5);
    assert_eq!(controls[0]["state"]["type"], json!("number"));
    assert_eq!(controls[0]["state"]["unit"], json!("px"));
    assert_eq!(controls[3]["state"]["presentation"], json!("button-group"));
}

#[test]
fn test_unbound_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (options, panel) = fixtures(dir.path());

    let cli = Cli::try_parse_from(["knobs", "--options", options.as_str(), "--panel", panel.as_str(), "--set", "credits.enabled=true"])
        .unwrap();
    let err = run(&cli).unwrap_err();
    assert!(err.to_string().contains("no control bound to 'credits.enabled'"));
}

#[test]
fn test_panel_or_markup_required() {
    assert!(Cli::try_parse_from(["knobs", "--options", "chart.json"]).is_err());
    assert!(
        Cli::try_parse_from(["knobs", "--options", "a.json", "--panel", "p.json", "--markup", "m.html"])
            .is_err()
    );
}

#[test]
fn test_inputs_for_kinds() {
    assert_eq!(inputs_for(ControlKind::Boolean, "true").unwrap(), vec![UiInput::Toggle(true)]);
    assert!(inputs_for(ControlKind::Boolean, "yes").is_err());
    assert_eq!(inputs_for(ControlKind::Number, "12px").unwrap(), vec![UiInput::Slide(12.0)]);
    assert_eq!(
        inputs_for(ControlKind::Color, "#00ff00@25").unwrap(),
        vec![UiInput::Pick("#00ff00".into()), UiInput::Opacity("25".into())]
    );
    assert_eq!(inputs_for(ControlKind::Text, "a=b").unwrap(), vec![UiInput::Type("a=b".into())]);
}
