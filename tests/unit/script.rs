use super::*;
use crate::backend::meta::{MetaBackend, MetaOp};
use crate::params::PlotterParams;
use crate::path::Path;

fn plotter() -> Plotter<MetaBackend> {
    let params = PlotterParams::new();
    let backend = MetaBackend::new(Box::new(std::io::sink()), &params);
    Plotter::new(backend, params)
}

#[test]
fn parses_tagged_commands() {
    let script = Script::from_json(
        r#"[
            {"op": "pencolorname", "name": "red"},
            {"op": "box", "x0": 0.1, "y0": 0.1, "x1": 0.9, "y1": 0.5},
            {"op": "ellipse", "xc": 0.5, "yc": 0.5, "rx": 0.2, "ry": 0.1},
            {"op": "alabel", "h": "c", "v": "c", "text": "hi"}
        ]"#,
    )
    .unwrap();

    assert_eq!(script.commands.len(), 4);
    assert_eq!(
        script.commands[1],
        DrawCommand::Rect {
            x0: 0.1,
            y0: 0.1,
            x1: 0.9,
            y1: 0.5
        }
    );
    assert!(matches!(
        script.commands[2],
        DrawCommand::Ellipse { angle, .. } if angle == 0.0
    ));
    assert!(!script.opens_pages());
}

#[test]
fn unknown_ops_are_config_errors() {
    let err = Script::from_json(r#"[{"op": "teleport"}]"#).unwrap_err();
    assert!(matches!(err, PlotError::Config(_)));
}

#[test]
fn render_wraps_a_bare_script_in_one_page() {
    let script = Script::from_json(
        r#"[
            {"op": "line", "x0": 0, "y0": 0, "x1": 1, "y1": 1},
            {"op": "circle", "xc": 0.5, "yc": 0.5, "r": 0.25}
        ]"#,
    )
    .unwrap();
    let mut p = plotter();
    script.render(&mut p).unwrap();

    assert!(!p.is_open());
    let ops = p.backend().ops();
    assert_eq!(ops.first(), Some(&MetaOp::OpenPage { page: 1 }));
    assert_eq!(ops.last(), Some(&MetaOp::ClosePage));
    let paths: Vec<&Path> = ops
        .iter()
        .filter_map(|op| match op {
            MetaOp::PaintPath { path, .. } => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(paths.len(), 2);
    assert!(matches!(paths[1], Path::Circle { .. }));
}

#[test]
fn run_stops_at_the_first_failing_command() {
    let script = Script {
        commands: vec![
            DrawCommand::Openpl,
            DrawCommand::Restorestate,
            DrawCommand::Point { x: 0.5, y: 0.5 },
        ],
    };
    let mut p = plotter();
    let err = script.run(&mut p).unwrap_err();
    assert!(matches!(err, PlotError::InvalidOperation(_)));
    assert_eq!(p.backend().paints().count(), 0);
    assert!(p.is_open());
}

#[test]
fn scripts_survive_serialization() {
    let script = Script {
        commands: vec![
            DrawCommand::Openpl,
            DrawCommand::Linedash {
                dashes: vec![0.5, 0.25],
                offset: 0.0,
            },
            DrawCommand::Closepl,
        ],
    };
    let json = serde_json::to_string(&script).unwrap();
    assert!(json.starts_with(r#"[{"op":"openpl"}"#));
    assert_eq!(Script::from_json(&json).unwrap(), script);
}
