use std::collections::BTreeSet;

use anyhow::Result;
use clap::{Parser, Subcommand};
use graphfill::prelude::*;
use tracing_subscriber::fmt::SubscriberBuilder;

mod expr;
mod scene;

use expr::DemoCompiler;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Region detection driver for JSON scene files")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Detect the region around the scene's drop point
    Detect {
        #[arg(long)]
        scene: String,
        /// Boundary ids to leave out (repeatable)
        #[arg(long)]
        ignore: Vec<String>,
    },
    /// Run the special-case bounded trace on the scene's boundaries
    Trace {
        #[arg(long)]
        scene: String,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let out = match cmd.action {
        Action::Detect { scene, ignore } => run_detect(&scene, &ignore)?,
        Action::Trace { scene } => run_trace(&scene)?,
    };
    println!("{out}");
    Ok(())
}

fn run_detect(path: &str, ignore: &[String]) -> Result<String> {
    let file = scene::load(path)?;
    let elements = file.elements();
    let ignored: BTreeSet<String> = ignore.iter().cloned().collect();
    tracing::info!(path, elements = elements.len(), ignored = ignore.len(), "detect");
    let result = detect_region(
        &DemoCompiler,
        file.drop_point(),
        &elements,
        file.axes(),
        &ignored,
        &DetectCfg::default(),
    );
    let out = match result {
        Some(r) => serde_json::to_string_pretty(&scene::RegionOut::from(r))?,
        None => "null".to_string(),
    };
    Ok(out)
}

fn run_trace(path: &str) -> Result<String> {
    let file = scene::load(path)?;
    let elements = file.elements();
    tracing::info!(path, elements = elements.len(), "trace");
    let polygon =
        trace_bounded_by_elements(&DemoCompiler, &elements, file.drop_point(), file.axes());
    let points: Vec<[f64; 2]> = polygon.iter().map(|p| [p.x, p.y]).collect();
    Ok(serde_json::to_string_pretty(&points)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scene_json() -> &'static str {
        r#"{
            "axes": {"x_min": -10.0, "x_max": 10.0, "y_min": -10.0, "y_max": 10.0},
            "drop": [0.5, 0.6],
            "elements": [
                {"kind": "function", "id": "sq", "expression": "x^2"},
                {"kind": "function", "id": "lin2", "expression": "2x"}
            ]
        }"#
    }

    fn write_scene(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        f.write_all(contents.as_bytes()).expect("write scene");
        f
    }

    #[test]
    fn detect_reports_the_lens_region() {
        let f = write_scene(scene_json());
        let out = run_detect(f.path().to_str().unwrap(), &[]).expect("detect");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json");
        let ids: Vec<_> = parsed["boundary_ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["lin2", "sq"]);
        assert!(parsed["polygon"].as_array().unwrap().len() >= 3);
    }

    #[test]
    fn ignoring_a_boundary_removes_it_from_the_result() {
        let f = write_scene(scene_json());
        let out = run_detect(f.path().to_str().unwrap(), &["lin2".to_string()]).expect("detect");
        // Without the second curve the lens opens to the viewport.
        assert_eq!(out, "null");
    }

    #[test]
    fn malformed_scene_is_an_error() {
        let f = write_scene("{ not json");
        assert!(run_detect(f.path().to_str().unwrap(), &[]).is_err());
    }
}
