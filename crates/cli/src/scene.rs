//! JSON scene schema and conversion into core types.
//!
//! The serde surface lives here on the cli side; the core library stays
//! serde-free. A scene file carries the viewport axes, the drop point,
//! and the boundary elements, mirroring what the editor hands the engine.

use anyhow::{Context, Result};
use graphfill::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SceneFile {
    pub axes: AxesIn,
    pub drop: [f64; 2],
    pub elements: Vec<ElementIn>,
}

#[derive(Debug, Deserialize)]
pub struct AxesIn {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementIn {
    Function {
        id: String,
        expression: String,
        #[serde(default)]
        domain: Option<(f64, f64)>,
        #[serde(default)]
        offset_x: f64,
        #[serde(default)]
        offset_y: f64,
        #[serde(default = "one")]
        scale_y: f64,
    },
    Line {
        id: String,
        line_kind: LineKindIn,
        start: [f64; 2],
        end: [f64; 2],
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKindIn {
    Segment,
    Ray,
    Line,
}

fn one() -> f64 {
    1.0
}

/// Serialized detection outcome (`null` on stdout means no region).
#[derive(Debug, Serialize)]
pub struct RegionOut {
    pub polygon: Vec<[f64; 2]>,
    pub boundary_ids: Vec<String>,
    pub domain: [f64; 2],
}

impl From<RegionResult> for RegionOut {
    fn from(r: RegionResult) -> Self {
        Self {
            polygon: r.polygon.iter().map(|p| [p.x, p.y]).collect(),
            boundary_ids: r.boundary_ids.into_iter().collect(),
            domain: [r.domain.0, r.domain.1],
        }
    }
}

pub fn load(path: &str) -> Result<SceneFile> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading scene {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scene {path}"))
}

impl SceneFile {
    pub fn axes(&self) -> Axes {
        Axes::new(
            self.axes.x_min,
            self.axes.x_max,
            self.axes.y_min,
            self.axes.y_max,
        )
    }

    pub fn drop_point(&self) -> Vec2<f64> {
        Vec2::new(self.drop[0], self.drop[1])
    }

    pub fn elements(&self) -> Vec<BoundaryElement> {
        self.elements
            .iter()
            .map(|e| match e {
                ElementIn::Function {
                    id,
                    expression,
                    domain,
                    offset_x,
                    offset_y,
                    scale_y,
                } => {
                    let mut f = FunctionElement::new(id.clone(), expression.clone());
                    f.domain = *domain;
                    f.offset_x = *offset_x;
                    f.offset_y = *offset_y;
                    f.scale_y = *scale_y;
                    BoundaryElement::Function(f)
                }
                ElementIn::Line {
                    id,
                    line_kind,
                    start,
                    end,
                } => {
                    let kind = match line_kind {
                        LineKindIn::Segment => LineKind::Segment,
                        LineKindIn::Ray => LineKind::Ray,
                        LineKindIn::Line => LineKind::Line,
                    };
                    BoundaryElement::Line(LineElement::new(
                        id.clone(),
                        kind,
                        Vec2::new(start[0], start[1]),
                        Vec2::new(end[0], end[1]),
                    ))
                }
            })
            .collect()
    }
}
