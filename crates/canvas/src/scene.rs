use crate::{CanvasStore, Transform};
use node::{CanvasPoint, EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Screen-space sizes for node glyphs. Divided by the zoom when drawn so
/// nodes keep a constant on-screen size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub radius: f32,
    pub font_size: f32,
    pub stroke_width: f32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            radius: 28.0,
            font_size: 14.0,
            stroke_width: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeShape {
    pub id: NodeId,
    pub center: CanvasPoint,
    /// World-space radius (screen radius / k).
    pub radius: f32,
    pub font_size: f32,
    pub label: String,
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: EdgeId,
    pub from: CanvasPoint,
    pub to: CanvasPoint,
    pub width: f32,
}

/// World-space draw list for one frame, drawn under `transform`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub transform: Transform,
    pub connectors: Vec<Connector>,
    pub nodes: Vec<NodeShape>,
}

impl Scene {
    pub fn build(
        store: &CanvasStore,
        transform: Transform,
        style: &NodeStyle,
        selection: &HashSet<NodeId>,
    ) -> Self {
        let nodes = store.unique_nodes();
        let centers: HashMap<&NodeId, CanvasPoint> = nodes.iter().map(|n| (&n.id, n.position)).collect();

        let connectors = store
            .edges()
            .iter()
            .filter_map(|edge| {
                Some(Connector {
                    id: edge.id.clone(),
                    from: *centers.get(&edge.from)?,
                    to: *centers.get(&edge.to)?,
                    width: transform.screen_constant(style.stroke_width),
                })
            })
            .collect();

        let shapes = nodes
            .iter()
            .map(|n| NodeShape {
                id: n.id.clone(),
                center: n.position,
                radius: transform.screen_constant(style.radius),
                font_size: transform.screen_constant(style.font_size),
                label: n.label.clone(),
                selected: selection.contains(&n.id),
                completed: n.completed,
            })
            .collect();

        Self {
            transform,
            connectors,
            nodes: shapes,
        }
    }
}
