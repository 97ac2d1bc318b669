use crate::Transform;
use glam::Vec2;
use node::{CanvasPoint, Edge, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Minimap edge length in pixels.
    pub size: f32,
    /// Fixed logical canvas edge the minimap represents. Not fitted to content:
    /// nodes outside it fall off the minimap.
    pub logical_canvas_size: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            size: 150.0,
            logical_canvas_size: 2000.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

/// Everything the minimap draws, in minimap pixel space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MinimapScene {
    pub dots: Vec<(NodeId, Vec2)>,
    pub lines: Vec<(Vec2, Vec2)>,
    pub viewport: Option<Rect>,
}

/// Scaled-down overview of the whole map.
#[derive(Clone, Debug, Default)]
pub struct Minimap {
    config: MinimapConfig,
}

impl Minimap {
    pub fn new(config: MinimapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MinimapConfig {
        &self.config
    }

    /// Minimap pixels per logical canvas unit.
    pub fn scale(&self) -> f32 {
        let logical = self.config.logical_canvas_size;
        if logical.is_finite() && logical > 0.0 && self.config.size.is_finite() && self.config.size > 0.0 {
            self.config.size / logical
        } else {
            1.0
        }
    }

    pub fn project(&self, point: CanvasPoint) -> Vec2 {
        point.finite_or_zero().0 * self.scale()
    }

    /// Current viewport as a minimap rectangle: origin `(-x/k, -y/k)`,
    /// extent `(size/k, size/k)`, both scaled into minimap pixels.
    pub fn viewport_rect(&self, transform: &Transform) -> Rect {
        let scale = self.scale();
        let k = transform.k;
        Rect {
            origin: Vec2::new(-transform.x / k, -transform.y / k) * scale,
            size: Vec2::splat(self.config.size / k) * scale,
        }
    }

    /// Logical coordinates for a click at `pixel` inside the minimap.
    pub fn click(&self, pixel: Vec2) -> CanvasPoint {
        CanvasPoint(pixel / self.scale()).finite_or_zero()
    }

    pub fn scene(&self, nodes: &[Node], edges: &[Edge], transform: &Transform) -> MinimapScene {
        let positions: HashMap<&NodeId, Vec2> =
            nodes.iter().map(|n| (&n.id, self.project(n.position))).collect();

        let lines = edges
            .iter()
            .filter_map(|e| Some((*positions.get(&e.from)?, *positions.get(&e.to)?)))
            .collect();

        MinimapScene {
            dots: nodes.iter().map(|n| (n.id.clone(), self.project(n.position))).collect(),
            lines,
            viewport: Some(self.viewport_rect(transform)),
        }
    }
}
