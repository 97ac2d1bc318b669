use node::{CanvasPoint, ContainerId, Node, NodeId, NodePatch, TodoListId};
use serde::{Deserialize, Serialize};

/// Position as it travels over the wire. Either coordinate may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPosition {
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

impl RecordPosition {
    pub fn to_point(self) -> CanvasPoint {
        CanvasPoint::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0)).finite_or_zero()
    }
}

impl From<CanvasPoint> for RecordPosition {
    fn from(point: CanvasPoint) -> Self {
        let point = point.finite_or_zero();
        Self {
            x: Some(point.x()),
            y: Some(point.y()),
        }
    }
}

/// A node as the backend stores it. Only `id` is guaranteed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub position: Option<RecordPosition>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_list_id: Option<TodoListId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NodeRecord {
    /// Build a canvas node, filling gaps with defaults and zeroing bad coordinates.
    pub fn into_node(self) -> Node {
        let position = self.position.unwrap_or_default().to_point();
        let parent_id = self.parent_id.filter(|p| !p.is_empty());
        Node {
            id: self.id,
            parent_id,
            position,
            label: self.label.unwrap_or_default(),
            description: self.description,
            todo_list_id: self.todo_list_id,
            completed: self.completed,
            direction: None,
        }
    }

    pub fn apply(&mut self, patch: &NodePatch) {
        let mut node = self.clone().into_node();
        node.apply(patch);
        *self = NodeRecord::from(&node);
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            parent_id: node.parent_id.clone(),
            position: Some(node.position.into()),
            label: Some(node.label.clone()),
            description: node.description.clone(),
            todo_list_id: node.todo_list_id.clone(),
            completed: node.completed,
        }
    }
}

/// Payload for creating a node. The backend assigns the id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNode {
    pub container_id: ContainerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    pub position: RecordPosition,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateNode {
    /// Request for persisting a locally staged node.
    pub fn for_node(container_id: ContainerId, node: &Node) -> Self {
        Self {
            container_id,
            parent_id: node.parent_id.clone(),
            position: node.position.into(),
            label: node.label.clone(),
            description: node.description.clone(),
        }
    }

    pub fn into_record(self, id: NodeId) -> NodeRecord {
        NodeRecord {
            id,
            parent_id: self.parent_id,
            position: Some(self.position),
            label: Some(self.label),
            description: self.description,
            todo_list_id: None,
            completed: None,
        }
    }
}
