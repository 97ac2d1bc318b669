use crate::{CanvasPoint, Direction, NodeId, TodoListId};
use serde::{Deserialize, Serialize};

/// A single mind-map entry.
///
/// `parent_id == None` marks the root. A dangling `parent_id` (parent deleted
/// or not loaded yet) is tolerated everywhere; such nodes are laid out and
/// drawn as if they were parentless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Position in canvas space. Always finite once it has passed through the store.
    pub position: CanvasPoint,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_list_id: Option<TodoListId>,
    /// Completion rollup of the linked todo list, once loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Bearing from the parent, recorded at creation to bias grandchildren.
    #[serde(skip)]
    pub direction: Option<Direction>,
}

impl Node {
    pub fn new(id: NodeId, position: CanvasPoint, label: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            position: position.finite_or_zero(),
            label: label.into(),
            description: None,
            todo_list_id: None,
            completed: None,
            direction: None,
        }
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Coerce non-finite coordinates to zero.
    pub fn sanitize(&mut self) {
        self.position = self.position.finite_or_zero();
    }

    /// Shallow merge of a later copy of this node: every field the later copy
    /// carries wins, optional fields it lacks keep their current value.
    pub fn merge_from(&mut self, later: &Node) {
        self.id = later.id.clone();
        self.position = later.position.finite_or_zero();
        self.label = later.label.clone();
        if later.parent_id.is_some() {
            self.parent_id = later.parent_id.clone();
        }
        if later.description.is_some() {
            self.description = later.description.clone();
        }
        if later.todo_list_id.is_some() {
            self.todo_list_id = later.todo_list_id.clone();
        }
        if later.completed.is_some() {
            self.completed = later.completed;
        }
        if later.direction.is_some() {
            self.direction = later.direction;
        }
    }

    /// Apply a partial update. Fields absent from the patch are left alone.
    pub fn apply(&mut self, patch: &NodePatch) {
        if let Some(parent) = &patch.parent_id {
            self.parent_id = Some(parent.clone());
        }
        if let Some(position) = patch.position {
            self.position = position.finite_or_zero();
        }
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(list) = &patch.todo_list_id {
            self.todo_list_id = Some(list.clone());
        }
        if let Some(completed) = patch.completed {
            self.completed = Some(completed);
        }
    }
}

/// Partial node update. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<CanvasPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_list_id: Option<TodoListId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NodePatch {
    pub fn position(position: CanvasPoint) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn reparent(parent: NodeId) -> Self {
        Self {
            parent_id: Some(parent),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Every persisted field of `node`, for writing a local copy back in full.
impl From<&Node> for NodePatch {
    fn from(node: &Node) -> Self {
        Self {
            parent_id: node.parent_id.clone(),
            position: Some(node.position),
            label: Some(node.label.clone()),
            description: node.description.clone(),
            todo_list_id: node.todo_list_id.clone(),
            completed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node::new(NodeId::new(id), CanvasPoint::new(10.0, 20.0), "label")
    }

    #[test]
    fn new_node_coerces_nan_position() {
        let n = Node::new(NodeId::new("a"), CanvasPoint::new(f32::NAN, 5.0), "a");
        assert_eq!(n.position, CanvasPoint::new(0.0, 5.0));
    }

    #[test]
    fn patch_keeps_fields_it_does_not_name() {
        let mut n = node("a").with_description("keep me");
        n.apply(&NodePatch::label("renamed"));
        assert_eq!(n.label, "renamed");
        assert_eq!(n.description.as_deref(), Some("keep me"));
        assert_eq!(n.position, CanvasPoint::new(10.0, 20.0));
    }

    #[test]
    fn patch_position_is_sanitized() {
        let mut n = node("a");
        n.apply(&NodePatch::position(CanvasPoint::new(f32::INFINITY, 3.0)));
        assert_eq!(n.position, CanvasPoint::new(0.0, 3.0));
    }

    #[test]
    fn merge_from_keeps_earlier_optionals() {
        let mut earlier = node("a").with_description("first");
        let mut later = node("a");
        later.label = "second".into();
        earlier.merge_from(&later);
        assert_eq!(earlier.label, "second");
        assert_eq!(earlier.description.as_deref(), Some("first"));
    }

    #[test]
    fn direction_is_not_serialized() {
        let n = node("a").with_direction(Direction::TopLeft);
        let json = serde_json::to_value(&n).unwrap();
        assert!(json.get("direction").is_none());
        assert!(json.get("parentId").is_none());
    }

    #[test]
    fn keys_match_patch_keys() {
        let mut n = node("a").with_parent(NodeId::new("root"));
        n.todo_list_id = Some(TodoListId::new("list"));
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["parentId"], "root");
        assert_eq!(json["todoListId"], "list");

        let patch: NodePatch = serde_json::from_value(serde_json::json!({ "todoListId": "list" })).unwrap();
        assert_eq!(patch.todo_list_id, n.todo_list_id);
    }

    #[test]
    fn full_patch_rebuilds_the_node() {
        let source = node("a").with_parent(NodeId::new("root")).with_description("d");
        let mut copy = node("a");
        copy.label = "stale".into();
        copy.apply(&NodePatch::from(&source));
        assert_eq!(copy, source);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(NodePatch::default().is_empty());
        assert!(!NodePatch::completed(true).is_empty());
    }
}
