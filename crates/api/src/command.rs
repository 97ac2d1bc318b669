//! Mind-map commands - all operations that modify map or view state.
//!
//! Commands describe what the user wants. The session decides how: where
//! a new child goes, when the backend is called, and how failures surface.

use glam::Vec2;
use node::{CanvasPoint, NodeId, NodePatch, ScreenPoint};
use serde::{Deserialize, Serialize};

/// A command that modifies the mind map or its view.
///
/// Serializable for scripting and recording.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Nodes ===
    /// Add a child at the parent's next radial slot. Without a parent, add the root.
    AddChild {
        #[serde(default)]
        parent: Option<NodeId>,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// Apply a partial update.
    UpdateNode { id: NodeId, patch: NodePatch },

    /// Set a node's canvas position.
    MoveNode { id: NodeId, position: CanvasPoint },

    /// Delete a node. Its children are kept.
    DeleteNode { id: NodeId },

    // === Selection ===
    /// Select a node, optionally adding to existing selection.
    Select {
        id: NodeId,
        #[serde(default)]
        add_to_selection: bool,
    },

    ClearSelection,

    // === View ===
    /// Pan by a screen-space delta.
    Pan { delta: Vec2 },

    /// Zoom by a factor around a screen point (container centre if omitted).
    Zoom {
        factor: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<ScreenPoint>,
    },

    ResetView,

    SetContainerSize { size: Vec2 },

    /// Recentre on the point under a minimap click, in minimap pixels.
    MinimapClick { pixel: Vec2 },

    // === Batch ===
    /// Run commands in order, stopping at the first failure.
    Batch { commands: Vec<Command> },
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    /// Command succeeded.
    Success {
        /// IDs of nodes created, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<NodeId>,
        /// IDs of nodes modified, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<NodeId>,
        /// IDs of nodes deleted, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<NodeId>,
    },
    /// Command failed.
    Error { message: String },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn created(ids: Vec<NodeId>) -> Self {
        Self::Success {
            created: ids,
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn modified(ids: Vec<NodeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: ids,
            deleted: vec![],
        }
    }

    pub fn deleted(ids: Vec<NodeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: ids,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_child_serializes_with_type_field() {
        let cmd = Command::AddChild {
            parent: Some(NodeId::new("root")),
            label: "Idea".into(),
            description: None,
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json, json!({ "type": "add_child", "parent": "root", "label": "Idea" }));
    }

    #[test]
    fn add_child_without_parent_deserializes() {
        let cmd: Command = serde_json::from_value(json!({ "type": "add_child", "label": "Root" })).unwrap();
        assert!(matches!(cmd, Command::AddChild { parent: None, .. }));
    }

    #[test]
    fn move_node_takes_position_as_array() {
        let cmd: Command = serde_json::from_value(json!({
            "type": "move_node",
            "id": "n1",
            "position": [10.0, -4.0]
        }))
        .unwrap();
        match cmd {
            Command::MoveNode { id, position } => {
                assert_eq!(id, NodeId::new("n1"));
                assert_eq!(position, CanvasPoint::new(10.0, -4.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn update_patch_uses_camel_case_fields() {
        let cmd: Command = serde_json::from_value(json!({
            "type": "update_node",
            "id": "n1",
            "patch": { "label": "renamed", "todoListId": "list-1" }
        }))
        .unwrap();
        let Command::UpdateNode { patch, .. } = cmd else {
            panic!("expected update_node");
        };
        assert_eq!(patch.label.as_deref(), Some("renamed"));
        assert!(patch.todo_list_id.is_some());
        assert!(patch.position.is_none());
    }

    #[test]
    fn batch_command_contains_nested_commands() {
        let cmd = Command::Batch {
            commands: vec![Command::ClearSelection, Command::ResetView],
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["commands"][0]["type"], "clear_selection");
        assert_eq!(json["commands"][1]["type"], "reset_view");
    }

    #[test]
    fn result_omits_empty_id_lists() {
        let json = serde_json::to_value(CommandResult::created(vec![NodeId::new("n1")])).unwrap();
        assert_eq!(json, json!({ "status": "success", "created": ["n1"] }));
    }
}
