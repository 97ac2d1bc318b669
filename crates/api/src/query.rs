//! Read-only access to map and view state.

use canvas::{MinimapScene, Transform};
use node::{Edge, Node, NodeId};
use serde::{Deserialize, Serialize};

/// A query for map state (read-only).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// All nodes, one entry per id.
    GetNodes,

    GetNode { id: NodeId },

    GetEdges,

    /// Direct children of a node.
    GetChildren { id: NodeId },

    GetTransform,

    /// Minimap draw list in minimap pixels.
    GetMinimap,

    GetSelection,

    GetNodeCount,
}

/// Response to a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Nodes { nodes: Vec<Node> },
    Node { node: Option<Node> },
    Edges { edges: Vec<Edge> },
    Transform { transform: Transform },
    Minimap { minimap: MinimapScene },
    Selection { ids: Vec<NodeId> },
    Count { count: usize },
}
