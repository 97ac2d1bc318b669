use crate::{CreateNode, GatewayError, NodeRecord};
use async_trait::async_trait;
use node::{ContainerId, NodeId, NodePatch, TodoListId};

/// Backend operations the canvas persists through.
///
/// Implementations report every failure. Deciding which failures matter is
/// left to [`crate::SyncGateway`].
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Provision an empty map. Succeeds if it already exists.
    async fn create_container(&self, container: &ContainerId) -> Result<(), GatewayError>;

    /// Persist a new node and return the id the backend assigned.
    async fn create_node(&self, request: &CreateNode) -> Result<NodeId, GatewayError>;

    async fn update_node(&self, id: &NodeId, patch: &NodePatch) -> Result<(), GatewayError>;

    async fn delete_node(&self, id: &NodeId) -> Result<(), GatewayError>;

    async fn list_nodes(&self, container: &ContainerId) -> Result<Vec<NodeRecord>, GatewayError>;

    /// Whether every item of a todo list is done. Empty lists are not complete.
    async fn todo_completion(&self, list: &TodoListId) -> Result<bool, GatewayError>;
}
