use crate::{CreateNode, Gateway, GatewayError, NodeRecord};
use node::{ContainerId, Node, NodeId, NodePatch, TodoListId};
use std::sync::Arc;

/// A backend wrapped with the canvas's failure policies.
pub struct SyncGateway<G> {
    backend: Arc<G>,
}

impl<G> Clone for SyncGateway<G> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
        }
    }
}

impl<G: Gateway + 'static> SyncGateway<G> {
    pub fn new(backend: G) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    pub fn from_arc(backend: Arc<G>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<G> {
        &self.backend
    }

    pub async fn create_container(&self, container: &ContainerId) -> Result<(), GatewayError> {
        self.backend.create_container(container).await
    }

    /// Persist a new node. A missing container is provisioned and the create
    /// retried once; any other failure yields `None`.
    pub async fn create(&self, request: &CreateNode) -> Option<NodeId> {
        let result = match self.backend.create_node(request).await {
            Err(GatewayError::MissingContainer(container)) => {
                log::info!("container {container} missing, provisioning and retrying create");
                if let Err(err) = self.backend.create_container(&container).await {
                    log::warn!("failed to provision container {container}: {err}");
                    return None;
                }
                self.backend.create_node(request).await
            }
            other => other,
        };

        match result {
            Ok(id) if id.is_empty() => {
                log::warn!("backend returned an empty id for {:?}", request.label);
                None
            }
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("create of {:?} failed: {err}", request.label);
                None
            }
        }
    }

    /// Persist a partial update. The local copy stays authoritative, so failures are only logged.
    pub async fn update(&self, id: &NodeId, patch: &NodePatch) {
        if let Err(err) = self.backend.update_node(id, patch).await {
            log::warn!("update of node {} failed: {err}", id.short());
        }
    }

    /// Delete a node. A node that is already gone counts as deleted.
    pub async fn delete(&self, id: &NodeId) -> Result<(), GatewayError> {
        match self.backend.delete_node(id).await {
            Ok(()) => Ok(()),
            Err(GatewayError::NotFound(what)) => {
                log::debug!("delete of {what} skipped: already gone");
                Ok(())
            }
            Err(err) => {
                log::error!("delete of node {} failed: {err}", id.short());
                Err(err)
            }
        }
    }

    /// Fetch every node of a map. Any failure reads as an empty map.
    pub async fn list(&self, container: &ContainerId) -> Vec<Node> {
        match self.backend.list_nodes(container).await {
            Ok(records) => records.into_iter().map(NodeRecord::into_node).collect(),
            Err(err) => {
                log::warn!("listing nodes of {container} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Completion of a todo list, or `None` if it can't be read.
    pub async fn completion(&self, list: &TodoListId) -> Option<bool> {
        match self.backend.todo_completion(list).await {
            Ok(completed) => Some(completed),
            Err(err) => {
                log::debug!("completion of {list} unavailable: {err}");
                None
            }
        }
    }

    /// Spawn a completion fetch on the global executor. Dropping the task cancels it.
    pub fn spawn_completion(&self, list: TodoListId) -> smol::Task<Option<bool>> {
        let gateway = self.clone();
        smol::spawn(async move { gateway.completion(&list).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryGateway, Operation, RecordPosition};
    use node::CanvasPoint;

    fn request(label: &str) -> CreateNode {
        CreateNode {
            container_id: ContainerId::new("map"),
            parent_id: None,
            position: CanvasPoint::new(10.0, 20.0).into(),
            label: label.into(),
            description: None,
        }
    }

    #[test]
    fn missing_container_is_provisioned_then_create_retried() {
        smol::block_on(async {
            let gateway = SyncGateway::new(MemoryGateway::new());
            let id = gateway.create(&request("first")).await;

            let backend = gateway.backend();
            assert_eq!(id, Some(NodeId::new("node-1")));
            assert!(backend.has_container(&ContainerId::new("map")));
            assert_eq!(backend.calls(Operation::Create), 2);
            assert_eq!(backend.calls(Operation::CreateContainer), 1);
        });
    }

    #[test]
    fn create_retries_only_once() {
        smol::block_on(async {
            let gateway = SyncGateway::new(MemoryGateway::new());
            gateway.backend().fail(Operation::CreateContainer);
            assert_eq!(gateway.create(&request("first")).await, None);
            assert_eq!(gateway.backend().calls(Operation::Create), 1);
        });
    }

    #[test]
    fn other_create_failures_yield_none() {
        smol::block_on(async {
            let gateway = SyncGateway::new(MemoryGateway::with_container(ContainerId::new("map")));
            gateway.backend().fail(Operation::Create);
            assert_eq!(gateway.create(&request("first")).await, None);
            assert_eq!(gateway.backend().calls(Operation::CreateContainer), 0);
        });
    }

    #[test]
    fn deleting_an_absent_node_succeeds() {
        smol::block_on(async {
            let gateway = SyncGateway::new(MemoryGateway::with_container(ContainerId::new("map")));
            assert!(gateway.delete(&NodeId::new("ghost")).await.is_ok());

            gateway.backend().fail(Operation::Delete);
            assert!(gateway.delete(&NodeId::new("ghost")).await.is_err());
        });
    }

    #[test]
    fn list_failure_reads_as_empty() {
        smol::block_on(async {
            let gateway = SyncGateway::new(MemoryGateway::new());
            assert!(gateway.list(&ContainerId::new("nowhere")).await.is_empty());
        });
    }

    #[test]
    fn list_sanitizes_records() {
        smol::block_on(async {
            let container = ContainerId::new("map");
            let backend = MemoryGateway::with_container(container.clone());
            backend.insert(
                &container,
                NodeRecord {
                    id: NodeId::new("n1"),
                    parent_id: None,
                    position: Some(RecordPosition {
                        x: Some(f32::NAN),
                        y: None,
                    }),
                    label: None,
                    description: None,
                    todo_list_id: None,
                    completed: None,
                },
            );
            let nodes = SyncGateway::new(backend).list(&container).await;
            assert_eq!(nodes.len(), 1);
            assert_eq!(nodes[0].position, CanvasPoint::ORIGIN);
        });
    }

    #[test]
    fn update_failure_is_swallowed() {
        smol::block_on(async {
            let gateway = SyncGateway::new(MemoryGateway::new());
            gateway.update(&NodeId::new("ghost"), &NodePatch::label("x")).await;
            assert_eq!(gateway.backend().calls(Operation::Update), 1);
        });
    }

    #[test]
    fn spawned_completion_resolves() {
        smol::block_on(async {
            let gateway = SyncGateway::new(MemoryGateway::new());
            gateway.backend().set_todo_list(TodoListId::new("l"), vec![true]);
            let task = gateway.spawn_completion(TodoListId::new("l"));
            assert_eq!(task.await, Some(true));
            assert_eq!(gateway.spawn_completion(TodoListId::new("missing")).await, None);
        });
    }
}
