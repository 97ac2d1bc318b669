use crate::{CreateNode, Gateway, GatewayError, NodeRecord};
use async_trait::async_trait;
use node::{ContainerId, NodeId, NodePatch, TodoListId};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Gateway calls, for failure injection and call counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateContainer,
    Create,
    Update,
    Delete,
    List,
    TodoCompletion,
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    containers: HashMap<ContainerId, Vec<NodeRecord>>,
    todo_lists: HashMap<TodoListId, Vec<bool>>,
    failing: HashSet<Operation>,
    calls: HashMap<Operation, usize>,
}

impl MemoryState {
    fn enter(&mut self, op: Operation) -> Result<(), GatewayError> {
        *self.calls.entry(op).or_default() += 1;
        if self.failing.contains(&op) {
            return Err(GatewayError::Rejected(format!("{op:?} is failing")));
        }
        Ok(())
    }

    fn find_mut(&mut self, id: &NodeId) -> Option<&mut NodeRecord> {
        self.containers
            .values_mut()
            .flat_map(|records| records.iter_mut())
            .find(|record| &record.id == id)
    }
}

/// In-process backend. Ids are `node-1`, `node-2`, ...
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(container: ContainerId) -> Self {
        let gateway = Self::new();
        gateway.state().containers.insert(container, Vec::new());
        gateway
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every subsequent `op` call fail until [`MemoryGateway::heal`].
    pub fn fail(&self, op: Operation) {
        self.state().failing.insert(op);
    }

    pub fn heal(&self, op: Operation) {
        self.state().failing.remove(&op);
    }

    pub fn calls(&self, op: Operation) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn has_container(&self, container: &ContainerId) -> bool {
        self.state().containers.contains_key(container)
    }

    /// Seed a stored record directly, bypassing id assignment.
    pub fn insert(&self, container: &ContainerId, record: NodeRecord) {
        self.state().containers.entry(container.clone()).or_default().push(record);
    }

    pub fn records(&self, container: &ContainerId) -> Vec<NodeRecord> {
        self.state().containers.get(container).cloned().unwrap_or_default()
    }

    pub fn set_todo_list(&self, list: TodoListId, done: Vec<bool>) {
        self.state().todo_lists.insert(list, done);
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn create_container(&self, container: &ContainerId) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.enter(Operation::CreateContainer)?;
        state.containers.entry(container.clone()).or_default();
        Ok(())
    }

    async fn create_node(&self, request: &CreateNode) -> Result<NodeId, GatewayError> {
        let mut state = self.state();
        state.enter(Operation::Create)?;
        if !state.containers.contains_key(&request.container_id) {
            return Err(GatewayError::MissingContainer(request.container_id.clone()));
        }
        state.next_id += 1;
        let id = NodeId::new(format!("node-{}", state.next_id));
        let record = request.clone().into_record(id.clone());
        state
            .containers
            .entry(request.container_id.clone())
            .or_default()
            .push(record);
        Ok(id)
    }

    async fn update_node(&self, id: &NodeId, patch: &NodePatch) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.enter(Operation::Update)?;
        let record = state
            .find_mut(id)
            .ok_or_else(|| GatewayError::NotFound(format!("node {id}")))?;
        record.apply(patch);
        Ok(())
    }

    async fn delete_node(&self, id: &NodeId) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.enter(Operation::Delete)?;
        let mut found = false;
        for records in state.containers.values_mut() {
            let before = records.len();
            records.retain(|record| &record.id != id);
            found |= records.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(GatewayError::NotFound(format!("node {id}")))
        }
    }

    async fn list_nodes(&self, container: &ContainerId) -> Result<Vec<NodeRecord>, GatewayError> {
        let mut state = self.state();
        state.enter(Operation::List)?;
        state
            .containers
            .get(container)
            .cloned()
            .ok_or_else(|| GatewayError::MissingContainer(container.clone()))
    }

    async fn todo_completion(&self, list: &TodoListId) -> Result<bool, GatewayError> {
        let mut state = self.state();
        state.enter(Operation::TodoCompletion)?;
        let items = state
            .todo_lists
            .get(list)
            .ok_or_else(|| GatewayError::NotFound(format!("todo list {list}")))?;
        Ok(!items.is_empty() && items.iter().all(|done| *done))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::CanvasPoint;

    fn request(container: &str, label: &str) -> CreateNode {
        CreateNode {
            container_id: ContainerId::new(container),
            parent_id: None,
            position: CanvasPoint::new(0.0, 0.0).into(),
            label: label.into(),
            description: None,
        }
    }

    #[test]
    fn create_assigns_sequential_ids() {
        smol::block_on(async {
            let gateway = MemoryGateway::with_container(ContainerId::new("map"));
            assert_eq!(gateway.create_node(&request("map", "a")).await.unwrap(), NodeId::new("node-1"));
            assert_eq!(gateway.create_node(&request("map", "b")).await.unwrap(), NodeId::new("node-2"));
            assert_eq!(gateway.records(&ContainerId::new("map")).len(), 2);
        });
    }

    #[test]
    fn create_without_container_fails() {
        smol::block_on(async {
            let gateway = MemoryGateway::new();
            let err = gateway.create_node(&request("map", "a")).await.unwrap_err();
            assert!(matches!(err, GatewayError::MissingContainer(_)));
        });
    }

    #[test]
    fn injected_failures_are_counted_and_healable() {
        smol::block_on(async {
            let gateway = MemoryGateway::with_container(ContainerId::new("map"));
            gateway.fail(Operation::List);
            assert!(gateway.list_nodes(&ContainerId::new("map")).await.is_err());
            gateway.heal(Operation::List);
            assert!(gateway.list_nodes(&ContainerId::new("map")).await.is_ok());
            assert_eq!(gateway.calls(Operation::List), 2);
        });
    }

    #[test]
    fn completion_requires_every_item() {
        smol::block_on(async {
            let gateway = MemoryGateway::new();
            gateway.set_todo_list(TodoListId::new("done"), vec![true, true]);
            gateway.set_todo_list(TodoListId::new("open"), vec![true, false]);
            gateway.set_todo_list(TodoListId::new("empty"), vec![]);

            assert!(gateway.todo_completion(&TodoListId::new("done")).await.unwrap());
            assert!(!gateway.todo_completion(&TodoListId::new("open")).await.unwrap());
            assert!(!gateway.todo_completion(&TodoListId::new("empty")).await.unwrap());
        });
    }
}
